//! Rolling windows
//!
//! Every metric that takes a callback period builds its date set through
//! [`window_dates`], so calls with the same arguments always cover the same
//! nights.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::adapters::NightSource;
use crate::error::MetricsError;
use crate::types::NightRecord;

/// `period` calendar dates ending at `date`, most recent first
pub fn window_dates(date: NaiveDate, period: usize) -> Vec<NaiveDate> {
    (0..period as i64)
        .map(|offset| date - Duration::days(offset))
        .collect()
}

/// Nights for consecutive dates ending at a reference date, most recent first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub reference: NaiveDate,
    pub nights: Vec<NightRecord>,
}

impl Window {
    /// Load the nights for `period` dates ending at `date`.
    ///
    /// Any date without a usable record fails the whole window; nothing is
    /// skipped or filled in.
    pub fn collect<S: NightSource + ?Sized>(
        source: &S,
        date: NaiveDate,
        period: usize,
    ) -> Result<Self, MetricsError> {
        let nights = window_dates(date, period)
            .into_iter()
            .map(|day| source.night_record(day))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(reference = %date, period, "window collected");
        Ok(Self {
            reference: date,
            nights,
        })
    }

    pub fn len(&self) -> usize {
        self.nights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nights.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.nights.iter().map(|n| n.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::NightLedger;
    use crate::clock::parse_clock;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_dates_descend_across_month_boundary() {
        let dates = window_dates(d(2024, 12, 2), 4);
        assert_eq!(
            dates,
            vec![d(2024, 12, 2), d(2024, 12, 1), d(2024, 11, 30), d(2024, 11, 29)]
        );
        assert!(window_dates(d(2024, 12, 2), 0).is_empty());
    }

    #[test]
    fn test_collect_fails_on_gap() {
        let ledger: NightLedger = [d(2024, 12, 3), d(2024, 12, 1)]
            .into_iter()
            .map(|date| {
                NightRecord::new(date, parse_clock("23:00").unwrap(), parse_clock("07:00").unwrap())
            })
            .collect();

        let result = Window::collect(&ledger, d(2024, 12, 3), 3);
        assert!(matches!(result, Err(MetricsError::NotFound(missing)) if missing == d(2024, 12, 2)));

        let window = Window::collect(&ledger, d(2024, 12, 1), 1).unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window.dates().collect::<Vec<_>>(), vec![d(2024, 12, 1)]);
    }
}
