//! Social jet lag
//!
//! The difference between the average sleep midpoint on free days (Saturday
//! and Sunday) and on workdays, in hours.

use chrono::{Datelike, Weekday};

use crate::clock::{fractional_hours, sleep_midpoint};
use crate::error::MetricsError;
use crate::types::NightRecord;

/// Whether a night's date falls on a free day
pub fn is_free_day(night: &NightRecord) -> bool {
    matches!(night.date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Signed social jet lag in hours (free-day average − workday average).
///
/// Both groups must have at least one night; an empty group is reported as
/// `InsufficientData` rather than averaged as zero.
pub fn social_jet_lag(nights: &[NightRecord]) -> Result<f64, MetricsError> {
    let (free, work): (Vec<&NightRecord>, Vec<&NightRecord>) =
        nights.iter().partition(|n| is_free_day(n));

    let free_avg = average_midpoint(&free).ok_or_else(|| {
        MetricsError::InsufficientData("social jet lag needs at least one free day".to_string())
    })?;
    let work_avg = average_midpoint(&work).ok_or_else(|| {
        MetricsError::InsufficientData("social jet lag needs at least one workday".to_string())
    })?;

    Ok(free_avg - work_avg)
}

fn average_midpoint(nights: &[&NightRecord]) -> Option<f64> {
    if nights.is_empty() {
        return None;
    }
    let total: f64 = nights
        .iter()
        .map(|n| fractional_hours(sleep_midpoint(n.onset_time, n.offset_time)))
        .sum();
    Some(total / nights.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::parse_clock;
    use crate::window::window_dates;
    use chrono::NaiveDate;

    fn week(reference: NaiveDate, times: impl Fn(NaiveDate) -> (&'static str, &'static str)) -> Vec<NightRecord> {
        window_dates(reference, 7)
            .into_iter()
            .map(|date| {
                let (onset, offset) = times(date);
                NightRecord::new(date, parse_clock(onset).unwrap(), parse_clock(offset).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_identical_week_has_no_jet_lag() {
        let nights = week(NaiveDate::from_ymd_opt(2024, 12, 10).unwrap(), |_| ("23:00", "07:00"));
        assert_eq!(social_jet_lag(&nights).unwrap(), 0.0);
    }

    #[test]
    fn test_later_weekend_midpoint_is_positive() {
        let nights = week(NaiveDate::from_ymd_opt(2024, 12, 10).unwrap(), |date| {
            match date.weekday() {
                Weekday::Sat | Weekday::Sun => ("01:00", "10:00"),
                _ => ("23:00", "07:00"),
            }
        });

        // free midpoint 05:30, workday midpoint 03:00
        let sjl = social_jet_lag(&nights).unwrap();
        assert!((sjl - 2.5).abs() < 1e-9, "SJL = {sjl}");
    }

    #[test]
    fn test_weekday_only_window_is_insufficient() {
        // 2024-12-10 is a Tuesday; Mon + Tue only
        let nights: Vec<_> = window_dates(NaiveDate::from_ymd_opt(2024, 12, 10).unwrap(), 2)
            .into_iter()
            .map(|date| {
                NightRecord::new(date, parse_clock("23:00").unwrap(), parse_clock("07:00").unwrap())
            })
            .collect();
        assert!(matches!(
            social_jet_lag(&nights),
            Err(MetricsError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_free_day_classification() {
        let saturday = NightRecord::new(
            NaiveDate::from_ymd_opt(2024, 12, 7).unwrap(),
            parse_clock("23:00").unwrap(),
            parse_clock("07:00").unwrap(),
        );
        let friday = NightRecord {
            date: NaiveDate::from_ymd_opt(2024, 12, 6).unwrap(),
            ..saturday
        };
        assert!(is_free_day(&saturday));
        assert!(!is_free_day(&friday));
    }
}
