//! Night ledger
//!
//! An in-memory set of already extracted nights, persisted as a CSV with
//! `date,onset_time,offset_time` columns. Serves nights exactly like the
//! Garmin directory does, so metrics over logged nights and freshly extracted
//! ones are computed the same way.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

use super::NightSource;
use crate::error::MetricsError;
use crate::types::NightRecord;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NightLedger {
    nights: BTreeMap<NaiveDate, NightRecord>,
}

impl NightLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the night for `record.date`
    pub fn insert(&mut self, record: NightRecord) -> Option<NightRecord> {
        self.nights.insert(record.date, record)
    }

    pub fn len(&self) -> usize {
        self.nights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nights.is_empty()
    }

    /// Nights in ascending date order
    pub fn iter(&self) -> impl Iterator<Item = &NightRecord> {
        self.nights.values()
    }

    /// Copy the nights for `dates` out of another source.
    ///
    /// Dates the source has no record for are skipped and logged.
    pub fn capture<S: NightSource>(
        source: &S,
        dates: impl IntoIterator<Item = NaiveDate>,
    ) -> Result<Self, MetricsError> {
        let mut ledger = Self::new();
        for date in dates {
            match source.night_record(date) {
                Ok(record) => {
                    ledger.insert(record);
                }
                Err(MetricsError::NotFound(missing)) => {
                    tracing::warn!(date = %missing, "no night record, not captured");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(ledger)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, MetricsError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut ledger = Self::new();
        for row in csv_reader.deserialize::<NightRecord>() {
            ledger.insert(row?);
        }
        Ok(ledger)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), MetricsError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for record in self.nights.values() {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, MetricsError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn save(&self, path: &Path) -> Result<(), MetricsError> {
        let file = std::fs::File::create(path)?;
        self.to_writer(file)
    }
}

impl NightSource for NightLedger {
    fn night_record(&self, date: NaiveDate) -> Result<NightRecord, MetricsError> {
        self.nights
            .get(&date)
            .copied()
            .ok_or(MetricsError::NotFound(date))
    }
}

impl FromIterator<NightRecord> for NightLedger {
    fn from_iter<I: IntoIterator<Item = NightRecord>>(iter: I) -> Self {
        let mut ledger = Self::new();
        for record in iter {
            ledger.insert(record);
        }
        ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::parse_clock;
    use pretty_assertions::assert_eq;

    fn night(date: &str, onset: &str, offset: &str) -> NightRecord {
        NightRecord::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            parse_clock(onset).unwrap(),
            parse_clock(offset).unwrap(),
        )
    }

    #[test]
    fn test_csv_layout() {
        let ledger: NightLedger = vec![
            night("2024-12-02", "00:15", "07:45"),
            night("2024-12-01", "23:00", "07:00"),
        ]
        .into_iter()
        .collect();

        let mut buf = Vec::new();
        ledger.to_writer(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "date,onset_time,offset_time\n2024-12-01,23:00,07:00\n2024-12-02,00:15,07:45\n"
        );
    }

    #[test]
    fn test_reads_logged_nights() {
        let csv = "date,onset_time,offset_time\n2024-12-01,23:00,07:00\n";
        let ledger = NightLedger::from_reader(csv.as_bytes()).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();

        assert_eq!(
            ledger.night_record(date).unwrap(),
            night("2024-12-01", "23:00", "07:00")
        );
        assert!(matches!(
            ledger.night_record(date.succ_opt().unwrap()),
            Err(MetricsError::NotFound(_))
        ));
    }

    #[test]
    fn test_bad_clock_cell_fails() {
        let csv = "date,onset_time,offset_time\n2024-12-01,late,07:00\n";
        assert!(NightLedger::from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_capture_skips_missing_dates() {
        let source: NightLedger = vec![night("2024-12-01", "23:00", "07:00")]
            .into_iter()
            .collect();
        let first = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        let dates = vec![first, first.succ_opt().unwrap()];

        let captured = NightLedger::capture(&source, dates).unwrap();
        assert_eq!(captured.len(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nights.csv");
        let ledger: NightLedger = vec![night("2024-12-01", "23:00", "07:00")]
            .into_iter()
            .collect();

        ledger.save(&path).unwrap();
        assert_eq!(NightLedger::load(&path).unwrap(), ledger);
    }
}
