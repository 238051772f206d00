//! Daily metrics log
//!
//! An append-only CSV with one row of computed metrics per date. Rows are
//! never rewritten: appending a date that is already logged is a no-op.

use chrono::NaiveDate;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::error::MetricsError;
use crate::types::DailyMetrics;

const HEADER: [&str; 10] = [
    "Date",
    "StDev_onset",
    "StDev_offset",
    "StDev_duration",
    "IS",
    "SJL",
    "CPD",
    "SRI",
    "optimal_bedtime",
    "optimal_waketime",
];

#[derive(Debug, Clone)]
pub struct MetricsLog {
    path: PathBuf,
}

impl MetricsLog {
    /// Open the log at `path`, creating it with a header row if absent
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, MetricsError> {
        let path = path.into();
        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let mut writer = csv::Writer::from_path(&path)?;
            writer.write_record(HEADER)?;
            writer.flush()?;
            tracing::info!(path = %path.display(), "created metrics log");
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_all(&self) -> Result<Vec<DailyMetrics>, MetricsError> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        reader
            .deserialize::<DailyMetrics>()
            .map(|row| row.map_err(MetricsError::from))
            .collect()
    }

    pub fn contains(&self, date: NaiveDate) -> Result<bool, MetricsError> {
        Ok(self.read_all()?.iter().any(|row| row.date == date))
    }

    /// Most recent logged row, by date
    pub fn latest(&self) -> Result<Option<DailyMetrics>, MetricsError> {
        Ok(self.read_all()?.into_iter().max_by_key(|row| row.date))
    }

    /// Append `row` unless its date is already logged; returns whether a row was written
    pub fn append(&self, row: &DailyMetrics) -> Result<bool, MetricsError> {
        if self.contains(row.date)? {
            tracing::info!(date = %row.date, "metrics already logged, skipping");
            return Ok(false);
        }

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(row)?;
        writer.flush()?;

        tracing::info!(date = %row.date, path = %self.path.display(), "metrics logged");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(day: u32) -> DailyMetrics {
        DailyMetrics {
            date: NaiveDate::from_ymd_opt(2024, 12, day).unwrap(),
            stdev_onset: 12.5,
            stdev_offset: 20.0,
            stdev_duration: 18.25,
            interdaily_stability: 0.82,
            social_jet_lag: -0.5,
            composite_phase_dev: None,
            sleep_regularity_index: None,
            optimal_bedtime: "23:10".to_string(),
            optimal_waketime: "07:05".to_string(),
        }
    }

    #[test]
    fn test_creates_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("sleep_metrics.csv");
        let log = MetricsLog::open(&path).unwrap();

        let text = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            text,
            "Date,StDev_onset,StDev_offset,StDev_duration,IS,SJL,CPD,SRI,optimal_bedtime,optimal_waketime\n"
        );
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_is_idempotent_per_date() {
        let dir = tempfile::tempdir().unwrap();
        let log = MetricsLog::open(dir.path().join("sleep_metrics.csv")).unwrap();

        assert!(log.append(&row(10)).unwrap());
        assert!(!log.append(&row(10)).unwrap());
        assert!(log.append(&row(9)).unwrap());

        let rows = log.read_all().unwrap();
        assert_eq!(rows, vec![row(10), row(9)]);
        assert_eq!(log.latest().unwrap(), Some(row(10)));
    }

    #[test]
    fn test_empty_metric_cells() {
        let dir = tempfile::tempdir().unwrap();
        let log = MetricsLog::open(dir.path().join("sleep_metrics.csv")).unwrap();
        log.append(&row(10)).unwrap();

        let text = std::fs::read_to_string(log.path()).unwrap();
        let data_line = text.lines().nth(1).unwrap();
        assert_eq!(data_line, "2024-12-10,12.5,20.0,18.25,0.82,-0.5,,,23:10,07:05");
    }

    #[test]
    fn test_reopen_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sleep_metrics.csv");
        MetricsLog::open(&path).unwrap().append(&row(10)).unwrap();

        let reopened = MetricsLog::open(&path).unwrap();
        assert!(reopened.contains(NaiveDate::from_ymd_opt(2024, 12, 10).unwrap()).unwrap());
    }
}
