//! Garmin sleep adapter
//!
//! Reads the per-night `sleep_<YYYY-MM-DD>.json` exports and extracts onset
//! and offset from the first and last sleep-movement entries.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::NightSource;
use crate::config::EngineConfig;
use crate::error::MetricsError;
use crate::types::NightRecord;

/// Directory of Garmin sleep exports, one file per night
#[derive(Debug, Clone)]
pub struct GarminSleepDirectory {
    dir: PathBuf,
    tz: Tz,
    shift_hours: i64,
}

impl GarminSleepDirectory {
    pub fn new(dir: impl Into<PathBuf>, tz: Tz, shift_hours: i64) -> Self {
        Self {
            dir: dir.into(),
            tz,
            shift_hours,
        }
    }

    /// Build from the sleep directory and time handling in `config`
    pub fn from_config(config: &EngineConfig) -> Result<Self, MetricsError> {
        Ok(Self::new(
            config.sleep_dir.clone(),
            config.tz()?,
            config.local_shift_hours,
        ))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the export for `date`
    pub fn file_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("sleep_{}.json", date.format("%Y-%m-%d")))
    }
}

impl NightSource for GarminSleepDirectory {
    fn night_record(&self, date: NaiveDate) -> Result<NightRecord, MetricsError> {
        let path = self.file_for(date);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MetricsError::NotFound(date));
            }
            Err(e) => return Err(MetricsError::Io(e)),
        };
        extract_night(date, &contents, &self.tz, self.shift_hours)
    }
}

/// Extract a night's onset and offset from a Garmin sleep export.
///
/// Timestamps are UTC. They are converted into `tz` and then moved by a fixed
/// `shift_hours`, regardless of daylight saving, which is how the historical
/// dataset was produced.
pub fn extract_night(
    date: NaiveDate,
    raw_json: &str,
    tz: &Tz,
    shift_hours: i64,
) -> Result<NightRecord, MetricsError> {
    let export: GarminSleepExport = serde_json::from_str(raw_json)
        .map_err(|e| MetricsError::Malformed(format!("sleep export for {}: {}", date, e)))?;

    let (first, last) = match (export.sleep_movement.first(), export.sleep_movement.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(MetricsError::Malformed(format!(
                "sleep export for {} has no sleepMovement entries",
                date
            )))
        }
    };

    let start = first.start_gmt.as_deref().ok_or_else(|| {
        MetricsError::Malformed(format!("first sleepMovement entry for {} lacks startGMT", date))
    })?;
    let end = last.end_gmt.as_deref().ok_or_else(|| {
        MetricsError::Malformed(format!("last sleepMovement entry for {} lacks endGMT", date))
    })?;

    let onset_time = to_local_clock(parse_gmt_timestamp(start)?, tz, shift_hours);
    let offset_time = to_local_clock(parse_gmt_timestamp(end)?, tz, shift_hours);

    Ok(NightRecord::new(date, onset_time, offset_time))
}

/// Parse a Garmin GMT timestamp such as `2024-12-01 22:30:00.0`
pub fn parse_gmt_timestamp(raw: &str) -> Result<NaiveDateTime, MetricsError> {
    let trimmed = raw.trim().trim_end_matches('Z');
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| MetricsError::Malformed(format!("invalid GMT timestamp '{}'", raw)))
}

/// Shift is wall-clock arithmetic on the local time, not on the instant
fn to_local_clock(utc: NaiveDateTime, tz: &Tz, shift_hours: i64) -> NaiveTime {
    let local = (tz.from_utc_datetime(&utc).naive_local() + Duration::hours(shift_hours)).time();
    NaiveTime::from_hms_opt(local.hour(), local.minute(), 0).unwrap_or_default()
}

// Garmin export structures

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GarminSleepExport {
    #[serde(default)]
    sleep_movement: Vec<SleepMovement>,
}

#[derive(Debug, Deserialize)]
struct SleepMovement {
    #[serde(rename = "startGMT")]
    start_gmt: Option<String>,
    #[serde(rename = "endGMT")]
    end_gmt: Option<String>,
}
