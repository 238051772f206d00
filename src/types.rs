//! Core types for circadia
//!
//! This module defines the data structures that flow through the engine:
//! per-night records, metric results, environment readings and the rows of
//! the daily metrics log.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::clock::serde_hhmm;

/// Onset and offset clock times for one night.
///
/// Times carry no date context: an offset earlier than (or equal to) the
/// onset means the interval crosses midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightRecord {
    /// Calendar date the night is keyed by
    pub date: NaiveDate,
    /// Sleep onset (local clock time)
    #[serde(with = "serde_hhmm")]
    pub onset_time: NaiveTime,
    /// Sleep offset (local clock time)
    #[serde(with = "serde_hhmm")]
    pub offset_time: NaiveTime,
}

impl NightRecord {
    pub fn new(date: NaiveDate, onset_time: NaiveTime, offset_time: NaiveTime) -> Self {
        Self {
            date,
            onset_time,
            offset_time,
        }
    }

    /// Whether the sleep interval runs past midnight
    pub fn crosses_midnight(&self) -> bool {
        self.offset_time <= self.onset_time
    }
}

/// Per-night minute offsets that the standard deviations are computed over
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariabilityValues {
    /// Sleep duration per night (minutes)
    pub duration: Vec<f64>,
    /// Onset as minutes before midnight (positive = before midnight)
    pub sleep_times: Vec<f64>,
    /// Offset as minutes after midnight (negative = before midnight)
    pub wake_times: Vec<f64>,
}

/// Sample standard deviations of onset, offset and duration over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariabilityResult {
    pub stdev_onset: f64,
    pub stdev_offset: f64,
    pub stdev_duration: f64,
    pub values: VariabilityValues,
}

/// Recommended schedule for the coming nights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BedtimeRecommendation {
    /// Recommended sleep duration (minutes)
    pub sleep_duration: f64,
    /// Recommended bedtime (HH:MM)
    pub bedtime: String,
    /// Recommended wake time (HH:MM)
    pub wake_time: String,
}

/// Averaged bedroom conditions for one night
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentReading {
    pub date: NaiveDate,
    /// Mean temperature (°C)
    pub avg_temperature: f64,
    /// Mean relative humidity (%)
    pub avg_humidity: f64,
    /// Number of sensor samples averaged
    pub samples: usize,
}

/// How strongly a bedroom condition should be corrected
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionLevel {
    None,
    Moderate,
    Significant,
}

impl InterventionLevel {
    pub fn as_u8(&self) -> u8 {
        match self {
            InterventionLevel::None => 0,
            InterventionLevel::Moderate => 1,
            InterventionLevel::Significant => 2,
        }
    }
}

/// Distance of the bedroom from ideal conditions, with advice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentDelta {
    /// Signed temperature difference from ideal (°C)
    pub temperature_difference: f64,
    /// Signed humidity difference from ideal (%)
    pub humidity_difference: f64,
    pub temperature_level: InterventionLevel,
    pub humidity_level: InterventionLevel,
    pub temperature_advice: String,
    pub humidity_advice: String,
}

/// One row of the daily metrics log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetrics {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "StDev_onset")]
    pub stdev_onset: f64,
    #[serde(rename = "StDev_offset")]
    pub stdev_offset: f64,
    #[serde(rename = "StDev_duration")]
    pub stdev_duration: f64,
    #[serde(rename = "IS")]
    pub interdaily_stability: f64,
    #[serde(rename = "SJL")]
    pub social_jet_lag: f64,
    /// Composite phase deviation (no algorithm yet, always empty)
    #[serde(rename = "CPD")]
    pub composite_phase_dev: Option<f64>,
    /// Sleep regularity index (no algorithm yet, always empty)
    #[serde(rename = "SRI")]
    pub sleep_regularity_index: Option<f64>,
    pub optimal_bedtime: String,
    pub optimal_waketime: String,
}
