//! Clock arithmetic
//!
//! Sleep times are naive clock times. To do statistics across midnight they
//! are mapped to signed minute offsets centred on midnight: anything after
//! 12:00 counts as "minutes before midnight" (negative), anything up to 12:00
//! as "minutes after midnight".

use chrono::{Duration, NaiveTime, Timelike};

use crate::error::MetricsError;

pub const MINUTES_PER_DAY: i64 = 24 * 60;
const HALF_DAY_MINUTES: i64 = 12 * 60;

/// Parse an `HH:MM` clock time
pub fn parse_clock(value: &str) -> Result<NaiveTime, MetricsError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|e| MetricsError::Malformed(format!("invalid clock time '{}': {}", value, e)))
}

/// Minutes since midnight, ignoring seconds
pub fn clock_minutes(time: NaiveTime) -> i64 {
    (time.hour() * 60 + time.minute()) as i64
}

/// Minutes from midnight folded into (-720, 720]
pub fn signed_minutes(time: NaiveTime) -> i64 {
    let minutes = clock_minutes(time);
    if minutes > HALF_DAY_MINUTES {
        minutes - MINUTES_PER_DAY
    } else {
        minutes
    }
}

/// Onset as minutes before midnight, so 23:00 becomes 60 and 00:30 becomes -30
pub fn onset_offset_minutes(onset: NaiveTime) -> f64 {
    -(signed_minutes(onset) as f64)
}

/// Offset as minutes after midnight, so 07:00 becomes 420 and 23:30 becomes -30
pub fn wake_offset_minutes(offset: NaiveTime) -> f64 {
    signed_minutes(offset) as f64
}

/// Format a minute count as `HH:MM`, wrapping at 24 hours.
///
/// Negative values count back from midnight: `-60` is `"23:00"`.
pub fn format_time(minutes: f64) -> String {
    let hours = (minutes / 60.0).floor().rem_euclid(24.0) as u32;
    let mins = minutes.rem_euclid(60.0).floor() as u32;
    format!("{:02}:{:02}", hours, mins)
}

/// Length of the interval from onset to offset in minutes.
///
/// An offset at or before the onset is taken to be on the next day.
pub fn interval_minutes(onset: NaiveTime, offset: NaiveTime) -> i64 {
    let diff = clock_minutes(offset) - clock_minutes(onset);
    if offset <= onset {
        diff + MINUTES_PER_DAY
    } else {
        diff
    }
}

/// Clock time halfway between onset and offset
pub fn sleep_midpoint(onset: NaiveTime, offset: NaiveTime) -> NaiveTime {
    let onset = onset.with_second(0).unwrap_or(onset);
    let half_seconds = interval_minutes(onset, offset) * 30;
    onset + Duration::seconds(half_seconds)
}

/// Hour of day as a fraction, seconds dropped
pub fn fractional_hours(time: NaiveTime) -> f64 {
    time.hour() as f64 + time.minute() as f64 / 60.0
}

/// Serde adapter for `HH:MM` clock times
pub mod serde_hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_clock(&raw).map_err(serde::de::Error::custom)
    }
}
