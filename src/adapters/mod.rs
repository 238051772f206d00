//! Data source adapters
//!
//! This module provides the sources the engine reads from: per-night sleep
//! files exported from Garmin (and the downloader that refreshes them), a CSV ledger of previously extracted nights,
//! and per-night bedroom sensor files from ThingSpeak.

mod garmin;
mod garmin_sync;
mod ledger;
mod thingspeak;

pub use garmin::{extract_night, parse_gmt_timestamp, GarminSleepDirectory};
pub use garmin_sync::GarminSync;
pub use ledger::NightLedger;
#[cfg(feature = "fetch")]
pub use thingspeak::ThingSpeakClient;
pub use thingspeak::{average_feed_csv, feed_url, ThingSpeakNightFiles};

use chrono::NaiveDate;

use crate::error::MetricsError;
use crate::types::{EnvironmentReading, NightRecord};

/// Trait for anything that can produce onset/offset times for a date
pub trait NightSource {
    /// Fetch the night keyed by `date`.
    ///
    /// Fails with `NotFound` when there is no record for the date and with
    /// `Malformed` when the record exists but cannot be read.
    fn night_record(&self, date: NaiveDate) -> Result<NightRecord, MetricsError>;
}

/// Trait for sources of averaged bedroom conditions
pub trait EnvironmentSource {
    /// Fails with `EnvironmentUnavailable` when nothing was recorded for `date`
    fn environment_reading(&self, date: NaiveDate) -> Result<EnvironmentReading, MetricsError>;
}

impl<T: NightSource + ?Sized> NightSource for &T {
    fn night_record(&self, date: NaiveDate) -> Result<NightRecord, MetricsError> {
        (**self).night_record(date)
    }
}

impl<T: NightSource + ?Sized> NightSource for Box<T> {
    fn night_record(&self, date: NaiveDate) -> Result<NightRecord, MetricsError> {
        (**self).night_record(date)
    }
}
