//! ThingSpeak bedroom sensor adapter
//!
//! The bedroom sensor publishes to a ThingSpeak channel (field1 =
//! temperature in °C, field2 = relative humidity in %). Each night's feed is
//! cached as `nightdata_<YYYY-MM-DD>.csv`; this module averages those files
//! and, with the `fetch` feature, downloads them.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::EnvironmentSource;
use crate::error::MetricsError;
use crate::types::{EnvironmentReading, NightRecord};

const THINGSPEAK_BASE_URL: &str = "https://api.thingspeak.com";

/// Directory of cached per-night feed files
#[derive(Debug, Clone)]
pub struct ThingSpeakNightFiles {
    dir: PathBuf,
}

impl ThingSpeakNightFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_for(&self, date: NaiveDate) -> PathBuf {
        night_file(&self.dir, date)
    }
}

impl EnvironmentSource for ThingSpeakNightFiles {
    fn environment_reading(&self, date: NaiveDate) -> Result<EnvironmentReading, MetricsError> {
        let path = self.file_for(date);
        let file = match std::fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MetricsError::EnvironmentUnavailable(date));
            }
            Err(e) => return Err(MetricsError::Io(e)),
        };
        average_feed_csv(date, file)
    }
}

fn night_file(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("nightdata_{}.csv", date.format("%Y-%m-%d")))
}

/// Average the temperature and humidity columns of a ThingSpeak feed CSV.
///
/// Blank or non-numeric cells are skipped. A feed without any usable
/// temperature or humidity sample is reported as unavailable.
pub fn average_feed_csv<R: Read>(
    date: NaiveDate,
    reader: R,
) -> Result<EnvironmentReading, MetricsError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let mut temperatures = Vec::new();
    let mut humidities = Vec::new();
    for row in csv_reader.deserialize::<FeedRow>() {
        let row = row?;
        if let Some(t) = row.field1 {
            temperatures.push(t);
        }
        if let Some(h) = row.field2 {
            humidities.push(h);
        }
    }

    if temperatures.is_empty() || humidities.is_empty() {
        tracing::warn!(%date, "environment feed has no usable samples");
        return Err(MetricsError::EnvironmentUnavailable(date));
    }

    Ok(EnvironmentReading {
        date,
        avg_temperature: mean(&temperatures),
        avg_humidity: mean(&humidities),
        samples: temperatures.len(),
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Feed URL covering one night.
///
/// A night is keyed by its wake-up date, so an interval crossing midnight
/// starts on the previous day.
pub fn feed_url(channel_id: &str, api_key: &str, night: &NightRecord) -> String {
    let end = NaiveDateTime::new(night.date, night.offset_time);
    let start_date = if night.crosses_midnight() {
        night.date - Duration::days(1)
    } else {
        night.date
    };
    let start = NaiveDateTime::new(start_date, night.onset_time);

    format!(
        "{}/channels/{}/feeds.csv?api_key={}&start={}&end={}",
        THINGSPEAK_BASE_URL,
        channel_id,
        api_key,
        encode_timestamp(start),
        encode_timestamp(end)
    )
}

fn encode_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d%%20%H:%M:%S").to_string()
}

/// Blocking downloader for per-night feed files
#[cfg(feature = "fetch")]
pub struct ThingSpeakClient {
    http: reqwest::blocking::Client,
    channel_id: String,
    api_key: String,
    dir: PathBuf,
}

#[cfg(feature = "fetch")]
impl ThingSpeakClient {
    pub fn new(channel_id: String, api_key: String, dir: impl Into<PathBuf>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            channel_id,
            api_key,
            dir: dir.into(),
        }
    }

    /// Build from the channel credentials and cache directory in `config`
    pub fn from_config(config: &crate::config::EngineConfig) -> Result<Self, MetricsError> {
        let channel_id = config.thingspeak.channel_id.clone().ok_or_else(|| {
            MetricsError::Fetch("thingspeak.channel_id is not configured".to_string())
        })?;
        let api_key = config.thingspeak.api_key.clone().ok_or_else(|| {
            MetricsError::Fetch("thingspeak.api_key is not configured".to_string())
        })?;
        Ok(Self::new(channel_id, api_key, config.environment_dir.clone()))
    }

    /// Download the feed for `night` and cache it, returning the file path
    pub fn fetch_night(&self, night: &NightRecord) -> Result<PathBuf, MetricsError> {
        let url = feed_url(&self.channel_id, &self.api_key, night);
        tracing::info!(date = %night.date, channel = %self.channel_id, "fetching environment feed");

        let body = self
            .http
            .get(&url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.bytes())
            .map_err(|e| MetricsError::Fetch(e.to_string()))?;

        std::fs::create_dir_all(&self.dir)?;
        let path = night_file(&self.dir, night.date);
        std::fs::write(&path, &body)?;
        tracing::info!(path = %path.display(), bytes = body.len(), "environment feed saved");
        Ok(path)
    }
}

// ThingSpeak feed structures

#[derive(Debug, Deserialize)]
struct FeedRow {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    field1: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    field2: Option<f64>,
}
