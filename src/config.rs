//! Engine configuration
//!
//! Everything that used to be process-wide constants (ideal bedroom
//! conditions, time-zone handling, data locations, feed credentials) lives in
//! one explicit [`EngineConfig`] value that is handed to the engine.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::bedtime::MAX_DAYS_TO_TARGET;
use crate::clock::MINUTES_PER_DAY;
use crate::error::MetricsError;

/// Default callback period in days
pub const DEFAULT_PERIOD: usize = 7;

/// Default number of epochs each day is split into for interdaily stability
pub const DEFAULT_EPOCHS_PER_DAY: usize = 24;

/// Environment variable naming a JSON config file
pub const CONFIG_PATH_ENV: &str = "CIRCADIA_CONFIG";
pub const THINGSPEAK_CHANNEL_ENV: &str = "CIRCADIA_THINGSPEAK_CHANNEL";
pub const THINGSPEAK_API_KEY_ENV: &str = "CIRCADIA_THINGSPEAK_API_KEY";

/// Ideal bedroom conditions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdealConditions {
    /// Temperature (°C)
    pub temperature: f64,
    /// Relative humidity (%)
    pub humidity: f64,
}

impl Default for IdealConditions {
    fn default() -> Self {
        Self {
            temperature: 19.0,
            humidity: 60.0,
        }
    }
}

/// ThingSpeak channel holding the bedroom sensor feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThingSpeakConfig {
    pub channel_id: Option<String>,
    pub api_key: Option<String>,
}

/// External command that downloads new Garmin sleep exports into `sleep_dir`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GarminSyncConfig {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for GarminSyncConfig {
    fn default() -> Self {
        Self {
            command: "garmindb_cli.py".to_string(),
            args: ["--all", "--download", "--import", "--analyze", "--latest"]
                .iter()
                .map(|arg| arg.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// IANA zone the sensor's UTC timestamps are converted into
    pub timezone: String,
    /// Fixed shift applied after zone conversion (hours, DST-naive)
    pub local_shift_hours: i64,
    /// Callback period used when none is given
    pub default_period: usize,
    /// Epochs per day for interdaily stability; must divide 1440
    pub epochs_per_day: usize,
    /// Days ahead the bedtime projection aims at
    pub target_horizon_days: i64,
    pub ideal: IdealConditions,
    /// Directory of `sleep_<date>.json` files
    pub sleep_dir: PathBuf,
    /// Directory of `nightdata_<date>.csv` files
    pub environment_dir: PathBuf,
    /// Append-only daily metrics log
    pub metrics_log: PathBuf,
    pub thingspeak: ThingSpeakConfig,
    pub garmin_sync: GarminSyncConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: "Europe/London".to_string(),
            local_shift_hours: 1,
            default_period: DEFAULT_PERIOD,
            epochs_per_day: DEFAULT_EPOCHS_PER_DAY,
            target_horizon_days: 3,
            ideal: IdealConditions::default(),
            sleep_dir: PathBuf::from("HealthData/Sleep"),
            environment_dir: PathBuf::from("data/night_sensor_data"),
            metrics_log: PathBuf::from("data/sleep_metrics.csv"),
            thingspeak: ThingSpeakConfig::default(),
            garmin_sync: GarminSyncConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, MetricsError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, MetricsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Resolve configuration: explicit path, then `CIRCADIA_CONFIG`, then
    /// defaults. Feed credentials can be overridden from the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, MetricsError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| env_non_empty(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut config = match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading engine config");
                let contents = std::fs::read_to_string(&path)?;
                Self::from_json(&contents)?
            }
            None => Self::default(),
        };

        if let Some(channel) = env_non_empty(THINGSPEAK_CHANNEL_ENV) {
            config.thingspeak.channel_id = Some(channel);
        }
        if let Some(key) = env_non_empty(THINGSPEAK_API_KEY_ENV) {
            config.thingspeak.api_key = Some(key);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MetricsError> {
        self.tz()?;
        if self.epochs_per_day == 0 || MINUTES_PER_DAY % self.epochs_per_day as i64 != 0 {
            return Err(MetricsError::InvalidRange(format!(
                "epochs_per_day must divide 1440, got {}",
                self.epochs_per_day
            )));
        }
        if self.default_period == 0 {
            return Err(MetricsError::InvalidRange(
                "default_period must be at least 1".to_string(),
            ));
        }
        if !(1..=MAX_DAYS_TO_TARGET).contains(&self.target_horizon_days) {
            return Err(MetricsError::InvalidRange(format!(
                "target_horizon_days must be 1 to {}, got {}",
                MAX_DAYS_TO_TARGET, self.target_horizon_days
            )));
        }
        Ok(())
    }

    /// Parsed time zone
    pub fn tz(&self) -> Result<Tz, MetricsError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| MetricsError::InvalidTimezone(self.timezone.clone()))
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
