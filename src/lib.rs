//! circadia - Circadian-rhythm regularity metrics from nightly sleep data
//!
//! circadia turns per-night sleep onset/offset times into regularity metrics
//! through a one-way pipeline: source adaptation → rolling window → metric
//! computation → recommendation.
//!
//! ## Metrics
//!
//! - **Variability**: standard deviation of onset, offset and duration
//! - **Interdaily stability**: day-to-day alignment of sleep/wake epochs
//! - **Social jet lag**: free-day vs workday sleep midpoint difference
//! - **Optimal bedtime**: gradual schedule correction toward an ideal
//! - **Environment**: bedroom temperature/humidity against ideal conditions

pub mod adapters;
pub mod bedtime;
pub mod clock;
pub mod config;
pub mod engine;
pub mod environment;
pub mod error;
pub mod jet_lag;
pub mod metrics_log;
pub mod stability;
pub mod types;
pub mod variability;
pub mod window;

pub use adapters::{EnvironmentSource, GarminSleepDirectory, NightLedger, NightSource};
pub use clock::format_time;
pub use config::EngineConfig;
pub use engine::CircadianEngine;
pub use error::MetricsError;
pub use metrics_log::MetricsLog;
pub use window::{window_dates, Window};

/// circadia version
pub const CIRCADIA_VERSION: &str = env!("CARGO_PKG_VERSION");
