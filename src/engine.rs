//! Metrics engine
//!
//! This module provides the public API of circadia. The engine binds a night
//! source to a configuration; every call builds its window from scratch and
//! runs the pure metric functions over it. Nothing is cached.

use chrono::{Duration, NaiveDate};

use crate::adapters::{EnvironmentSource, NightSource};
use crate::bedtime;
use crate::config::EngineConfig;
use crate::environment;
use crate::error::MetricsError;
use crate::jet_lag;
use crate::stability;
use crate::types::{
    BedtimeRecommendation, DailyMetrics, EnvironmentDelta, EnvironmentReading, VariabilityResult,
};
use crate::variability;
use crate::window::Window;

pub struct CircadianEngine<S> {
    source: S,
    config: EngineConfig,
}

impl<S: NightSource> CircadianEngine<S> {
    pub fn new(source: S, config: EngineConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Nights for `period` dates ending at `date`, most recent first
    pub fn window(&self, date: NaiveDate, period: usize) -> Result<Window, MetricsError> {
        Window::collect(&self.source, date, period)
    }

    /// Onset, offset and duration standard deviations over the window
    pub fn variability(
        &self,
        date: NaiveDate,
        period: usize,
    ) -> Result<VariabilityResult, MetricsError> {
        let window = self.window(date, period)?;
        variability::st_devs(&window.nights)
    }

    pub fn interdaily_stability(&self, date: NaiveDate, period: usize) -> Result<f64, MetricsError> {
        let window = self.window(date, period)?;
        stability::interdaily_stability(&window.nights, self.config.epochs_per_day)
    }

    /// Per-night sleep (0) / wake (1) epochs, most recent night first
    pub fn sleep_wake_matrix(
        &self,
        date: NaiveDate,
        period: usize,
    ) -> Result<Vec<Vec<u8>>, MetricsError> {
        let window = self.window(date, period)?;
        stability::sleep_wake_matrix(&window.nights, self.config.epochs_per_day)
    }

    /// Social jet lag in hours
    pub fn social_jet_lag(&self, date: NaiveDate, period: usize) -> Result<f64, MetricsError> {
        let window = self.window(date, period)?;
        jet_lag::social_jet_lag(&window.nights)
    }

    /// Recommended bedtime and wake time aiming at the configured horizon
    pub fn optimal_bedtime(
        &self,
        date: NaiveDate,
        period: usize,
    ) -> Result<BedtimeRecommendation, MetricsError> {
        let target_date = Duration::try_days(self.config.target_horizon_days)
            .and_then(|horizon| date.checked_add_signed(horizon))
            .ok_or_else(|| {
                MetricsError::InvalidRange(format!(
                    "target date {} days after {} is out of range",
                    self.config.target_horizon_days, date
                ))
            })?;
        let days_to_target = (target_date - date).num_days();

        let window = self.window(date, period)?;
        let variability = variability::st_devs(&window.nights)?;
        let sjl = jet_lag::social_jet_lag(&window.nights)?;
        bedtime::project(&variability, sjl, days_to_target)
    }

    /// Score averaged bedroom conditions against the configured ideal
    pub fn environment_delta(&self, avg_temperature: f64, avg_humidity: f64) -> EnvironmentDelta {
        environment::environment_delta(avg_temperature, avg_humidity, &self.config.ideal)
    }

    /// Read a night's environment averages and score them
    pub fn environment_report<E: EnvironmentSource>(
        &self,
        environment: &E,
        date: NaiveDate,
    ) -> Result<(EnvironmentReading, EnvironmentDelta), MetricsError> {
        let reading = environment.environment_reading(date)?;
        let delta = self.environment_delta(reading.avg_temperature, reading.avg_humidity);
        Ok((reading, delta))
    }

    /// Composite phase deviation has no defined algorithm yet
    pub fn composite_phase_dev(&self, _date: NaiveDate, _period: usize) -> Result<f64, MetricsError> {
        Err(MetricsError::NotSpecified("composite_phase_dev"))
    }

    /// Sleep regularity index has no defined algorithm yet
    pub fn sleep_regularity_index(
        &self,
        _date: NaiveDate,
        _period: usize,
    ) -> Result<f64, MetricsError> {
        Err(MetricsError::NotSpecified("sleep_regularity_index"))
    }

    /// Holistic nightly score (0-100) has no defined algorithm yet
    pub fn sleep_score(&self, _date: NaiveDate) -> Result<f64, MetricsError> {
        Err(MetricsError::NotSpecified("sleep_score"))
    }

    /// Everything the daily metrics log records for `date`, over the default period
    pub fn daily_metrics(&self, date: NaiveDate) -> Result<DailyMetrics, MetricsError> {
        let period = self.config.default_period;

        let variability = self.variability(date, period)?;
        let interdaily_stability = self.interdaily_stability(date, period)?;
        let social_jet_lag = self.social_jet_lag(date, period)?;
        let bedtime = self.optimal_bedtime(date, period)?;

        Ok(DailyMetrics {
            date,
            stdev_onset: variability.stdev_onset,
            stdev_offset: variability.stdev_offset,
            stdev_duration: variability.stdev_duration,
            interdaily_stability,
            social_jet_lag,
            composite_phase_dev: unspecified(self.composite_phase_dev(date, period))?,
            sleep_regularity_index: unspecified(self.sleep_regularity_index(date, period))?,
            optimal_bedtime: bedtime.bedtime,
            optimal_waketime: bedtime.wake_time,
        })
    }
}

/// Map a `NotSpecified` metric to an empty value, keeping real errors
fn unspecified(result: Result<f64, MetricsError>) -> Result<Option<f64>, MetricsError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(MetricsError::NotSpecified(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
