//! Sleep timing variability
//!
//! Standard deviations of onset, offset and duration over a window of nights.

use crate::clock::{onset_offset_minutes, wake_offset_minutes};
use crate::error::MetricsError;
use crate::types::{NightRecord, VariabilityResult, VariabilityValues};

/// Compute onset, offset and duration standard deviations.
///
/// Onsets are counted as minutes before midnight and offsets as minutes after
/// it, so a night's duration is simply their sum. Uses the sample standard
/// deviation (N−1), which needs at least two nights.
pub fn st_devs(nights: &[NightRecord]) -> Result<VariabilityResult, MetricsError> {
    if nights.len() < 2 {
        return Err(MetricsError::InsufficientData(format!(
            "variability needs at least 2 nights, got {}",
            nights.len()
        )));
    }

    let sleep_times: Vec<f64> = nights
        .iter()
        .map(|n| onset_offset_minutes(n.onset_time))
        .collect();
    let wake_times: Vec<f64> = nights
        .iter()
        .map(|n| wake_offset_minutes(n.offset_time))
        .collect();
    let duration: Vec<f64> = sleep_times
        .iter()
        .zip(&wake_times)
        .map(|(sleep, wake)| sleep + wake)
        .collect();

    Ok(VariabilityResult {
        stdev_onset: sample_std_dev(&sleep_times),
        stdev_offset: sample_std_dev(&wake_times),
        stdev_duration: sample_std_dev(&duration),
        values: VariabilityValues {
            duration,
            sleep_times,
            wake_times,
        },
    })
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Bessel-corrected standard deviation; callers guarantee two or more values
fn sample_std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::parse_clock;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn nights(times: &[(&str, &str)]) -> Vec<NightRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 12, 10).unwrap();
        times
            .iter()
            .enumerate()
            .map(|(i, (onset, offset))| {
                NightRecord::new(
                    start - chrono::Duration::days(i as i64),
                    parse_clock(onset).unwrap(),
                    parse_clock(offset).unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_identical_nights_have_zero_spread() {
        let window = nights(&[("23:00", "07:00"); 7]);
        let result = st_devs(&window).unwrap();

        assert_eq!(result.stdev_onset, 0.0);
        assert_eq!(result.stdev_offset, 0.0);
        assert_eq!(result.stdev_duration, 0.0);
        assert_eq!(result.values.sleep_times, vec![60.0; 7]);
        assert_eq!(result.values.wake_times, vec![420.0; 7]);
        assert_eq!(result.values.duration, vec![480.0; 7]);
    }

    #[test]
    fn test_sample_deviation_across_midnight() {
        // Onsets 23:00 and 00:00 -> 60 and 0 minutes before midnight
        let window = nights(&[("23:00", "07:00"), ("00:00", "08:00")]);
        let result = st_devs(&window).unwrap();

        let expected = (2.0f64 * 30.0 * 30.0).sqrt();
        assert!((result.stdev_onset - expected).abs() < 1e-9);
        assert!((result.stdev_offset - expected).abs() < 1e-9);
        assert_eq!(result.stdev_duration, 0.0);
        assert_eq!(result.values.sleep_times, vec![60.0, 0.0]);
    }

    #[test]
    fn test_duration_follows_onset_plus_offset() {
        let window = nights(&[("22:30", "06:00"), ("01:00", "09:30"), ("23:45", "07:15")]);
        let result = st_devs(&window).unwrap();

        assert_eq!(result.values.duration, vec![450.0, 510.0, 450.0]);
        // durations 450, 510, 450: mean 470, squared deviations 400 + 1600 + 400
        let expected = (2400.0f64 / 2.0).sqrt();
        assert!((result.stdev_duration - expected).abs() < 1e-9);
    }

    #[test]
    fn test_single_night_is_insufficient() {
        let window = nights(&[("23:00", "07:00")]);
        assert!(matches!(
            st_devs(&window),
            Err(MetricsError::InsufficientData(_))
        ));
        assert!(matches!(st_devs(&[]), Err(MetricsError::InsufficientData(_))));
    }
}
