//! Interdaily stability
//!
//! Each night is discretised into sleep (0) / wake (1) epochs and IS compares
//! the variance of the per-epoch means against the total variance. Values
//! near 1 mean the same sleep/wake pattern every day, values near 0 mean no
//! day-to-day alignment.

use chrono::NaiveTime;

use crate::clock::{clock_minutes, MINUTES_PER_DAY};
use crate::error::MetricsError;
use crate::types::NightRecord;

pub const ASLEEP: u8 = 0;
pub const AWAKE: u8 = 1;

/// Sleep/wake state for each epoch of one day.
///
/// Epoch `e` starts at minute `e * 1440 / epochs_per_day` and is asleep when
/// that clock time lies in `[onset, offset)`, wrapping past midnight when the
/// onset is later than the offset.
pub fn sleep_wake_epochs(
    onset: NaiveTime,
    offset: NaiveTime,
    epochs_per_day: usize,
) -> Result<Vec<u8>, MetricsError> {
    let epoch_minutes = epoch_length(epochs_per_day)?;
    let onset = clock_minutes(onset);
    let offset = clock_minutes(offset);

    Ok((0..epochs_per_day as i64)
        .map(|e| {
            let t = e * epoch_minutes;
            let asleep = if onset <= offset {
                onset <= t && t < offset
            } else {
                t >= onset || t < offset
            };
            if asleep {
                ASLEEP
            } else {
                AWAKE
            }
        })
        .collect())
}

/// Epoch vectors for every night, in the order given
pub fn sleep_wake_matrix(
    nights: &[NightRecord],
    epochs_per_day: usize,
) -> Result<Vec<Vec<u8>>, MetricsError> {
    nights
        .iter()
        .map(|n| sleep_wake_epochs(n.onset_time, n.offset_time, epochs_per_day))
        .collect()
}

/// Interdaily stability of a window of nights.
///
/// `IS = n · Σ_h (x̄_h − x̄)² / (p · Σ_i (x_i − x̄)²)` with `n` the total number
/// of epoch samples and `p` the epochs per day. A single night is reported as
/// 1.0 and a window without any variance as 0.0.
pub fn interdaily_stability(
    nights: &[NightRecord],
    epochs_per_day: usize,
) -> Result<f64, MetricsError> {
    match nights.len() {
        0 => {
            return Err(MetricsError::InsufficientData(
                "interdaily stability needs at least 1 night".to_string(),
            ))
        }
        1 => {
            epoch_length(epochs_per_day)?;
            return Ok(1.0);
        }
        _ => {}
    }

    let matrix = sleep_wake_matrix(nights, epochs_per_day)?;
    Ok(stability_of_matrix(&matrix, epochs_per_day))
}

fn stability_of_matrix(matrix: &[Vec<u8>], epochs_per_day: usize) -> f64 {
    let days = matrix.len() as f64;
    let n = days * epochs_per_day as f64;

    let overall_mean = matrix
        .iter()
        .flat_map(|day| day.iter())
        .map(|&v| v as f64)
        .sum::<f64>()
        / n;

    let between: f64 = (0..epochs_per_day)
        .map(|epoch| {
            let epoch_mean = matrix.iter().map(|day| day[epoch] as f64).sum::<f64>() / days;
            (epoch_mean - overall_mean).powi(2)
        })
        .sum();

    let total: f64 = matrix
        .iter()
        .flat_map(|day| day.iter())
        .map(|&v| (v as f64 - overall_mean).powi(2))
        .sum();

    if total > 0.0 {
        (n * between) / (epochs_per_day as f64 * total)
    } else {
        0.0
    }
}

fn epoch_length(epochs_per_day: usize) -> Result<i64, MetricsError> {
    if epochs_per_day == 0 || MINUTES_PER_DAY % epochs_per_day as i64 != 0 {
        return Err(MetricsError::InvalidRange(format!(
            "epochs_per_day must divide 1440, got {}",
            epochs_per_day
        )));
    }
    Ok(MINUTES_PER_DAY / epochs_per_day as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::parse_clock;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn night(i: i64, onset: &str, offset: &str) -> NightRecord {
        NightRecord::new(
            NaiveDate::from_ymd_opt(2024, 12, 10).unwrap() - chrono::Duration::days(i),
            parse_clock(onset).unwrap(),
            parse_clock(offset).unwrap(),
        )
    }

    #[test]
    fn test_epochs_wrap_past_midnight() {
        let epochs =
            sleep_wake_epochs(parse_clock("23:00").unwrap(), parse_clock("07:00").unwrap(), 24)
                .unwrap();
        let mut expected = vec![AWAKE; 24];
        for hour in [23, 0, 1, 2, 3, 4, 5, 6] {
            expected[hour] = ASLEEP;
        }
        assert_eq!(epochs, expected);
    }

    #[test]
    fn test_epochs_same_day_interval() {
        let epochs =
            sleep_wake_epochs(parse_clock("01:30").unwrap(), parse_clock("04:00").unwrap(), 24)
                .unwrap();
        // Epoch starts 02:00 and 03:00 fall inside [01:30, 04:00)
        let asleep: Vec<usize> = epochs
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == ASLEEP)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(asleep, vec![2, 3]);
    }

    #[test]
    fn test_equal_onset_offset_is_all_awake() {
        let epochs =
            sleep_wake_epochs(parse_clock("08:00").unwrap(), parse_clock("08:00").unwrap(), 24)
                .unwrap();
        assert_eq!(epochs, vec![AWAKE; 24]);
    }

    #[test]
    fn test_single_night_is_one() {
        let nights = vec![night(0, "02:00", "05:00")];
        assert_eq!(interdaily_stability(&nights, 24).unwrap(), 1.0);
    }

    #[test]
    fn test_identical_nights_are_fully_stable() {
        let nights: Vec<_> = (0..7).map(|i| night(i, "23:00", "07:00")).collect();
        let is = interdaily_stability(&nights, 24).unwrap();
        assert!((is - 1.0).abs() < 1e-9, "IS = {is}");
    }

    #[test]
    fn test_shifting_schedule_lowers_stability() {
        // The 8h block moves by 8h each night, so every hour is slept equally often
        let times = [
            ("21:00", "05:00"),
            ("05:00", "13:00"),
            ("13:00", "21:00"),
            ("21:00", "05:00"),
            ("05:00", "13:00"),
            ("13:00", "21:00"),
        ];
        let nights: Vec<_> = times
            .iter()
            .enumerate()
            .map(|(i, (on, off))| night(i as i64, on, off))
            .collect();

        let is = interdaily_stability(&nights, 24).unwrap();
        assert!(is.abs() < 1e-9, "IS = {is}");
    }

    #[test]
    fn test_no_variance_is_zero() {
        let nights: Vec<_> = (0..3).map(|i| night(i, "08:00", "08:00")).collect();
        assert_eq!(interdaily_stability(&nights, 24).unwrap(), 0.0);
    }

    #[test]
    fn test_empty_window_and_bad_epochs() {
        assert!(matches!(
            interdaily_stability(&[], 24),
            Err(MetricsError::InsufficientData(_))
        ));
        let nights: Vec<_> = (0..2).map(|i| night(i, "23:00", "07:00")).collect();
        assert!(matches!(
            interdaily_stability(&nights, 7),
            Err(MetricsError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_finer_epochs() {
        let nights: Vec<_> = (0..4).map(|i| night(i, "23:30", "07:30")).collect();
        let matrix = sleep_wake_matrix(&nights, 48).unwrap();
        assert_eq!(matrix.len(), 4);
        assert_eq!(matrix[0].iter().filter(|&&v| v == ASLEEP).count(), 16);
        assert!((interdaily_stability(&nights, 48).unwrap() - 1.0).abs() < 1e-9);
    }
}
