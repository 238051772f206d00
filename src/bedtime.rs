//! Optimal bedtime projection
//!
//! Moves the recent average schedule a fraction of the way toward an ideal
//! one: eight hours centred on the average midpoint, corrected for social jet
//! lag. The fraction is one over the days left to the target date, so the
//! schedule shifts gradually instead of all at once.

use crate::clock::{format_time, MINUTES_PER_DAY};
use crate::error::MetricsError;
use crate::types::{BedtimeRecommendation, VariabilityResult};
use crate::variability::mean;

/// Baseline target sleep duration (minutes)
pub const TARGET_SLEEP_MINUTES: f64 = 480.0;

/// Social jet lag (minutes) beyond which the target duration is adjusted
const SJL_ADJUST_THRESHOLD_MINUTES: f64 = 30.0;
const SJL_DURATION_ADJUSTMENT: f64 = 10.0;

/// Longest horizon the projection accepts (days)
pub const MAX_DAYS_TO_TARGET: i64 = 3;

/// Project a bedtime and wake time.
///
/// `variability` and `sjl_hours` must come from the same window.
/// `days_to_target` has to be within `1..=3`.
pub fn project(
    variability: &VariabilityResult,
    sjl_hours: f64,
    days_to_target: i64,
) -> Result<BedtimeRecommendation, MetricsError> {
    if !(1..=MAX_DAYS_TO_TARGET).contains(&days_to_target) {
        return Err(MetricsError::InvalidRange(format!(
            "target date must be 1 to {} days ahead, got {}",
            MAX_DAYS_TO_TARGET, days_to_target
        )));
    }

    // Signed minutes from midnight: negative bedtimes fall before midnight
    let avg_bedtime = -mean(&variability.values.sleep_times);
    let avg_wake = mean(&variability.values.wake_times);

    let sjl_minutes = sjl_hours * 60.0;

    let mut target_duration = TARGET_SLEEP_MINUTES;
    if sjl_minutes.abs() > SJL_ADJUST_THRESHOLD_MINUTES {
        target_duration += if sjl_minutes > 0.0 {
            -SJL_DURATION_ADJUSTMENT
        } else {
            SJL_DURATION_ADJUSTMENT
        };
    }

    let ideal_midpoint = (avg_bedtime + avg_wake) / 2.0 - sjl_minutes / 2.0;
    let ideal_bedtime = ideal_midpoint - target_duration / 2.0;
    let ideal_wake = ideal_midpoint + target_duration / 2.0;

    let factor = 1.0 / days_to_target as f64;

    let mut bedtime = avg_bedtime + factor * (ideal_bedtime - avg_bedtime);
    let mut wake = avg_wake + factor * (ideal_wake - avg_wake);

    // Pull both ends inward in proportion to how much they vary
    bedtime += variability.stdev_onset * factor;
    wake -= variability.stdev_offset * factor;

    let sleep_duration = (wake - bedtime).rem_euclid(MINUTES_PER_DAY as f64);

    tracing::debug!(
        avg_bedtime,
        avg_wake,
        ideal_bedtime,
        ideal_wake,
        bedtime,
        wake,
        "bedtime projected"
    );

    Ok(BedtimeRecommendation {
        sleep_duration,
        bedtime: format_time(bedtime),
        wake_time: format_time(wake),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VariabilityValues;
    use pretty_assertions::assert_eq;

    fn steady(sleep_times: Vec<f64>, wake_times: Vec<f64>, sd_on: f64, sd_off: f64) -> VariabilityResult {
        let duration = sleep_times.iter().zip(&wake_times).map(|(s, w)| s + w).collect();
        VariabilityResult {
            stdev_onset: sd_on,
            stdev_offset: sd_off,
            stdev_duration: 0.0,
            values: VariabilityValues {
                duration,
                sleep_times,
                wake_times,
            },
        }
    }

    #[test]
    fn test_regular_schedule_is_kept() {
        let v = steady(vec![60.0; 7], vec![420.0; 7], 0.0, 0.0);
        let rec = project(&v, 0.0, 3).unwrap();

        assert_eq!(
            rec,
            BedtimeRecommendation {
                sleep_duration: 480.0,
                bedtime: "23:00".to_string(),
                wake_time: "07:00".to_string(),
            }
        );
    }

    #[test]
    fn test_short_sleep_moves_a_third_of_the_way() {
        // 00:00 -> 06:00, midpoint 03:00; ideal 23:00 -> 07:00
        let v = steady(vec![0.0; 7], vec![360.0; 7], 0.0, 0.0);
        let rec = project(&v, 0.0, 3).unwrap();

        assert_eq!(rec.bedtime, "23:40");
        assert_eq!(rec.wake_time, "06:20");
        assert!((rec.sleep_duration - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_variability_pulls_inward() {
        let v = steady(vec![60.0; 7], vec![420.0; 7], 30.0, 15.0);
        let rec = project(&v, 0.0, 3).unwrap();

        assert_eq!(rec.bedtime, "23:10");
        assert_eq!(rec.wake_time, "06:55");
        assert!((rec.sleep_duration - 465.0).abs() < 1e-9);
    }

    #[test]
    fn test_positive_jet_lag_shortens_and_shifts_earlier() {
        let v = steady(vec![60.0; 7], vec![420.0; 7], 0.0, 0.0);
        // +1h SJL: target 470, midpoint 03:00 - 30min = 02:30
        // ideal bed 22:35, ideal wake 06:25 -> a third of the way from 23:00 / 07:00
        let rec = project(&v, 1.0, 3).unwrap();

        let expected_bed = -60.0 + (-85.0 + 60.0) / 3.0;
        let expected_wake = 420.0 + (385.0 - 420.0) / 3.0;
        assert_eq!(rec.bedtime, format_time(expected_bed));
        assert_eq!(rec.wake_time, format_time(expected_wake));
        assert!((rec.sleep_duration - (expected_wake - expected_bed)).abs() < 1e-9);
    }

    #[test]
    fn test_negative_jet_lag_lengthens() {
        let v = steady(vec![60.0; 7], vec![420.0; 7], 0.0, 0.0);
        let rec = project(&v, -1.0, 1).unwrap();
        // With the full step the target is reached: 490 minutes
        assert!((rec.sleep_duration - 490.0).abs() < 1e-9);
        assert_eq!(rec.bedtime, "23:25");
        assert_eq!(rec.wake_time, "07:35");
    }

    #[test]
    fn test_horizon_out_of_range() {
        let v = steady(vec![60.0; 7], vec![420.0; 7], 0.0, 0.0);
        for days in [-1, 0, 4] {
            assert!(matches!(
                project(&v, 0.0, days),
                Err(MetricsError::InvalidRange(_))
            ));
        }
    }
}
