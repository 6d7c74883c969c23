// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! Put two charging profiles on one time axis.
//!
//! Both inputs are step functions of time. The merge walks them like the
//! merge step of merge sort; a profile without a sample at some timestamp
//! holds its last known SOC.

use crate::simulator::ChargingProfile;
use serde::{Deserialize, Serialize};

/// Timestamps closer than this (in minutes) are treated as the same sample.
pub const TIME_EPSILON_MIN: f64 = 1e-9;

/// A sample of both profiles at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergedPoint {
    pub elapsed_minutes: f64,
    /// SOC reached with the charger cap applied
    pub soc_capped: f64,
    /// SOC reached without the cap
    pub soc_uncapped: f64,
}

/// Merge two time-ascending `(minutes, soc)` series.
///
/// Returns an empty vector if either series is empty.
pub fn merge_series(capped: &[(f64, f64)], uncapped: &[(f64, f64)]) -> Vec<MergedPoint> {
    let (Some(&(_, first_capped)), Some(&(_, first_uncapped))) = (capped.first(), uncapped.first())
    else {
        return Vec::new();
    };

    let mut merged = Vec::with_capacity(capped.len() + uncapped.len());
    let (mut i, mut j) = (0, 0);
    let mut held_capped = first_capped;
    let mut held_uncapped = first_uncapped;

    while i < capped.len() || j < uncapped.len() {
        let next_capped = capped.get(i);
        let next_uncapped = uncapped.get(j);

        let point = match (next_capped, next_uncapped) {
            (Some(&(ta, sa)), Some(&(tb, sb))) if (ta - tb).abs() <= TIME_EPSILON_MIN => {
                i += 1;
                j += 1;
                held_capped = sa;
                held_uncapped = sb;
                MergedPoint {
                    elapsed_minutes: ta.min(tb),
                    soc_capped: sa,
                    soc_uncapped: sb,
                }
            }
            (Some(&(ta, sa)), Some(&(tb, _))) if ta < tb => {
                i += 1;
                held_capped = sa;
                MergedPoint {
                    elapsed_minutes: ta,
                    soc_capped: sa,
                    soc_uncapped: held_uncapped,
                }
            }
            (Some(&(ta, sa)), None) => {
                i += 1;
                held_capped = sa;
                MergedPoint {
                    elapsed_minutes: ta,
                    soc_capped: sa,
                    soc_uncapped: held_uncapped,
                }
            }
            (_, Some(&(tb, sb))) => {
                j += 1;
                held_uncapped = sb;
                MergedPoint {
                    elapsed_minutes: tb,
                    soc_capped: held_capped,
                    soc_uncapped: sb,
                }
            }
            (None, None) => break,
        };
        merged.push(point);
    }

    merged
}

/// Merge the capped and uncapped profiles of an estimate.
pub fn merge_profiles(capped: &ChargingProfile, uncapped: &ChargingProfile) -> Vec<MergedPoint> {
    merge_series(&capped.time_series(), &uncapped.time_series())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::{ChargeSession, estimate};
    use crate::temperature::Chemistry;

    fn mp(t: f64, a: f64, b: f64) -> MergedPoint {
        MergedPoint {
            elapsed_minutes: t,
            soc_capped: a,
            soc_uncapped: b,
        }
    }

    #[test]
    fn test_interleaves_with_carry_forward() {
        let capped = [(0.0, 20.0), (2.0, 21.0), (4.0, 22.0)];
        let uncapped = [(0.0, 20.0), (1.0, 21.0), (2.0, 22.0)];
        let merged = merge_series(&capped, &uncapped);
        assert_eq!(
            merged,
            vec![
                mp(0.0, 20.0, 20.0),
                mp(1.0, 20.0, 21.0),
                mp(2.0, 21.0, 22.0),
                mp(4.0, 22.0, 22.0),
            ]
        );
    }

    #[test]
    fn test_first_value_used_before_any_sample() {
        let capped = [(0.5, 30.0), (1.5, 31.0)];
        let uncapped = [(1.0, 40.0)];
        let merged = merge_series(&capped, &uncapped);
        assert_eq!(merged[0], mp(0.5, 30.0, 40.0));
        assert_eq!(merged[1], mp(1.0, 30.0, 40.0));
        assert_eq!(merged[2], mp(1.5, 31.0, 40.0));
    }

    #[test]
    fn test_near_equal_times_merge() {
        let capped = [(0.0, 1.0), (0.1 + 0.2, 2.0)];
        let uncapped = [(0.0, 1.0), (0.3, 2.0)];
        let merged = merge_series(&capped, &uncapped);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_series(&[], &[(0.0, 1.0)]).is_empty());
        assert!(merge_series(&[(0.0, 1.0)], &[]).is_empty());
    }

    #[test]
    fn test_merged_estimate_is_time_ordered() {
        let session = ChargeSession::new(10, 90, 90.0, 5.0, Chemistry::Lfp, false);
        let est = estimate(&session, None).unwrap();
        let merged = merge_profiles(&est.capped, &est.uncapped);

        assert!(merged.len() >= est.capped.len());
        assert!(merged.len() <= est.capped.len() + est.uncapped.len());
        for pair in merged.windows(2) {
            assert!(pair[1].elapsed_minutes >= pair[0].elapsed_minutes);
            assert!(pair[1].soc_capped >= pair[0].soc_capped);
            assert!(pair[1].soc_uncapped >= pair[0].soc_uncapped);
        }

        // A held value never runs ahead of the true sample at that time.
        for m in &merged {
            let reached = est
                .capped
                .points
                .iter()
                .filter(|p| p.elapsed_minutes <= m.elapsed_minutes + TIME_EPSILON_MIN)
                .map(|p| p.soc as f64)
                .fold(f64::MIN, f64::max);
            assert!(m.soc_capped <= reached);
        }

        let last = merged.last().unwrap();
        assert_eq!(last.soc_capped, 90.0);
        assert_eq!(last.soc_uncapped, 90.0);
        assert_eq!(last.elapsed_minutes, est.total_minutes);
    }
}
