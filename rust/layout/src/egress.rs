// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Egress distances along the single straight corridor

use crate::types::{ComplianceStatus, EgressConfig, EgressReport};

/// Merge overlapping core x-ranges into sorted disjoint spans.
fn merge_spans(spans: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut sorted: Vec<(f64, f64)> = spans.iter().filter(|(s, e)| e > s).copied().collect();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut merged: Vec<(f64, f64)> = Vec::with_capacity(sorted.len());
    for (start, end) in sorted {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Evaluate dead-end, travel distance and common path.
///
/// `corridor` is the `(start, end)` extent of the corridor along x,
/// `cores` the x-ranges of the cores it connects to. Travel is measured to
/// the nearest core edge; between two cores the farthest point is the
/// midpoint of the gap. Common path adds the unit depth to the longest
/// dead end.
pub fn evaluate_egress(
    corridor: (f64, f64),
    cores: &[(f64, f64)],
    rentable_depth: f64,
    config: &EgressConfig,
    cores_added: usize,
) -> EgressReport {
    let spans = merge_spans(cores);
    let length = (corridor.1 - corridor.0).max(0.0);

    let (dead_end_west, dead_end_east, max_gap) = match (spans.first(), spans.last()) {
        (Some(first), Some(last)) => {
            let west = (first.0 - corridor.0).clamp(0.0, length);
            let east = (corridor.1 - last.1).clamp(0.0, length);
            let max_gap = spans
                .windows(2)
                .map(|w| (w[1].0 - w[0].1).max(0.0))
                .fold(0.0_f64, f64::max);
            (west, east, max_gap)
        }
        _ => (length, length, 0.0),
    };

    let max_dead_end = dead_end_west.max(dead_end_east);
    let max_travel_distance = max_dead_end.max(max_gap / 2.0);
    let common_path = max_dead_end + rentable_depth;

    EgressReport {
        core_count: spans.len(),
        cores_added,
        dead_end_west,
        dead_end_east,
        max_dead_end,
        max_travel_distance,
        common_path,
        dead_end_status: ComplianceStatus::check(max_dead_end, config.max_dead_end),
        travel_distance_status: ComplianceStatus::check(
            max_travel_distance,
            config.max_travel_distance,
        ),
        common_path_status: ComplianceStatus::check(common_path, config.max_common_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_two_end_cores() {
        let report = evaluate_egress(
            (2.0, 58.0),
            &[(14.0, 17.66), (42.34, 46.0)],
            9.085,
            &EgressConfig::sprinklered(),
            0,
        );
        assert_eq!(report.core_count, 2);
        assert_relative_eq!(report.dead_end_west, 12.0);
        assert_relative_eq!(report.dead_end_east, 12.0);
        assert_relative_eq!(report.max_travel_distance, 12.34, epsilon = 1e-9);
        assert!(report.dead_end_status.is_pass());
        assert!(report.is_compliant());
    }

    #[test]
    fn test_long_dead_end_fails() {
        let report = evaluate_egress(
            (0.0, 100.0),
            &[(40.0, 44.0)],
            9.0,
            &EgressConfig::sprinklered(),
            0,
        );
        assert_eq!(report.dead_end_status, ComplianceStatus::Fail);
        assert_relative_eq!(report.max_dead_end, 56.0);
    }

    #[test]
    fn test_no_cores_is_whole_corridor() {
        let report = evaluate_egress((0.0, 30.0), &[], 9.0, &EgressConfig::sprinklered(), 0);
        assert_eq!(report.core_count, 0);
        assert_relative_eq!(report.max_travel_distance, 30.0);
    }

    #[test]
    fn test_mirrored_cores_merge() {
        let report = evaluate_egress(
            (0.0, 60.0),
            &[(10.0, 14.0), (10.0, 14.0), (46.0, 50.0)],
            9.0,
            &EgressConfig::sprinklered(),
            0,
        );
        assert_eq!(report.core_count, 2);
    }

    proptest! {
        #[test]
        fn prop_adding_core_never_worsens(
            cores in prop::collection::vec((0.0f64..200.0, 1.0f64..6.0), 0..5),
            extra in (0.0f64..200.0, 1.0f64..6.0),
        ) {
            let config = EgressConfig::sprinklered();
            let spans: Vec<(f64, f64)> = cores.iter().map(|&(x, w)| (x, x + w)).collect();
            let before = evaluate_egress((0.0, 200.0), &spans, 9.0, &config, 0);

            let mut more = spans.clone();
            more.push((extra.0, extra.0 + extra.1));
            let after = evaluate_egress((0.0, 200.0), &more, 9.0, &config, 0);

            prop_assert!(after.max_travel_distance <= before.max_travel_distance + 1e-9);
            prop_assert!(after.max_dead_end <= before.max_dead_end + 1e-9);
        }
    }
}
