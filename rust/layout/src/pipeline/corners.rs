// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Corner-length search (step 3)

use super::{build_draft, stats, Draft, LayoutContext};
use crate::config::{CORNER_CANDIDATES, EPS};
use crate::distribution::{SideSplit, UnitCounts};
use crate::egress::evaluate_egress;
use tracing::debug;

/// Best candidate of the search.
pub(crate) struct Candidate {
    pub draft: Draft,
    pub score: f64,
    pub compliant: bool,
}

/// Search bounds for the corner reservation length.
///
/// The lower bound is the widest corner-eligible minimum width, so a premium
/// unit always fits the corner. The upper bound keeps the corner within
/// three premium units, within the dead-end limit plus one unit, and within
/// a third of the usable length so mid segments survive.
pub(crate) fn corner_range(ctx: &LayoutContext, core_count: usize) -> (f64, f64) {
    let active = || {
        ctx.specs
            .iter()
            .zip(&ctx.behaviors)
            .filter(|(spec, _)| spec.percentage > 0.0)
    };

    let widest_eligible = active()
        .filter(|(_, b)| b.corner_eligible)
        .map(|(_, b)| b.min_width)
        .fold(0.0_f64, f64::max);
    let lo = if widest_eligible > 0.0 {
        widest_eligible
    } else {
        active().map(|(_, b)| b.min_width).fold(0.0_f64, f64::max)
    };

    let usable = (ctx.width - core_count as f64 * ctx.core_width).max(0.0);
    let hi = (3.0 * lo)
        .min(ctx.egress.max_dead_end + lo)
        .min(usable / 3.0);

    (lo.min(hi).max(0.0), hi.max(0.0))
}

/// Evenly spaced candidates over `[lo, hi]`.
pub(crate) fn candidates(lo: f64, hi: f64) -> Vec<f64> {
    if hi - lo <= EPS || CORNER_CANDIDATES < 2 {
        return vec![lo];
    }
    let step = (hi - lo) / (CORNER_CANDIDATES - 1) as f64;
    (0..CORNER_CANDIDATES).map(|i| lo + step * i as f64).collect()
}

/// Run steps 4-13 for every candidate and keep the best score.
///
/// Ties keep the earlier (shorter) candidate.
pub(crate) fn optimize_corner_length(
    ctx: &LayoutContext,
    core_count: usize,
    counts: &UnitCounts,
    split: &SideSplit,
    cores_added: usize,
) -> Candidate {
    let (lo, hi) = corner_range(ctx, core_count);
    let mut best: Option<Candidate> = None;

    for corner_length in candidates(lo, hi) {
        let draft = build_draft(ctx, core_count, corner_length, split);

        let placed = stats::placed_counts(ctx, &draft);
        let deviation = stats::mix_deviation(ctx, &placed);
        let efficiency = stats::efficiency(ctx, &draft);
        let margin = stats::placement_margin(&draft, counts.total);
        let egress = evaluate_egress(
            draft.corridor,
            &draft.core_spans(ctx.core_width),
            ctx.rentable_depth,
            ctx.egress,
            cores_added,
        );
        let compliant = egress.dead_end_status.is_pass() && egress.travel_distance_status.is_pass();
        let score = ctx.profile.score(deviation, efficiency, margin, compliant);

        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(Candidate {
                draft,
                score,
                compliant,
            });
        }
    }

    // `candidates` always yields at least one length
    let best = best.unwrap_or_else(|| Candidate {
        draft: build_draft(ctx, core_count, lo, split),
        score: f64::MIN,
        compliant: false,
    });

    debug!(
        core_count,
        corner_length = best.draft.corner_length,
        score = best.score,
        compliant = best.compliant,
        "Selected corner length"
    );

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_unit_config;
    use crate::types::{
        BuildingFootprint, EgressConfig, LayoutInput, LayoutParams, Strategy, UnitTypeSpec,
    };
    use approx::assert_relative_eq;

    fn input(width: f64, types: Vec<UnitTypeSpec>) -> LayoutInput {
        LayoutInput::new(
            BuildingFootprint::new(width, 20.0),
            types,
            EgressConfig::sprinklered(),
            LayoutParams::default(),
        )
    }

    #[test]
    fn test_range_starts_at_widest_premium() {
        let input = input(60.0, default_unit_config());
        let ctx = LayoutContext::new(&input, Strategy::Balanced);
        let (lo, hi) = corner_range(&ctx, 2);

        assert_relative_eq!(lo, 120.77 / ctx.rentable_depth);
        assert_relative_eq!(hi, (60.0 - 2.0 * 3.66) / 3.0);
    }

    #[test]
    fn test_range_without_eligible_types() {
        let types = vec![
            UnitTypeSpec::new("Studio", 100.0, 46.45),
            UnitTypeSpec::new("1BR", 0.0, 65.03),
        ];
        let input = input(60.0, types);
        let ctx = LayoutContext::new(&input, Strategy::Balanced);
        let (lo, _) = corner_range(&ctx, 2);

        assert_relative_eq!(lo, 46.45 / ctx.rentable_depth);
    }

    #[test]
    fn test_candidates_span_range() {
        let c = candidates(10.0, 20.0);
        assert_eq!(c.len(), CORNER_CANDIDATES);
        assert_relative_eq!(c[0], 10.0);
        assert_relative_eq!(c[c.len() - 1], 20.0, epsilon = 1e-9);
        assert_eq!(candidates(5.0, 5.0), vec![5.0]);
    }
}
