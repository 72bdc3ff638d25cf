// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building statistics (step 12)

use super::{Draft, LayoutContext};
use crate::distribution::{SideSplit, UnitCounts};
use crate::types::{LayoutStats, SideCounts};
use std::collections::BTreeMap;

/// Total variation distance between the placed and the target mix.
pub(crate) fn mix_deviation(ctx: &LayoutContext, placed: &[usize]) -> f64 {
    let total: usize = placed.iter().sum();
    let target_sum: f64 = ctx.specs.iter().map(|s| s.percentage).sum();
    if total == 0 || target_sum <= 0.0 {
        return 1.0;
    }

    let distance: f64 = ctx
        .specs
        .iter()
        .zip(placed)
        .map(|(spec, &n)| (n as f64 / total as f64 - spec.percentage / target_sum).abs())
        .sum();
    (distance / 2.0).clamp(0.0, 1.0)
}

/// Placed units per type index.
pub(crate) fn placed_counts(ctx: &LayoutContext, draft: &Draft) -> Vec<usize> {
    let mut placed = vec![0usize; ctx.specs.len()];
    for unit in &draft.units {
        placed[unit.type_index] += 1;
    }
    placed
}

/// Net rentable area over gross area.
pub(crate) fn efficiency(ctx: &LayoutContext, draft: &Draft) -> f64 {
    let gross = ctx.width * ctx.depth;
    let net: f64 = draft.units.iter().map(|u| u.area(ctx)).sum();
    if gross > 0.0 {
        net / gross
    } else {
        0.0
    }
}

/// Share of requested units that found a place.
pub(crate) fn placement_margin(draft: &Draft, requested: usize) -> f64 {
    if requested == 0 {
        return 1.0;
    }
    let unplaced: usize = draft.unplaced.iter().sum();
    (1.0 - unplaced as f64 / requested as f64).clamp(0.0, 1.0)
}

pub(crate) fn compute_stats(
    ctx: &LayoutContext,
    draft: &Draft,
    counts: &UnitCounts,
    split: &SideSplit,
) -> LayoutStats {
    let placed = placed_counts(ctx, draft);
    let gross_area = ctx.width * ctx.depth;
    let net_rentable_area: f64 = draft.units.iter().map(|u| u.area(ctx)).sum();

    let by_id = |values: &[usize]| -> BTreeMap<String, usize> {
        ctx.specs
            .iter()
            .zip(values)
            .map(|(spec, &n)| (spec.id.clone(), n))
            .collect()
    };

    let mut side_targets = SideCounts::default();
    let primary = ctx.primary_side();
    side_targets.add(primary, split.core_total());
    side_targets.add(primary.opposite(), split.far_total());

    let core_count = draft.core_xs.len() * ctx.core_side.sides().len();
    let core_area = core_count as f64 * ctx.core_width * ctx.core_depth;
    let corridor_area = (draft.corridor.1 - draft.corridor.0).max(0.0) * ctx.corridor_width;
    let filler_area = draft.fillers.iter().map(|f| f.rect.area()).sum();

    LayoutStats {
        gross_area,
        net_rentable_area,
        efficiency: if gross_area > 0.0 {
            net_rentable_area / gross_area
        } else {
            0.0
        },
        total_units: placed.iter().sum(),
        unit_counts: by_id(&placed),
        l_shaped_units: draft.units.iter().filter(|u| !u.extensions.is_empty()).count(),
        target_counts: by_id(&counts.per_type),
        side_targets,
        target_total: counts.total,
        unplaced: by_id(&draft.unplaced),
        core_area,
        corridor_area,
        filler_area,
        mix_deviation: mix_deviation(ctx, &placed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_unit_config;
    use crate::types::{BuildingFootprint, EgressConfig, LayoutInput, LayoutParams, Strategy};
    use approx::assert_relative_eq;

    #[test]
    fn test_mix_deviation_bounds() {
        let input = LayoutInput::new(
            BuildingFootprint::new(60.0, 20.0),
            default_unit_config(),
            EgressConfig::sprinklered(),
            LayoutParams::default(),
        );
        let ctx = LayoutContext::new(&input, Strategy::Balanced);

        assert_relative_eq!(mix_deviation(&ctx, &[3, 8, 7, 2]), 0.0, epsilon = 1e-12);
        assert_relative_eq!(mix_deviation(&ctx, &[10, 0, 0, 0]), 0.85, epsilon = 1e-12);
        assert_relative_eq!(mix_deviation(&ctx, &[0, 0, 0, 0]), 1.0);
    }
}
