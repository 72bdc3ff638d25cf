// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layout pipeline
//!
//! The fourteen steps run strictly in sequence:
//!
//! 1. core count from the travel-distance limit ([`cores`])
//! 2. global unit counts ([`crate::distribution`])
//! 3. corner-length search, running steps 4-13 per candidate ([`corners`])
//! 4. core x-positions and 5. core records ([`cores`])
//! 6. segments, 7. distribution to segments and 7b. corner mirroring ([`segments`])
//! 8. unit generation ([`units`])
//! 9. wall alignment ([`alignment`])
//! 10. core wrapping and 11. corridor-end voids ([`wrapping`])
//! 11b. filler detection ([`fillers`])
//! 12. statistics ([`stats`])
//! 13. egress validation with bounded core addition (here)
//! 14. output transform ([`output`])
//!
//! All intermediate geometry lives in local coordinates with the south-west
//! building corner at the origin.

mod alignment;
mod corners;
mod cores;
mod fillers;
mod output;
mod segments;
mod stats;
mod units;
mod wrapping;

use crate::config::{StrategyProfile, EPS, MAX_CORES};
use crate::distribution::{distribute_unit_counts, split_by_side, SideSplit, UnitCounts};
use crate::error::Result;
use crate::flexibility::{derive_behaviors, UnitTypeBehavior};
use crate::types::{
    AlignmentReport, CoreSide, EgressConfig, FillerKind, FloorPlan, LayoutInput, LayoutOption,
    Side, Strategy, UnitTypeSpec,
};
use barplan_geometry::Rect;
use rayon::prelude::*;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

/// Resolved, read-only parameters shared by every step.
#[derive(Debug, Clone)]
pub(crate) struct LayoutContext<'a> {
    pub width: f64,
    pub depth: f64,
    pub corridor_width: f64,
    pub rentable_depth: f64,
    pub core_width: f64,
    /// Core depth clamped to the rentable depth.
    pub core_depth: f64,
    pub core_side: CoreSide,
    pub specs: &'a [UnitTypeSpec],
    pub behaviors: Vec<UnitTypeBehavior>,
    pub egress: &'a EgressConfig,
    pub profile: StrategyProfile,
    pub alignment_tolerance: f64,
    pub side_bias: Option<f64>,
}

impl<'a> LayoutContext<'a> {
    pub fn new(input: &'a LayoutInput, strategy: Strategy) -> Self {
        let p = &input.params;
        let rentable_depth = (input.footprint.depth - p.corridor_width) / 2.0;
        Self {
            width: input.footprint.width,
            depth: input.footprint.depth,
            corridor_width: p.corridor_width,
            rentable_depth,
            core_width: p.core_width,
            core_depth: p.core_depth.min(rentable_depth),
            core_side: p.core_side,
            specs: &input.unit_types,
            behaviors: derive_behaviors(&input.unit_types, rentable_depth),
            egress: &input.egress,
            profile: StrategyProfile::for_strategy(strategy),
            alignment_tolerance: p.alignment_tolerance,
            side_bias: p.side_bias,
        }
    }

    /// Unit band `(y, depth)` of a side.
    pub fn band(&self, side: Side) -> (f64, f64) {
        match side {
            Side::South => (0.0, self.rentable_depth),
            Side::North => (self.rentable_depth + self.corridor_width, self.rentable_depth),
        }
    }

    /// Lower y of the corridor.
    #[inline]
    pub fn corridor_y(&self) -> f64 {
        self.rentable_depth
    }

    /// Core rectangle y; cores always touch the corridor.
    pub fn core_y(&self, side: Side) -> f64 {
        match side {
            Side::South => self.rentable_depth - self.core_depth,
            Side::North => self.rentable_depth + self.corridor_width,
        }
    }

    /// Facade strip `(y, depth)` between a core and the facade.
    pub fn strip(&self, side: Side) -> (f64, f64) {
        let depth = self.rentable_depth - self.core_depth;
        match side {
            Side::South => (0.0, depth),
            Side::North => (self.depth - depth, depth),
        }
    }

    /// Side whose counts come from the core-side share of the split.
    pub fn primary_side(&self) -> Side {
        match self.core_side {
            CoreSide::South => Side::South,
            CoreSide::North | CoreSide::Both => Side::North,
        }
    }

    /// Rentable length of one side with `n` cores.
    pub fn side_length(&self, side: Side, n: usize) -> f64 {
        if self.core_side.includes(side) {
            (self.width - n as f64 * self.core_width).max(0.0)
        } else {
            self.width
        }
    }

    pub fn usable_length(&self, n: usize) -> f64 {
        Side::ALL.iter().map(|&s| self.side_length(s, n)).sum()
    }

    /// Fraction of units assigned to the primary side.
    pub fn resolved_bias(&self, n: usize) -> f64 {
        if let Some(bias) = self.side_bias {
            return bias;
        }
        let total = self.usable_length(n);
        if total <= 0.0 {
            0.5
        } else {
            self.side_length(self.primary_side(), n) / total
        }
    }

    /// Pool of one side out of the split.
    pub fn side_pool<'s>(&self, split: &'s SideSplit, side: Side) -> &'s [usize] {
        if side == self.primary_side() {
            &split.core_side
        } else {
            &split.far_side
        }
    }

    /// True when `n` cores still leave non-negative room between them.
    pub fn fits_cores(&self, n: usize) -> bool {
        self.width - n as f64 * self.core_width >= -EPS
    }

    #[inline]
    pub fn area_of(&self, type_index: usize) -> f64 {
        self.specs[type_index].target_area
    }

    #[inline]
    pub fn min_width(&self, type_index: usize) -> f64 {
        self.behaviors[type_index].min_width
    }
}

/// Building end a corner segment touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum End {
    West,
    East,
}

/// A stretch of one side between cores, core centerlines or building ends.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Segment {
    pub side: Side,
    pub start: f64,
    pub end: f64,
    pub corner: Option<End>,
}

impl Segment {
    #[inline]
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    #[inline]
    pub fn is_corner(&self) -> bool {
        self.corner.is_some()
    }
}

/// A unit before ids, colors and the output transform are applied.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DraftUnit {
    pub type_index: usize,
    pub side: Side,
    pub x: f64,
    pub width: f64,
    pub extensions: SmallVec<[Rect; 2]>,
}

impl DraftUnit {
    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn rect(&self, ctx: &LayoutContext) -> Rect {
        let (y, depth) = ctx.band(self.side);
        Rect::new(self.x, y, self.width, depth)
    }

    pub fn rects(&self, ctx: &LayoutContext) -> Vec<Rect> {
        let mut rects = Vec::with_capacity(1 + self.extensions.len());
        rects.push(self.rect(ctx));
        rects.extend(self.extensions.iter().copied());
        rects
    }

    pub fn area(&self, ctx: &LayoutContext) -> f64 {
        self.rects(ctx).iter().map(Rect::area).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DraftFiller {
    pub rect: Rect,
    pub side: Side,
    pub kind: FillerKind,
}

/// Result of steps 4-11b for one core count and corner length.
#[derive(Debug, Clone)]
pub(crate) struct Draft {
    pub corner_length: f64,
    /// Left edges of the cores, sorted.
    pub core_xs: Vec<f64>,
    pub units: Vec<DraftUnit>,
    pub fillers: Vec<DraftFiller>,
    /// Corridor extent along x after void absorption.
    pub corridor: (f64, f64),
    pub unplaced: Vec<usize>,
    pub alignment: AlignmentReport,
}

impl Draft {
    pub fn core_spans(&self, core_width: f64) -> Vec<(f64, f64)> {
        self.core_xs.iter().map(|&x| (x, x + core_width)).collect()
    }
}

/// Steps 4 through 11b for a fixed core count and corner length.
pub(crate) fn build_draft(
    ctx: &LayoutContext,
    core_count: usize,
    corner_length: f64,
    split: &SideSplit,
) -> Draft {
    let core_xs = cores::core_positions(ctx, core_count, corner_length);
    let segments = segments::define_segments(ctx, &core_xs);

    let mut assignment = segments::assign_units(ctx, &segments, split);
    segments::mirror_corner_premium(ctx, &segments, &mut assignment);

    let mut units = units::generate_units(ctx, &segments, &assignment.per_segment, &mut assignment.unplaced);
    fillers::absorb_slivers(ctx, &core_xs, &mut units);

    let alignment = alignment::align_walls(ctx, &mut units);

    let mut strip_fillers = wrapping::wrap_cores(ctx, &core_xs, &mut units);
    let corridor = wrapping::absorb_corridor_voids(ctx, &mut units);

    let mut fillers = fillers::detect_fillers(ctx, &core_xs, &units);
    fillers.append(&mut strip_fillers);

    Draft {
        corner_length,
        core_xs,
        units,
        fillers,
        corridor,
        unplaced: assignment.unplaced,
        alignment,
    }
}

/// A finished attempt for one core count.
struct Attempt {
    draft: Draft,
    counts: UnitCounts,
    split: SideSplit,
    score: f64,
    compliant: bool,
}

fn attempt(ctx: &LayoutContext, core_count: usize, cores_added: usize) -> Attempt {
    let counts = distribute_unit_counts(
        ctx.usable_length(core_count),
        ctx.specs,
        &ctx.behaviors,
        ctx.profile.safety_factor,
    );
    let split = split_by_side(&counts.per_type, ctx.resolved_bias(core_count));

    debug!(
        core_count,
        total_units = counts.total,
        core_side = split.core_total(),
        far_side = split.far_total(),
        "Distributed unit counts"
    );

    let best = corners::optimize_corner_length(ctx, core_count, &counts, &split, cores_added);

    Attempt {
        draft: best.draft,
        counts,
        split,
        score: best.score,
        compliant: best.compliant,
    }
}

/// Run the pipeline and return the plan together with its objective score.
fn run(input: &LayoutInput, strategy: Strategy) -> Result<(FloorPlan, f64)> {
    input.validate()?;
    let ctx = LayoutContext::new(input, strategy);

    let initial = cores::initial_core_count(&ctx);
    let mut core_count = initial;
    let mut result = attempt(&ctx, core_count, 0);

    // Bounded retry: one more core per failed egress check
    while !result.compliant && core_count < MAX_CORES && ctx.fits_cores(core_count + 1) {
        core_count += 1;
        debug!(core_count, "Egress check failed, adding a core");
        result = attempt(&ctx, core_count, core_count - initial);
    }

    if !result.compliant {
        warn!(
            core_count,
            strategy = strategy.label(),
            "Egress limits not met at maximum core count"
        );
    }

    let stats = stats::compute_stats(&ctx, &result.draft, &result.counts, &result.split);
    let egress = crate::egress::evaluate_egress(
        result.draft.corridor,
        &result.draft.core_spans(ctx.core_width),
        ctx.rentable_depth,
        ctx.egress,
        core_count - initial,
    );

    let unplaced: usize = result.draft.unplaced.iter().sum();
    if unplaced > 0 {
        warn!(unplaced, strategy = strategy.label(), "Some requested units did not fit");
    }

    let plan = output::assemble(&ctx, input, strategy, result.draft, stats, egress);

    info!(
        strategy = strategy.label(),
        units = plan.units.len(),
        cores = plan.egress.core_count,
        fillers = plan.fillers.len(),
        efficiency = plan.stats.efficiency,
        compliant = plan.is_compliant(),
        "Generated floor plan"
    );

    Ok((plan, result.score))
}

/// Generate one floor plan with the strategy in `input.params`.
pub fn generate(input: &LayoutInput) -> Result<FloorPlan> {
    run(input, input.params.strategy).map(|(plan, _)| plan)
}

/// Generate all three strategy variants, in the fixed order
/// Balanced, Mix-Optimized, Efficiency-Optimized.
pub fn generate_all(input: &LayoutInput) -> Result<Vec<LayoutOption>> {
    input.validate()?;

    Strategy::ALL
        .par_iter()
        .map(|&strategy| {
            run(input, strategy).map(|(plan, score)| LayoutOption {
                strategy,
                label: strategy.label().to_string(),
                score,
                plan,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_unit_config;
    use crate::types::{BuildingFootprint, LayoutParams};
    use approx::assert_relative_eq;

    fn input(width: f64) -> LayoutInput {
        LayoutInput::new(
            BuildingFootprint::new(width, 20.0),
            default_unit_config(),
            EgressConfig::sprinklered(),
            LayoutParams::default(),
        )
    }

    #[test]
    fn test_context_bands_tile_depth() {
        let input = input(60.0);
        let ctx = LayoutContext::new(&input, Strategy::Balanced);
        let (sy, sd) = ctx.band(Side::South);
        let (ny, nd) = ctx.band(Side::North);
        assert_relative_eq!(sy, 0.0);
        assert_relative_eq!(sd + ctx.corridor_width + nd, 20.0);
        assert_relative_eq!(ny + nd, 20.0);
    }

    #[test]
    fn test_core_and_strip_fill_band() {
        let input = input(60.0);
        let ctx = LayoutContext::new(&input, Strategy::Balanced);
        let (strip_y, strip_d) = ctx.strip(Side::North);
        assert_relative_eq!(ctx.core_y(Side::North) + ctx.core_depth, strip_y);
        assert_relative_eq!(strip_y + strip_d, 20.0);

        let (strip_y, strip_d) = ctx.strip(Side::South);
        assert_relative_eq!(strip_y + strip_d, ctx.core_y(Side::South));
    }

    #[test]
    fn test_bias_follows_usable_length() {
        let input = input(60.0);
        let ctx = LayoutContext::new(&input, Strategy::Balanced);
        let expected = (60.0 - 2.0 * 3.66) / (120.0 - 2.0 * 3.66);
        assert_relative_eq!(ctx.resolved_bias(2), expected);
    }

    #[test]
    fn test_generate_all_order() {
        let options = generate_all(&input(60.0)).unwrap();
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Balanced", "Mix-Optimized", "Efficiency-Optimized"]);
        assert_eq!(options[1].plan.strategy, Strategy::MixOptimized);
    }

    #[test]
    fn test_generate_rejects_invalid() {
        let mut bad = input(60.0);
        bad.footprint.depth = -1.0;
        assert!(generate(&bad).is_err());
        assert!(generate_all(&bad).is_err());
    }
}
