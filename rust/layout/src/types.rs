// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Input and output value types of the layout core.
//!
//! Local building coordinates: `x` runs along the corridor from the west end
//! (0) to the east end (width), `y` runs across it from the south facade (0)
//! to the north facade (depth). The final plan is shifted so the building
//! center sits at the origin.

use barplan_geometry::Rect;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// A 2D point in plan coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Oriented rectangular footprint of one building floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingFootprint {
    /// Extent along the corridor axis.
    pub width: f64,
    /// Extent perpendicular to the corridor.
    pub depth: f64,
    /// Floor-to-floor height, used for extruded presentation.
    #[serde(default = "default_height")]
    pub height: f64,
    /// World-space center of the footprint.
    #[serde(default)]
    pub center: Point2D,
    /// World-space elevation of the floor.
    #[serde(default)]
    pub floor_elevation: f64,
    /// Counter-clockwise rotation of the corridor axis against world X.
    #[serde(default)]
    pub rotation: f64,
}

fn default_height() -> f64 {
    crate::config::DEFAULT_FLOOR_HEIGHT
}

impl BuildingFootprint {
    /// Axis-aligned footprint centered at the world origin.
    pub fn new(width: f64, depth: f64) -> Self {
        Self {
            width,
            depth,
            height: default_height(),
            center: Point2D::default(),
            floor_elevation: 0.0,
            rotation: 0.0,
        }
    }

    pub fn with_center(mut self, center: Point2D) -> Self {
        self.center = center;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    #[inline]
    pub fn gross_area(&self) -> f64 {
        self.width * self.depth
    }
}

/// One configured apartment type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTypeSpec {
    /// Stable identifier, e.g. "1BR".
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Target share of all units, 0-100.
    pub percentage: f64,
    /// Target floor area in square meters.
    pub target_area: f64,
    /// Explicit corner eligibility. Derived from size when absent.
    #[serde(default)]
    pub corner_eligible: Option<bool>,
    /// Hex color, e.g. "#4A90D9".
    #[serde(default)]
    pub color: Option<String>,
}

impl UnitTypeSpec {
    pub fn new(id: impl Into<String>, percentage: f64, target_area: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            percentage,
            target_area,
            corner_eligible: None,
            color: None,
        }
    }

    pub fn corner_eligible(mut self, eligible: bool) -> Self {
        self.corner_eligible = Some(eligible);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Fire-egress distance limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EgressConfig {
    pub sprinklered: bool,
    /// Longest corridor stretch reachable from one direction only.
    pub max_dead_end: f64,
    /// Longest distance from any corridor point to its nearest core.
    pub max_travel_distance: f64,
    /// Longest path before two exit directions become available.
    pub max_common_path: f64,
}

/// One of the two corridor-facing sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    South,
    North,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::South, Side::North];

    pub fn opposite(self) -> Side {
        match self {
            Side::South => Side::North,
            Side::North => Side::South,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::South => "S",
            Side::North => "N",
        }
    }
}

/// Which side(s) of the corridor carry the cores.
///
/// The default puts every core on the north side only, leaving the south
/// band free for units. `Both` is the classic mirrored layout: each core
/// position gets a core on either side of the corridor and both bands lose
/// the core width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoreSide {
    #[default]
    North,
    South,
    /// Mirrored on both sides.
    Both,
}

impl CoreSide {
    pub fn sides(self) -> &'static [Side] {
        match self {
            CoreSide::North => &[Side::North],
            CoreSide::South => &[Side::South],
            CoreSide::Both => &Side::ALL,
        }
    }

    #[inline]
    pub fn includes(self, side: Side) -> bool {
        self.sides().contains(&side)
    }
}

impl std::str::FromStr for CoreSide {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(CoreSide::North),
            "south" | "s" => Ok(CoreSide::South),
            "both" | "b" => Ok(CoreSide::Both),
            other => Err(format!("unknown core side '{}'", other)),
        }
    }
}

/// Optimization strategy for the corner-length search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Strategy {
    #[default]
    Balanced,
    MixOptimized,
    EfficiencyOptimized,
}

impl Strategy {
    /// Fixed output order of `generate_all`.
    pub const ALL: [Strategy; 3] = [
        Strategy::Balanced,
        Strategy::MixOptimized,
        Strategy::EfficiencyOptimized,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Strategy::Balanced => "Balanced",
            Strategy::MixOptimized => "Mix-Optimized",
            Strategy::EfficiencyOptimized => "Efficiency-Optimized",
        }
    }
}

/// Scalar layout parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    pub corridor_width: f64,
    pub core_width: f64,
    pub core_depth: f64,
    pub core_side: CoreSide,
    pub strategy: Strategy,
    /// Wall alignment tolerance as a fraction (0-1) of the average unit width.
    pub alignment_tolerance: f64,
    /// Unit type id -> color, applied over the type's own color.
    pub color_overrides: BTreeMap<String, String>,
    /// Fraction of units on the core side. Derived from usable lengths when absent.
    pub side_bias: Option<f64>,
}

/// Complete, resolved input of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutInput {
    pub footprint: BuildingFootprint,
    pub unit_types: Vec<UnitTypeSpec>,
    pub egress: EgressConfig,
    #[serde(default)]
    pub params: LayoutParams,
}

/// Stair/elevator core kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoreKind {
    End,
    Mid,
}

/// A stair/elevator core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Core {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub depth: f64,
    pub kind: CoreKind,
    pub side: Side,
}

impl Core {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.depth)
    }
}

/// One apartment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub type_id: String,
    pub side: Side,
    /// Base rectangle facing the corridor.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub depth: f64,
    /// Final area including absorbed strips.
    pub area: f64,
    pub color: Option<String>,
    /// Strips absorbed from core wrapping or corridor-end voids.
    #[serde(default)]
    pub extensions: SmallVec<[Rect; 2]>,
    /// Outline, present only for L-shaped units.
    #[serde(default)]
    pub polygon: Option<Vec<Point2D>>,
}

impl Unit {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.depth)
    }

    /// Base rectangle followed by absorbed strips.
    pub fn rects(&self) -> impl Iterator<Item = Rect> + '_ {
        std::iter::once(self.rect()).chain(self.extensions.iter().copied())
    }

    #[inline]
    pub fn is_l_shaped(&self) -> bool {
        !self.extensions.is_empty()
    }
}

/// Origin of a filler rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillerKind {
    /// Leftover length along a side.
    Gap,
    /// Facade strip beyond a core that no unit wrapped.
    CoreStrip,
}

/// Leftover space backfilled as non-residential service area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filler {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub depth: f64,
    pub side: Side,
    pub kind: FillerKind,
    /// Space use at output time, always [`crate::config::SERVICE_USE`].
    pub usage: String,
}

impl Filler {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.depth)
    }
}

/// Unit counts per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SideCounts {
    pub south: usize,
    pub north: usize,
}

impl SideCounts {
    pub fn total(&self) -> usize {
        self.south + self.north
    }

    pub fn get(&self, side: Side) -> usize {
        match side {
            Side::South => self.south,
            Side::North => self.north,
        }
    }

    pub(crate) fn add(&mut self, side: Side, n: usize) {
        match side {
            Side::South => self.south += n,
            Side::North => self.north += n,
        }
    }
}

/// Building-level statistics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutStats {
    pub gross_area: f64,
    pub net_rentable_area: f64,
    /// Net rentable over gross.
    pub efficiency: f64,
    pub total_units: usize,
    /// Placed units per type id.
    pub unit_counts: BTreeMap<String, usize>,
    pub l_shaped_units: usize,
    /// Target count per type id from the global distribution.
    pub target_counts: BTreeMap<String, usize>,
    /// Target count per side; sums to `target_total`.
    pub side_targets: SideCounts,
    pub target_total: usize,
    /// Requested units that fit nowhere, per type id.
    pub unplaced: BTreeMap<String, usize>,
    pub core_area: f64,
    pub corridor_area: f64,
    pub filler_area: f64,
    /// Total variation distance between placed and target mix, 0-1.
    pub mix_deviation: f64,
}

/// Pass/fail result of one egress limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceStatus {
    Pass,
    Fail,
}

impl ComplianceStatus {
    pub fn check(value: f64, limit: f64) -> Self {
        if value <= limit + crate::config::EPS {
            ComplianceStatus::Pass
        } else {
            ComplianceStatus::Fail
        }
    }

    #[inline]
    pub fn is_pass(self) -> bool {
        self == ComplianceStatus::Pass
    }
}

/// Egress evaluation along the corridor axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EgressReport {
    /// Distinct core positions along the corridor.
    pub core_count: usize,
    /// Cores added by the retry loop over the initial count.
    pub cores_added: usize,
    pub dead_end_west: f64,
    pub dead_end_east: f64,
    pub max_dead_end: f64,
    pub max_travel_distance: f64,
    pub common_path: f64,
    pub dead_end_status: ComplianceStatus,
    pub travel_distance_status: ComplianceStatus,
    pub common_path_status: ComplianceStatus,
}

impl EgressReport {
    pub fn is_compliant(&self) -> bool {
        self.dead_end_status.is_pass()
            && self.travel_distance_status.is_pass()
            && self.common_path_status.is_pass()
    }
}

/// One opposing wall pair considered for alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallPair {
    pub south_before: f64,
    pub north_before: f64,
    pub south_after: f64,
    pub north_after: f64,
    pub aligned: bool,
}

/// Wall alignment outcome.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlignmentReport {
    pub tolerance: f64,
    /// Offset threshold in meters (tolerance x average unit width).
    pub threshold: f64,
    pub pairs: Vec<WallPair>,
}

impl AlignmentReport {
    pub fn aligned_count(&self) -> usize {
        self.pairs.iter().filter(|p| p.aligned).count()
    }
}

/// World placement applied at presentation time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldTransform {
    pub center: Point2D,
    pub elevation: f64,
    pub rotation: f64,
}

/// Generated floor plan in building-centered local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPlan {
    pub strategy: Strategy,
    pub width: f64,
    pub depth: f64,
    pub height: f64,
    pub rentable_depth: f64,
    /// Chosen corner reservation length.
    pub corner_length: f64,
    pub units: Vec<Unit>,
    pub cores: Vec<Core>,
    pub fillers: Vec<Filler>,
    pub corridor: Rect,
    pub stats: LayoutStats,
    pub egress: EgressReport,
    pub alignment: AlignmentReport,
    pub transform: WorldTransform,
}

impl FloorPlan {
    /// Building outline in local coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(-self.width / 2.0, -self.depth / 2.0, self.width, self.depth)
    }

    /// Distinct core x-ranges along the corridor, sorted.
    pub fn core_positions(&self) -> Vec<(f64, f64)> {
        let mut spans: Vec<(f64, f64)> = Vec::new();
        let mut sorted: Vec<&Core> = self.cores.iter().collect();
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x));
        for core in sorted {
            let span = (core.x, core.x + core.width);
            if spans
                .last()
                .map_or(true, |last| (last.0 - span.0).abs() > crate::config::EPS)
            {
                spans.push(span);
            }
        }
        spans
    }

    pub fn is_compliant(&self) -> bool {
        self.egress.is_compliant()
    }

    /// Geometric self-check of the plan.
    pub fn validate(&self, unit_types: &[UnitTypeSpec]) -> Vec<crate::validation::ValidationIssue> {
        crate::validation::validate_plan(self, unit_types)
    }
}

/// One labeled strategy result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutOption {
    pub strategy: Strategy,
    pub label: String,
    pub score: f64,
    pub plan: FloorPlan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_side_parse() {
        assert_eq!("north".parse::<CoreSide>().unwrap(), CoreSide::North);
        assert_eq!("Both".parse::<CoreSide>().unwrap(), CoreSide::Both);
        assert!("east".parse::<CoreSide>().is_err());
    }

    #[test]
    fn test_core_side_default_is_single_sided() {
        assert_eq!(CoreSide::default(), CoreSide::North);
        assert_eq!(CoreSide::default().sides(), &[Side::North]);
        assert_eq!(CoreSide::Both.sides(), &Side::ALL);
    }

    #[test]
    fn test_core_side_includes() {
        assert!(CoreSide::Both.includes(Side::South));
        assert!(!CoreSide::North.includes(Side::South));
        assert_eq!(Side::North.opposite(), Side::South);
    }

    #[test]
    fn test_compliance_check() {
        assert!(ComplianceStatus::check(15.24, 15.24).is_pass());
        assert!(!ComplianceStatus::check(15.3, 15.24).is_pass());
    }

    #[test]
    fn test_unit_type_deserialize_defaults() {
        let spec: UnitTypeSpec =
            serde_json::from_str(r#"{"id":"1BR","percentage":40,"target_area":65.03}"#).unwrap();
        assert_eq!(spec.corner_eligible, None);
        assert_eq!(spec.color, None);
    }
}
