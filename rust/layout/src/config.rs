// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Defaults, presets and strategy profiles.

use crate::types::{CoreSide, EgressConfig, LayoutParams, Strategy, UnitTypeSpec};
use std::collections::BTreeMap;

/// Geometric tolerance in meters.
pub const EPS: f64 = 1e-6;

/// Gaps narrower than this are absorbed by a neighbouring unit.
pub const MIN_FILLER_WIDTH: f64 = 0.5;

/// Corridor frontage an end unit keeps when it absorbs a corridor-end void.
pub const MIN_CORRIDOR_FRONTAGE: f64 = 1.2;

/// Voids shorter than this stay part of the corridor.
pub const MIN_VOID_LENGTH: f64 = 0.3;

/// Upper bound of the egress retry loop.
pub const MAX_CORES: usize = 4;

/// Corner-length candidates evaluated per core count.
pub const CORNER_CANDIDATES: usize = 24;

/// Expansion cap of the largest configured type.
pub const LARGEST_TYPE_EXPANSION: f64 = 1.25;

pub const DEFAULT_FLOOR_HEIGHT: f64 = 3.05;

pub const DEFAULT_CORRIDOR_WIDTH: f64 = 1.83;
pub const DEFAULT_CORE_WIDTH: f64 = 3.66;
pub const DEFAULT_CORE_DEPTH: f64 = 8.99;
pub const DEFAULT_ALIGNMENT_TOLERANCE: f64 = 0.5;

/// Space use tag of every filler.
pub const SERVICE_USE: &str = "Service";

/// Standard four-type mix.
pub fn default_unit_config() -> Vec<UnitTypeSpec> {
    vec![
        UnitTypeSpec::new("Studio", 15.0, 46.45).with_color("#8FBC8F"),
        UnitTypeSpec::new("1BR", 40.0, 65.03).with_color("#4A90D9"),
        UnitTypeSpec::new("2BR", 35.0, 92.90)
            .corner_eligible(true)
            .with_color("#E8A33D"),
        UnitTypeSpec::new("3BR", 10.0, 120.77)
            .corner_eligible(true)
            .with_color("#C0504D"),
    ]
}

impl EgressConfig {
    pub fn sprinklered() -> Self {
        Self {
            sprinklered: true,
            max_dead_end: 15.24,
            max_travel_distance: 76.2,
            max_common_path: 38.1,
        }
    }

    pub fn unsprinklered() -> Self {
        Self {
            sprinklered: false,
            max_dead_end: 6.10,
            max_travel_distance: 61.0,
            max_common_path: 22.86,
        }
    }

    pub fn preset(sprinklered: bool) -> Self {
        if sprinklered {
            Self::sprinklered()
        } else {
            Self::unsprinklered()
        }
    }
}

impl Default for EgressConfig {
    fn default() -> Self {
        Self::sprinklered()
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            corridor_width: DEFAULT_CORRIDOR_WIDTH,
            core_width: DEFAULT_CORE_WIDTH,
            core_depth: DEFAULT_CORE_DEPTH,
            core_side: CoreSide::default(),
            strategy: Strategy::default(),
            alignment_tolerance: DEFAULT_ALIGNMENT_TOLERANCE,
            color_overrides: BTreeMap::new(),
            side_bias: None,
        }
    }
}

/// Objective weights and packing factor of one strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyProfile {
    pub mix_weight: f64,
    pub efficiency_weight: f64,
    pub safety_weight: f64,
    /// Fraction of usable length that step 2 may fill (0.97-1.0).
    pub safety_factor: f64,
}

impl StrategyProfile {
    pub fn for_strategy(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Balanced => Self {
                mix_weight: 0.4,
                efficiency_weight: 0.4,
                safety_weight: 0.2,
                safety_factor: 0.985,
            },
            Strategy::MixOptimized => Self {
                mix_weight: 0.7,
                efficiency_weight: 0.15,
                safety_weight: 0.15,
                safety_factor: 0.97,
            },
            Strategy::EfficiencyOptimized => Self {
                mix_weight: 0.15,
                efficiency_weight: 0.75,
                safety_weight: 0.10,
                safety_factor: 1.0,
            },
        }
    }

    /// Weighted objective; non-compliant egress costs a full point.
    pub fn score(&self, mix_deviation: f64, efficiency: f64, margin: f64, egress_ok: bool) -> f64 {
        let penalty = if egress_ok { 0.0 } else { 1.0 };
        self.mix_weight * (1.0 - mix_deviation)
            + self.efficiency_weight * efficiency
            + self.safety_weight * margin
            - penalty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_mix_sums_to_hundred() {
        let total: f64 = default_unit_config().iter().map(|t| t.percentage).sum();
        assert_relative_eq!(total, 100.0);
    }

    #[test]
    fn test_profiles_weights_sum_to_one() {
        for strategy in Strategy::ALL {
            let p = StrategyProfile::for_strategy(strategy);
            assert_relative_eq!(p.mix_weight + p.efficiency_weight + p.safety_weight, 1.0);
            assert!(p.safety_factor >= 0.97 && p.safety_factor <= 1.0);
        }
    }

    #[test]
    fn test_egress_penalty_dominates() {
        let p = StrategyProfile::for_strategy(Strategy::Balanced);
        assert!(p.score(0.5, 0.5, 0.5, true) > p.score(0.0, 1.0, 1.0, false));
    }
}
