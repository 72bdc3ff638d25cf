// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entry-boundary validation of layout inputs.

use crate::error::{Error, Result};
use crate::types::{BuildingFootprint, EgressConfig, LayoutInput, LayoutParams, UnitTypeSpec};
use rustc_hash::FxHashSet;

impl LayoutInput {
    pub fn new(
        footprint: BuildingFootprint,
        unit_types: Vec<UnitTypeSpec>,
        egress: EgressConfig,
        params: LayoutParams,
    ) -> Self {
        Self {
            footprint,
            unit_types,
            egress,
            params,
        }
    }

    /// Reject degenerate inputs before any computation.
    pub fn validate(&self) -> Result<()> {
        let fp = &self.footprint;
        if !(fp.width.is_finite() && fp.depth.is_finite() && fp.width > 0.0 && fp.depth > 0.0) {
            return Err(Error::InvalidFootprint {
                width: fp.width,
                depth: fp.depth,
            });
        }

        validate_unit_types(&self.unit_types)?;

        let p = &self.params;
        positive("corridor_width", p.corridor_width)?;
        positive("core_width", p.core_width)?;
        positive("core_depth", p.core_depth)?;

        if p.corridor_width >= fp.depth {
            return Err(Error::parameter(
                "corridor_width",
                format!(
                    "corridor {} leaves no rentable depth in a {} deep building",
                    p.corridor_width, fp.depth
                ),
            ));
        }
        if fp.width < 2.0 * p.core_width {
            return Err(Error::parameter(
                "core_width",
                format!("building width {} cannot hold two {} wide cores", fp.width, p.core_width),
            ));
        }
        unit_interval("alignment_tolerance", p.alignment_tolerance)?;
        if let Some(bias) = p.side_bias {
            unit_interval("side_bias", bias)?;
        }

        let e = &self.egress;
        positive("max_dead_end", e.max_dead_end)?;
        positive("max_travel_distance", e.max_travel_distance)?;
        positive("max_common_path", e.max_common_path)?;

        Ok(())
    }
}

fn validate_unit_types(types: &[UnitTypeSpec]) -> Result<()> {
    if types.is_empty() {
        return Err(Error::EmptyUnitMix);
    }

    let mut seen = FxHashSet::default();
    let mut total = 0.0;
    for spec in types {
        if !seen.insert(spec.id.as_str()) {
            return Err(Error::DuplicateUnitType(spec.id.clone()));
        }
        if !spec.percentage.is_finite() || spec.percentage < 0.0 {
            return Err(Error::InvalidUnitType {
                id: spec.id.clone(),
                reason: format!("percentage {} must be a non-negative number", spec.percentage),
            });
        }
        if !spec.target_area.is_finite() || spec.target_area <= 0.0 {
            return Err(Error::InvalidUnitType {
                id: spec.id.clone(),
                reason: format!("target area {} must be positive", spec.target_area),
            });
        }
        total += spec.percentage;
    }

    if total <= 0.0 {
        return Err(Error::ZeroPercentages);
    }
    Ok(())
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::parameter(name, format!("{} must be positive", value)))
    }
}

fn unit_interval(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::parameter(name, format!("{} is outside [0, 1]", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_unit_config;

    fn input() -> LayoutInput {
        LayoutInput::new(
            BuildingFootprint::new(60.0, 20.0),
            default_unit_config(),
            EgressConfig::sprinklered(),
            LayoutParams::default(),
        )
    }

    #[test]
    fn test_default_input_is_valid() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_footprint() {
        let mut bad = input();
        bad.footprint.width = 0.0;
        assert!(matches!(bad.validate(), Err(Error::InvalidFootprint { .. })));

        bad.footprint.width = f64::NAN;
        assert!(matches!(bad.validate(), Err(Error::InvalidFootprint { .. })));
    }

    #[test]
    fn test_rejects_empty_and_zero_mix() {
        let mut bad = input();
        bad.unit_types.clear();
        assert!(matches!(bad.validate(), Err(Error::EmptyUnitMix)));

        let mut zero = input();
        for spec in &mut zero.unit_types {
            spec.percentage = 0.0;
        }
        assert!(matches!(zero.validate(), Err(Error::ZeroPercentages)));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut bad = input();
        bad.unit_types[1].id = "Studio".to_string();
        assert!(matches!(bad.validate(), Err(Error::DuplicateUnitType(id)) if id == "Studio"));
    }

    #[test]
    fn test_percentages_need_not_sum_to_hundred() {
        let mut odd = input();
        odd.unit_types[0].percentage = 70.0;
        assert!(odd.validate().is_ok());
    }

    #[test]
    fn test_rejects_corridor_wider_than_building() {
        let mut bad = input();
        bad.params.corridor_width = 25.0;
        assert!(matches!(
            bad.validate(),
            Err(Error::InvalidParameter { name: "corridor_width", .. })
        ));
    }

    #[test]
    fn test_rejects_tolerance_out_of_range() {
        let mut bad = input();
        bad.params.alignment_tolerance = 1.5;
        assert!(bad.validate().is_err());
    }
}
