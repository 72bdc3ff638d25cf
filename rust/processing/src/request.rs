// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host requests and their resolution into layout inputs.

use crate::error::Result;
use barplan_layout::{
    default_unit_config, generate_all, BuildingFootprint, EgressConfig, LayoutInput, LayoutOption,
    LayoutParams, UnitTypeSpec,
};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Colors for unit types that carry none, assigned in order.
const FALLBACK_PALETTE: [&str; 6] = ["#8FBC8F", "#4A90D9", "#E8A33D", "#C0504D", "#8064A2", "#4BACC6"];

fn default_sprinklered() -> bool {
    true
}

/// A layout request as a host application sends it.
///
/// Everything except the footprint may be omitted: the unit mix falls back
/// to the standard four types, egress limits to the sprinkler preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRequest {
    pub footprint: BuildingFootprint,
    #[serde(default)]
    pub unit_types: Option<Vec<UnitTypeSpec>>,
    #[serde(default = "default_sprinklered")]
    pub sprinklered: bool,
    /// Explicit limits, taking precedence over the preset.
    #[serde(default)]
    pub egress: Option<EgressConfig>,
    #[serde(default)]
    pub params: LayoutParams,
}

impl LayoutRequest {
    pub fn new(footprint: BuildingFootprint) -> Self {
        Self {
            footprint,
            unit_types: None,
            sprinklered: default_sprinklered(),
            egress: None,
            params: LayoutParams::default(),
        }
    }

    /// Freeze the request into the value types the layout core takes.
    ///
    /// Types without a color get one from the fallback palette. Color
    /// overrides naming an unknown type are dropped.
    pub fn resolve(&self) -> LayoutInput {
        let mut unit_types = self.unit_types.clone().unwrap_or_else(default_unit_config);
        for (i, spec) in unit_types.iter_mut().enumerate() {
            if spec.color.is_none() {
                spec.color = Some(FALLBACK_PALETTE[i % FALLBACK_PALETTE.len()].to_string());
            }
        }

        let known: FxHashSet<&str> = unit_types.iter().map(|t| t.id.as_str()).collect();
        let mut params = self.params.clone();
        params.color_overrides.retain(|id, _| {
            let keep = known.contains(id.as_str());
            if !keep {
                tracing::warn!(type_id = %id, "Ignoring color override for unknown unit type");
            }
            keep
        });

        let egress = self
            .egress
            .clone()
            .unwrap_or_else(|| EgressConfig::preset(self.sprinklered));

        LayoutInput::new(self.footprint.clone(), unit_types, egress, params)
    }
}

/// Resolve a request and generate its three strategy options.
pub fn generate_options(request: &LayoutRequest) -> Result<Vec<LayoutOption>> {
    let input = request.resolve();
    let options = generate_all(&input)?;

    tracing::debug!(
        width = input.footprint.width,
        depth = input.footprint.depth,
        options = options.len(),
        "Generated layout options"
    );

    Ok(options)
}

/// Generate options for many requests in parallel, e.g. every floor of a
/// model. Results keep the request order.
pub fn generate_batch(requests: &[LayoutRequest]) -> Vec<Result<Vec<LayoutOption>>> {
    let start = std::time::Instant::now();
    let results: Vec<_> = requests.par_iter().map(generate_options).collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    tracing::info!(
        requests = requests.len(),
        failed,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Processed layout batch"
    );

    results
}
