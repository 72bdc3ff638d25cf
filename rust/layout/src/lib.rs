// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Barplan Layout
//!
//! Apartment layouts for double-loaded corridor buildings. A rectangular
//! footprint and a unit mix go in; a floor plan of units, cores, corridor
//! and service fillers that tiles the whole floor comes out, together with
//! its statistics and an egress report.
//!
//! ```no_run
//! use barplan_layout::{default_unit_config, generate_all, BuildingFootprint, EgressConfig,
//!     LayoutInput, LayoutParams};
//!
//! let input = LayoutInput::new(
//!     BuildingFootprint::new(60.0, 20.0),
//!     default_unit_config(),
//!     EgressConfig::sprinklered(),
//!     LayoutParams::default(),
//! );
//! for option in generate_all(&input)? {
//!     println!("{}: {} units", option.label, option.plan.stats.total_units);
//! }
//! # Ok::<(), barplan_layout::Error>(())
//! ```

pub mod config;
pub mod distribution;
pub mod egress;
pub mod error;
pub mod flexibility;
pub mod footprint;
mod input;
mod pipeline;
pub mod types;
pub mod validation;

pub use config::{default_unit_config, StrategyProfile};
pub use distribution::{apportion, distribute_unit_counts, split_by_side, SideSplit, UnitCounts};
pub use egress::evaluate_egress;
pub use error::{Error, Result};
pub use flexibility::{derive_behaviors, UnitTypeBehavior};
pub use footprint::{extract_footprint, extract_footprint_from_mesh, ExtractionOptions};
pub use pipeline::{generate, generate_all};
pub use types::*;
pub use validation::{validate_plan, Severity, ValidationIssue};
