// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for layout generation.
//!
//! Only entry-boundary validation fails; everything past it degrades into
//! fillers, unplaced counts and `Fail` compliance flags.

/// Result type alias for layout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur before layout generation starts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Footprint width or depth is non-positive or not finite.
    #[error("invalid footprint: width {width}, depth {depth} must both be positive")]
    InvalidFootprint { width: f64, depth: f64 },

    /// No unit types were configured.
    #[error("unit mix is empty")]
    EmptyUnitMix,

    /// Percentages add up to zero, so no unit can be apportioned.
    #[error("unit mix percentages sum to zero")]
    ZeroPercentages,

    /// A unit type entry is malformed.
    #[error("invalid unit type '{id}': {reason}")]
    InvalidUnitType { id: String, reason: String },

    /// Two unit types share one identifier.
    #[error("duplicate unit type id '{0}'")]
    DuplicateUnitType(String),

    /// A scalar parameter is out of range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Geometry kernel error (footprint extraction).
    #[error("geometry error: {0}")]
    Geometry(#[from] barplan_geometry::Error),
}

impl Error {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
