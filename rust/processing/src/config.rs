// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

use barplan_layout::config::DEFAULT_ALIGNMENT_TOLERANCE;
use barplan_layout::CoreSide;

/// Generation defaults a shell session can preset.
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// `BARPLAN_SPRINKLERED`, default true.
    pub sprinklered: bool,
    /// `BARPLAN_ALIGNMENT`, default 0.5.
    pub alignment_tolerance: f64,
    /// `BARPLAN_CORE_SIDE`, default north.
    pub core_side: CoreSide,
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup; unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            sprinklered: lookup("BARPLAN_SPRINKLERED")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.sprinklered),
            alignment_tolerance: lookup("BARPLAN_ALIGNMENT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.alignment_tolerance),
            core_side: lookup("BARPLAN_CORE_SIDE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.core_side),
        }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            sprinklered: true,
            alignment_tolerance: DEFAULT_ALIGNMENT_TOLERANCE,
            core_side: CoreSide::North,
        }
    }
}
