// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Saved layouts as versioned JSON blobs.

use crate::error::{Error, Result};
use crate::request::LayoutRequest;
use barplan_layout::LayoutOption;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Format version written by this crate.
pub const SAVED_LAYOUT_VERSION: u32 = 1;

/// A request together with the options generated from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedLayout {
    pub version: u32,
    pub request: LayoutRequest,
    pub options: Vec<LayoutOption>,
}

#[derive(Deserialize)]
struct Header {
    version: u32,
}

impl SavedLayout {
    pub fn new(request: LayoutRequest, options: Vec<LayoutOption>) -> Self {
        Self {
            version: SAVED_LAYOUT_VERSION,
            request,
            options,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a blob, rejecting versions this crate does not know.
    pub fn from_json(json: &str) -> Result<Self> {
        let header: Header = serde_json::from_str(json)?;
        if header.version != SAVED_LAYOUT_VERSION {
            return Err(Error::UnsupportedVersion(header.version));
        }
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        tracing::info!(path = %path.as_ref().display(), options = self.options.len(), "Saved layout");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::generate_options;
    use barplan_layout::BuildingFootprint;

    fn saved() -> SavedLayout {
        let request = LayoutRequest::new(BuildingFootprint::new(60.0, 20.0));
        let options = generate_options(&request).unwrap();
        SavedLayout::new(request, options)
    }

    #[test]
    fn test_blob_restores_plans() {
        let saved = saved();
        let restored = SavedLayout::from_json(&saved.to_json().unwrap()).unwrap();

        assert_eq!(restored.version, SAVED_LAYOUT_VERSION);
        assert_eq!(restored.request, saved.request);
        assert_eq!(restored.options.len(), 3);
        for (a, b) in restored.options.iter().zip(&saved.options) {
            assert_eq!(a.plan.units.len(), b.plan.units.len());
            assert_eq!(a.plan.stats.unit_counts, b.plan.stats.unit_counts);
            assert_eq!(a.label, b.label);
        }
    }

    #[test]
    fn test_unknown_version_rejected() {
        let json = r#"{ "version": 7, "request": null, "options": [] }"#;
        assert!(matches!(
            SavedLayout::from_json(json),
            Err(Error::UnsupportedVersion(7))
        ));
        assert!(matches!(
            SavedLayout::from_json("not json"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let saved = saved();
        let path = std::env::temp_dir().join(format!("barplan-saved-{}.json", std::process::id()));

        saved.save(&path).unwrap();
        let loaded = SavedLayout::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.request, saved.request);
        let ids = |s: &SavedLayout| -> Vec<String> {
            s.options[0].plan.cores.iter().map(|c| c.id.clone()).collect()
        };
        assert_eq!(ids(&loaded), ids(&saved));
    }
}
