// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Layout error: {0}")]
    Layout(#[from] barplan_layout::Error),

    #[error("Geometry error: {0}")]
    Geometry(#[from] barplan_geometry::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported saved layout version {0}")]
    UnsupportedVersion(u32),

    #[error("Footprint source error: {0}")]
    FootprintSource(String),
}
