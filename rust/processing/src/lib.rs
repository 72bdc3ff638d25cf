// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Barplan Processing
//!
//! Everything around the pure layout core that touches a host: footprint
//! sources, request resolution, batch generation, presentation meshes and
//! saved-layout blobs.

pub mod config;
pub mod error;
pub mod persistence;
pub mod render;
pub mod request;
pub mod source;

pub use config::CliConfig;
pub use error::{Error, Result};
pub use persistence::{SavedLayout, SAVED_LAYOUT_VERSION};
pub use render::{parse_hex_color, render_plan, ElementKind, RenderElement, RenderOptions};
pub use request::{generate_batch, generate_options, LayoutRequest};
pub use source::{FlatPointBuffer, FootprintSource, TriangleBuffer};
