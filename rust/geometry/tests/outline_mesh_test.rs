// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outline → triangulation → mesh round through the public API, using the
//! shapes the layout produces (a unit wrapping the facade strip of a core).

use approx::assert_relative_eq;
use barplan_geometry::{
    extrude_polygon, flat_polygon, is_convex, polygon_area, rects_outline, signed_area, Rect,
};

#[test]
fn wrapped_unit_outline_meshes_without_spill() {
    let unit = Rect::new(10.0, 10.915, 8.0, 9.085);
    let strip = Rect::new(18.0, 19.905, 3.66, 0.095);

    let outline = rects_outline(&[unit, strip]).unwrap();

    assert!(!is_convex(&outline));
    assert!(signed_area(&outline) > 0.0);
    assert_relative_eq!(
        polygon_area(&outline),
        unit.area() + strip.area(),
        epsilon = 1e-3
    );

    let plate = flat_polygon(&outline, 0.0).unwrap();
    assert_relative_eq!(
        plate.projected_signed_area(),
        unit.area() + strip.area(),
        epsilon = 1e-2
    );
}

#[test]
fn corridor_void_outline_three_rects() {
    // End unit plus corridor-end void plus core facade strip
    let unit = Rect::new(0.0, 0.0, 12.0, 9.0);
    let void = Rect::new(0.0, 9.0, 8.0, 2.0);
    let strip = Rect::new(12.0, 0.0, 3.0, 0.5);

    let outline = rects_outline(&[unit, void, strip]).unwrap();
    assert_relative_eq!(polygon_area(&outline), 108.0 + 16.0 + 1.5, epsilon = 1e-3);

    let prism = extrude_polygon(&outline, 0.0, 3.0).unwrap();
    assert!(prism.triangle_count() > 2 * (outline.len() - 2));
}
