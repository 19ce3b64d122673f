//! Unit tests for the annotation documents.
//!
//! These tests check the exact JSON layout of both schemas, schema
//! detection on import, and export-then-import round trips.

mod full_tests;
mod pivots_tests;
mod roundtrip_tests;

use crate::geometry::Point2;
use crate::interaction::Annotator;
use crate::model::Color;
use crate::transform::Size;

/// A 200x200 image shown at 100x100, so source = 2 × view.
fn annotator() -> Annotator {
    let mut annotator = Annotator::default();
    annotator.load_image(Size::new(200, 200), Size::new(100, 100));
    annotator
}

/// Right angle 1-2-3 with both arms, a circle around 1 through 3,
/// a green point 4 and pivots {2, 4}. Coordinates in source pixels.
fn annotated() -> Annotator {
    let mut annotator = annotator();
    for (x, y) in [(20.0, 20.0), (60.0, 20.0), (60.0, 80.0)] {
        annotator.add_point_at_source(None, Point2::new(x, y)).unwrap();
    }
    let green = Color::parse("green").unwrap();
    annotator.set_color(green);
    annotator.add_point_at_source(Some(4), Point2::new(150.0, 40.5)).unwrap();

    let store = annotator.store_mut();
    assert!(store.add_line(1, 2, Color::RED));
    assert!(store.add_line(3, 2, Color::RED));
    assert!(store.add_angle(3, 2, 1, Color::RED));
    assert!(store.add_circle(1, 3, green));
    store.toggle_pivot(4);
    store.toggle_pivot(2);
    annotator
}
