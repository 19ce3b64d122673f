//! Renderer-agnostic display list.
//!
//! [`build_scene`] turns the annotator state into a flat list of primitives
//! that a painter can draw in order: points, then lines, angles and circles.
//! A view-space scene reflects the interactive highlight; a source-space
//! scene is what gets burned into an exported image, so it scales strokes
//! and text with the image and never highlights anything.

use std::collections::BTreeSet;

use crate::geometry::labels::{degree_label_position, distance_label_position, index_label_position};
use crate::geometry::{Point2, Rect};
use crate::interaction::Annotator;
use crate::measure::format_rounded;
use crate::model::{AngleKey, AnnotationMode, CircleKey, Color, LineKey, PointIndex};

/// Coordinate space a scene is built in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Space {
    /// The displayed bitmap, with highlighting.
    #[default]
    View,
    /// The original image pixels.
    Source,
}

/// A piece of text anchored at its baseline origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: Point2,
}

/// One drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawItem {
    /// A round dot with its index label.
    Point {
        index: PointIndex,
        position: Point2,
        color: Color,
        width: f64,
        label: Label,
    },
    /// A line segment with its length label.
    Segment {
        line: LineKey,
        from: Point2,
        to: Point2,
        color: Color,
        width: f64,
        label: Label,
    },
    /// An arc inside `bounds`, starting at `start_degrees` counter-clockwise
    /// from east and sweeping `sweep_degrees`, with the angle label.
    Arc {
        angle: AngleKey,
        bounds: Rect,
        start_degrees: f64,
        sweep_degrees: f64,
        color: Color,
        width: f64,
        label: Label,
    },
    /// An outlined circle inscribed in `bounds`.
    Circle {
        circle: CircleKey,
        bounds: Rect,
        color: Color,
        width: f64,
    },
}

/// Everything to draw for one frame or export.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub space: Space,
    pub font_family: String,
    pub font_size: f64,
    pub items: Vec<DrawItem>,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Build the display list for the annotator's current state.
///
/// Returns an empty scene when no image is loaded.
pub fn build_scene(annotator: &Annotator, space: Space) -> Scene {
    let config = annotator.config();
    let Some(transform) = annotator.transform() else {
        return Scene {
            space,
            font_family: config.font_family.clone(),
            ..Default::default()
        };
    };
    let store = annotator.store();
    let kernel = annotator.kernel();

    let scale = match space {
        Space::View => 1.0,
        Space::Source => transform.scale_view_to_source(),
    };
    let map = |p: Point2| match space {
        Space::View => p,
        Space::Source => transform.to_source(p),
    };

    let (highlighted, pending): (BTreeSet<PointIndex>, BTreeSet<PointIndex>) = match space {
        Space::View => (
            annotator.highlighted_points(),
            annotator.pending().iter().copied().collect(),
        ),
        Space::Source => (BTreeSet::new(), BTreeSet::new()),
    };
    let shade = |color: Color, lit: bool| if lit { color.lighter() } else { color };
    let mode = annotator.mode();

    let mut items = Vec::new();

    for (index, point) in store.points() {
        let position = map(point.position);
        items.push(DrawItem::Point {
            index,
            position,
            color: shade(point.color, highlighted.contains(&index)),
            width: config.point_width * scale,
            label: Label {
                text: index.to_string(),
                position: index_label_position(position, config),
            },
        });
    }

    let line_mode = matches!(mode, AnnotationMode::Angle | AnnotationMode::Vertical);
    for (line, color) in store.lines() {
        let (Some(a), Some(b)) = (store.position(line.a()), store.position(line.b())) else {
            continue;
        };
        let (from, to) = (map(a), map(b));
        let length = kernel.distance(transform.to_source(a), transform.to_source(b));
        let lit = line_mode && pending.contains(&line.a()) && pending.contains(&line.b());
        items.push(DrawItem::Segment {
            line,
            from,
            to,
            color: shade(color, lit),
            width: config.line_width * scale,
            label: Label {
                text: format_rounded(length, 2),
                position: distance_label_position(a, b, kernel.midpoint(from, to), config),
            },
        });
    }

    for (angle, color) in store.angles() {
        let (Some(a), Some(b), Some(c)) = (
            store.position(angle.first()),
            store.position(angle.vertex()),
            store.position(angle.last()),
        ) else {
            continue;
        };
        let (top_left, bottom_right) = kernel.diag_points(a, b, c);
        let sweep = kernel.angle_degrees(a, b, c);
        let arc_mid = map(kernel.arc_midpoint(a, b, c));
        items.push(DrawItem::Arc {
            angle,
            bounds: Rect::from_corners(map(top_left), map(bottom_right)),
            start_degrees: kernel.arc_start_degree(a, b, c),
            sweep_degrees: sweep,
            color,
            width: config.angle_width * scale,
            label: Label {
                text: format!("{}°", format_rounded(sweep, 2)),
                position: degree_label_position(map(b), arc_mid, config),
            },
        });
    }

    let circle_mode = mode == AnnotationMode::Circle;
    for (circle, color) in store.circles() {
        let (Some(a), Some(b)) = (store.position(circle.center), store.position(circle.rim)) else {
            continue;
        };
        let lit = circle_mode && pending.contains(&circle.center) && pending.contains(&circle.rim);
        items.push(DrawItem::Circle {
            circle,
            bounds: kernel.circle_bounds(map(a), map(b)),
            color: shade(color, lit),
            width: config.line_width * scale,
        });
    }

    Scene {
        space,
        font_family: config.font_family.clone(),
        font_size: config.font_size * scale,
        items,
    }
}

/// Pivots in ascending index order as `"index: (x, y)"`, in source pixels.
pub fn pivot_summary(annotator: &Annotator) -> Vec<String> {
    let Some(transform) = annotator.transform() else {
        return Vec::new();
    };
    let store = annotator.store();
    store
        .pivots()
        .filter_map(|index| {
            let p = transform.to_source(store.position(index)?);
            Some(format!(
                "{index}: ({}, {})",
                format_rounded(p.x, 2),
                format_rounded(p.y, 2)
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::PointerEvent;
    use crate::transform::Size;

    fn annotator_with_line() -> Annotator {
        let mut annotator = Annotator::default();
        annotator.load_image(Size::new(200, 200), Size::new(100, 100));
        annotator.switch_mode(AnnotationMode::Line);
        annotator.handle_event(PointerEvent::down(10.0, 10.0));
        annotator.handle_event(PointerEvent::down(40.0, 10.0));
        annotator
    }

    fn segments(scene: &Scene) -> Vec<&DrawItem> {
        scene
            .items
            .iter()
            .filter(|item| matches!(item, DrawItem::Segment { .. }))
            .collect()
    }

    #[test]
    fn test_empty_without_image() {
        let scene = build_scene(&Annotator::default(), Space::View);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_view_scene_labels_and_highlight() {
        let annotator = annotator_with_line();
        let scene = build_scene(&annotator, Space::View);
        assert_eq!(scene.items.len(), 3);

        // Point 2 is still pending after the chained line, so it is lit.
        let DrawItem::Point { color, label, .. } = &scene.items[1] else {
            panic!("expected a point");
        };
        assert_eq!(*color, Color::RED.lighter());
        assert_eq!(label.text, "2");
        assert_eq!(label.position, Point2::new(43.0, 7.0));

        let DrawItem::Segment { color, label, .. } = segments(&scene)[0] else {
            panic!("expected a segment");
        };
        // Lines only light up in angle and vertical modes.
        assert_eq!(*color, Color::RED);
        // 30 view px = 60 source px, horizontal line puts the label above.
        assert_eq!(label.text, "60.0");
        assert_eq!(label.position, Point2::new(25.0, 2.0));
    }

    #[test]
    fn test_source_scene_scales_and_never_highlights() {
        let annotator = annotator_with_line();
        let scene = build_scene(&annotator, Space::Source);
        assert_eq!(scene.font_size, 20.0);

        let DrawItem::Point { position, color, width, .. } = &scene.items[1] else {
            panic!("expected a point");
        };
        assert_eq!(*position, Point2::new(80.0, 20.0));
        assert_eq!(*color, Color::RED);
        assert_eq!(*width, 14.0);
    }

    #[test]
    fn test_angle_arc() {
        let mut annotator = Annotator::default();
        annotator.load_image(Size::new(100, 100), Size::new(100, 100));
        for (x, y) in [(50.0, 20.0), (20.0, 20.0), (20.0, 50.0)] {
            annotator.add_point_at_source(None, Point2::new(x, y)).unwrap();
        }
        let store = annotator.store_mut();
        store.add_line(1, 2, Color::RED);
        store.add_line(2, 3, Color::RED);
        store.add_angle(1, 2, 3, Color::RED);

        let scene = build_scene(&annotator, Space::View);
        let arc = scene
            .items
            .iter()
            .find(|item| matches!(item, DrawItem::Arc { .. }))
            .unwrap();
        let DrawItem::Arc { bounds, start_degrees, sweep_degrees, label, .. } = arc else {
            unreachable!();
        };
        // r = 30 * 0.2 = 6 around the vertex (20, 20)
        assert_eq!(*bounds, Rect::new(14.0, 14.0, 12.0, 12.0));
        assert!((sweep_degrees - 90.0).abs() < 1e-9);
        assert!((start_degrees - 270.0).abs() < 1e-9);
        assert_eq!(label.text, "90.0°");
    }

    #[test]
    fn test_pivot_summary_sorted_in_source_space() {
        let mut annotator = Annotator::default();
        annotator.load_image(Size::new(200, 200), Size::new(100, 100));
        annotator.add_point_at_source(Some(5), Point2::new(30.0, 40.0)).unwrap();
        annotator.add_point_at_source(Some(2), Point2::new(10.5, 20.25)).unwrap();
        annotator.store_mut().toggle_pivot(5);
        annotator.store_mut().toggle_pivot(2);
        assert_eq!(
            pivot_summary(&annotator),
            vec!["2: (10.5, 20.25)".to_string(), "5: (30.0, 40.0)".to_string()]
        );
    }
}
