//! Export-then-import round trips and import validation.

use super::{annotated, annotator};
use crate::format::error::FormatError;
use crate::format::formats::FullFormat;
use crate::format::traits::{AnnotationFormat, ExportOptions};
use crate::format::{import_file, import_str};
use crate::interaction::Annotator;
use crate::model::{AngleKey, CircleKey, Color, LineKey};
use crate::transform::Size;

const EPSILON: f64 = 1e-5;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn export_json(annotator: &Annotator) -> String {
    let (bytes, _) = FullFormat
        .export_to_bytes(annotator, &ExportOptions::default())
        .unwrap();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_roundtrip_across_view_sizes() {
    let original = annotated();
    let json = export_json(&original);

    // Same image, shown at a different size.
    let mut restored = Annotator::default();
    restored.load_image(Size::new(200, 200), Size::new(300, 300));
    let summary = import_str(&mut restored, &json).unwrap();
    assert_eq!(summary.points, 4);
    assert_eq!(summary.dropped, 0);

    let (a, b) = (original.store(), restored.store());
    let (ta, tb) = (original.transform().unwrap(), restored.transform().unwrap());
    for (index, point) in a.points() {
        let expected = ta.to_source(point.position);
        let got = tb.to_source(b.position(index).unwrap());
        assert!(approx_eq(expected.x, got.x) && approx_eq(expected.y, got.y), "point {index}");
        assert_eq!(b.point(index).unwrap().color, point.color);
    }
    assert_eq!(a.lines().collect::<Vec<_>>(), b.lines().collect::<Vec<_>>());
    assert_eq!(a.angles().collect::<Vec<_>>(), b.angles().collect::<Vec<_>>());
    assert_eq!(a.circles().collect::<Vec<_>>(), b.circles().collect::<Vec<_>>());
    assert_eq!(a.pivots().collect::<Vec<_>>(), b.pivots().collect::<Vec<_>>());
}

#[test]
fn test_import_leaves_store_clean() {
    let mut annotator = annotator();
    import_str(&mut annotator, &export_json(&annotated())).unwrap();
    assert!(!annotator.store().is_dirty());

    annotator.store_mut().toggle_pivot(1);
    assert!(annotator.store().is_dirty());
}

#[test]
fn test_import_canonicalises_keys() {
    let mut annotator = annotator();
    let json = r##"{
        "points": [[1, 0, 0, "red"], [2, 10, 0, "red"], [3, 10, 10, "#00f"]],
        "lines": [[2, 1, "red"], [3, 2, "red"]],
        "angles": [[3, 2, 1, "red"]],
        "circles": [[3, 1, "blue"]],
        "pivots": [3]
    }"##;
    import_str(&mut annotator, json).unwrap();

    let store = annotator.store();
    assert_eq!(
        store.lines().map(|(key, _)| key).collect::<Vec<_>>(),
        vec![LineKey::new(1, 2), LineKey::new(2, 3)]
    );
    assert_eq!(store.angles().next().map(|(key, _)| key), Some(AngleKey::new(1, 2, 3)));
    // Circles keep their orientation.
    assert_eq!(store.circles().next().map(|(key, _)| key), Some(CircleKey::new(3, 1)));
    assert_eq!(store.point(3).unwrap().color, Color::rgb(0, 0, 255));
}

#[test]
fn test_dangling_references_are_dropped() {
    let mut annotator = annotator();
    let json = r#"{
        "points": [[1, 0, 0, "red"], [2, 10, 0, "red"], [3, 10, 10, "red"]],
        "lines": [[1, 2, "red"], [2, 9, "red"]],
        "angles": [[1, 2, 3, "red"]],
        "circles": [[1, 7, "red"]],
        "pivots": [2, 8]
    }"#;
    let summary = import_str(&mut annotator, json).unwrap();

    // Line 2-9, circle 1@7, pivot 8 and the angle without line 2-3.
    assert_eq!(summary.dropped, 4);
    assert_eq!(summary.lines, 1);
    assert_eq!(summary.angles, 0);
    assert_eq!(summary.circles, 0);
    assert_eq!(summary.pivots, 1);
}

#[test]
fn test_missing_field() {
    let mut annotator = annotator();
    let err = import_str(&mut annotator, r#"{"points": [], "lines": []}"#).unwrap_err();
    assert!(matches!(err, FormatError::MissingField { field } if field == "angles"));
}

#[test]
fn test_invalid_color_leaves_store_untouched() {
    let mut annotator = annotated();
    let json = r#"{"points": [[1, 0, 0, "notacolor"]], "lines": [], "angles": [], "circles": [], "pivots": []}"#;
    let err = import_str(&mut annotator, json).unwrap_err();

    assert!(matches!(err, FormatError::InvalidColor { value } if value == "notacolor"));
    assert_eq!(annotator.store().point_count(), 4);
}

#[test]
fn test_non_positive_index_rejected() {
    let mut annotator = annotator();
    let json = r#"{"points": [[0, 0, 0, "red"]], "lines": [], "angles": [], "circles": [], "pivots": []}"#;
    let err = import_str(&mut annotator, json).unwrap_err();
    assert!(matches!(err, FormatError::InvalidFormat { .. }));

    let json = r#"{"points": [], "lines": [[1, -2, "red"]], "angles": [], "circles": [], "pivots": []}"#;
    let err = import_str(&mut annotator, json).unwrap_err();
    assert!(matches!(err, FormatError::InvalidFormat { .. }));
}

#[test]
fn test_malformed_documents() {
    let mut annotator = annotator();
    assert!(matches!(
        import_str(&mut annotator, "[1, 2]").unwrap_err(),
        FormatError::InvalidFormat { .. }
    ));
    assert!(matches!(
        import_str(&mut annotator, "{").unwrap_err(),
        FormatError::Json(_)
    ));
    assert!(matches!(
        import_str(&mut annotator, r#"{"pivots": [[1, "x", 2]]}"#).unwrap_err(),
        FormatError::Json(_)
    ));
}

#[test]
fn test_import_without_image() {
    let mut annotator = Annotator::default();
    let err = import_str(&mut annotator, r#"{"pivots": []}"#).unwrap_err();
    assert!(matches!(err, FormatError::NoImage));
}

#[test]
fn test_import_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.json");
    std::fs::write(&path, export_json(&annotated())).unwrap();

    let mut annotator = annotator();
    let summary = import_file(&mut annotator, &path).unwrap();
    assert_eq!(summary.points, 4);

    let err = import_file(&mut annotator, &dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, FormatError::Io(_)));
    assert_eq!(annotator.store().point_count(), 4);
}
