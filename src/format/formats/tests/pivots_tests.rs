//! Tests for the pivots-only schema.

use serde_json::{json, Value};

use super::{annotated, annotator};
use crate::format::error::FormatError;
use crate::format::formats::PivotsFormat;
use crate::format::import_str;
use crate::format::traits::{AnnotationFormat, ExportOptions};
use crate::geometry::Point2;

#[test]
fn test_format_metadata() {
    assert_eq!(PivotsFormat.id(), "pivots");
    assert_eq!(PivotsFormat.display_name(), "Pivots (JSON)");
}

#[test]
fn test_export_layout() {
    let (bytes, result) = PivotsFormat
        .export_to_bytes(&annotated(), &ExportOptions::default())
        .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(value, json!({"pivots": [[2, 60.0, 20.0], [4, 150.0, 40.5]]}));
    assert_eq!(result.points_exported, 2);
    assert_eq!(result.relations_exported, 0);
}

#[test]
fn test_import_creates_points_and_pivots() {
    let mut annotator = annotator();
    let summary = import_str(&mut annotator, r#"{"pivots": [[3, 40.0, 60.0], [1, 10, 10]]}"#).unwrap();

    assert_eq!(summary.points, 2);
    assert_eq!(summary.pivots, 2);
    assert_eq!(summary.lines, 0);

    let store = annotator.store();
    assert_eq!(store.position(3), Some(Point2::new(20.0, 30.0)));
    assert_eq!(store.position(1), Some(Point2::new(5.0, 5.0)));
    assert!(store.is_pivot(1) && store.is_pivot(3));
    assert_eq!(store.point(3).unwrap().color, annotator.color());
}

#[test]
fn test_import_replaces_existing_annotations() {
    let mut annotator = annotated();
    import_str(&mut annotator, r#"{"pivots": [[9, 2.0, 2.0]]}"#).unwrap();

    let store = annotator.store();
    assert_eq!(store.point_count(), 1);
    assert_eq!(store.line_count(), 0);
    assert_eq!(store.circle_count(), 0);
    assert!(store.is_pivot(9));
}

#[test]
fn test_duplicate_index_leaves_store_untouched() {
    let mut annotator = annotated();
    let err = import_str(&mut annotator, r#"{"pivots": [[1, 0, 0], [1, 5, 5]]}"#).unwrap_err();

    assert!(matches!(err, FormatError::InvalidFormat { .. }));
    assert_eq!(annotator.store().point_count(), 4);
}

#[test]
fn test_single_key_must_be_pivots() {
    let mut annotator = annotator();
    let err = import_str(&mut annotator, r#"{"points": []}"#).unwrap_err();
    assert!(matches!(err, FormatError::MissingField { field } if field == "pivots"));
}
