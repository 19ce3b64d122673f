//! Tests for the full annotation export.

use serde_json::{json, Value};

use super::{annotated, annotator};
use crate::format::error::FormatError;
use crate::format::formats::FullFormat;
use crate::format::traits::{AnnotationFormat, ExportOptions};
use crate::interaction::Annotator;

fn export_value(annotator: &Annotator) -> Value {
    let (bytes, _) = FullFormat
        .export_to_bytes(annotator, &ExportOptions::default())
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[test]
fn test_format_metadata() {
    assert_eq!(FullFormat.id(), "full");
    assert_eq!(FullFormat.display_name(), "Annotations (JSON)");
}

#[test]
fn test_export_layout() {
    let value = export_value(&annotated());
    assert_eq!(
        value,
        json!({
            "points": [
                [1, 20.0, 20.0, "#ff0000"],
                [2, 60.0, 20.0, "#ff0000"],
                [3, 60.0, 80.0, "#ff0000"],
                [4, 150.0, 40.5, "#008000"]
            ],
            "lines": [[1, 2, "#ff0000"], [2, 3, "#ff0000"]],
            "angles": [[1, 2, 3, "#ff0000"]],
            "circles": [[1, 3, "#008000"]],
            "pivots": [2, 4]
        })
    );
}

#[test]
fn test_export_counts() {
    let (_, result) = FullFormat
        .export_to_bytes(&annotated(), &ExportOptions::default())
        .unwrap();
    assert_eq!(result.points_exported, 4);
    assert_eq!(result.relations_exported, 4);
    assert!(result.files_created.is_empty());
}

#[test]
fn test_export_empty_store() {
    let value = export_value(&annotator());
    assert_eq!(
        value,
        json!({"points": [], "lines": [], "angles": [], "circles": [], "pivots": []})
    );
}

#[test]
fn test_indent_follows_options() {
    let annotator = annotated();

    let (two, _) = FullFormat
        .export_to_bytes(&annotator, &ExportOptions::new().indent(2))
        .unwrap();
    let two = String::from_utf8(two).unwrap();
    assert!(two.starts_with("{\n  \"points\": [\n    [\n      1,"));

    let (four, _) = FullFormat
        .export_to_bytes(&annotator, &ExportOptions::new().indent(4))
        .unwrap();
    let four = String::from_utf8(four).unwrap();
    assert!(four.starts_with("{\n    \"points\": [\n        [\n            1,"));
}

#[test]
fn test_export_without_image() {
    let err = FullFormat
        .export_to_bytes(&Annotator::default(), &ExportOptions::default())
        .unwrap_err();
    assert!(matches!(err, FormatError::NoImage));
}

#[test]
fn test_export_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.json");

    let result = FullFormat
        .export(&annotated(), &path, &ExportOptions::default())
        .unwrap();
    assert_eq!(result.files_created, vec![path.clone()]);

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["pivots"], json!([2, 4]));
}
