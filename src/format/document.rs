//! JSON documents for annotation exchange.
//!
//! Two schemas exist, both with entries written as plain JSON arrays:
//!
//! ```text
//! full:   {"points":  [[index, x, y, "#rrggbb"], ...],
//!          "lines":   [[a, b, "#rrggbb"], ...],
//!          "angles":  [[a, vertex, c, "#rrggbb"], ...],
//!          "circles": [[center, rim, "#rrggbb"], ...],
//!          "pivots":  [index, ...]}
//! pivots: {"pivots":  [[index, x, y], ...]}
//! ```
//!
//! Coordinates are always in source pixels. On import a document with a
//! single top-level key is read as the pivots schema.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::format::error::FormatError;
use crate::format::traits::ImportSummary;
use crate::geometry::Point2;
use crate::interaction::Annotator;
use crate::model::{AngleKey, CircleKey, Color, LineKey, PointIndex};

/// `[index, x, y, color]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord(pub i64, pub f64, pub f64, pub String);

/// `[a, b, color]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord(pub i64, pub i64, pub String);

/// `[a, vertex, c, color]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleRecord(pub i64, pub i64, pub i64, pub String);

/// `[center, rim, color]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleRecord(pub i64, pub i64, pub String);

/// `[index, x, y]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRecord(pub i64, pub f64, pub f64);

/// Every point, relation and pivot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDocument {
    pub points: Vec<PointRecord>,
    pub lines: Vec<LineRecord>,
    pub angles: Vec<AngleRecord>,
    pub circles: Vec<CircleRecord>,
    pub pivots: Vec<i64>,
}

/// Only the pivots, with their coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotsDocument {
    pub pivots: Vec<PivotRecord>,
}

/// A parsed document of either schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Full(AnnotationDocument),
    Pivots(PivotsDocument),
}

impl AnnotationDocument {
    /// Field names in document order.
    pub const FIELDS: [&'static str; 5] = ["points", "lines", "angles", "circles", "pivots"];

    /// Snapshot the annotator's store in source coordinates.
    pub fn capture(annotator: &Annotator) -> Result<Self, FormatError> {
        let transform = annotator.transform().ok_or(FormatError::NoImage)?;
        let store = annotator.store();

        let points = store
            .points()
            .map(|(index, point)| {
                let p = transform.to_source(point.position);
                PointRecord(i64::from(index), p.x, p.y, point.color.to_hex())
            })
            .collect();
        let lines = store
            .lines()
            .map(|(key, color)| LineRecord(key.a().into(), key.b().into(), color.to_hex()))
            .collect();
        let angles = store
            .angles()
            .map(|(key, color)| {
                AngleRecord(key.first().into(), key.vertex().into(), key.last().into(), color.to_hex())
            })
            .collect();
        let circles = store
            .circles()
            .map(|(key, color)| CircleRecord(key.center.into(), key.rim.into(), color.to_hex()))
            .collect();
        let pivots = store.pivots().map(i64::from).collect();

        Ok(Self {
            points,
            lines,
            angles,
            circles,
            pivots,
        })
    }

    /// Number of lines, angles and circles.
    pub fn relation_count(&self) -> usize {
        self.lines.len() + self.angles.len() + self.circles.len()
    }
}

impl PivotsDocument {
    /// Snapshot the pivots in source coordinates.
    pub fn capture(annotator: &Annotator) -> Result<Self, FormatError> {
        let transform = annotator.transform().ok_or(FormatError::NoImage)?;
        let store = annotator.store();
        let pivots = store
            .pivots()
            .filter_map(|index| {
                let p = transform.to_source(store.position(index)?);
                Some(PivotRecord(i64::from(index), p.x, p.y))
            })
            .collect();
        Ok(Self { pivots })
    }
}

// ============================================================================
// Parsing
// ============================================================================

impl Document {
    /// Parse either schema.
    ///
    /// A single top-level key selects the pivots schema; anything else must
    /// carry every field of the full schema.
    pub fn parse(json: &str) -> Result<Self, FormatError> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(object) = value else {
            return Err(FormatError::invalid_format("top level must be a JSON object"));
        };

        if object.len() == 1 {
            let pivots = take_field(object, "pivots")?;
            return Ok(Document::Pivots(PivotsDocument {
                pivots: serde_json::from_value(pivots)?,
            }));
        }

        for field in AnnotationDocument::FIELDS {
            if !object.contains_key(field) {
                return Err(FormatError::missing_field(field));
            }
        }
        Ok(Document::Full(serde_json::from_value(Value::Object(object))?))
    }

    /// Serialize as pretty-printed JSON with `indent` spaces per level.
    pub fn to_json(&self, indent: usize) -> Result<String, FormatError> {
        match self {
            Document::Full(doc) => to_pretty_json(doc, indent),
            Document::Pivots(doc) => to_pretty_json(doc, indent),
        }
    }

    /// Replace the annotator's annotations with this document.
    ///
    /// The whole document is validated first; on error the store is left
    /// untouched. Relations and pivots naming missing entities are dropped
    /// with a warning rather than failing the import.
    pub fn apply(&self, annotator: &mut Annotator) -> Result<ImportSummary, FormatError> {
        let transform = annotator.transform().cloned().ok_or(FormatError::NoImage)?;
        let staged = self.stage(annotator.color())?;

        annotator.clear_annotations();
        let store = annotator.store_mut();
        for (index, position, color) in &staged.points {
            store
                .insert_point(*index, transform.to_view(*position), *color)
                .map_err(|e| FormatError::invalid_format(e.to_string()))?;
        }
        for (key, color) in &staged.lines {
            store.insert_line_unchecked(*key, *color);
        }
        for (key, color) in &staged.angles {
            store.insert_angle_unchecked(*key, *color);
        }
        for (key, color) in &staged.circles {
            store.insert_circle_unchecked(*key, *color);
        }
        for index in &staged.pivots {
            store.insert_pivot_unchecked(*index);
        }

        let dropped = store.prune_dangling();
        if dropped > 0 {
            log::warn!("Dropped {dropped} references to missing points or lines");
        }
        store.clear_dirty();

        let summary = ImportSummary {
            points: store.point_count(),
            lines: store.line_count(),
            angles: store.angle_count(),
            circles: store.circle_count(),
            pivots: store.pivot_count(),
            dropped,
        };
        log::info!(
            "Imported {} points, {} lines, {} angles, {} circles, {} pivots",
            summary.points,
            summary.lines,
            summary.angles,
            summary.circles,
            summary.pivots
        );
        Ok(summary)
    }

    /// Validate every entry and convert it to store types.
    fn stage(&self, default_color: Color) -> Result<Staged, FormatError> {
        let mut staged = Staged::default();
        let mut seen = BTreeSet::new();
        let mut push_point = |staged: &mut Staged, index: PointIndex, position: Point2, color: Color| {
            if !seen.insert(index) {
                return Err(FormatError::invalid_format(format!("duplicate point index {index}")));
            }
            staged.points.push((index, position, color));
            Ok(())
        };

        match self {
            Document::Pivots(doc) => {
                for PivotRecord(index, x, y) in &doc.pivots {
                    let index = point_index(*index, "pivots")?;
                    push_point(&mut staged, index, Point2::new(*x, *y), default_color)?;
                    staged.pivots.push(index);
                }
            }
            Document::Full(doc) => {
                for PointRecord(index, x, y, color) in &doc.points {
                    let index = point_index(*index, "points")?;
                    push_point(&mut staged, index, Point2::new(*x, *y), parse_color(color)?)?;
                }
                for LineRecord(a, b, color) in &doc.lines {
                    let key = LineKey::new(point_index(*a, "lines")?, point_index(*b, "lines")?);
                    staged.lines.push((key, parse_color(color)?));
                }
                for AngleRecord(a, b, c, color) in &doc.angles {
                    let key = AngleKey::new(
                        point_index(*a, "angles")?,
                        point_index(*b, "angles")?,
                        point_index(*c, "angles")?,
                    );
                    staged.angles.push((key, parse_color(color)?));
                }
                for CircleRecord(center, rim, color) in &doc.circles {
                    let key = CircleKey::new(point_index(*center, "circles")?, point_index(*rim, "circles")?);
                    staged.circles.push((key, parse_color(color)?));
                }
                for index in &doc.pivots {
                    staged.pivots.push(point_index(*index, "pivots")?);
                }
            }
        }
        Ok(staged)
    }
}

/// Validated document contents, ready to insert.
#[derive(Default)]
struct Staged {
    points: Vec<(PointIndex, Point2, Color)>,
    lines: Vec<(LineKey, Color)>,
    angles: Vec<(AngleKey, Color)>,
    circles: Vec<(CircleKey, Color)>,
    pivots: Vec<PointIndex>,
}

fn take_field(mut object: Map<String, Value>, field: &str) -> Result<Value, FormatError> {
    object.remove(field).ok_or_else(|| FormatError::missing_field(field))
}

fn point_index(value: i64, field: &str) -> Result<PointIndex, FormatError> {
    PointIndex::try_from(value)
        .ok()
        .filter(|&index| index > 0)
        .ok_or_else(|| FormatError::invalid_format(format!("invalid point index {value} in {field}")))
}

fn parse_color(value: &str) -> Result<Color, FormatError> {
    Color::parse(value).map_err(|_| FormatError::InvalidColor {
        value: value.to_string(),
    })
}

fn to_pretty_json<T: Serialize>(value: &T, indent: usize) -> Result<String, FormatError> {
    let indent = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(out).map_err(|e| FormatError::invalid_format(e.to_string()))
}
