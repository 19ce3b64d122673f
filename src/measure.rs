//! Measurements in source pixels.

use serde::Serialize;

use crate::interaction::Annotator;
use crate::model::{AngleKey, CircleKey, LineKey};

/// One derived measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Measurement {
    /// Length of a line.
    Distance { line: LineKey, value: f64 },
    /// Angle at the vertex, in degrees.
    Angle { angle: AngleKey, value: f64 },
    /// Circle radius.
    Radius { circle: CircleKey, value: f64 },
}

impl Measurement {
    pub fn value(&self) -> f64 {
        match self {
            Measurement::Distance { value, .. }
            | Measurement::Angle { value, .. }
            | Measurement::Radius { value, .. } => *value,
        }
    }

    /// Human-readable label, e.g. `"line 1-2: 14.14"` or `"angle 1-2-3: 90.0°"`.
    pub fn describe(&self) -> String {
        match self {
            Measurement::Distance { line, value } => {
                format!("line {}-{}: {}", line.a(), line.b(), format_rounded(*value, 2))
            }
            Measurement::Angle { angle, value } => format!(
                "angle {}-{}-{}: {}°",
                angle.first(),
                angle.vertex(),
                angle.last(),
                format_rounded(*value, 2)
            ),
            Measurement::Radius { circle, value } => format!(
                "circle {}@{}: r = {}",
                circle.center,
                circle.rim,
                format_rounded(*value, 2)
            ),
        }
    }
}

/// Every line length, angle and circle radius, in that order.
///
/// Empty when no image is loaded.
pub fn measurements(annotator: &Annotator) -> Vec<Measurement> {
    let Some(transform) = annotator.transform() else {
        return Vec::new();
    };
    let store = annotator.store();
    let kernel = annotator.kernel();
    let source = |index| store.position(index).map(|p| transform.to_source(p));

    let mut out = Vec::new();
    for (line, _) in store.lines() {
        if let (Some(a), Some(b)) = (source(line.a()), source(line.b())) {
            out.push(Measurement::Distance {
                line,
                value: kernel.distance(a, b),
            });
        }
    }
    for (angle, _) in store.angles() {
        if let (Some(a), Some(b), Some(c)) = (source(angle.first()), source(angle.vertex()), source(angle.last())) {
            out.push(Measurement::Angle {
                angle,
                value: kernel.angle_degrees(a, b, c),
            });
        }
    }
    for (circle, _) in store.circles() {
        if let (Some(a), Some(b)) = (source(circle.center), source(circle.rim)) {
            out.push(Measurement::Radius {
                circle,
                value: kernel.distance(a, b),
            });
        }
    }
    out
}

/// Round to `digits` decimals and print with at least one decimal place.
///
/// `10.0` prints as `"10.0"`, `1.23456` as `"1.23"`.
pub fn format_rounded(value: f64, digits: i32) -> String {
    let factor = 10f64.powi(digits);
    let rounded = (value * factor).round() / factor;
    let text = rounded.to_string();
    if rounded.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}
