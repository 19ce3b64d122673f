//! Errors raised by annotation store and annotator operations.

use thiserror::Error;

use crate::model::PointIndex;

/// Rejections surfaced to the user.
///
/// References to missing points inside `add_line`/`add_angle`/`add_circle`
/// are not errors; those calls simply store nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    /// The requested index already names a point.
    #[error("point index {index} is already in use")]
    DuplicateIndex { index: PointIndex },

    /// Point indices start at 1.
    #[error("point index must be positive, got {index}")]
    NonPositiveIndex { index: i64 },

    /// The operation names a point that does not exist.
    #[error("no point with index {index}")]
    UnknownPoint { index: PointIndex },

    /// The operation needs a loaded image.
    #[error("no image is loaded")]
    NoImage,
}
