//! medmark - landmark annotation engine for medical images
//!
//! Points, lines, angles and circles are placed on an image through a small
//! mode-driven pointer protocol, and distances, angles and radii are measured
//! from them in source pixels.
//!
//! - [`interaction::Annotator`] owns everything for one image and consumes
//!   pointer events
//! - [`annotation::AnnotationStore`] keeps the landmark graph consistent
//!   across erase, renumber and rescale
//! - [`transform::ViewTransform`] maps between the displayed view and the
//!   source image
//! - [`format`] reads and writes the JSON exchange documents
//! - [`render`] turns the state into a display list for any painter
//! - [`detect`] proposes landmarks from keypoint heatmaps

pub mod annotation;
pub mod color_utils;
pub mod config;
pub mod constants;
pub mod detect;
pub mod error;
pub mod format;
pub mod geometry;
pub mod interaction;
pub mod measure;
pub mod model;
pub mod render;
pub mod transform;

pub use annotation::{AnnotationStore, Landmark};
pub use config::{ConfigError, EngineConfig, LogLevel};
pub use error::AnnotationError;
pub use geometry::{Kernel, Point2, Rect};
pub use interaction::{Annotator, ContextAction, PointerEvent};
pub use model::{AngleKey, AnnotationMode, CircleKey, Color, LineKey, PointIndex};
pub use transform::{Size, ViewTransform};
