//! Data models shared by the store, the interaction engine and the codec.

mod color;
mod keys;
mod mode;

pub use color::{Color, ColorParseError};
pub use keys::{AngleKey, CircleKey, LineKey, PointIndex};
pub use mode::AnnotationMode;
