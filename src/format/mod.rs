//! Annotation import/export.
//!
//! Export goes through an [`AnnotationFormat`]: the full schema restores a
//! session, the pivots schema hands landmark coordinates to downstream
//! tools. Import recognises the schema from the document itself.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medmark::format::{import_file, ExportOptions, FormatRegistry};
//!
//! let registry = FormatRegistry::new();
//! let format = registry.get("pivots").unwrap();
//! format.export(&annotator, &format.default_path(image_path), &ExportOptions::default())?;
//!
//! let summary = import_file(&mut annotator, json_path)?;
//! ```

mod document;
mod error;
pub mod formats;
mod paths;
mod registry;
mod traits;

use std::path::Path;

pub use document::{
    AngleRecord, AnnotationDocument, CircleRecord, Document, LineRecord, PivotRecord, PivotsDocument, PointRecord,
};
pub use error::FormatError;
pub use paths::{annotation_path, default_image_dir, pivots_path, rendered_image_path};
pub use registry::FormatRegistry;
pub use traits::{AnnotationFormat, ExportOptions, ExportResult, ImportSummary};

use crate::interaction::Annotator;

/// Replace the annotator's annotations with a JSON document of either schema.
pub fn import_str(annotator: &mut Annotator, json: &str) -> Result<ImportSummary, FormatError> {
    if !annotator.has_image() {
        return Err(FormatError::NoImage);
    }
    Document::parse(json)?.apply(annotator)
}

/// Read a JSON file and import it with [`import_str`].
pub fn import_file(annotator: &mut Annotator, path: &Path) -> Result<ImportSummary, FormatError> {
    log::info!("Importing annotations from {:?}", path);
    let json = std::fs::read_to_string(path)?;
    import_str(annotator, &json)
}
