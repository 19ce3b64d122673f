//! Full annotation export: points, lines, angles, circles and pivots.

use std::path::{Path, PathBuf};

use crate::format::document::{AnnotationDocument, Document};
use crate::format::error::FormatError;
use crate::format::paths::annotation_path;
use crate::format::traits::{AnnotationFormat, ExportOptions, ExportResult};
use crate::interaction::Annotator;

/// Everything needed to restore an annotation session.
pub struct FullFormat;

impl AnnotationFormat for FullFormat {
    fn id(&self) -> &'static str {
        "full"
    }

    fn display_name(&self) -> &'static str {
        "Annotations (JSON)"
    }

    fn default_path(&self, image_path: &Path) -> PathBuf {
        annotation_path(image_path)
    }

    fn export_to_bytes(
        &self,
        annotator: &Annotator,
        options: &ExportOptions,
    ) -> Result<(Vec<u8>, ExportResult), FormatError> {
        let document = AnnotationDocument::capture(annotator)?;
        let result = ExportResult {
            points_exported: document.points.len(),
            relations_exported: document.relation_count(),
            files_created: Vec::new(),
        };
        let json = Document::Full(document).to_json(options.indent)?;
        Ok((json.into_bytes(), result))
    }
}
