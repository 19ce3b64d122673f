//! Pivots-only export for downstream measurement tools.

use std::path::{Path, PathBuf};

use crate::format::document::{Document, PivotsDocument};
use crate::format::error::FormatError;
use crate::format::paths::pivots_path;
use crate::format::traits::{AnnotationFormat, ExportOptions, ExportResult};
use crate::interaction::Annotator;

/// The marked landmarks and their source coordinates, nothing else.
pub struct PivotsFormat;

impl AnnotationFormat for PivotsFormat {
    fn id(&self) -> &'static str {
        "pivots"
    }

    fn display_name(&self) -> &'static str {
        "Pivots (JSON)"
    }

    fn default_path(&self, image_path: &Path) -> PathBuf {
        pivots_path(image_path)
    }

    fn export_to_bytes(
        &self,
        annotator: &Annotator,
        options: &ExportOptions,
    ) -> Result<(Vec<u8>, ExportResult), FormatError> {
        let document = PivotsDocument::capture(annotator)?;
        let result = ExportResult {
            points_exported: document.pivots.len(),
            relations_exported: 0,
            files_created: Vec::new(),
        };
        let json = Document::Pivots(document).to_json(options.indent)?;
        Ok((json.into_bytes(), result))
    }
}
