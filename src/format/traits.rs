//! Trait definitions for annotation format implementations.

use std::path::{Path, PathBuf};

use crate::config::EngineConfig;
use crate::format::error::FormatError;
use crate::interaction::Annotator;

/// Trait for annotation export implementations.
///
/// Each schema (full annotation set, pivots only) implements this trait.
/// Import does not go through a format: the schema is recognised from the
/// document itself, see [`crate::format::import_str`].
pub trait AnnotationFormat: Send + Sync {
    /// Unique identifier for this format (e.g., "full", "pivots").
    fn id(&self) -> &'static str;

    /// Human-readable name for UI display.
    fn display_name(&self) -> &'static str;

    /// Where to save by default when annotating `image_path`.
    fn default_path(&self, image_path: &Path) -> PathBuf;

    /// Serialize the annotator's current state, in source coordinates.
    fn export_to_bytes(
        &self,
        annotator: &Annotator,
        options: &ExportOptions,
    ) -> Result<(Vec<u8>, ExportResult), FormatError>;

    /// Export to the specified file.
    fn export(
        &self,
        annotator: &Annotator,
        path: &Path,
        options: &ExportOptions,
    ) -> Result<ExportResult, FormatError> {
        log::info!("Exporting {} to {:?}", self.display_name(), path);

        let (bytes, mut result) = self.export_to_bytes(annotator, options)?;
        std::fs::write(path, &bytes)?;
        result.files_created = vec![path.to_path_buf()];

        log::info!(
            "Exported {} points and {} relations",
            result.points_exported,
            result.relations_exported
        );
        Ok(result)
    }
}

/// Options for export operations.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Spaces per pretty-print indentation level.
    pub indent: usize,
}

impl ExportOptions {
    /// Create new export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation width.
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Options matching an engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            indent: config.indent,
        }
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

/// Result of an export operation.
#[derive(Debug, Default)]
pub struct ExportResult {
    /// Number of points written.
    pub points_exported: usize,

    /// Number of lines, angles and circles written.
    pub relations_exported: usize,

    /// Files created during export.
    pub files_created: Vec<PathBuf>,
}

impl ExportResult {
    /// Create a new export result.
    pub fn new() -> Self {
        Self::default()
    }
}

/// What an import put into the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub points: usize,
    pub lines: usize,
    pub angles: usize,
    pub circles: usize,
    pub pivots: usize,
    /// Relations and pivots dropped because they referenced missing entities.
    pub dropped: usize,
}
