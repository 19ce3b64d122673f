//! Default file locations derived from the image being annotated.

use std::path::{Path, PathBuf};

/// `<stem>.json` next to the image.
pub fn annotation_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("json")
}

/// `<stem>_pivots.json` next to the image.
pub fn pivots_path(image_path: &Path) -> PathBuf {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    image_path.with_file_name(format!("{stem}_pivots.json"))
}

/// Where a rendered copy of the image goes: DICOM files become `<stem>.jpg`,
/// other images keep their path.
pub fn rendered_image_path(image_path: &Path) -> PathBuf {
    let is_dicom = image_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("dcm"));
    if is_dicom {
        image_path.with_extension("jpg")
    } else {
        image_path.to_path_buf()
    }
}

/// The user's pictures directory, or the working directory when there is none.
pub fn default_image_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
