//! Stamp image files on disk.

use std::path::{Component, Path, PathBuf};

use crate::error::StampError;
use crate::placement::StampName;

/// Extensions (lowercase) recognized as stamp images.
pub const STAMP_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// True if `name` has a stamp image extension, ignoring case.
pub fn is_stamp_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| STAMP_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Sorted names of the stamp images directly inside `dir`.
///
/// A missing directory has no stamps.
pub fn list_stamps(dir: &Path) -> Result<Vec<StampName>, StampError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if is_stamp_file(name) {
                names.push(name.to_string());
            }
        }
    }

    names.sort();
    Ok(names)
}

/// Resolve `name` inside `dir`, rejecting anything that could escape it.
pub fn stamp_path(dir: &Path, name: &str) -> Option<PathBuf> {
    let relative = Path::new(name);
    let contained = !name.is_empty()
        && relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    contained.then(|| dir.join(relative))
}
