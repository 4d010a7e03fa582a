//! Font resolution for overlay text.
//!
//! Font families are mapped to TrueType file names and looked up in an
//! optional font directory. When no file can be loaded the built-in Spleen
//! bitmap font is used instead, so text always renders.

use ab_glyph::FontArc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::stamps;

/// Most families kept in a [`FontBook`] before it starts over.
pub const MAX_CACHED_FAMILIES: usize = 64;

/// Family names with a well-known TrueType file name.
const FAMILY_FILES: &[(&str, &str)] = &[
    ("Arial", "arial.ttf"),
    ("Verdana", "verdana.ttf"),
    ("Times New Roman", "times.ttf"),
    ("Courier New", "cour.ttf"),
    ("Georgia", "georgia.ttf"),
    ("Impact", "impact.ttf"),
];

/// File name a family is expected to live in.
///
/// Unknown families map to `<family>.ttf`.
pub fn family_file_name(family: &str) -> String {
    FAMILY_FILES
        .iter()
        .find(|(name, _)| *name == family)
        .map(|(_, file)| file.to_string())
        .unwrap_or_else(|| format!("{}.ttf", family))
}

/// A resolved typeface.
#[derive(Clone)]
pub enum Typeface {
    /// Anti-aliased TrueType outlines.
    TrueType(FontArc),
    /// Built-in Spleen 12x24 bitmap font, scaled to size.
    Bitmap,
}

impl std::fmt::Debug for Typeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Typeface::TrueType(_) => f.write_str("Typeface::TrueType"),
            Typeface::Bitmap => f.write_str("Typeface::Bitmap"),
        }
    }
}

/// Caches typefaces by family name.
#[derive(Debug, Default)]
pub struct FontBook {
    dir: Option<PathBuf>,
    cache: HashMap<String, Typeface>,
}

impl FontBook {
    /// A font book that searches `dir` for TrueType files.
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            cache: HashMap::new(),
        }
    }

    /// A font book that always uses the bitmap font.
    pub fn bitmap_only() -> Self {
        Self::new(None)
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Resolve a family to a typeface, loading and caching on first use.
    ///
    /// Tries the mapped file name first, then the family name itself. A
    /// family that fails to load is cached as [`Typeface::Bitmap`] so the
    /// warning is logged once. Families are looked up only inside the font
    /// directory; names with path separators leading out of it never load.
    /// The cache is emptied once it holds [`MAX_CACHED_FAMILIES`] entries.
    pub fn resolve(&mut self, family: &str) -> Typeface {
        if let Some(face) = self.cache.get(family) {
            return face.clone();
        }

        let face = match self.load(family) {
            Some(font) => Typeface::TrueType(font),
            None => {
                warn!(
                    family,
                    file = %family_file_name(family),
                    "Could not load font, using built-in bitmap font"
                );
                Typeface::Bitmap
            }
        };

        if self.cache.len() >= MAX_CACHED_FAMILIES {
            debug!(families = self.cache.len(), "Font cache full, clearing");
            self.cache.clear();
        }
        self.cache.insert(family.to_string(), face.clone());
        face
    }

    fn load(&self, family: &str) -> Option<FontArc> {
        self.candidates(family)
            .iter()
            .find_map(|path| load_font_file(path))
    }

    /// Files tried for `family`, all inside the font directory.
    fn candidates(&self, family: &str) -> Vec<PathBuf> {
        let Some(dir) = self.dir.as_deref() else {
            return Vec::new();
        };
        [family_file_name(family), family.to_string()]
            .iter()
            .filter_map(|candidate| stamps::stamp_path(dir, candidate))
            .collect()
    }
}

fn load_font_file(path: &Path) -> Option<FontArc> {
    let bytes = std::fs::read(path).ok()?;
    match FontArc::try_from_vec(bytes) {
        Ok(font) => {
            debug!(path = %path.display(), "Loaded font");
            Some(font)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to parse font file");
            None
        }
    }
}
