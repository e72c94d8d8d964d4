//! Path codec
//!
//! Splits catalog paths of the form
//!
//! ```text
//! <dir>/<name>#<frame>#<width>x<height>@<interval>.<extension>
//! ```
//!
//! into their parts. All scanning is bounded by the slice length; caller
//! buffers are never assumed to be terminated. Only the extension is ever
//! case-folded for matching; directory separators and argument markers are
//! compared byte for byte.

use core::cmp::Ordering;
use core::fmt;

use heapless::String;

use crate::limits::{
    ANIMATION_EXTENSION, ARG_MARKER, EXTENSION_SEPARATOR, IMAGE_EXTENSION, MAX_PATH_LENGTH,
    PATH_SEPARATOR, RAW_EXTENSION,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Path with a lowercased extension, bounded by [`MAX_PATH_LENGTH`]
pub type NormalizedPath = String<MAX_PATH_LENGTH>;

/// Path codec errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PathError {
    /// Path does not fit in [`MAX_PATH_LENGTH`] bytes
    TooLong,
    /// Output buffer smaller than the name
    BufferTooSmall,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::TooLong => write!(f, "path longer than {} bytes", MAX_PATH_LENGTH),
            PathError::BufferTooSmall => f.write_str("name buffer too small"),
        }
    }
}

/// The parts of one path
///
/// All fields borrow from the split path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PathParts<'p> {
    /// Everything after the last `/`
    pub base_name: &'p str,
    /// Base name without argument block and extension
    pub name: &'p str,
    /// Full path up to the argument marker or extension, whichever comes first
    pub stem: &'p str,
    /// Extension without the dot, empty if absent
    pub extension: &'p str,
    /// Argument block without the leading marker
    pub args: Option<&'p str>,
}

/// Split a path into base name, stem, extension and argument block
pub fn split(path: &str) -> PathParts<'_> {
    let bytes = path.as_bytes();
    let base_start = bytes
        .iter()
        .rposition(|&b| b == PATH_SEPARATOR)
        .map_or(0, |i| i + 1);
    let base = &bytes[base_start..];

    let marker = base
        .iter()
        .position(|&b| b == ARG_MARKER)
        .map(|i| base_start + i);

    // The extension sits after the argument block, so a dot in front of the
    // marker belongs to the name.
    let search_from = marker.unwrap_or(base_start);
    let dot = bytes[search_from..]
        .iter()
        .rposition(|&b| b == EXTENSION_SEPARATOR)
        .map(|i| search_from + i);

    let ext_start = dot.map_or(bytes.len(), |d| d + 1);
    let stem_end = marker.or(dot).unwrap_or(bytes.len());
    let args = marker.map(|m| &path[m + 1..dot.unwrap_or(bytes.len())]);

    PathParts {
        base_name: &path[base_start..],
        name: &path[base_start..stem_end],
        stem: &path[..stem_end],
        extension: &path[ext_start..],
        args,
    }
}

/// Copy `path` with only its extension lowercased
///
/// Fails with [`PathError::TooLong`] when the path does not fit in
/// [`MAX_PATH_LENGTH`] bytes; nothing is copied in that case.
pub fn normalize_extension_case(path: &str) -> Result<NormalizedPath, PathError> {
    let mut normalized = NormalizedPath::new();
    normalized.push_str(path).map_err(|_| PathError::TooLong)?;

    let ext_len = split(path).extension.len();
    let ext_start = normalized.len() - ext_len;
    normalized.as_mut_str()[ext_start..].make_ascii_lowercase();
    Ok(normalized)
}

/// Kind of asset a preview file stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AssetKind {
    /// Still image with a `.png` preview
    Image,
    /// Animation with a `.gif` preview
    Animation,
}

/// Role of a catalog file, decided by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FileKind {
    /// Preview of an image or animation
    Preview(AssetKind),
    /// Raw pixel data with an argument block
    Raw,
    /// Anything else (web pages, scripts, ...)
    Other,
}

impl FileKind {
    /// Classify a path by its extension, ignoring case
    pub fn of(path: &str) -> Self {
        Self::from_extension(split(path).extension)
    }

    /// Classify an extension (without dot), ignoring case
    pub fn from_extension(extension: &str) -> Self {
        if extension.eq_ignore_ascii_case(IMAGE_EXTENSION) {
            FileKind::Preview(AssetKind::Image)
        } else if extension.eq_ignore_ascii_case(ANIMATION_EXTENSION) {
            FileKind::Preview(AssetKind::Animation)
        } else if extension.eq_ignore_ascii_case(RAW_EXTENSION) {
            FileKind::Raw
        } else {
            FileKind::Other
        }
    }
}

/// Whether a display name keeps its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NameMode {
    /// `cat.png`
    WithExtension,
    /// `cat`
    WithoutExtension,
}

/// Write the lowercased display name of `path` into `out`
///
/// The argument block is never part of a display name, so
/// `/img/Cat#2#10x10@50.raw` becomes `cat.raw` or `cat`. Returns the number
/// of bytes written.
pub fn display_name(path: &str, mode: NameMode, out: &mut [u8]) -> Result<usize, PathError> {
    let parts = split(path);
    let name = parts.name.as_bytes();
    let ext = parts.extension.as_bytes();

    let needed = match mode {
        NameMode::WithExtension if !ext.is_empty() => name.len() + 1 + ext.len(),
        _ => name.len(),
    };
    if out.len() < needed {
        return Err(PathError::BufferTooSmall);
    }

    out[..name.len()].copy_from_slice(name);
    if needed > name.len() {
        out[name.len()] = EXTENSION_SEPARATOR;
        out[name.len() + 1..needed].copy_from_slice(ext);
    }
    out[..needed].make_ascii_lowercase();
    Ok(needed)
}

/// Compare the display names of two paths, ignoring ASCII case
pub fn compare_display_names(a: &str, b: &str) -> Ordering {
    let a = split(a).name.bytes().map(|b| b.to_ascii_lowercase());
    let b = split(b).name.bytes().map(|b| b.to_ascii_lowercase());
    a.cmp(b)
}
