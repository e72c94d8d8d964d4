//! Asset validator
//!
//! An asset is a stem (path without argument block and extension) backed by
//! a preview file and at least one raw data file. A single broken raw file
//! invalidates the whole asset: partially broken animations are never
//! exposed.

use heapless::Vec;

use crate::limits::{MAX_FRAMES, MAX_PATH_LENGTH};
use crate::meta::extract_args;
use crate::path::{split, AssetKind, FileKind};
use crate::store::CatalogStore;

/// What one scan found for an asset
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AssetReport {
    /// A `.png` preview shares the stem
    pub preview_found: bool,
    /// A `.gif` preview shares the stem
    pub animation_preview_found: bool,
    /// Number of raw files sharing the stem
    pub raw_count: usize,
    /// Every raw file decoded and stayed within bounds
    pub args_valid: bool,
    /// At least one raw file has a non-zero interval
    pub animated: bool,
    /// No frame number appears twice
    pub frames_unique: bool,
}

impl Default for AssetReport {
    fn default() -> Self {
        Self {
            preview_found: false,
            animation_preview_found: false,
            raw_count: 0,
            args_valid: true,
            animated: false,
            frames_unique: true,
        }
    }
}

impl AssetReport {
    /// Kind the raw files make the asset, `None` if it is invalid
    ///
    /// A non-zero interval on any raw file makes an animation, which needs a
    /// `.gif` preview. Otherwise the asset is a still image backed by exactly
    /// one raw file and a `.png` preview. A stem with both previews is
    /// exposed once, under this kind.
    pub fn kind(&self) -> Option<AssetKind> {
        if self.raw_count == 0 || !self.args_valid || !self.frames_unique {
            return None;
        }
        if self.animated {
            self.animation_preview_found.then_some(AssetKind::Animation)
        } else if self.raw_count == 1 {
            self.preview_found.then_some(AssetKind::Image)
        } else {
            None
        }
    }

    /// True if the asset may be exposed to callers
    pub fn is_valid(&self) -> bool {
        self.kind().is_some()
    }

    /// True if a preview of `kind` exists
    pub fn has_preview(&self, kind: AssetKind) -> bool {
        match kind {
            AssetKind::Image => self.preview_found,
            AssetKind::Animation => self.animation_preview_found,
        }
    }
}

/// Scan the whole store for files belonging to the asset of `path`
///
/// `path` may name the preview, any raw file or just the stem.
pub fn inspect_asset(store: &CatalogStore<'_>, path: &str) -> AssetReport {
    let mut report = AssetReport::default();
    if path.len() > MAX_PATH_LENGTH {
        report.args_valid = false;
        return report;
    }

    let stem = split(path).stem;
    let mut frames: Vec<u16, MAX_FRAMES> = Vec::new();

    for entry in store.iter() {
        let name = entry.name();
        if name.len() > MAX_PATH_LENGTH {
            continue;
        }
        let parts = split(name);
        if parts.stem != stem {
            continue;
        }

        match FileKind::from_extension(parts.extension) {
            FileKind::Preview(AssetKind::Image) => report.preview_found = true,
            FileKind::Preview(AssetKind::Animation) => report.animation_preview_found = true,
            FileKind::Raw => {
                report.raw_count += 1;
                match extract_args(name) {
                    Ok(args) => {
                        report.animated |= args.is_animated();
                        if frames.contains(&args.frame_number) {
                            report.frames_unique = false;
                        } else if frames.push(args.frame_number).is_err() {
                            // More frames than any caller can hold
                            report.args_valid = false;
                        }
                    }
                    Err(_) => report.args_valid = false,
                }
            }
            FileKind::Other => {}
        }
    }

    report
}

/// True if the asset of `path` has a preview and only well-formed raw files
pub fn is_valid_asset(store: &CatalogStore<'_>, path: &str) -> bool {
    inspect_asset(store, path).is_valid()
}

/// Kind of the asset of `path`, `None` if it is invalid
pub fn asset_kind(store: &CatalogStore<'_>, path: &str) -> Option<AssetKind> {
    inspect_asset(store, path).kind()
}
