//! Catalog index
//!
//! One full scan at startup computes the aggregate counts; every listing
//! rescans the store. The store never changes at runtime, so counts taken
//! at init stay consistent with later listings.
//!
//! A `CatalogIndex` only exists after [`CatalogIndex::init`] has run, so
//! querying an uninitialized catalog is impossible by construction. The
//! index holds shared references and integers only and can be handed to
//! interrupt handlers once built.

use core::fmt;

use heapless::Vec;

use crate::limits::{MAX_FRAMES, MAX_PATH_LENGTH};
use crate::listing::{insert_sorted, SortOrder};
use crate::meta::{extract_args, requested_frame, ImageMetadata};
use crate::path::{normalize_extension_case, split, AssetKind, FileKind, PathError};
use crate::store::CatalogStore;
use crate::validate::{asset_kind, is_valid_asset};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sorted frame paths of one asset
pub type FrameList<'a> = Vec<&'a str, MAX_FRAMES>;

/// Catalog query errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CatalogError {
    /// Output buffer cannot hold every entry
    BufferTooSmall,
    /// Asset has more frames than [`MAX_FRAMES`]
    TooManyFrames,
    /// No valid asset for the requested path
    NotFound,
    /// A path exceeds [`MAX_PATH_LENGTH`]
    PathTooLong,
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::BufferTooSmall => f.write_str("output buffer too small"),
            CatalogError::TooManyFrames => write!(f, "more than {} frames", MAX_FRAMES),
            CatalogError::NotFound => f.write_str("asset not found"),
            CatalogError::PathTooLong => write!(f, "path longer than {} bytes", MAX_PATH_LENGTH),
        }
    }
}

impl From<PathError> for CatalogError {
    fn from(e: PathError) -> Self {
        match e {
            PathError::TooLong => CatalogError::PathTooLong,
            PathError::BufferTooSmall => CatalogError::BufferTooSmall,
        }
    }
}

/// Aggregate counts computed at init
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CatalogSummary {
    /// Valid still images
    pub image_count: usize,
    /// Valid animations
    pub animation_count: usize,
    /// Longest post-slash name of any file of a valid asset
    pub max_name_length: usize,
    /// Paths skipped because they exceed [`MAX_PATH_LENGTH`]
    pub skipped_paths: usize,
}

/// Index over a catalog store
#[derive(Debug, Clone, Copy)]
pub struct CatalogIndex<'a> {
    store: CatalogStore<'a>,
    summary: CatalogSummary,
}

/// Init found paths longer than [`MAX_PATH_LENGTH`]
///
/// Those paths were skipped; the rest of the catalog was indexed normally.
/// The caller decides whether the partial index is good enough.
#[derive(Debug, Clone, Copy)]
pub struct PartialIndex<'a> {
    index: CatalogIndex<'a>,
}

impl<'a> PartialIndex<'a> {
    /// Number of skipped paths
    pub fn skipped_paths(&self) -> usize {
        self.index.summary.skipped_paths
    }

    /// Take the partial index
    pub fn into_index(self) -> CatalogIndex<'a> {
        self.index
    }
}

impl fmt::Display for PartialIndex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} catalog paths longer than {} bytes skipped",
            self.skipped_paths(),
            MAX_PATH_LENGTH
        )
    }
}

impl<'a> CatalogIndex<'a> {
    /// Scan the store once and compute the aggregate counts
    pub fn init(store: CatalogStore<'a>) -> Result<Self, PartialIndex<'a>> {
        let mut summary = CatalogSummary::default();

        for entry in store.iter() {
            let name = entry.name();
            if normalize_extension_case(name).is_err() {
                #[cfg(feature = "defmt")]
                defmt::warn!("Skipping catalog path longer than {} bytes", MAX_PATH_LENGTH);
                summary.skipped_paths += 1;
                continue;
            }
            let Some(kind) = asset_kind(&store, name) else {
                continue;
            };

            summary.max_name_length = summary.max_name_length.max(split(name).base_name.len());
            match (FileKind::of(name), kind) {
                (FileKind::Preview(AssetKind::Image), AssetKind::Image) => summary.image_count += 1,
                (FileKind::Preview(AssetKind::Animation), AssetKind::Animation) => {
                    summary.animation_count += 1
                }
                _ => {}
            }
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Catalog indexed: {} images, {} animations, longest name {}",
            summary.image_count,
            summary.animation_count,
            summary.max_name_length
        );

        let index = Self { store, summary };
        if summary.skipped_paths > 0 {
            Err(PartialIndex { index })
        } else {
            Ok(index)
        }
    }

    /// The indexed store
    pub fn store(&self) -> CatalogStore<'a> {
        self.store
    }

    /// Number of valid still images
    pub fn asset_count(&self) -> usize {
        self.summary.image_count
    }

    /// Number of valid animations
    pub fn animation_count(&self) -> usize {
        self.summary.animation_count
    }

    /// Number of valid assets of `kind`
    pub fn count(&self, kind: AssetKind) -> usize {
        match kind {
            AssetKind::Image => self.summary.image_count,
            AssetKind::Animation => self.summary.animation_count,
        }
    }

    /// Longest post-slash file name of any valid asset
    ///
    /// Name buffers passed to [`crate::path::display_name`] must be at least
    /// this long.
    pub fn max_name_length(&self) -> usize {
        self.summary.max_name_length
    }

    /// All counters at once
    pub fn summary(&self) -> CatalogSummary {
        self.summary
    }

    /// Write the preview paths of every valid asset of `kind` into `out`, sorted
    ///
    /// A stem with both previews is listed once, under the kind its raw
    /// files give it.
    ///
    /// `out` should hold [`Self::count`] entries. Returns the number of paths
    /// written, or [`CatalogError::BufferTooSmall`] if more assets exist than
    /// `out` can hold; nothing is written past `out`.
    pub fn list(
        &self,
        kind: AssetKind,
        order: SortOrder,
        out: &mut [&'a str],
    ) -> Result<usize, CatalogError> {
        let mut written = 0;
        for entry in self.store.iter() {
            let name = entry.name();
            if name.len() > MAX_PATH_LENGTH || FileKind::of(name) != FileKind::Preview(kind) {
                continue;
            }
            if asset_kind(&self.store, name) != Some(kind) {
                continue;
            }
            insert_sorted(out, written, name, order)?;
            written += 1;
        }
        Ok(written)
    }

    /// Write the raw frame paths of the asset of `path` into `out`
    ///
    /// `path` may be the preview, any frame or the bare stem. Frames are
    /// sorted ascending by display name, then frame number. A still image
    /// lists its single raw file.
    pub fn list_animation_frames(
        &self,
        path: &str,
        out: &mut [&'a str],
    ) -> Result<usize, CatalogError> {
        if !is_valid_asset(&self.store, path) {
            return Err(CatalogError::NotFound);
        }

        let stem = split(path).stem;
        let mut written = 0;
        for entry in self.store.iter() {
            let name = entry.name();
            if name.len() > MAX_PATH_LENGTH {
                continue;
            }
            if FileKind::of(name) != FileKind::Raw || split(name).stem != stem {
                continue;
            }
            insert_sorted(out, written, name, SortOrder::Ascending)?;
            written += 1;
        }
        Ok(written)
    }

    /// Sorted raw frame paths of the asset of `path`
    pub fn animation_frames(&self, path: &str) -> Result<FrameList<'a>, CatalogError> {
        let mut frames = [""; MAX_FRAMES];
        let count = self
            .list_animation_frames(path, &mut frames)
            .map_err(|e| match e {
                CatalogError::BufferTooSmall => CatalogError::TooManyFrames,
                e => e,
            })?;
        FrameList::from_slice(&frames[..count]).map_err(|_| CatalogError::TooManyFrames)
    }

    /// Metadata and pixel data for `path`
    ///
    /// A preview or bare stem yields frame 1; a raw path yields its own
    /// frame. `None` if the asset is invalid or has no such frame.
    pub fn get_metadata(&self, path: &str) -> Option<ImageMetadata<'a>> {
        if !is_valid_asset(&self.store, path) {
            return None;
        }
        let frame = requested_frame(path)?;
        let stem = split(path).stem;

        self.store
            .iter()
            .filter(|entry| entry.name().len() <= MAX_PATH_LENGTH)
            .filter(|entry| FileKind::of(entry.name()) == FileKind::Raw)
            .filter(|entry| split(entry.name()).stem == stem)
            .find(|entry| {
                extract_args(entry.name()).map_or(false, |args| args.frame_number == frame)
            })
            .and_then(|entry| ImageMetadata::from_entry(entry).ok())
    }

    /// Pixel data for `path` (see [`Self::get_metadata`])
    pub fn raw_data(&self, path: &str) -> Option<&'a [u8]> {
        self.get_metadata(path).map(|meta| meta.data)
    }

    /// Find the valid preview of `kind` whose display name is `name`
    ///
    /// Matching ignores ASCII case and accepts the name with or without its
    /// extension, e.g. `lion`, `Lion.PNG`.
    pub fn find(&self, kind: AssetKind, name: &str) -> Option<&'a str> {
        self.store
            .iter()
            .map(|entry| entry.name())
            .filter(|path| path.len() <= MAX_PATH_LENGTH)
            .filter(|path| FileKind::of(path) == FileKind::Preview(kind))
            .filter(|path| {
                let parts = split(path);
                parts.name.eq_ignore_ascii_case(name) || parts.base_name.eq_ignore_ascii_case(name)
            })
            .find(|path| asset_kind(&self.store, path) == Some(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::compare_paths;
    use crate::store::CatalogEntry;
    use core::cmp::Ordering;

    const HEADER: &[u8] = b"HTTP/1.0 200 OK\r\nContent-Type: application/octet-stream\r\n\r\n";

    static GALLERY: [CatalogEntry<'static>; 16] = [
        CatalogEntry::new("/index.html", b"<html></html>"),
        CatalogEntry::new("/images/skull#1#100x100@0.raw", b"HTTP/1.0 200 OK\r\n\r\nSKULL"),
        CatalogEntry::new("/images/lion.png", b""),
        CatalogEntry::new("/images/Alien.PNG", b""),
        CatalogEntry::new("/images/skull.png", b""),
        CatalogEntry::new("/images/lion#1#120x90@0.raw", b"HTTP/1.0 200 OK\r\n\r\nLION"),
        CatalogEntry::new("/images/alien#1#10x10@0.RAW", b""),
        CatalogEntry::new("/images/Alien#1#10x10@0.raw", b""),
        CatalogEntry::new("/images/spin#3#20x20@100.raw", b"HTTP/1.0 200 OK\r\n\r\nF3"),
        CatalogEntry::new("/images/spin.gif", b""),
        CatalogEntry::new("/images/spin#1#20x20@100.raw", b"HTTP/1.0 200 OK\r\n\r\nF1"),
        CatalogEntry::new("/images/spin#2#20x20@100.raw", b"HTTP/1.0 200 OK\r\n\r\nF2"),
        CatalogEntry::new("/images/broken.gif", b""),
        CatalogEntry::new("/images/broken#1#20x20@100.raw", b""),
        CatalogEntry::new("/images/broken#2#999x20@100.raw", b""),
        CatalogEntry::new("/images/orphan.png", b""),
    ];

    fn gallery() -> CatalogIndex<'static> {
        CatalogIndex::init(CatalogStore::new(&GALLERY)).unwrap()
    }

    #[test]
    fn test_scenario_still_image() {
        static ENTRIES: [CatalogEntry<'static>; 2] = [
            CatalogEntry::new("a.png", b""),
            CatalogEntry::new("a#1#50x50@0.raw", HEADER),
        ];
        let index = CatalogIndex::init(CatalogStore::new(&ENTRIES)).unwrap();
        assert_eq!(index.asset_count(), 1);
        assert_eq!(index.animation_count(), 0);

        let mut out = [""; 1];
        let count = index.list(AssetKind::Image, SortOrder::Ascending, &mut out).unwrap();
        assert_eq!(&out[..count], ["a.png"]);

        let meta = index.get_metadata("a.png").unwrap();
        assert_eq!((meta.width, meta.height), (50, 50));
        assert_eq!(meta.frame_number, 1);
        assert_eq!(meta.frame_interval_ms, 0);
        assert_eq!(meta.name, "a#1#50x50@0.raw");
        assert!(meta.data.is_empty());
    }

    #[test]
    fn test_scenario_animation() {
        static ENTRIES: [CatalogEntry<'static>; 3] = [
            CatalogEntry::new("b.gif", b""),
            CatalogEntry::new("b#2#20x20@100.raw", b""),
            CatalogEntry::new("b#1#20x20@100.raw", b""),
        ];
        let index = CatalogIndex::init(CatalogStore::new(&ENTRIES)).unwrap();
        assert_eq!(index.animation_count(), 1);
        assert_eq!(index.asset_count(), 0);

        let frames = index.animation_frames("b").unwrap();
        assert_eq!(frames.as_slice(), ["b#1#20x20@100.raw", "b#2#20x20@100.raw"]);
    }

    #[test]
    fn test_scenario_orphan_preview() {
        static ENTRIES: [CatalogEntry<'static>; 1] = [CatalogEntry::new("c.png", b"")];
        let index = CatalogIndex::init(CatalogStore::new(&ENTRIES)).unwrap();
        assert_eq!(index.asset_count(), 0);
        assert_eq!(index.max_name_length(), 0);
    }

    #[test]
    fn test_scenario_width_out_of_bound() {
        static ENTRIES: [CatalogEntry<'static>; 2] = [
            CatalogEntry::new("d#1#9999x10@0.raw", b""),
            CatalogEntry::new("d.png", b""),
        ];
        let index = CatalogIndex::init(CatalogStore::new(&ENTRIES)).unwrap();
        assert_eq!(index.asset_count(), 0);

        let mut out = [""; 4];
        assert_eq!(index.list(AssetKind::Image, SortOrder::Ascending, &mut out), Ok(0));
        assert!(index.get_metadata("d.png").is_none());
    }

    #[test]
    fn test_counts() {
        let index = gallery();
        // lion, skull; Alien.PNG pairs with the Alien raw file, alien.RAW has
        // no preview of its own
        assert_eq!(index.asset_count(), 3);
        assert_eq!(index.animation_count(), 1);
        assert_eq!(index.count(AssetKind::Image), 3);
        assert_eq!(index.max_name_length(), "skull#1#100x100@0.raw".len());
        assert_eq!(index.summary().skipped_paths, 0);
    }

    #[test]
    fn test_list_sorted_both_ways() {
        let index = gallery();
        let mut out = [""; 3];

        let count = index.list(AssetKind::Image, SortOrder::Ascending, &mut out).unwrap();
        assert_eq!(count, index.asset_count());
        assert_eq!(out, ["/images/Alien.PNG", "/images/lion.png", "/images/skull.png"]);

        let count = index.list(AssetKind::Image, SortOrder::Descending, &mut out).unwrap();
        assert_eq!(count, index.asset_count());
        assert_eq!(out, ["/images/skull.png", "/images/lion.png", "/images/Alien.PNG"]);

        let mut anims = [""; 1];
        let count = index.list(AssetKind::Animation, SortOrder::Ascending, &mut anims).unwrap();
        assert_eq!(&anims[..count], ["/images/spin.gif"]);
    }

    #[test]
    fn test_list_buffer_too_small() {
        let index = gallery();
        let mut out = [""; 2];
        assert_eq!(
            index.list(AssetKind::Image, SortOrder::Ascending, &mut out),
            Err(CatalogError::BufferTooSmall)
        );
    }

    #[test]
    fn test_list_never_exposes_invalid_assets() {
        let index = gallery();
        let mut out = [""; 8];
        let count = index.list(AssetKind::Animation, SortOrder::Ascending, &mut out).unwrap();
        assert!(!out[..count].contains(&"/images/broken.gif"));

        let count = index.list(AssetKind::Image, SortOrder::Ascending, &mut out).unwrap();
        assert!(!out[..count].contains(&"/images/orphan.png"));
    }

    #[test]
    fn test_frames_sorted_by_frame_number() {
        let index = gallery();
        let frames = index.animation_frames("/images/spin.gif").unwrap();
        assert_eq!(
            frames.as_slice(),
            [
                "/images/spin#1#20x20@100.raw",
                "/images/spin#2#20x20@100.raw",
                "/images/spin#3#20x20@100.raw",
            ]
        );
        for pair in frames.windows(2) {
            assert_eq!(compare_paths(pair[0], pair[1]), Ordering::Less);
        }

        // Any frame path lists the same animation
        let same = index.animation_frames("/images/spin#2#20x20@100.raw").unwrap();
        assert_eq!(same, frames);
    }

    #[test]
    fn test_frames_of_invalid_asset() {
        let index = gallery();
        assert_eq!(
            index.animation_frames("/images/broken.gif"),
            Err(CatalogError::NotFound)
        );
        assert_eq!(
            index.animation_frames("/images/missing.gif"),
            Err(CatalogError::NotFound)
        );
    }

    #[test]
    fn test_frames_into_small_buffer() {
        let index = gallery();
        let mut out = [""; 2];
        assert_eq!(
            index.list_animation_frames("/images/spin.gif", &mut out),
            Err(CatalogError::BufferTooSmall)
        );
    }

    #[test]
    fn test_still_image_has_one_frame() {
        let index = gallery();
        let frames = index.animation_frames("/images/lion.png").unwrap();
        assert_eq!(frames.as_slice(), ["/images/lion#1#120x90@0.raw"]);
    }

    #[test]
    fn test_get_metadata_per_frame() {
        let index = gallery();

        let first = index.get_metadata("/images/spin.gif").unwrap();
        assert_eq!(first.frame_number, 1);
        assert_eq!(first.frame_interval_ms, 100);
        assert_eq!(first.data, b"F1");

        let third = index.get_metadata("/images/spin#3#20x20@100.raw").unwrap();
        assert_eq!(third.frame_number, 3);
        assert_eq!(third.data, b"F3");

        assert_eq!(index.raw_data("/images/lion.png"), Some(&b"LION"[..]));
        assert_eq!(index.raw_data("/images/lion"), Some(&b"LION"[..]));
    }

    #[test]
    fn test_get_metadata_missing_frame() {
        let index = gallery();
        assert!(index.get_metadata("/images/spin#4#20x20@100.raw").is_none());
        assert!(index.get_metadata("/images/orphan.png").is_none());
        assert!(index.get_metadata("/index.html").is_none());
    }

    #[test]
    fn test_find_by_display_name() {
        let index = gallery();
        assert_eq!(index.find(AssetKind::Image, "lion"), Some("/images/lion.png"));
        assert_eq!(index.find(AssetKind::Image, "LION.png"), Some("/images/lion.png"));
        assert_eq!(index.find(AssetKind::Image, "alien"), Some("/images/Alien.PNG"));
        assert_eq!(index.find(AssetKind::Animation, "spin"), Some("/images/spin.gif"));
        assert_eq!(index.find(AssetKind::Image, "spin"), None);
        assert_eq!(index.find(AssetKind::Image, "orphan"), None);
        assert_eq!(index.find(AssetKind::Animation, "broken"), None);
    }

    #[test]
    fn test_overlong_path_reports_partial_index() {
        const LONG: &str = concat!(
            "/images/",
            "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            ".png"
        );
        static ENTRIES: [CatalogEntry<'static>; 3] = [
            CatalogEntry::new(LONG, b""),
            CatalogEntry::new("/a.png", b""),
            CatalogEntry::new("/a#1#10x10@0.raw", b""),
        ];

        let partial = CatalogIndex::init(CatalogStore::new(&ENTRIES)).unwrap_err();
        assert_eq!(partial.skipped_paths(), 1);

        let index = partial.into_index();
        assert_eq!(index.asset_count(), 1);
        assert_eq!(index.find(AssetKind::Image, "a"), Some("/a.png"));
    }

    #[test]
    fn test_empty_store() {
        let index = CatalogIndex::init(CatalogStore::new(&[])).unwrap();
        assert_eq!(index.summary(), CatalogSummary::default());

        let mut out: [&str; 0] = [];
        assert_eq!(index.list(AssetKind::Image, SortOrder::Ascending, &mut out), Ok(0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_summary_serializes() {
        let summary = gallery().summary();
        let mut buf = [0u8; 32];
        let bytes = postcard::to_slice(&summary, &mut buf).unwrap();
        let decoded: CatalogSummary = postcard::from_bytes(bytes).unwrap();
        assert_eq!(decoded, summary);
    }

    #[test]
    fn test_kind_follows_raw_intervals() {
        static ENTRIES: [CatalogEntry<'static>; 8] = [
            CatalogEntry::new("/x.gif", b""),
            CatalogEntry::new("/x#1#10x10@0.raw", b""),
            CatalogEntry::new("/y.png", b""),
            CatalogEntry::new("/y#1#10x10@100.raw", b""),
            CatalogEntry::new("/y#2#10x10@100.raw", b""),
            CatalogEntry::new("/z.png", b""),
            CatalogEntry::new("/z.gif", b""),
            CatalogEntry::new("/z#1#10x10@0.raw", b""),
        ];
        let index = CatalogIndex::init(CatalogStore::new(&ENTRIES)).unwrap();

        // Only z counts, and only once, as a still image
        assert_eq!(index.asset_count(), 1);
        assert_eq!(index.animation_count(), 0);

        let mut out = [""; 4];
        let count = index.list(AssetKind::Image, SortOrder::Ascending, &mut out).unwrap();
        assert_eq!(&out[..count], ["/z.png"]);
        let count = index.list(AssetKind::Animation, SortOrder::Ascending, &mut out).unwrap();
        assert_eq!(count, 0);

        assert_eq!(index.find(AssetKind::Image, "z"), Some("/z.png"));
        assert_eq!(index.find(AssetKind::Animation, "z"), None);
        assert_eq!(index.find(AssetKind::Animation, "x"), None);
        assert_eq!(index.find(AssetKind::Image, "y"), None);
        assert!(index.get_metadata("/y.png").is_none());
    }

    #[test]
    fn test_overlong_frame_is_not_listed() {
        const LONG_FRAME: &str = concat!(
            "/a#",
            "0000000000000000000000000000000000000000000000000000000000000000",
            "0000000000000000000000000000000000000000000000000000000000000000",
            "0000000000000000000000000000000000000000000000000000000000000000",
            "0000000000000000000000000000000000000000000000000000000000000000",
            "02#10x10@100.raw"
        );
        static ENTRIES: [CatalogEntry<'static>; 3] = [
            CatalogEntry::new("/a.gif", b""),
            CatalogEntry::new("/a#1#10x10@100.raw", b"\r\n\r\n1"),
            CatalogEntry::new(LONG_FRAME, b"\r\n\r\n2"),
        ];

        let index = CatalogIndex::init(CatalogStore::new(&ENTRIES))
            .unwrap_err()
            .into_index();
        let frames = index.animation_frames("/a.gif").unwrap();
        assert_eq!(frames.as_slice(), ["/a#1#10x10@100.raw"]);
        assert!(index.get_metadata(LONG_FRAME).is_none());
    }
}
