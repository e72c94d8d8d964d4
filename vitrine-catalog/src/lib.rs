//! Board-agnostic image catalog for the picture frame firmware
//!
//! Images are embedded into the firmware at build time as a flat, read-only
//! list of named blobs. An image asset is a preview file (`.png` for still
//! images, `.gif` for animations) plus one or more raw pixel files whose
//! names carry the frame metadata:
//!
//! ```text
//! /images/spin.gif
//! /images/spin#1#20x20@100.raw
//! /images/spin#2#20x20@100.raw
//! ```
//!
//! This crate contains:
//!
//! - Path codec (name, extension and argument block splitting)
//! - Metadata codec (argument block decoding and bounds checks)
//! - Asset validator (preview and raw file pairing)
//! - Catalog index (counts, sorted listings, frame lookup)
//! - Animation playback cursor
//!
//! Nothing here allocates; every output goes into a caller-owned buffer or
//! a fixed-capacity `heapless` container.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod index;
pub mod limits;
pub mod listing;
pub mod meta;
pub mod path;
pub mod playback;
pub mod store;
pub mod validate;

pub use index::{CatalogError, CatalogIndex, CatalogSummary, FrameList, PartialIndex};
pub use listing::{write_name_list, SortOrder};
pub use meta::{extract_args, ArgError, ImageMetadata, RawArgs};
pub use path::{
    display_name, normalize_extension_case, split, AssetKind, FileKind, NameMode, PathError,
};
pub use playback::Playback;
pub use store::{CatalogEntry, CatalogStore};
pub use validate::{asset_kind, inspect_asset, is_valid_asset, AssetReport};
