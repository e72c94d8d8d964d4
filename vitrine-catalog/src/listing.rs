//! Ordered insertion and name list formatting
//!
//! Lists are tiny (build-time asset counts), so they are kept sorted by
//! linear insertion into caller-owned buffers instead of sorting afterwards.

use core::cmp::Ordering;

use heapless::String;

use crate::index::CatalogError;
use crate::limits::{EXTENSION_SEPARATOR, LIST_SEPARATOR};
use crate::meta::requested_frame;
use crate::path::{compare_display_names, split, NameMode};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Listing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SortOrder {
    /// a → z
    #[default]
    Ascending,
    /// z → a
    Descending,
}

/// Compare two catalog paths by display name, then by frame number
///
/// Display names ignore ASCII case. Paths without a decodable frame sort as
/// frame 0.
pub fn compare_paths(a: &str, b: &str) -> Ordering {
    compare_display_names(a, b).then_with(|| {
        let frame_a = requested_frame(a).unwrap_or(0);
        let frame_b = requested_frame(b).unwrap_or(0);
        frame_a.cmp(&frame_b)
    })
}

/// Index at which `path` goes into the sorted `existing` entries
///
/// Ascending order inserts in front of the first entry that is not smaller,
/// descending in front of the first entry that is not larger. Otherwise the
/// path is appended.
pub fn insertion_point(existing: &[&str], path: &str, order: SortOrder) -> usize {
    existing
        .iter()
        .position(|current| {
            let ord = compare_paths(path, current);
            match order {
                SortOrder::Ascending => ord != Ordering::Greater,
                SortOrder::Descending => ord != Ordering::Less,
            }
        })
        .unwrap_or(existing.len())
}

/// Insert `path` into the sorted prefix `out[..len]`, shifting the rest right
///
/// Fails with [`CatalogError::BufferTooSmall`] if `out` is already full;
/// nothing is written in that case.
pub fn insert_sorted<'a>(
    out: &mut [&'a str],
    len: usize,
    path: &'a str,
    order: SortOrder,
) -> Result<(), CatalogError> {
    if len >= out.len() {
        return Err(CatalogError::BufferTooSmall);
    }
    let pos = insertion_point(&out[..len], path, order);
    out.copy_within(pos..len, pos + 1);
    out[pos] = path;
    Ok(())
}

/// Append the lowercased display name of every path to `out`
///
/// Each name is followed by `"\n\r"`. On overflow the names that fit stay in
/// `out` and [`CatalogError::BufferTooSmall`] is returned.
pub fn write_name_list<const N: usize>(
    paths: &[&str],
    mode: NameMode,
    out: &mut String<N>,
) -> Result<(), CatalogError> {
    for path in paths {
        let parts = split(path);
        push_lowercase(out, parts.name)?;
        if mode == NameMode::WithExtension && !parts.extension.is_empty() {
            out.push(char::from(EXTENSION_SEPARATOR))
                .map_err(|_| CatalogError::BufferTooSmall)?;
            push_lowercase(out, parts.extension)?;
        }
        out.push_str(LIST_SEPARATOR)
            .map_err(|_| CatalogError::BufferTooSmall)?;
    }
    Ok(())
}

fn push_lowercase<const N: usize>(out: &mut String<N>, text: &str) -> Result<(), CatalogError> {
    for c in text.chars() {
        out.push(c.to_ascii_lowercase())
            .map_err(|_| CatalogError::BufferTooSmall)?;
    }
    Ok(())
}
