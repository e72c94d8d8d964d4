//! Read-only catalog store
//!
//! The store is generated at build time: an ordered, immutable slice of
//! named blobs. Each payload starts with a small textual header (the blobs
//! are also served over HTTP) that ends with a blank line.

use crate::limits::HEADER_TERMINATOR;

/// One named blob in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CatalogEntry<'a> {
    name: &'a str,
    payload: &'a [u8],
}

impl<'a> CatalogEntry<'a> {
    /// Create an entry from a path-like name and its payload (header included)
    pub const fn new(name: &'a str, payload: &'a [u8]) -> Self {
        Self { name, payload }
    }

    /// Full path-like name, e.g. `/images/cat#1#20x20@0.raw`
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Payload including its header
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Payload with the header skipped
    ///
    /// A payload without a header terminator is returned unchanged.
    pub fn data(&self) -> &'a [u8] {
        strip_header(self.payload)
    }
}

/// Skip everything up to and including the first blank line
pub fn strip_header(payload: &[u8]) -> &[u8] {
    payload
        .windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
        .map(|pos| &payload[pos + HEADER_TERMINATOR.len()..])
        .unwrap_or(payload)
}

/// Immutable sequence of catalog entries
#[derive(Debug, Clone, Copy)]
pub struct CatalogStore<'a> {
    entries: &'a [CatalogEntry<'a>],
}

impl<'a> CatalogStore<'a> {
    /// Wrap a build-time generated entry slice
    pub const fn new(entries: &'a [CatalogEntry<'a>]) -> Self {
        Self { entries }
    }

    /// First entry, if the store is not empty
    pub fn first_entry(&self) -> Option<&'a CatalogEntry<'a>> {
        self.entries.first()
    }

    /// Iterate all entries in store order
    pub fn iter(&self) -> core::slice::Iter<'a, CatalogEntry<'a>> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find an entry by exact name
    pub fn get(&self, name: &str) -> Option<&'a CatalogEntry<'a>> {
        self.entries.iter().find(|e| e.name == name)
    }
}
