//! Images embedded into the firmware
//!
//! `build.rs` turns every file under the directory configured in
//! `assets.toml` into one [`CatalogEntry`]. Each payload carries an HTTP
//! header so the same blobs can be served by the board's web server.

#![no_std]
#![deny(unsafe_code)]

use vitrine_catalog::{CatalogEntry, CatalogStore};

include!(concat!(env!("OUT_DIR"), "/catalog.rs"));

/// The embedded catalog store
pub fn store() -> CatalogStore<'static> {
    CatalogStore::new(&ENTRIES)
}
