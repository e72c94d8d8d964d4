//! Animation playback cursor
//!
//! The board's timer interrupt owns the timing; this type only remembers
//! which frames belong to the current picture and which one is next.

use crate::index::{CatalogError, CatalogIndex, FrameList};
use crate::meta::ImageMetadata;

/// Frame cursor over one asset
#[derive(Debug, Clone, Default)]
pub struct Playback<'a> {
    frames: FrameList<'a>,
    next: usize,
    interval_ms: u16,
}

impl<'a> Playback<'a> {
    /// Create an idle cursor
    pub const fn new() -> Self {
        Self {
            frames: FrameList::new(),
            next: 0,
            interval_ms: 0,
        }
    }

    /// Load the frames of the asset of `path` and return the first one
    ///
    /// A still image loads a single frame with interval 0; the caller should
    /// not arm its timer in that case. The previous playback is dropped even
    /// if loading fails.
    pub fn start(
        &mut self,
        index: &CatalogIndex<'a>,
        path: &str,
    ) -> Result<ImageMetadata<'a>, CatalogError> {
        self.stop();

        let frames = index.animation_frames(path)?;
        let first = frames
            .first()
            .and_then(|frame| index.get_metadata(frame))
            .ok_or(CatalogError::NotFound)?;

        self.frames = frames;
        self.next = 1 % self.frames.len();
        self.interval_ms = first.frame_interval_ms;
        Ok(first)
    }

    /// Metadata of the next frame, wrapping around after the last one
    pub fn advance(&mut self, index: &CatalogIndex<'a>) -> Option<ImageMetadata<'a>> {
        let frame = *self.frames.get(self.next)?;
        self.next = (self.next + 1) % self.frames.len();
        index.get_metadata(frame)
    }

    /// Forget the current picture
    pub fn stop(&mut self) {
        self.frames.clear();
        self.next = 0;
        self.interval_ms = 0;
    }

    /// Timer period for the current picture, 0 for a still image or when idle
    pub fn interval_ms(&self) -> u16 {
        self.interval_ms
    }

    /// True while an animation with more than one frame is loaded
    pub fn is_animating(&self) -> bool {
        self.interval_ms > 0 && self.frames.len() > 1
    }

    /// Number of loaded frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}
