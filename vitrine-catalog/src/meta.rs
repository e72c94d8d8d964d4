//! Metadata codec
//!
//! Decodes the argument block of a raw file name:
//!
//! ```text
//! cat#<frame>#<width>x<height>@<interval>.raw
//! ```
//!
//! `<frame>#` may be left out (frame 1) and so may `@<interval>`
//! (interval 0, a still image). Width and height are always required.

use core::fmt;

use crate::limits::{
    ARG_MARKER, INTERVAL_MARKER, MAX_IMAGE_HEIGHT, MAX_IMAGE_WIDTH, MIN_IMAGE_HEIGHT,
    MIN_IMAGE_WIDTH, SIZE_SEPARATOR,
};
use crate::path::{split, FileKind};
use crate::store::CatalogEntry;

/// Argument block errors
///
/// Callers treat all of these the same way: the raw file does not count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArgError {
    /// Path does not have the raw-data extension
    NotRaw,
    /// Raw file without an argument block
    MissingArgs,
    /// Unexpected character, empty or missing token
    Malformed,
    /// Token outside its numeric bound
    OutOfRange,
}

impl fmt::Display for ArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgError::NotRaw => f.write_str("not a raw data file"),
            ArgError::MissingArgs => f.write_str("missing argument block"),
            ArgError::Malformed => f.write_str("malformed argument block"),
            ArgError::OutOfRange => f.write_str("argument out of range"),
        }
    }
}

/// Decoded argument block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawArgs {
    /// Frame number, starting at 1
    pub frame_number: u16,
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
    /// Frame display interval in ms, 0 for a still image
    pub frame_interval_ms: u16,
}

impl RawArgs {
    /// True if this raw file is an animation frame
    pub fn is_animated(&self) -> bool {
        self.frame_interval_ms > 0
    }
}

/// Everything a renderer needs to draw one frame
///
/// Recomputed per query; `name` and `data` borrow from the catalog store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImageMetadata<'a> {
    /// Path of the raw file the frame was read from
    pub name: &'a str,
    /// Pixel data with the payload header skipped
    pub data: &'a [u8],
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
    /// Frame number, starting at 1
    pub frame_number: u16,
    /// Frame display interval in ms, 0 for a still image
    pub frame_interval_ms: u16,
}

impl<'a> ImageMetadata<'a> {
    /// Decode a raw catalog entry
    pub fn from_entry(entry: &CatalogEntry<'a>) -> Result<Self, ArgError> {
        let args = extract_args(entry.name())?;
        Ok(Self {
            name: entry.name(),
            data: entry.data(),
            width: args.width,
            height: args.height,
            frame_number: args.frame_number,
            frame_interval_ms: args.frame_interval_ms,
        })
    }

    /// True if this frame belongs to an animation
    pub fn is_animated(&self) -> bool {
        self.frame_interval_ms > 0
    }
}

/// Tokenizer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgState {
    /// First number: frame (if followed by `#`) or width (if followed by `x`)
    Leading,
    /// Width after an explicit frame token
    Width,
    /// Height after `x`
    Height,
    /// Interval after `@`
    Interval,
}

/// Decode the argument block of a raw file path
pub fn extract_args(path: &str) -> Result<RawArgs, ArgError> {
    let parts = split(path);
    if FileKind::from_extension(parts.extension) != FileKind::Raw {
        return Err(ArgError::NotRaw);
    }
    let block = parts.args.ok_or(ArgError::MissingArgs)?;
    parse_args(block)
}

/// Parse an argument block (without the leading marker)
pub fn parse_args(block: &str) -> Result<RawArgs, ArgError> {
    let mut state = ArgState::Leading;
    let mut value: u32 = 0;
    let mut digits: usize = 0;

    let mut frame: u32 = 1;
    let mut width: u32 = 0;
    let mut height: u32 = 0;
    let mut interval: u32 = 0;

    for &byte in block.as_bytes() {
        match (state, byte) {
            (_, b'0'..=b'9') => {
                value = value * 10 + u32::from(byte - b'0');
                // Anything past u16 is out of range for every token
                if value > u32::from(u16::MAX) {
                    return Err(ArgError::OutOfRange);
                }
                digits += 1;
                continue;
            }
            _ if digits == 0 => return Err(ArgError::Malformed),
            (ArgState::Leading, ARG_MARKER) => {
                frame = value;
                state = ArgState::Width;
            }
            (ArgState::Leading | ArgState::Width, SIZE_SEPARATOR) => {
                width = value;
                state = ArgState::Height;
            }
            (ArgState::Height, INTERVAL_MARKER) => {
                height = value;
                state = ArgState::Interval;
            }
            _ => return Err(ArgError::Malformed),
        }
        value = 0;
        digits = 0;
    }

    if digits == 0 {
        return Err(ArgError::Malformed);
    }
    match state {
        ArgState::Height => height = value,
        ArgState::Interval => interval = value,
        ArgState::Leading | ArgState::Width => return Err(ArgError::Malformed),
    }

    if frame < 1
        || !(u32::from(MIN_IMAGE_WIDTH)..=u32::from(MAX_IMAGE_WIDTH)).contains(&width)
        || !(u32::from(MIN_IMAGE_HEIGHT)..=u32::from(MAX_IMAGE_HEIGHT)).contains(&height)
    {
        return Err(ArgError::OutOfRange);
    }

    // Bounded by the u16 check above
    Ok(RawArgs {
        frame_number: frame as u16,
        width: width as u16,
        height: height as u16,
        frame_interval_ms: interval as u16,
    })
}

/// Frame number a path asks for
///
/// Previews and bare names ask for frame 1; a raw path asks for its own
/// frame. `None` if the path is a raw file with a broken argument block.
pub fn requested_frame(path: &str) -> Option<u16> {
    match FileKind::of(path) {
        FileKind::Raw => extract_args(path).ok().map(|args| args.frame_number),
        _ => Some(1),
    }
}
