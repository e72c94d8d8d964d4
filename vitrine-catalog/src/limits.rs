//! Compile-time limits and filename grammar constants
//!
//! Every buffer in the catalog is sized from these values. They mirror the
//! LCD layout: pictures are drawn in the right half of a 480×272 panel, so a
//! frame can be at most 240 pixels wide and 272 pixels high.

/// Longest catalog path accepted, in bytes
pub const MAX_PATH_LENGTH: usize = 255;

/// Maximum number of frames in one animation
pub const MAX_FRAMES: usize = 50;

/// Smallest accepted frame width in pixels
pub const MIN_IMAGE_WIDTH: u16 = 1;

/// Largest accepted frame width in pixels (half the LCD width)
pub const MAX_IMAGE_WIDTH: u16 = 240;

/// Smallest accepted frame height in pixels
pub const MIN_IMAGE_HEIGHT: u16 = 1;

/// Largest accepted frame height in pixels (full LCD height)
pub const MAX_IMAGE_HEIGHT: u16 = 272;

/// Directory separator
pub const PATH_SEPARATOR: u8 = b'/';

/// Separator between name and extension
pub const EXTENSION_SEPARATOR: u8 = b'.';

/// Starts the argument block and separates frame from size
pub const ARG_MARKER: u8 = b'#';

/// Separates width from height
pub const SIZE_SEPARATOR: u8 = b'x';

/// Introduces the frame interval
pub const INTERVAL_MARKER: u8 = b'@';

/// Extension of still-image previews
pub const IMAGE_EXTENSION: &str = "png";

/// Extension of animation previews
pub const ANIMATION_EXTENSION: &str = "gif";

/// Extension of raw pixel-data files
pub const RAW_EXTENSION: &str = "raw";

/// Terminates the textual header in front of every payload
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Separator written after every name by [`crate::listing::write_name_list`]
pub const LIST_SEPARATOR: &str = "\n\r";
