//! Hanko-style stamp generation.
//!
//! Renders a short string glyph by glyph, trims and stacks the glyphs,
//! fits them inside a minimum enclosing circle, and draws a ring around
//! them on a transparent square canvas.

pub mod circle;
pub mod color;
pub mod compose;
pub mod crop;
pub mod font;
pub mod frame;
pub mod options;
pub mod resize;
pub mod stamp;
pub mod text;

// Re-exports for convenience
pub use circle::{Circle, min_enclosing_circle};
pub use color::parse_color;
pub use font::{FontCatalog, FontEntry, FontSource};
pub use options::StampOptions;
pub use stamp::Stamp;

use image::Rgba;

/// Fill value for every pixel outside the glyphs and the ring.
pub const TRANSPARENT: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Errors that can occur while building or exporting a stamp.
#[derive(Debug, thiserror::Error)]
pub enum StampError {
    #[error("Font has no glyph for {0:?}")]
    MissingGlyph(char),

    #[error("Nothing visible to stamp")]
    EmptyContent,

    #[error("Invalid stamp size: {0}")]
    InvalidSize(u32),

    #[error("Ring width {width} and margin {margin} leave no room inside a {size}px stamp")]
    InvalidGeometry { size: u32, width: u32, margin: u32 },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Failed to parse font data (TTF/OTF)")]
    FontParse,

    #[error("Font index {index} out of range ({len} system fonts)")]
    FontIndexOutOfRange { index: usize, len: usize },

    #[error("No usable font found")]
    NoFont,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type alias for stamp operations.
pub type Result<T> = std::result::Result<T, StampError>;
