//! Glyph composition: render, trim, and stack characters top to bottom.

use ab_glyph::{Font, PxScale};
use image::{Rgba, RgbaImage, imageops};
use tracing::{debug, warn};

use crate::crop::crop_to_content;
use crate::text::render_glyph;
use crate::{Result, StampError, TRANSPARENT};

/// Concatenate images vertically (top to bottom).
///
/// Each image is horizontally centered. The output width equals the maximum
/// width and the height is the sum of all heights.
pub fn concat_centered(images: &[RgbaImage]) -> RgbaImage {
    if images.is_empty() {
        return RgbaImage::from_pixel(1, 1, TRANSPARENT);
    }

    let max_width = images.iter().map(|i| i.width()).max().unwrap_or(1);
    let total_height: u32 = images.iter().map(|i| i.height()).sum();

    let mut result = RgbaImage::from_pixel(max_width, total_height, TRANSPARENT);

    let mut y_offset = 0u32;
    for img in images {
        let x = (max_width - img.width()) / 2;
        imageops::replace(&mut result, img, i64::from(x), i64::from(y_offset));
        y_offset += img.height();
    }

    result
}

/// Render `text` as a vertical column of trimmed glyphs.
///
/// Blank characters (spaces) are skipped. A single visible glyph is returned
/// as-is, without going through the stacking step.
pub fn compose_text<F: Font>(
    font: &F,
    scale: PxScale,
    text: &str,
    color: Rgba<u8>,
    thresh: u8,
) -> Result<RgbaImage> {
    let mut glyphs = Vec::with_capacity(text.chars().count());

    for ch in text.chars() {
        if ch.is_whitespace() {
            continue;
        }
        let trimmed = render_glyph(font, scale, ch, color)?
            .and_then(|img| crop_to_content(&img, thresh));
        match trimmed {
            Some(img) => glyphs.push(img),
            None => warn!(?ch, "Glyph has no visible pixels, skipping"),
        }
    }

    debug!(glyphs = glyphs.len(), "Composing glyphs");

    match glyphs.len() {
        0 => Err(StampError::EmptyContent),
        1 => Ok(glyphs.remove(0)),
        _ => Ok(concat_centered(&glyphs)),
    }
}
