//! Glyph rasterization.
//!
//! Each character is rendered onto its own transparent canvas sized to the
//! glyph's pixel bounds, so later trimming only has to shave off
//! anti-aliasing fringes.

use ab_glyph::{Font, GlyphId, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use tracing::debug;

use crate::{Result, StampError, TRANSPARENT};

/// Padding around the glyph bounds so anti-aliased edges are not clipped.
const GLYPH_PADDING: u32 = 1;

/// Check that the font can render `ch` with a real glyph.
///
/// Glyph id 0 is `.notdef`, the "tofu" box fonts draw for unknown characters.
pub fn ensure_glyph<F: Font>(font: &F, ch: char) -> Result<GlyphId> {
    let id = font.glyph_id(ch);
    if id.0 == 0 {
        return Err(StampError::MissingGlyph(ch));
    }
    Ok(id)
}

/// Render a single character onto its own transparent canvas.
///
/// Returns `Ok(None)` for characters without an outline (spaces and other
/// blank glyphs).
pub fn render_glyph<F: Font>(
    font: &F,
    scale: PxScale,
    ch: char,
    color: Rgba<u8>,
) -> Result<Option<RgbaImage>> {
    let id = ensure_glyph(font, ch)?;
    let scaled = font.as_scaled(scale);

    // Same placement imageproc uses when laying out text at (0, 0).
    let glyph = id.with_scale_and_position(scale, point(0.0, scaled.ascent()));
    let Some(outlined) = font.outline_glyph(glyph) else {
        return Ok(None);
    };
    let bounds = outlined.px_bounds();

    let width = bounds.width().ceil() as u32 + GLYPH_PADDING * 2;
    let height = bounds.height().ceil() as u32 + GLYPH_PADDING * 2;
    let x = GLYPH_PADDING as i32 - bounds.min.x.round() as i32;
    let y = GLYPH_PADDING as i32 - bounds.min.y.round() as i32;

    debug!(?ch, width, height, "Rendering glyph");

    // draw_text_mut blends every channel with the canvas, so start from the
    // ink color at zero alpha to keep edge pixels the ink's hue.
    let mut ink = color;
    ink[3] = 0;
    let mut img = RgbaImage::from_pixel(width, height, ink);
    let mut buf = [0u8; 4];
    draw_text_mut(&mut img, color, x, y, scale, font, ch.encode_utf8(&mut buf));

    for pixel in img.pixels_mut().filter(|p| p[3] == 0) {
        *pixel = TRANSPARENT;
    }
    Ok(Some(img))
}
