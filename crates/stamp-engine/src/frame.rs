//! Circle framing: fit the composed glyphs into a disk, draw the ring, and
//! clear everything outside it.

use image::{Rgba, RgbaImage, imageops};
use tracing::debug;

use crate::circle::{Circle, content_circle};
use crate::options::StampOptions;
use crate::resize::{resize_square, square_by_shorter_side};
use crate::{Result, StampError, TRANSPARENT};

/// Transparent border added around the circle crop so rounding the center
/// never clips content.
const CROP_PADDING: u32 = 1;

/// Frame a composed glyph image into a `size` x `size` stamp.
pub fn frame(composite: &RgbaImage, opts: &StampOptions) -> Result<RgbaImage> {
    let size = opts.size;
    if size == 0 {
        return Err(StampError::InvalidSize(size));
    }
    let inner = opts.inner_radius();
    if inner < 1.0 {
        return Err(StampError::InvalidGeometry {
            size,
            width: opts.ring_width,
            margin: opts.margin,
        });
    }

    let square = square_by_shorter_side(composite);
    let circle = content_circle(&square, opts.threshold).ok_or(StampError::EmptyContent)?;
    let disk = crop_to_circle(&square, &circle);

    // Inner diameter with the same parity as `size`, so the content sits
    // exactly on the canvas center.
    let mut diameter = (inner * 2.0).floor() as u32;
    if (size - diameter) % 2 == 1 {
        diameter -= 1;
    }
    let diameter = diameter.max(1);
    let fitted = resize_square(&disk, diameter);

    debug!(
        size,
        diameter,
        outer = opts.outer_radius(),
        inner,
        "Placing content inside ring"
    );

    let mut canvas = RgbaImage::from_pixel(size, size, TRANSPARENT);
    let offset = i64::from((size - diameter) / 2);
    imageops::replace(&mut canvas, &fitted, offset, offset);

    let center = size as f32 / 2.0;
    draw_ring(
        &mut canvas,
        (center, center),
        opts.outer_radius(),
        opts.ring_width as f32,
        opts.color,
    );
    mask_outside_circle(&mut canvas, opts.outer_radius());

    Ok(canvas)
}

/// Copy the region around `circle` onto a square canvas whose center is the
/// circle's center and whose edge is the circle's diameter.
pub fn crop_to_circle(img: &RgbaImage, circle: &Circle) -> RgbaImage {
    let side = circle.diameter().ceil().max(1.0) as u32 + CROP_PADDING * 2;
    let half = f64::from(side) / 2.0;
    let dx = (half - circle.x).round() as i64;
    let dy = (half - circle.y).round() as i64;

    debug!(side, dx, dy, "Cropping content to enclosing circle");

    let mut canvas = RgbaImage::from_pixel(side, side, TRANSPARENT);
    imageops::replace(&mut canvas, img, dx, dy);
    canvas
}

/// Draw an anti-aliased ring whose outer edge has radius `outer`.
///
/// Pixels fully inside the band get exactly `color`.
pub fn draw_ring(
    img: &mut RgbaImage,
    center: (f32, f32),
    outer: f32,
    width: f32,
    color: Rgba<u8>,
) {
    let inner = outer - width;
    let (cx, cy) = center;
    let (w, h) = img.dimensions();

    let x0 = (cx - outer - 1.0).floor().max(0.0) as u32;
    let y0 = (cy - outer - 1.0).floor().max(0.0) as u32;
    let x1 = ((cx + outer + 1.0).ceil() as u32).min(w);
    let y1 = ((cy + outer + 1.0).ceil() as u32).min(h);

    for y in y0..y1 {
        for x in x0..x1 {
            let d = (x as f32 + 0.5 - cx).hypot(y as f32 + 0.5 - cy);
            let coverage = (outer - d + 0.5)
                .clamp(0.0, 1.0)
                .min((d - inner + 0.5).clamp(0.0, 1.0));
            if coverage <= 0.0 {
                continue;
            }
            let bg = *img.get_pixel(x, y);
            img.put_pixel(x, y, blend_over(bg, color, coverage));
        }
    }
}

/// Clear every pixel outside the centered disk of radius `radius`.
///
/// Uses the same pixel-center distance as [`draw_ring`], so nothing the ring
/// paints is cut and nothing beyond its outer edge survives.
pub fn mask_outside_circle(img: &mut RgbaImage, radius: f32) {
    let (w, h) = img.dimensions();
    let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
    let limit = radius + 0.5;

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let d = (x as f32 + 0.5 - cx).hypot(y as f32 + 0.5 - cy);
        if d > limit {
            *pixel = TRANSPARENT;
        }
    }
}

/// Source-over compositing of `fg` scaled by `coverage` onto `bg`.
fn blend_over(bg: Rgba<u8>, fg: Rgba<u8>, coverage: f32) -> Rgba<u8> {
    let src_a = fg[3] as f32 / 255.0 * coverage;
    let dst_a = bg[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return TRANSPARENT;
    }
    if src_a >= 1.0 {
        return fg;
    }

    let channel = |i: usize| {
        let v = (fg[i] as f32 * src_a + bg[i] as f32 * dst_a * (1.0 - src_a)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round() as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    /// Tall composite with two ink blocks, like two stacked glyphs.
    fn create_composite() -> RgbaImage {
        let mut img = RgbaImage::from_pixel(40, 90, TRANSPARENT);
        for y in 0..40 {
            for x in 5..35 {
                img.put_pixel(x, y, BLACK);
            }
        }
        for y in 50..90 {
            for x in 0..40 {
                img.put_pixel(x, y, BLACK);
            }
        }
        img
    }

    fn center_distance(size: u32, x: u32, y: u32) -> f32 {
        let c = size as f32 / 2.0;
        (x as f32 + 0.5 - c).hypot(y as f32 + 0.5 - c)
    }

    #[test]
    fn test_frame_is_square_of_configured_size() {
        let opts = StampOptions::new().with_size(128);
        let stamp = frame(&create_composite(), &opts).unwrap();
        assert_eq!(stamp.dimensions(), (128, 128));

        let opts = StampOptions::new().with_size(77);
        let stamp = frame(&create_composite(), &opts).unwrap();
        assert_eq!(stamp.dimensions(), (77, 77));
    }

    #[test]
    fn test_frame_ring_is_opaque_configured_color() {
        let opts = StampOptions::new()
            .with_size(200)
            .with_color(RED)
            .with_text_color(BLACK)
            .with_ring_width(6)
            .with_margin(2);
        let stamp = frame(&create_composite(), &opts).unwrap();

        // Middle of the band at the four compass points
        let band = 2 + 3;
        for (x, y) in [(100, band), (100, 199 - band), (band, 100), (199 - band, 100)] {
            assert_eq!(*stamp.get_pixel(x, y), RED, "ring pixel ({x}, {y})");
        }
    }

    #[test]
    fn test_frame_clears_outside_circle() {
        let opts = StampOptions::new().with_size(150).with_margin(4);
        let stamp = frame(&create_composite(), &opts).unwrap();
        let outer = opts.outer_radius();

        for (x, y, p) in stamp.enumerate_pixels() {
            if center_distance(150, x, y) > outer + 0.5 {
                assert_eq!(p[3], 0, "pixel ({x}, {y}) outside ring is visible");
            }
        }
        // Corners are always outside
        assert_eq!(stamp.get_pixel(0, 0)[3], 0);
        assert_eq!(stamp.get_pixel(149, 149)[3], 0);
    }

    #[test]
    fn test_frame_keeps_content_inside_ring() {
        let opts = StampOptions::new().with_size(160).with_text_color(BLACK);
        let stamp = frame(&create_composite(), &opts).unwrap();
        let inner = opts.inner_radius();

        let inside_ink = stamp
            .enumerate_pixels()
            .filter(|(x, y, p)| center_distance(160, *x, *y) < inner - 1.0 && p[3] >= 250)
            .count();
        assert!(inside_ink > 0, "no glyph pixels inside the ring");
    }

    #[test]
    fn test_frame_keeps_black_ink_edges_dark() {
        let opts = StampOptions::new().with_size(200).with_text_color(BLACK);
        let stamp = frame(&create_composite(), &opts).unwrap();
        let inner = opts.inner_radius();

        for (x, y, p) in stamp.enumerate_pixels() {
            if center_distance(200, x, y) < inner - 2.0 && p[3] > 0 {
                assert!(
                    p[0] <= 8 && p[1] <= 8 && p[2] <= 8,
                    "pixel ({x}, {y}) has a light fringe: {p:?}"
                );
            }
        }
    }

    #[test]
    fn test_frame_fits_ink_touching_left_edge() {
        // Only the lower block, flush against column 0
        let mut img = RgbaImage::from_pixel(40, 40, TRANSPARENT);
        for y in 20..40 {
            for x in 0..40 {
                img.put_pixel(x, y, BLACK);
            }
        }
        let opts = StampOptions::new().with_size(120).with_color(RED);
        let stamp = frame(&img, &opts).unwrap();
        let inner = opts.inner_radius();

        let inside_ink = stamp
            .enumerate_pixels()
            .filter(|(x, y, p)| center_distance(120, *x, *y) < inner - 1.0 && p[3] > 0)
            .count();
        assert!(inside_ink > 0);
    }

    #[test]
    fn test_frame_empty_composite() {
        let img = RgbaImage::from_pixel(10, 10, TRANSPARENT);
        let err = frame(&img, &StampOptions::new()).unwrap_err();
        assert!(matches!(err, StampError::EmptyContent));
    }

    #[test]
    fn test_frame_rejects_degenerate_geometry() {
        let opts = StampOptions::new().with_size(20).with_ring_width(9).with_margin(1);
        let err = frame(&create_composite(), &opts).unwrap_err();
        assert!(matches!(err, StampError::InvalidGeometry { .. }));

        let err = frame(&create_composite(), &StampOptions::new().with_size(0)).unwrap_err();
        assert!(matches!(err, StampError::InvalidSize(0)));
    }

    #[test]
    fn test_crop_to_circle_centers_content() {
        let mut img = RgbaImage::from_pixel(50, 50, TRANSPARENT);
        img.put_pixel(40, 10, BLACK);
        let circle = Circle::new(40.5, 10.5, 3.0);
        let cropped = crop_to_circle(&img, &circle);
        assert_eq!(cropped.dimensions(), (8, 8));
        assert_eq!(*cropped.get_pixel(3, 3), BLACK);
    }

    #[test]
    fn test_mask_outside_circle_clears_corners() {
        let mut img = RgbaImage::from_pixel(21, 21, RED);
        mask_outside_circle(&mut img, 10.0);
        assert_eq!(*img.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*img.get_pixel(20, 20), TRANSPARENT);
        assert_eq!(*img.get_pixel(10, 10), RED);
        assert_eq!(*img.get_pixel(10, 1), RED);
    }

    #[test]
    fn test_mask_outside_circle_matches_ring_edge() {
        for (size, outer) in [(150u32, 71.0f32), (77, 34.5), (200, 92.0)] {
            let mut img = RgbaImage::from_pixel(size, size, RED);
            mask_outside_circle(&mut img, outer);

            let farthest = img
                .enumerate_pixels()
                .filter(|(_, _, p)| p[3] > 0)
                .map(|(x, y, _)| center_distance(size, x, y))
                .fold(0.0f32, f32::max);
            assert!(farthest <= outer + 0.5, "size {size}: visible at {farthest}");
            assert!(farthest > outer - 0.5, "size {size}: disk shrank to {farthest}");
        }
    }

    #[test]
    fn test_blend_over_opaque_replaces() {
        assert_eq!(blend_over(TRANSPARENT, RED, 1.0), RED);
        assert_eq!(blend_over(BLACK, RED, 1.0), RED);
    }

    #[test]
    fn test_blend_over_partial_coverage() {
        let out = blend_over(TRANSPARENT, RED, 0.5);
        assert_eq!(out[3], 128);
        assert_eq!(out[0], 255);
        assert_eq!(out[1], 0);
    }
}
