//! Square resizing helpers.
//!
//! Uses Lanczos3 filtering throughout. Resampling runs on premultiplied
//! alpha so the white RGB of transparent pixels never bleeds into ink edges.

use image::imageops::{self, FilterType};
use image::{Rgba, Rgba32FImage, RgbaImage};
use tracing::debug;

use crate::TRANSPARENT;

/// Resize an image to a `size` x `size` square, ignoring its aspect ratio.
///
/// Returns a copy of the original if it is already at the target size.
pub fn resize_square(img: &RgbaImage, size: u32) -> RgbaImage {
    let (orig_w, orig_h) = img.dimensions();

    if orig_w == size && orig_h == size {
        debug!(size, "Image already at target size, skipping resize");
        return img.clone();
    }

    debug!(orig_w, orig_h, size, "Resizing image to square");
    let resized = imageops::resize(&premultiply(img), size, size, FilterType::Lanczos3);
    unpremultiply(&resized)
}

fn premultiply(img: &RgbaImage) -> Rgba32FImage {
    Rgba32FImage::from_fn(img.width(), img.height(), |x, y| {
        let p = img.get_pixel(x, y);
        let a = f32::from(p[3]) / 255.0;
        let c = |i: usize| f32::from(p[i]) / 255.0 * a;
        Rgba([c(0), c(1), c(2), a])
    })
}

fn unpremultiply(img: &Rgba32FImage) -> RgbaImage {
    RgbaImage::from_fn(img.width(), img.height(), |x, y| {
        let p = img.get_pixel(x, y);
        let a = p[3].clamp(0.0, 1.0);
        let alpha = (a * 255.0).round() as u8;
        if alpha == 0 {
            return TRANSPARENT;
        }
        let c = |i: usize| ((p[i] / a).clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([c(0), c(1), c(2), alpha])
    })
}

/// Squash an image into a square whose edge is its shorter side.
pub fn square_by_shorter_side(img: &RgbaImage) -> RgbaImage {
    let edge = img.width().min(img.height()).max(1);
    resize_square(img, edge)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test image with given dimensions.
    fn create_test_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([128, 0, 0, 255]))
    }

    #[test]
    fn test_resize_square_downscale() {
        let img = create_test_image(800, 600);
        let result = resize_square(&img, 300);
        assert_eq!(result.dimensions(), (300, 300));
    }

    #[test]
    fn test_resize_square_upscale() {
        let img = create_test_image(20, 10);
        let result = resize_square(&img, 64);
        assert_eq!(result.dimensions(), (64, 64));
    }

    #[test]
    fn test_resize_square_same_size() {
        let img = create_test_image(50, 50);
        let result = resize_square(&img, 50);
        assert_eq!(result, img);
    }

    #[test]
    fn test_resize_square_is_always_one_to_one() {
        let img = create_test_image(37, 91);
        for size in [1, 2, 7, 64, 257, 1000] {
            let result = resize_square(&img, size);
            assert_eq!(result.width(), result.height(), "size {size}");
            assert_eq!(result.width(), size);
        }
    }

    #[test]
    fn test_resize_square_keeps_ink_color_at_edges() {
        let mut img = RgbaImage::from_pixel(60, 60, TRANSPARENT);
        for y in 20..40 {
            for x in 20..40 {
                img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }

        for size in [17, 45, 131] {
            let result = resize_square(&img, size);
            let edge = result.pixels().filter(|p| p[3] > 0 && p[3] < 255).count();
            assert!(edge > 0, "size {size}: no anti-aliased edge");
            for p in result.pixels().filter(|p| p[3] > 0) {
                assert!(p[0] <= 2 && p[1] <= 2 && p[2] <= 2, "size {size}: fringe {p:?}");
            }
        }
    }

    #[test]
    fn test_resize_square_clears_fully_transparent_pixels() {
        let mut img = RgbaImage::from_pixel(40, 40, TRANSPARENT);
        img.put_pixel(20, 20, Rgba([255, 0, 0, 255]));
        let result = resize_square(&img, 80);
        assert_eq!(*result.get_pixel(0, 0), TRANSPARENT);
    }

    #[test]
    fn test_square_by_shorter_side_portrait() {
        let img = create_test_image(40, 120);
        assert_eq!(square_by_shorter_side(&img).dimensions(), (40, 40));
    }

    #[test]
    fn test_square_by_shorter_side_landscape() {
        let img = create_test_image(90, 30);
        assert_eq!(square_by_shorter_side(&img).dimensions(), (30, 30));
    }
}
