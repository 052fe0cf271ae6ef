//! Trimming images to the bounding box of their visible content.
//!
//! Foreground is decided on the alpha plane: it is converted to a grayscale
//! image and binarized, so glyph color never affects what gets trimmed.

use image::{GrayImage, RgbaImage, imageops};
use imageproc::contrast::{ThresholdType, threshold};
use imageproc::rect::Rect;
use tracing::debug;

/// Extract the alpha channel as a grayscale image.
pub fn alpha_plane(img: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        image::Luma([img.get_pixel(x, y)[3]])
    })
}

/// Binary foreground mask: 255 where alpha is above `thresh`, 0 elsewhere.
pub fn foreground_mask(img: &RgbaImage, thresh: u8) -> GrayImage {
    threshold(&alpha_plane(img), thresh, ThresholdType::Binary)
}

/// Bounding box of all foreground pixels, or `None` if there are none.
pub fn bounding_box(img: &RgbaImage, thresh: u8) -> Option<Rect> {
    let mask = foreground_mask(img, thresh);

    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut found = false;

    for (x, y, pixel) in mask.enumerate_pixels() {
        if pixel[0] == 0 {
            continue;
        }
        found = true;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    if !found {
        return None;
    }

    Some(Rect::at(min_x as i32, min_y as i32).of_size(max_x - min_x + 1, max_y - min_y + 1))
}

/// Crop an image to its visible content.
///
/// Returns `None` for images with no foreground pixel.
pub fn crop_to_content(img: &RgbaImage, thresh: u8) -> Option<RgbaImage> {
    let rect = bounding_box(img, thresh)?;
    debug!(
        orig_w = img.width(),
        orig_h = img.height(),
        left = rect.left(),
        top = rect.top(),
        width = rect.width(),
        height = rect.height(),
        "Cropping to content"
    );
    Some(
        imageops::crop_imm(
            img,
            rect.left() as u32,
            rect.top() as u32,
            rect.width(),
            rect.height(),
        )
        .to_image(),
    )
}
