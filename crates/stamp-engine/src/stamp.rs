//! The stamp itself: contents, font, options, and the rendered image.

use std::io::Cursor;
use std::path::Path;

use ab_glyph::{Font, PxScale};
use image::{ImageFormat, RgbaImage};
use tracing::{debug, info};

use crate::compose::compose_text;
use crate::frame::frame;
use crate::options::StampOptions;
use crate::resize::resize_square;
use crate::{Result, StampError};

/// A rendered stamp.
///
/// The image is generated eagerly by [`Stamp::new`]; afterwards only
/// [`Stamp::resize`] changes it.
#[derive(Debug, Clone)]
pub struct Stamp {
    contents: String,
    options: StampOptions,
    image: RgbaImage,
}

impl Stamp {
    /// Render `contents` with `font` into a stamp.
    pub fn new<F: Font>(contents: &str, font: &F, options: StampOptions) -> Result<Self> {
        if options.size == 0 {
            return Err(StampError::InvalidSize(0));
        }

        let scale = PxScale::from(options.font_size);
        let composite = compose_text(
            font,
            scale,
            contents,
            options.text_color,
            options.threshold,
        )?;
        debug!(
            width = composite.width(),
            height = composite.height(),
            "Composed glyphs"
        );

        let image = frame(&composite, &options)?;
        info!(contents, size = options.size, "Stamp generated");

        Ok(Self {
            contents: contents.to_string(),
            options,
            image,
        })
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn options(&self) -> &StampOptions {
        &self.options
    }

    /// Edge length of the current image.
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Rescale the stored image to a `size` x `size` square and return it.
    pub fn resize(&mut self, size: u32) -> Result<&RgbaImage> {
        if size == 0 {
            return Err(StampError::InvalidSize(size));
        }
        self.image = resize_square(&self.image, size);
        Ok(&self.image)
    }

    /// Encode the current image as PNG.
    pub fn png(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.image.write_to(&mut cursor, ImageFormat::Png)?;
        Ok(cursor.into_inner())
    }

    /// Write the current image to `path`. The format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.image.save(path)?;
        info!(path = %path.display(), "Stamp saved");
        Ok(())
    }
}
