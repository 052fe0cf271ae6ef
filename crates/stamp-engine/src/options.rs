//! Stamp rendering options.
//!
//! Sizes are in output pixels. The ring is drawn at the final resolution,
//! so `ring_width` and `margin` are not affected by glyph scaling.

use image::Rgba;

/// Vermilion-ish red used by the classic seal ink.
pub const DEFAULT_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Configuration options for a stamp.
#[derive(Debug, Clone)]
pub struct StampOptions {
    /// Edge length of the square output image.
    pub size: u32,

    /// Ring color.
    pub color: Rgba<u8>,

    /// Glyph color. Usually the same as the ring.
    pub text_color: Rgba<u8>,

    /// Ring stroke width.
    pub ring_width: u32,

    /// Gap between the ring's outer edge and the canvas edge.
    pub margin: u32,

    /// Pixel height glyphs are rasterized at before scaling.
    pub font_size: f32,

    /// Alpha values above this count as foreground when trimming and
    /// fitting the enclosing circle.
    pub threshold: u8,
}

impl Default for StampOptions {
    fn default() -> Self {
        Self {
            size: 320,
            color: DEFAULT_COLOR,
            text_color: DEFAULT_COLOR,
            ring_width: 6,
            margin: 2,
            font_size: 320.0,
            threshold: 32,
        }
    }
}

impl StampOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, val: u32) -> Self {
        self.size = val;
        self
    }

    /// Builder: set both the ring and glyph color.
    pub fn with_color(mut self, val: Rgba<u8>) -> Self {
        self.color = val;
        self.text_color = val;
        self
    }

    pub fn with_text_color(mut self, val: Rgba<u8>) -> Self {
        self.text_color = val;
        self
    }

    pub fn with_ring_width(mut self, val: u32) -> Self {
        self.ring_width = val;
        self
    }

    pub fn with_margin(mut self, val: u32) -> Self {
        self.margin = val;
        self
    }

    /// Builder: set the rasterization size.
    ///
    /// # Panics
    /// Panics if value is not positive and finite.
    pub fn with_font_size(mut self, val: f32) -> Self {
        assert!(
            val.is_finite() && val > 0.0,
            "Font size must be positive, got {val}"
        );
        self.font_size = val;
        self
    }

    pub fn with_threshold(mut self, val: u8) -> Self {
        self.threshold = val;
        self
    }

    /// Radius of the ring's outer edge, measured from the canvas center.
    pub fn outer_radius(&self) -> f32 {
        self.size as f32 / 2.0 - self.margin as f32
    }

    /// Radius of the disk the glyphs are fitted into.
    pub fn inner_radius(&self) -> f32 {
        self.outer_radius() - self.ring_width as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = StampOptions::default();
        assert_eq!(opts.size, 320);
        assert_eq!(opts.color, DEFAULT_COLOR);
        assert_eq!(opts.text_color, DEFAULT_COLOR);
        assert_eq!(opts.ring_width, 6);
        assert_eq!(opts.margin, 2);
        assert!((opts.font_size - 320.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_builder_chain() {
        let blue = Rgba([0, 0, 255, 255]);
        let black = Rgba([0, 0, 0, 255]);
        let opts = StampOptions::new()
            .with_size(128)
            .with_color(blue)
            .with_text_color(black)
            .with_ring_width(3)
            .with_margin(0)
            .with_font_size(64.0)
            .with_threshold(100);

        assert_eq!(opts.size, 128);
        assert_eq!(opts.color, blue);
        assert_eq!(opts.text_color, black);
        assert_eq!(opts.ring_width, 3);
        assert_eq!(opts.margin, 0);
        assert_eq!(opts.threshold, 100);
    }

    #[test]
    fn test_radii() {
        let opts = StampOptions::new().with_size(100).with_ring_width(5).with_margin(2);
        assert!((opts.outer_radius() - 48.0).abs() < f32::EPSILON);
        assert!((opts.inner_radius() - 43.0).abs() < f32::EPSILON);
    }

    #[test]
    #[should_panic(expected = "Font size must be positive")]
    fn test_invalid_font_size() {
        StampOptions::new().with_font_size(0.0);
    }
}
