//! Stamp configuration: defaults, optional JSON file, environment overrides.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use stamp_engine::{FontSource, StampOptions, parse_color};

/// Largest stamp edge accepted from configuration.
pub const MAX_SIZE: u32 = 8192;

/// Largest rasterization size accepted from configuration.
pub const MAX_FONT_SIZE: f32 = 4096.0;

/// Stamp settings as read from file, environment, and flags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StampConfig {
    pub size: u32,
    pub color: String,
    /// Glyph color; the ring color when unset.
    pub text_color: Option<String>,
    pub width: u32,
    pub margin: u32,
    pub font_size: f32,
    pub threshold: u8,
    pub font: Option<PathBuf>,
    pub font_index: Option<usize>,
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            size: 320,
            color: "red".into(),
            text_color: None,
            width: 6,
            margin: 2,
            font_size: 320.0,
            threshold: 32,
            font: None,
            font_index: None,
        }
    }
}

impl StampConfig {
    /// Load configuration: defaults, then the JSON file (if any), then
    /// `STAMP_*` environment variables.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read a JSON config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&data)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Apply environment overrides. Unparseable values are ignored with a
    /// warning.
    pub fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) {
        let g = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = g("STAMP_SIZE") {
            self.size = parse_or(&v, "STAMP_SIZE", self.size);
        }
        if let Some(v) = g("STAMP_COLOR") {
            self.color = v;
        }
        if let Some(v) = g("STAMP_TEXT_COLOR") {
            self.text_color = Some(v);
        }
        if let Some(v) = g("STAMP_WIDTH") {
            self.width = parse_or(&v, "STAMP_WIDTH", self.width);
        }
        if let Some(v) = g("STAMP_MARGIN") {
            self.margin = parse_or(&v, "STAMP_MARGIN", self.margin);
        }
        if let Some(v) = g("STAMP_FONT_SIZE") {
            self.font_size = parse_or(&v, "STAMP_FONT_SIZE", self.font_size);
        }
        if let Some(v) = g("STAMP_FONT") {
            self.font = Some(PathBuf::from(v));
            self.font_index = None;
        }
        if let Some(v) = g("STAMP_FONT_INDEX") {
            if let Some(index) = parse_opt(&v, "STAMP_FONT_INDEX") {
                self.font_index = Some(index);
                self.font = None;
            }
        }
    }

    /// Range-check values. Returns the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_SIZE).contains(&self.size) {
            return Err(format!("size must be between 1 and {MAX_SIZE}"));
        }
        if self.width == 0 {
            return Err("ring width must be at least 1".into());
        }
        if self.margin >= self.size / 2 {
            return Err("margin must be less than half the size".into());
        }
        if !(self.font_size > 0.0 && self.font_size <= MAX_FONT_SIZE) {
            return Err(format!("font size must be between 0 and {MAX_FONT_SIZE}"));
        }
        if self.font.is_some() && self.font_index.is_some() {
            return Err("set either a font path or a font index, not both".into());
        }
        parse_color(&self.color).map_err(|e| e.to_string())?;
        if let Some(tc) = &self.text_color {
            parse_color(tc).map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    /// Build engine options from this configuration.
    pub fn to_options(&self) -> anyhow::Result<StampOptions> {
        self.validate().map_err(|e| anyhow::anyhow!(e))?;

        let color = parse_color(&self.color)?;
        let text_color = match &self.text_color {
            Some(tc) => parse_color(tc)?,
            None => color,
        };

        Ok(StampOptions::new()
            .with_size(self.size)
            .with_color(color)
            .with_text_color(text_color)
            .with_ring_width(self.width)
            .with_margin(self.margin)
            .with_font_size(self.font_size)
            .with_threshold(self.threshold))
    }

    pub fn font_source(&self) -> FontSource {
        match (&self.font, self.font_index) {
            (Some(path), _) => FontSource::Path(path.clone()),
            (None, Some(index)) => FontSource::SystemIndex(index),
            (None, None) => FontSource::Default,
        }
    }
}

fn parse_opt<T: std::str::FromStr>(s: &str, key: &str) -> Option<T> {
    match s.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = s, "Ignoring unparseable environment value");
            None
        }
    }
}

fn parse_or<T: std::str::FromStr>(s: &str, key: &str, default: T) -> T {
    parse_opt(s, key).unwrap_or(default)
}
