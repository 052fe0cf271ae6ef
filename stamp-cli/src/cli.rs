//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::StampConfig;

#[derive(Debug, Parser)]
#[command(name = "stamp", version, about = "Generate hanko-style circular stamps")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a stamp image
    Render(RenderArgs),
    /// List the system font index
    Fonts,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Text to stamp, stacked top to bottom
    pub text: String,

    /// Output file path (defaults to a timestamped PNG)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Edge length of the output image in pixels
    #[arg(long)]
    pub size: Option<u32>,

    /// Ring color (name or #rrggbb)
    #[arg(long)]
    pub color: Option<String>,

    /// Glyph color (defaults to the ring color)
    #[arg(long)]
    pub text_color: Option<String>,

    /// Ring stroke width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Gap between the ring and the image edge in pixels
    #[arg(long)]
    pub margin: Option<u32>,

    /// Glyph rasterization size in pixels
    #[arg(long)]
    pub font_size: Option<f32>,

    /// Alpha threshold for trimming and circle fitting
    #[arg(long)]
    pub threshold: Option<u8>,

    /// Font file
    #[arg(long, conflicts_with = "font_index")]
    pub font: Option<PathBuf>,

    /// Position in the list printed by `stamp fonts`
    #[arg(long)]
    pub font_index: Option<usize>,
}

impl RenderArgs {
    /// Overlay flags that were given on top of `config`.
    pub fn apply(&self, config: &mut StampConfig) {
        if let Some(v) = self.size {
            config.size = v;
        }
        if let Some(v) = &self.color {
            config.color = v.clone();
        }
        if let Some(v) = &self.text_color {
            config.text_color = Some(v.clone());
        }
        if let Some(v) = self.width {
            config.width = v;
        }
        if let Some(v) = self.margin {
            config.margin = v;
        }
        if let Some(v) = self.font_size {
            config.font_size = v;
        }
        if let Some(v) = self.threshold {
            config.threshold = v;
        }
        if let Some(v) = &self.font {
            config.font = Some(v.clone());
            config.font_index = None;
        }
        if let Some(v) = self.font_index {
            config.font_index = Some(v);
            config.font = None;
        }
    }
}
