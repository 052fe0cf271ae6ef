//! `stamp`: render hanko-style stamps from the command line.

mod cli;
mod config;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stamp_engine::{FontCatalog, Stamp, font};

use crate::cli::{Cli, Command, RenderArgs};
use crate::config::StampConfig;

fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render(args) => render(&args),
        Command::Fonts => list_fonts(),
    }
}

fn render(args: &RenderArgs) -> anyhow::Result<()> {
    let mut config = StampConfig::load(args.config.as_deref())?;
    args.apply(&mut config);
    let options = config.to_options().context("invalid stamp settings")?;

    let font = font::resolve_font(&config.font_source()).context("failed to load font")?;
    let stamp = Stamp::new(&args.text, &font, options)
        .with_context(|| format!("failed to render stamp for {:?}", args.text))?;

    let output = args.output.clone().unwrap_or_else(default_output_path);
    stamp
        .save(&output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("{}", output.display());
    Ok(())
}

fn list_fonts() -> anyhow::Result<()> {
    let catalog = FontCatalog::system();
    if catalog.is_empty() {
        tracing::warn!("No fonts found in system font directories");
    }
    for (index, entry) in catalog.entries().iter().enumerate() {
        println!("{index:>4}  {}", entry.path.display());
    }
    Ok(())
}

fn default_output_path() -> PathBuf {
    let now = chrono::Local::now().format("%Y%m%d-%H%M%S");
    PathBuf::from(format!("stamp-{now}.png"))
}
