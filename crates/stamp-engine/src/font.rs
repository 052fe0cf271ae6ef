//! System font discovery and loading.
//!
//! Fonts can be picked by path, by position in the sorted system font
//! list (the "font index"), or from a short list of well-known defaults.
//!
//! # Search Paths
//! 1. Platform font directories (`/usr/share/fonts`, `C:\Windows\Fonts`, ...)
//! 2. User font directories (`~/.fonts`, `~/.local/share/fonts`, `~/Library/Fonts`)
//! 3. `STAMP_FONT_PATH` environment variable (path-list separated)

use std::path::{Path, PathBuf};

use ab_glyph::FontVec;
use tracing::{debug, info, warn};

use crate::{Result, StampError};

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc", "otc"];

/// Directory nesting followed when scanning font directories.
const MAX_SCAN_DEPTH: usize = 6;

/// How a stamp's font is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FontSource {
    /// A font file on disk.
    Path(PathBuf),
    /// Position in [`FontCatalog::system`].
    SystemIndex(usize),
    /// First usable font from a platform candidate list.
    #[default]
    Default,
}

/// A font file found on the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontEntry {
    pub path: PathBuf,
}

impl FontEntry {
    /// File name without directories, for listings.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Sorted list of installed font files.
#[derive(Debug, Clone, Default)]
pub struct FontCatalog {
    entries: Vec<FontEntry>,
}

impl FontCatalog {
    /// Scan the platform's font directories.
    pub fn system() -> Self {
        Self::from_dirs(&system_font_dirs())
    }

    /// Scan the given directories (recursively) for font files.
    pub fn from_dirs(dirs: &[PathBuf]) -> Self {
        let mut entries = Vec::new();
        for dir in dirs {
            if !dir.is_dir() {
                continue;
            }
            collect_fonts(dir, 0, &mut entries);
        }

        // Sort by path for a stable index across runs
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries.dedup();
        debug!(count = entries.len(), "Scanned font directories");
        Self { entries }
    }

    pub fn entries(&self) -> &[FontEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a font by its index in the sorted list.
    pub fn get(&self, index: usize) -> Result<&FontEntry> {
        self.entries
            .get(index)
            .ok_or(StampError::FontIndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }
}

fn collect_fonts(dir: &Path, depth: usize, out: &mut Vec<FontEntry>) {
    if depth > MAX_SCAN_DEPTH {
        return;
    }
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), "Skipping unreadable font directory: {e}");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_fonts(&path, depth + 1, out);
        } else if is_font_file(&path) {
            out.push(FontEntry { path });
        }
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| FONT_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Directories searched by [`FontCatalog::system`].
pub fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs_list: Vec<PathBuf> = Vec::new();

    #[cfg(target_os = "macos")]
    {
        dirs_list.push(PathBuf::from("/System/Library/Fonts"));
        dirs_list.push(PathBuf::from("/Library/Fonts"));
        if let Some(home) = dirs::home_dir() {
            dirs_list.push(home.join("Library/Fonts"));
        }
    }
    #[cfg(target_os = "windows")]
    {
        let windir = std::env::var("WINDIR").unwrap_or_else(|_| "C:\\Windows".into());
        dirs_list.push(PathBuf::from(windir).join("Fonts"));
        if let Some(local) = dirs::data_local_dir() {
            dirs_list.push(local.join("Microsoft\\Windows\\Fonts"));
        }
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        dirs_list.push(PathBuf::from("/usr/share/fonts"));
        dirs_list.push(PathBuf::from("/usr/local/share/fonts"));
        if let Some(home) = dirs::home_dir() {
            dirs_list.push(home.join(".fonts"));
        }
        if let Some(data) = dirs::data_dir() {
            dirs_list.push(data.join("fonts"));
        }
    }

    if let Some(custom) = std::env::var_os("STAMP_FONT_PATH") {
        dirs_list.extend(std::env::split_paths(&custom).filter(|p| !p.as_os_str().is_empty()));
    }

    dirs_list
}

/// Well-known fonts tried, in order, for [`FontSource::Default`].
///
/// CJK-capable faces come first since stamps are usually names in kanji.
fn default_font_candidates() -> &'static [&'static str] {
    #[cfg(target_os = "macos")]
    {
        &[
            "/System/Library/Fonts/Hiragino Sans GB.ttc",
            "/System/Library/Fonts/Supplemental/Songti.ttc",
            "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
            "/System/Library/Fonts/Helvetica.ttc",
        ]
    }
    #[cfg(target_os = "windows")]
    {
        &[
            "C:\\Windows\\Fonts\\msmincho.ttc",
            "C:\\Windows\\Fonts\\YuGothM.ttc",
            "C:\\Windows\\Fonts\\msgothic.ttc",
            "C:\\Windows\\Fonts\\arial.ttf",
        ]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        &[
            "/usr/share/fonts/opentype/noto/NotoSerifCJK-Regular.ttc",
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        ]
    }
}

/// Load a font file. Collections (`.ttc`) load their first face.
pub fn load_font(path: &Path) -> Result<FontVec> {
    let data = std::fs::read(path)?;
    FontVec::try_from_vec(data).map_err(|_| StampError::FontParse)
}

/// Resolve a [`FontSource`] to a parsed font.
pub fn resolve_font(source: &FontSource) -> Result<FontVec> {
    match source {
        FontSource::Path(path) => {
            info!(path = %path.display(), "Using font file");
            load_font(path)
        }
        FontSource::SystemIndex(index) => {
            let catalog = FontCatalog::system();
            let entry = catalog.get(*index)?;
            info!(index, path = %entry.path.display(), "Using system font");
            load_font(&entry.path)
        }
        FontSource::Default => load_default_font(),
    }
}

fn load_default_font() -> Result<FontVec> {
    for path in default_font_candidates() {
        let path = Path::new(path);
        if !path.is_file() {
            continue;
        }
        match load_font(path) {
            Ok(font) => {
                info!(path = %path.display(), "Using default font");
                return Ok(font);
            }
            Err(e) => warn!(path = %path.display(), "Failed to load font: {e}"),
        }
    }

    // Any installed font is better than none
    for entry in FontCatalog::system().entries() {
        if let Ok(font) = load_font(&entry.path) {
            info!(path = %entry.path.display(), "Using first loadable system font");
            return Ok(font);
        }
    }

    Err(StampError::NoFont)
}
