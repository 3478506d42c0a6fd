//! Font resource discovery. Decides the `TextMode` for a document build.

use std::path::Path;

use tracing::{debug, warn};

use crate::layout::text::TextMode;

pub const REGULAR_FONT_FILE: &str = "DejaVuSans.ttf";
pub const BOLD_FONT_FILE: &str = "DejaVuSans-Bold.ttf";

/// Fonts available to one document build.
#[derive(Clone)]
pub enum FontSet {
    /// Both DejaVu TTFs were found and read.
    Unicode { regular: Vec<u8>, bold: Vec<u8> },
    /// Built-in Helvetica core fonts.
    Core,
}

impl std::fmt::Debug for FontSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontSet::Unicode { regular, bold } => f
                .debug_struct("Unicode")
                .field("regular_bytes", &regular.len())
                .field("bold_bytes", &bold.len())
                .finish(),
            FontSet::Core => f.write_str("Core"),
        }
    }
}

impl FontSet {
    /// Looks for the regular and bold TTFs in `dir`. Both must exist and be
    /// readable; anything else falls back to the core fonts without error.
    pub fn discover(dir: &Path) -> Self {
        let regular_path = dir.join(REGULAR_FONT_FILE);
        let bold_path = dir.join(BOLD_FONT_FILE);

        if !(regular_path.is_file() && bold_path.is_file()) {
            debug!("Unicode fonts not found in {}; using core fonts", dir.display());
            return FontSet::Core;
        }

        match (read_font(&regular_path), read_font(&bold_path)) {
            (Some(regular), Some(bold)) => FontSet::Unicode { regular, bold },
            _ => FontSet::Core,
        }
    }

    pub fn mode(&self) -> TextMode {
        match self {
            FontSet::Unicode { .. } => TextMode::Unicode,
            FontSet::Core => TextMode::AsciiSafe,
        }
    }
}

fn read_font(path: &Path) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) if !bytes.is_empty() => Some(bytes),
        Ok(_) => {
            warn!("Font file {} is empty; using core fonts", path.display());
            None
        }
        Err(e) => {
            warn!("Cannot read font file {}: {e}; using core fonts", path.display());
            None
        }
    }
}
