// ── Window configuration ──────────────────────────────────────────────────────
//
// Optional JSON description of the window an application wants at startup.
// No `unsafe`; pure safe Rust + serde_json.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{GlWinError, Result},
    gl::PixelFormat,
};

// ── On-disk type ──────────────────────────────────────────────────────────────

/// Everything `GlWindow::create_from_config` needs.
///
/// Every field is optional in the file; missing fields take the values from
/// `WindowConfig::default()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Client-area width in pixels.
    pub width: i32,
    /// Client-area height in pixels.
    pub height: i32,
    /// Start in exclusive fullscreen at `width`×`height`.
    pub fullscreen: bool,
    pub vsync: bool,
    pub cursor_visible: bool,
    /// Confine the cursor to the client area.
    pub cursor_locked: bool,
    pub pixel_format: PixelFormat,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "glwin".to_owned(),
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: false,
            cursor_visible: true,
            cursor_locked: false,
            pixel_format: PixelFormat::default(),
        }
    }
}

impl WindowConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let config = Self::from_json(&data)?;
        log::debug!("loaded window config from {}", path.display());
        Ok(config)
    }

    /// Write the config as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Reject sizes `create` would refuse anyway.
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(GlWinError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
