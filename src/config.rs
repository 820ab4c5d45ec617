// ── Configuration file ────────────────────────────────────────────────────────
//
// Reads `%APPDATA%\Halo\config.json` (or the file named by `HALO_CONFIG`).
// No `unsafe`; pure safe Rust + serde_json.  Every failure falls back to the
// built-in defaults; the window always opens.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use serde::Deserialize;

use crate::{
    error::Result,
    geometry::{Color, PixelSize},
    platform::WindowSpec,
    window::Palette,
};

// ── Format version ────────────────────────────────────────────────────────────

const CONFIG_VERSION: u32 = 1;

/// Environment variable that overrides the config file location.
const CONFIG_ENV: &str = "HALO_CONFIG";

// ── Defaults ──────────────────────────────────────────────────────────────────

pub(crate) const DEFAULT_TITLE: &str = "Window Label";
pub(crate) const DEFAULT_BACKGROUND: Color = Color::rgb(0.1, 0.1, 0.1);
pub(crate) const DEFAULT_FILL: Color = Color::rgb(1.0, 1.0, 0.0);

// ── On-disk type ──────────────────────────────────────────────────────────────

/// Root of the JSON config file.  Every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    pub(crate) version: u32,
    /// Title bar text.
    pub(crate) title: String,
    /// Initial window width at 96 DPI; `None` lets Windows choose.
    pub(crate) width: Option<u32>,
    /// Initial window height at 96 DPI; `None` lets Windows choose.
    pub(crate) height: Option<u32>,
    pub(crate) resizable: bool,
    /// Colour the client area is cleared to before the ellipse is filled.
    pub(crate) background: Color,
    /// Ellipse fill colour.
    pub(crate) fill: Color,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            title: DEFAULT_TITLE.to_owned(),
            width: None,
            height: None,
            resizable: true,
            background: DEFAULT_BACKGROUND,
            fill: DEFAULT_FILL,
        }
    }
}

impl Config {
    /// The native window creation request derived from this config.
    ///
    /// A size is only requested when both dimensions are present and non-zero.
    pub(crate) fn window_spec(&self) -> WindowSpec {
        let size = match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some(PixelSize::new(w, h)),
            _ => None,
        };
        WindowSpec {
            title: self.title.clone(),
            size,
            resizable: self.resizable,
        }
    }

    pub(crate) fn palette(&self) -> Palette {
        Palette {
            background: self.background.clamped(),
            fill: self.fill.clamped(),
        }
    }
}

// ── Path ──────────────────────────────────────────────────────────────────────

/// Return the config file path: `$HALO_CONFIG`, else
/// `%APPDATA%\Halo\config.json`.
///
/// Returns `None` if neither environment variable is set.
pub(crate) fn config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(explicit));
    }
    let appdata = std::env::var_os("APPDATA")?;
    let mut p = PathBuf::from(appdata);
    p.push("Halo");
    p.push("config.json");
    Some(p)
}

// ── Load ──────────────────────────────────────────────────────────────────────

/// Load the config from the default location, or defaults if there is none.
pub(crate) fn load() -> Config {
    match config_path() {
        Some(path) => load_from(&path),
        None => {
            debug!("no config location (APPDATA unset); using defaults");
            Config::default()
        }
    }
}

/// Load the config at `path`.
///
/// Missing file → defaults.  Unreadable file, malformed JSON or an
/// unrecognised version → defaults plus a warning.
pub(crate) fn load_from(path: &Path) -> Config {
    match read(path) {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            warn!("ignoring config file {}: {e}", path.display());
            Config::default()
        }
    }
}

fn read(path: &Path) -> Result<Option<Config>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("no config file at {}", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let config: Config = serde_json::from_slice(&data)?;
    if config.version != CONFIG_VERSION {
        warn!(
            "config file {} has version {}, expected {CONFIG_VERSION}; using defaults",
            path.display(),
            config.version
        );
        return Ok(None);
    }
    Ok(Some(config))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
