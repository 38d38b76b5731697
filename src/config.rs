//! User settings.
//!
//! Settings live in one versioned JSON file under the user's config
//! directory. Every section and field has a default, so older or partial
//! files load fine. A missing or unreadable file is never fatal: callers
//! fall back to [`AppConfig::default`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_HISTORY, scale};

/// Bumped on breaking layout changes. Files from a newer build are rejected.
pub const CONFIG_VERSION: u32 = 1;

const CONFIG_DIR: &str = "annotate-ml";
const CONFIG_FILE: &str = "annotate-ml-config.json";

/// Verbosity of the `log` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub log_level: LogLevel,
    /// Show the pixel size of the active photo next to its name.
    pub show_image_size: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            show_image_size: true,
        }
    }
}

/// Base sizes for the annotation editor, before per-photo scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Side length of a corner resize handle.
    pub handle_size: f32,
    pub line_thickness: f32,
    pub label_size: f32,
    /// Minimum creatable area, also the resize floor.
    pub min_area: f32,
    /// Undo steps kept in memory.
    pub max_history: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            handle_size: scale::HANDLE_SIZE,
            line_thickness: scale::LINE_THICKNESS,
            label_size: scale::LABEL_SIZE,
            min_area: scale::MIN_AREA,
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

/// The whole settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    pub app_name: String,
    pub preferences: UserPreferences,
    pub editor: EditorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: "Annotate ML".to_string(),
            preferences: UserPreferences::default(),
            editor: EditorConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                found: config.version,
                supported: CONFIG_VERSION,
            });
        }
        Ok(config)
    }

    pub fn default_filename() -> &'static str {
        CONFIG_FILE
    }

    /// `<config dir>/annotate-ml/annotate-ml-config.json`, with
    /// `~/.config` standing in when the platform has no config dir.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        let base = dirs::config_dir().or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;
        Some(base.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Load from [`AppConfig::default_path`]. `None` if there is no file or
    /// it cannot be used; the reason is logged.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file at {:?}", path);
            return None;
        }
        Self::load(&path)
            .inspect(|_| log::info!("Loaded configuration from {:?}", path))
            .inspect_err(|e| log::warn!("Ignoring config file {:?}: {}", path, e))
            .ok()
    }

    /// Write to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        self.save(&path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration version {found} is newer than supported version {supported}")]
    VersionTooNew { found: u32, supported: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No config directory on this platform")]
    NoConfigDir,
}
