//! Configuration for glowfield.
//!
//! Settings live in `config.toml` inside the platform configuration
//! directory. A missing file yields the defaults; unknown keys are ignored
//! and missing keys fall back to their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use glowfield_core::{AnimationSpeed, BackdropStyle};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "glowfield.log";

/// Errors raised while loading or saving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a configuration directory for this platform")]
    NoConfigDir,
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize configuration")]
    Serialize(#[from] toml::ser::Error),
}

/// User settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backdrop shown at startup.
    pub style: BackdropStyle,
    /// Frame pacing.
    pub speed: AnimationSpeed,
    /// Fixed random seed; random on every start when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Logical nebula pixels per terminal half-cell.
    pub pixel_scale: f64,
    /// Darken the bottom of the nebula.
    pub vignette: bool,
    /// Show the key help line.
    pub show_help: bool,
    /// Log verbosity: error, warn, info, debug or trace.
    pub log_level: String,
    /// Log file; defaults to the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            style: BackdropStyle::default(),
            speed: AnimationSpeed::default(),
            seed: None,
            pixel_scale: 8.0,
            vignette: true,
            show_help: true,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load from `path`, returning defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "config loaded");
        Ok(config.sanitized())
    }

    /// Write to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Log file to use: the configured one, or the platform default.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(default_log_path)
    }

    /// Replace out-of-range values with defaults.
    fn sanitized(mut self) -> Self {
        if !(self.pixel_scale.is_finite() && self.pixel_scale > 0.0) {
            self.pixel_scale = Self::default().pixel_scale;
        }
        self
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "glowfield")
}

/// `config.toml` in the platform configuration directory.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    project_dirs()
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
        .ok_or(ConfigError::NoConfigDir)
}

/// `glowfield.log` in the platform local data directory.
pub fn default_log_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_local_dir().join(LOG_FILE))
}
