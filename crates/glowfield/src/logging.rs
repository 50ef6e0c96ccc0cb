//! Log setup. The terminal belongs to the UI, so logs go to a file.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use glowfield_config::Config;
use tracing::Level;

/// Install a file logger. Returns the log path, or `None` if logging is
/// unavailable (no writable location, or a subscriber is already set).
pub fn init(config: &Config) -> Option<PathBuf> {
    let path = config.log_path()?;
    let level = config.log_level.parse::<Level>().unwrap_or(Level::INFO);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .ok()?;
    Some(path)
}
