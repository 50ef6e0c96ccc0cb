//! Command-line flags. Flags override values from the config file.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use glowfield_config::Config;
use glowfield_core::{AnimationSpeed, BackdropStyle};

#[derive(Debug, Parser)]
#[command(name = "glowfield", version, about)]
pub struct Cli {
    /// Configuration file to read instead of the default location.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backdrop to show at startup.
    #[arg(long, value_enum)]
    pub style: Option<StyleArg>,

    /// Frame pacing.
    #[arg(long, value_enum)]
    pub speed: Option<SpeedArg>,

    /// Seed for reproducible animations.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Logical nebula pixels per terminal half-cell.
    #[arg(long, value_name = "FACTOR", value_parser = parse_scale)]
    pub scale: Option<f64>,

    /// Do not darken the bottom of the nebula.
    #[arg(long)]
    pub no_vignette: bool,

    /// Write the log to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Save the effective configuration and exit.
    #[arg(long)]
    pub write_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StyleArg {
    Nebula,
    Flow,
    Composite,
    None,
}

impl From<StyleArg> for BackdropStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Nebula => BackdropStyle::Nebula,
            StyleArg::Flow => BackdropStyle::Flow,
            StyleArg::Composite => BackdropStyle::Composite,
            StyleArg::None => BackdropStyle::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SpeedArg {
    Slow,
    Medium,
    Fast,
}

impl From<SpeedArg> for AnimationSpeed {
    fn from(arg: SpeedArg) -> Self {
        match arg {
            SpeedArg::Slow => AnimationSpeed::Slow,
            SpeedArg::Medium => AnimationSpeed::Medium,
            SpeedArg::Fast => AnimationSpeed::Fast,
        }
    }
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(style) = self.style {
            config.style = style.into();
        }
        if let Some(speed) = self.speed {
            config.speed = speed.into();
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(scale) = self.scale {
            config.pixel_scale = scale;
        }
        if self.no_vignette {
            config.vignette = false;
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
    }
}

fn parse_scale(value: &str) -> Result<f64, String> {
    let scale: f64 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err("scale must be a positive number".to_string())
    }
}
