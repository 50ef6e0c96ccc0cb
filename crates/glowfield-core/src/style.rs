//! Backdrop selection and frame pacing.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which backdrop the host shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackdropStyle {
    /// Drifting radial glows filling the viewport.
    #[default]
    Nebula,
    /// Particles flowing around a closed tube.
    Flow,
    /// Nebula fullscreen with the flow in a centered card.
    Composite,
    /// Nothing drawn.
    None,
}

impl BackdropStyle {
    /// Cycle to the next style.
    pub fn next(&self) -> Self {
        match self {
            BackdropStyle::Nebula => BackdropStyle::Flow,
            BackdropStyle::Flow => BackdropStyle::Composite,
            BackdropStyle::Composite => BackdropStyle::None,
            BackdropStyle::None => BackdropStyle::Nebula,
        }
    }

    /// Whether the ambient gradient field is shown.
    pub fn shows_nebula(&self) -> bool {
        matches!(self, BackdropStyle::Nebula | BackdropStyle::Composite)
    }

    /// Whether the particle flow is shown.
    pub fn shows_flow(&self) -> bool {
        matches!(self, BackdropStyle::Flow | BackdropStyle::Composite)
    }

    /// Human readable name for the status line.
    pub fn label(&self) -> &'static str {
        match self {
            BackdropStyle::Nebula => "nebula",
            BackdropStyle::Flow => "flow",
            BackdropStyle::Composite => "composite",
            BackdropStyle::None => "none",
        }
    }
}

/// Frame pacing. Animations advance a fixed step per frame, so a faster
/// frame rate also means faster motion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl AnimationSpeed {
    /// Cycle to the next speed.
    pub fn next(&self) -> Self {
        match self {
            AnimationSpeed::Slow => AnimationSpeed::Medium,
            AnimationSpeed::Medium => AnimationSpeed::Fast,
            AnimationSpeed::Fast => AnimationSpeed::Slow,
        }
    }

    /// Time between two scheduled frames.
    pub fn frame_interval(&self) -> Duration {
        match self {
            AnimationSpeed::Slow => Duration::from_millis(66),
            AnimationSpeed::Medium => Duration::from_millis(33),
            AnimationSpeed::Fast => Duration::from_millis(16),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnimationSpeed::Slow => "slow",
            AnimationSpeed::Medium => "medium",
            AnimationSpeed::Fast => "fast",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_cycle_visits_every_style() {
        let mut style = BackdropStyle::default();
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(style);
            style = style.next();
        }
        assert_eq!(style, BackdropStyle::Nebula);
        assert!(seen.contains(&BackdropStyle::Composite));
        assert!(seen.contains(&BackdropStyle::None));
    }

    #[test]
    fn test_composite_shows_both() {
        assert!(BackdropStyle::Composite.shows_nebula());
        assert!(BackdropStyle::Composite.shows_flow());
        assert!(!BackdropStyle::None.shows_nebula());
        assert!(!BackdropStyle::Nebula.shows_flow());
    }

    #[test]
    fn test_faster_speed_means_shorter_interval() {
        assert!(AnimationSpeed::Fast.frame_interval() < AnimationSpeed::Medium.frame_interval());
        assert!(AnimationSpeed::Medium.frame_interval() < AnimationSpeed::Slow.frame_interval());
        assert_eq!(AnimationSpeed::Fast.next(), AnimationSpeed::Slow);
    }
}
