//! Core types for the glowfield backdrop renderer.

mod color;
mod geometry;
mod style;

pub use color::{Rgba, hsl_to_rgb};
pub use geometry::{Point, Size};
pub use style::{AnimationSpeed, BackdropStyle};
