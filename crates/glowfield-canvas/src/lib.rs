//! Drawing surface for glowfield backdrops.
//!
//! Wraps a `vello_cpu` render context in a small 2D canvas (fills, radial
//! and linear gradients, circles, stroked paths) with a logical coordinate
//! space, and provides a ratatui widget that shows a canvas with half-block
//! characters.

mod canvas;
mod view;

pub use canvas::{Canvas, CanvasError, ColorStops, MAX_RASTER_PIXELS};
pub use view::{CanvasView, raster_for};
