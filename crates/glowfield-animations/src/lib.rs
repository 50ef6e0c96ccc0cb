//! Backdrop animations for glowfield.
//!
//! Two decorative animations are provided: an ambient field of drifting
//! radial glows ([`GradientField`]) and particles flowing around a closed
//! tube ([`CurveFlow`]). Both advance a fixed step per frame and redraw
//! their whole surface every frame. [`Mount`] ties an animation to its
//! surface and [`BackdropState`] composes them for the terminal host.

mod curve_flow;
mod gradient_field;
mod mount;
mod palette;
mod state;

use glowfield_canvas::Canvas;
use glowfield_core::Size;
use rand::Rng;

pub use curve_flow::{
    CurveDefinition, CurveError, CurveFlow, PARTICLE_COUNT, Particle, REFERENCE_ANCHORS,
    REFERENCE_RADIUS, SURFACE_SIZE, surface_size, wrap_progress,
};
pub use gradient_field::{GradientField, GradientPoint, POINT_COUNT, SIZE_MAX, SIZE_MIN};
pub use mount::Mount;
pub use palette::PARTICLE_COLORS;
pub use state::{BackdropOptions, BackdropState, fit_flow};

/// A per-frame animation drawing onto a [`Canvas`].
pub trait Animation {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Advance one frame. `bounds` is the surface's logical size, read fresh
    /// every frame so viewport changes apply on the next update.
    fn update(&mut self, bounds: Size);

    /// Draw the current state, replacing the previous contents.
    fn render(&self, canvas: &mut Canvas);

    /// Whether the surface follows the host viewport. Fixed-size
    /// animations keep their logical size when the host resizes.
    fn tracks_viewport(&self) -> bool {
        false
    }
}

/// Uniform sample from `[lo, hi)`, or `lo` when the range is empty.
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo { rng.gen_range(lo..hi) } else { lo }
}
