//! Host-side lifecycle of a mounted animation.

use glowfield_canvas::{Canvas, CanvasError};
use glowfield_core::Size;
use tracing::{debug, warn};

use crate::Animation;

/// An animation bound to its drawing surface.
///
/// Created at mount time with the result of acquiring a surface. A mount
/// whose surface could not be acquired is inert: it never runs a frame.
/// The surface always shows the current animation state: it is painted on
/// mount and repainted after a resize, so a paused host never shows a blank
/// surface.
/// [`Mount::unmount`] stops the animation and releases the surface; it is
/// safe to call more than once.
#[derive(Debug)]
pub struct Mount<A> {
    animation: A,
    surface: Option<Canvas>,
    frames: u64,
}

impl<A: Animation> Mount<A> {
    pub fn new(animation: A, surface: Result<Canvas, CanvasError>) -> Self {
        let surface = match surface {
            Ok(mut canvas) => {
                debug!(
                    animation = animation.name(),
                    cols = canvas.cols(),
                    rows = canvas.rows(),
                    "mounted"
                );
                canvas.paint(|c| animation.render(c));
                Some(canvas)
            }
            Err(err) => {
                warn!(animation = animation.name(), %err, "no drawing surface, animation disabled");
                None
            }
        };
        Self {
            animation,
            surface,
            frames: 0,
        }
    }

    /// Whether frames are still being produced.
    pub fn is_running(&self) -> bool {
        self.surface.is_some()
    }

    /// Run one update and render pass. Returns the freshly drawn surface, or
    /// `None` once unmounted or if no surface was ever acquired.
    pub fn frame(&mut self) -> Option<&Canvas> {
        let surface = self.surface.as_mut()?;
        self.animation.update(surface.size());
        let animation = &self.animation;
        surface.paint(|c| animation.render(c));
        self.frames += 1;
        Some(&*surface)
    }

    /// The surface as drawn by the last frame.
    pub fn surface(&self) -> Option<&Canvas> {
        self.surface.as_ref()
    }

    /// Apply a host viewport change. Animations that track the viewport get
    /// a new logical size; every animation gets the new raster resolution.
    /// A changed surface is repainted from the current state without
    /// advancing the animation.
    pub fn resize(&mut self, viewport: Size, cols: usize, rows: usize) {
        let animation = &self.animation;
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let size = if animation.tracks_viewport() {
            viewport
        } else {
            surface.size()
        };
        if size == surface.size() && (cols, rows) == (surface.cols(), surface.rows()) {
            return;
        }
        match surface.resize(size, cols, rows) {
            Ok(()) => surface.paint(|c| animation.render(c)),
            Err(err) => {
                warn!(animation = animation.name(), %err, "resize rejected, keeping previous surface");
            }
        }
    }

    /// Stop the animation and release its surface. Returns `true` if this
    /// call stopped a running animation.
    pub fn unmount(&mut self) -> bool {
        let was_running = self.surface.take().is_some();
        if was_running {
            debug!(
                animation = self.animation.name(),
                frames = self.frames,
                "unmounted"
            );
        }
        was_running
    }

    /// Number of frames produced so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn animation(&self) -> &A {
        &self.animation
    }

    pub fn animation_mut(&mut self) -> &mut A {
        &mut self.animation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CurveFlow, GradientField};
    use glowfield_canvas::MAX_RASTER_PIXELS;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn nebula_mount(width: f64, height: f64) -> Mount<GradientField> {
        let mut rng = StdRng::seed_from_u64(42);
        let viewport = Size::new(width, height);
        let field = GradientField::new(&mut rng, viewport);
        Mount::new(field, Canvas::new(viewport, 80, 60))
    }

    #[test]
    fn test_frame_runs_update_and_render() {
        let mut mount = nebula_mount(800.0, 600.0);
        assert!(mount.is_running());
        assert!(mount.frame().is_some());
        assert!(mount.frame().is_some());
        assert_eq!(mount.frames(), 2);
        assert!((mount.animation().time() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_resize_keeps_point_state() {
        let mut mount = nebula_mount(800.0, 600.0);
        mount.frame();
        let before = mount.animation().points().to_vec();

        mount.resize(Size::new(1200.0, 800.0), 120, 80);

        let surface = mount.surface().unwrap();
        assert_eq!(surface.size(), Size::new(1200.0, 800.0));
        assert_eq!((surface.cols(), surface.rows()), (120, 80));
        assert_eq!(mount.animation().points(), &before[..]);
        assert_eq!(mount.frames(), 1);
    }

    #[test]
    fn test_resize_repaints_without_advancing() {
        let mut mount = nebula_mount(800.0, 600.0);
        mount.frame();
        let time = mount.animation().time();

        mount.resize(Size::new(1200.0, 800.0), 120, 80);

        let surface = mount.surface().unwrap();
        assert!(surface.pixmap().data().iter().all(|px| px.a == 255));
        assert_eq!(mount.animation().time(), time);
        assert_eq!(mount.frames(), 1);
    }

    #[test]
    fn test_mount_paints_initial_state() {
        let mount = nebula_mount(800.0, 600.0);
        let surface = mount.surface().unwrap();
        assert!(surface.pixmap().data().iter().all(|px| px.a == 255));
        assert_eq!(mount.frames(), 0);
        assert_eq!(mount.animation().time(), 0.0);
    }

    #[test]
    fn test_resize_keeps_fixed_surface_size() {
        let mut rng = StdRng::seed_from_u64(1);
        let size = crate::surface_size();
        let mut mount = Mount::new(CurveFlow::new(&mut rng), Canvas::new(size, 50, 30));
        mount.resize(Size::new(1920.0, 1080.0), 100, 60);
        let surface = mount.surface().unwrap();
        assert_eq!(surface.size(), size);
        assert_eq!((surface.cols(), surface.rows()), (100, 60));
    }

    #[test]
    fn test_unmount_is_idempotent() {
        let mut mount = nebula_mount(800.0, 600.0);
        assert!(mount.unmount());
        assert!(!mount.unmount());
        assert!(!mount.is_running());
        assert!(mount.frame().is_none());
        assert_eq!(mount.frames(), 0);
        mount.resize(Size::new(10.0, 10.0), 1, 1);
        assert!(mount.surface().is_none());
    }

    #[test]
    fn test_missing_surface_is_inert() {
        let mut rng = StdRng::seed_from_u64(9);
        let viewport = Size::new(800.0, 600.0);
        let field = GradientField::new(&mut rng, viewport);
        let surface = Canvas::new(viewport, MAX_RASTER_PIXELS, 2);
        let mut mount = Mount::new(field, surface);

        assert!(!mount.is_running());
        assert!(mount.frame().is_none());
        assert_eq!(mount.animation().time(), 0.0);
        assert!(!mount.unmount());
    }

    #[test]
    fn test_rejected_resize_keeps_surface() {
        let mut mount = nebula_mount(800.0, 600.0);
        mount.resize(Size::new(800.0, 600.0), MAX_RASTER_PIXELS, 2);
        let surface = mount.surface().unwrap();
        assert_eq!((surface.cols(), surface.rows()), (80, 60));
    }
}
