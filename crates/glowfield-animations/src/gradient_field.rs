//! Ambient gradient field ("nebula").
//!
//! A handful of large, faint radial glows drift slowly across the viewport,
//! pulse in size, and bounce off the edges. Each glow is painted over the
//! whole surface, so overlapping glows build up through alpha blending.

use glowfield_canvas::Canvas;
use glowfield_core::{Point, Rgba, Size};
use rand::Rng;

use crate::Animation;
use crate::palette::{NEBULA_BACKDROP, VIGNETTE};
use crate::uniform;

/// Number of glows in the field.
pub const POINT_COUNT: usize = 8;
/// Global time advance per frame.
pub const TIME_STEP: f64 = 0.005;
/// Amplitude of the sinusoidal drift added to every glow each frame.
pub const DRIFT_AMPLITUDE: f64 = 0.05;
/// Lower bound of the pulsing size multiplier.
pub const SIZE_MIN: f64 = 0.8;
/// Upper bound of the pulsing size multiplier.
pub const SIZE_MAX: f64 = 1.2;

const RADIUS_RANGE: (f64, f64) = (200.0, 500.0);
const VELOCITY_LIMIT: f64 = 0.04;
const HUE_RANGE: (f64, f64) = (240.0, 300.0);
const PULSE_SPEED_RANGE: (f64, f64) = (0.002, 0.007);
const INITIAL_SIZE_RANGE: (f64, f64) = (0.8, 1.1);

const SATURATION: f32 = 0.8;
const LIGHTNESS: f32 = 0.6;
const CENTER_ALPHA: f32 = 0.08;

/// One glow of the field.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientPoint {
    pub x: f64,
    pub y: f64,
    /// Pixels per frame.
    pub x_velocity: f64,
    /// Pixels per frame.
    pub y_velocity: f64,
    /// Base radius before the pulse multiplier.
    pub radius: f64,
    /// Pulse multiplier, kept within [`SIZE_MIN`, `SIZE_MAX`].
    pub size: f64,
    pub pulse_speed: f64,
    /// `1.0` while growing, `-1.0` while shrinking.
    pub pulse_direction: f64,
    /// Degrees, in `240.0..300.0` (blue to purple).
    pub hue: f64,
}

impl GradientPoint {
    /// A glow with random placement and motion inside `viewport`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, viewport: Size) -> Self {
        Self {
            x: uniform(rng, 0.0, viewport.width()),
            y: uniform(rng, 0.0, viewport.height()),
            x_velocity: rng.gen_range(-VELOCITY_LIMIT..=VELOCITY_LIMIT),
            y_velocity: rng.gen_range(-VELOCITY_LIMIT..=VELOCITY_LIMIT),
            radius: rng.gen_range(RADIUS_RANGE.0..=RADIUS_RANGE.1),
            size: uniform(rng, INITIAL_SIZE_RANGE.0, INITIAL_SIZE_RANGE.1),
            pulse_speed: uniform(rng, PULSE_SPEED_RANGE.0, PULSE_SPEED_RANGE.1),
            pulse_direction: 1.0,
            hue: uniform(rng, HUE_RANGE.0, HUE_RANGE.1),
        }
    }

    /// Radius the glow is drawn with this frame.
    pub fn current_radius(&self) -> f64 {
        self.radius * self.size
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Color at the center of the glow; it fades to transparent at the rim.
    pub fn color(&self) -> Rgba {
        Rgba::hsla(self.hue as f32, SATURATION, LIGHTNESS, CENTER_ALPHA)
    }

    fn step(&mut self, drift: (f64, f64), bounds: Size) {
        self.x += self.x_velocity + drift.0;
        self.y += self.y_velocity + drift.1;

        self.size += self.pulse_speed * self.pulse_direction;
        if self.size > SIZE_MAX {
            self.size = SIZE_MAX;
            self.pulse_direction = -1.0;
        } else if self.size < SIZE_MIN {
            self.size = SIZE_MIN;
            self.pulse_direction = 1.0;
        }

        bounce(&mut self.x, &mut self.x_velocity, bounds.width());
        bounce(&mut self.y, &mut self.y_velocity, bounds.height());
    }
}

/// Reflect `velocity` and pin `position` to the edge it crossed.
fn bounce(position: &mut f64, velocity: &mut f64, extent: f64) {
    if *position < 0.0 {
        *position = 0.0;
        *velocity = -*velocity;
    } else if *position > extent {
        *position = extent;
        *velocity = -*velocity;
    }
}

/// The nebula animation state.
#[derive(Debug, Clone)]
pub struct GradientField {
    points: Vec<GradientPoint>,
    time: f64,
    vignette: bool,
}

impl GradientField {
    /// Scatter [`POINT_COUNT`] glows over `viewport`.
    pub fn new<R: Rng + ?Sized>(rng: &mut R, viewport: Size) -> Self {
        let points = (0..POINT_COUNT)
            .map(|_| GradientPoint::random(rng, viewport))
            .collect();
        Self::from_points(points)
    }

    /// Build a field from explicit glows.
    pub fn from_points(points: Vec<GradientPoint>) -> Self {
        Self {
            points,
            time: 0.0,
            vignette: true,
        }
    }

    pub fn points(&self) -> &[GradientPoint] {
        &self.points
    }

    /// Accumulated animation time.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn vignette(&self) -> bool {
        self.vignette
    }

    /// Toggle the darkening overlay at the bottom of the field.
    pub fn set_vignette(&mut self, vignette: bool) {
        self.vignette = vignette;
    }
}

impl Animation for GradientField {
    fn name(&self) -> &'static str {
        "nebula"
    }

    fn update(&mut self, bounds: Size) {
        self.time += TIME_STEP;
        let drift = (
            self.time.sin() * DRIFT_AMPLITUDE,
            (self.time * 0.8).cos() * DRIFT_AMPLITUDE,
        );
        for point in &mut self.points {
            point.step(drift, bounds);
        }
    }

    fn render(&self, canvas: &mut Canvas) {
        canvas.fill(NEBULA_BACKDROP);

        for point in &self.points {
            let color = point.color();
            canvas.fill_radial_gradient(
                point.center(),
                point.current_radius(),
                &[(0.0, color), (1.0, color.with_alpha(0.0))],
            );
        }

        if self.vignette {
            canvas.fill_vertical_gradient(&VIGNETTE);
        }
    }

    fn tracks_viewport(&self) -> bool {
        true
    }
}
