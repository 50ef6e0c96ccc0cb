//! Particle flow along a closed tube ("flow").
//!
//! The tube is drawn as a rounded loop through a fixed set of anchors, while
//! particles move along straight segments between the same anchors. The two
//! paths only roughly coincide; the particles stay inside the tube well
//! enough for decoration.

use glowfield_canvas::Canvas;
use glowfield_core::{Point, Rgba, Size};
use kurbo::BezPath;
use rand::Rng;
use thiserror::Error;

use crate::Animation;
use crate::palette::{FLOW_BACKDROP, GLOW_ALPHA, PARTICLE_COLORS, TUBE_BORE, TUBE_CASING};
use crate::uniform;

/// Number of particles in the flow.
pub const PARTICLE_COUNT: usize = 100;
/// Fixed logical size of the flow surface.
pub const SURFACE_SIZE: (f64, f64) = (500.0, 300.0);

/// Anchors of the reference loop, in surface coordinates.
pub const REFERENCE_ANCHORS: [Point; 9] = [
    Point::new(50.0, 150.0),
    Point::new(100.0, 80.0),
    Point::new(200.0, 50.0),
    Point::new(300.0, 80.0),
    Point::new(400.0, 150.0),
    Point::new(450.0, 220.0),
    Point::new(350.0, 250.0),
    Point::new(250.0, 220.0),
    Point::new(150.0, 250.0),
];
/// Tube radius of the reference loop.
pub const REFERENCE_RADIUS: f64 = 15.0;

const SPEED_RANGE: (f64, f64) = (0.0005, 0.0015);
const SIZE_RANGE: (f64, f64) = (3.0, 7.0);
const BORE_WIDTH_RATIO: f64 = 0.9;
const GLOW_SCALE: f64 = 1.5;

/// Errors in a curve definition.
#[derive(Debug, Error, PartialEq)]
pub enum CurveError {
    #[error("a closed curve needs at least 2 anchors, got {0}")]
    TooFewAnchors(usize),
    #[error("anchor {0} has a non-finite coordinate")]
    NonFiniteAnchor(usize),
    #[error("tube radius must be finite and non-negative, got {0}")]
    InvalidRadius(f64),
}

/// The surface size the flow is drawn at.
pub fn surface_size() -> Size {
    Size::new(SURFACE_SIZE.0, SURFACE_SIZE.1)
}

/// Wrap a progress value into `[0, 1)`.
pub fn wrap_progress(progress: f64) -> f64 {
    let wrapped = progress.rem_euclid(1.0);
    // rem_euclid rounds tiny negative inputs up to exactly 1.0.
    if wrapped.is_finite() && wrapped < 1.0 {
        wrapped
    } else {
        0.0
    }
}

/// A closed loop through a fixed sequence of anchors.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveDefinition {
    anchors: Vec<Point>,
    radius: f64,
}

impl CurveDefinition {
    pub fn new(anchors: Vec<Point>, radius: f64) -> Result<Self, CurveError> {
        if anchors.len() < 2 {
            return Err(CurveError::TooFewAnchors(anchors.len()));
        }
        if let Some(index) = anchors.iter().position(|p| !p.is_finite()) {
            return Err(CurveError::NonFiniteAnchor(index));
        }
        if !radius.is_finite() || radius < 0.0 {
            return Err(CurveError::InvalidRadius(radius));
        }
        Ok(Self { anchors, radius })
    }

    /// The nine-anchor loop drawn on the default surface.
    pub fn reference() -> Self {
        Self {
            anchors: REFERENCE_ANCHORS.to_vec(),
            radius: REFERENCE_RADIUS,
        }
    }

    pub fn anchors(&self) -> &[Point] {
        &self.anchors
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Segment index and fraction within that segment for progress `t`.
    ///
    /// The loop is split into one equal share of `t` per anchor; segment `i`
    /// runs from anchor `i` to anchor `i + 1`, the last one back to anchor 0.
    pub fn segment_at(&self, t: f64) -> (usize, f64) {
        let n = self.anchors.len();
        let scaled = wrap_progress(t) * n as f64;
        let index = (scaled.floor() as usize).min(n - 1);
        let local = (scaled - index as f64).clamp(0.0, 1.0);
        (index, local)
    }

    /// Point at progress `t` (taken modulo 1) along the straight segments.
    pub fn position_at(&self, t: f64) -> Point {
        let (index, local) = self.segment_at(t);
        let from = self.anchors[index];
        let to = self.anchors[(index + 1) % self.anchors.len()];
        from.lerp(to, local)
    }

    /// Rounded outline of the loop: every anchor acts as the control point of
    /// a quadratic curve ending halfway to the next anchor.
    pub fn smoothed_path(&self) -> BezPath {
        let anchors = &self.anchors;
        let first = anchors[0];
        let last = anchors[anchors.len() - 1];

        let mut path = BezPath::new();
        path.move_to(first);
        for pair in anchors.windows(2) {
            path.quad_to(pair[0], pair[0].midpoint(pair[1]));
        }
        path.quad_to(last, first);
        path.close_path();
        path
    }
}

/// A particle travelling along the loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position along the loop in `[0, 1)`.
    pub progress: f64,
    /// Progress added per frame.
    pub speed: f64,
    /// Core radius in surface pixels.
    pub size: f64,
    pub color: Rgba,
}

impl Particle {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            progress: uniform(rng, 0.0, 1.0),
            speed: uniform(rng, SPEED_RANGE.0, SPEED_RANGE.1),
            size: uniform(rng, SIZE_RANGE.0, SIZE_RANGE.1),
            color: PARTICLE_COLORS[rng.gen_range(0..PARTICLE_COLORS.len())],
        }
    }

    /// Move one frame forward, wrapping past the end of the loop.
    pub fn advance(&mut self) {
        self.progress = wrap_progress(self.progress + self.speed);
    }
}

/// The flow animation state.
#[derive(Debug, Clone)]
pub struct CurveFlow {
    curve: CurveDefinition,
    tube: BezPath,
    particles: Vec<Particle>,
}

impl CurveFlow {
    /// The reference loop with [`PARTICLE_COUNT`] random particles.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let particles = (0..PARTICLE_COUNT).map(|_| Particle::random(rng)).collect();
        Self::with_particles(CurveDefinition::reference(), particles)
    }

    pub fn with_particles(curve: CurveDefinition, particles: Vec<Particle>) -> Self {
        let tube = curve.smoothed_path();
        Self {
            curve,
            tube,
            particles,
        }
    }

    pub fn curve(&self) -> &CurveDefinition {
        &self.curve
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

impl Animation for CurveFlow {
    fn name(&self) -> &'static str {
        "flow"
    }

    fn update(&mut self, _bounds: Size) {
        for particle in &mut self.particles {
            particle.advance();
        }
    }

    fn render(&self, canvas: &mut Canvas) {
        canvas.fill(FLOW_BACKDROP);

        let width = self.curve.radius() * 2.0;
        canvas.stroke(&self.tube, width, TUBE_CASING);
        canvas.stroke(&self.tube, width * BORE_WIDTH_RATIO, TUBE_BORE);

        for particle in &self.particles {
            let center = self.curve.position_at(particle.progress);
            canvas.fill_circle(center, particle.size, particle.color);
            canvas.fill_circle(
                center,
                particle.size * GLOW_SCALE,
                particle.color.with_alpha(GLOW_ALPHA),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn near(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_sampling_hits_anchors() {
        let curve = CurveDefinition::reference();
        assert_eq!(curve.position_at(0.0), Point::new(50.0, 150.0));
        assert_eq!(curve.position_at(1.0 / 9.0), Point::new(100.0, 80.0));
        assert!(near(curve.position_at(0.5 / 9.0), Point::new(75.0, 115.0)));
    }

    #[test]
    fn test_sampling_wraps_modulo_one() {
        let curve = CurveDefinition::reference();
        assert_eq!(curve.position_at(1.0), curve.position_at(0.0));
        assert!(near(curve.position_at(1.25), curve.position_at(0.25)));
        assert!(near(curve.position_at(-0.75), curve.position_at(0.25)));
    }

    #[test]
    fn test_last_segment_closes_loop() {
        let curve = CurveDefinition::reference();
        let (index, local) = curve.segment_at(8.5 / 9.0);
        assert_eq!(index, 8);
        assert!((local - 0.5).abs() < 1e-9);
        assert!(near(
            curve.position_at(8.5 / 9.0),
            Point::new(100.0, 200.0)
        ));
    }

    #[test]
    fn test_wrap_progress() {
        assert_eq!(wrap_progress(1.0), 0.0);
        assert_eq!(wrap_progress(0.25), 0.25);
        assert_eq!(wrap_progress(-1e-18), 0.0);
        assert_eq!(wrap_progress(f64::NAN), 0.0);
        assert!((wrap_progress(2.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_particle_wraps_past_end() {
        let mut particle = Particle {
            progress: 0.999,
            speed: 0.002,
            size: 4.0,
            color: PARTICLE_COLORS[0],
        };
        particle.advance();
        assert!((particle.progress - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_curve_validation() {
        assert_eq!(
            CurveDefinition::new(vec![Point::new(0.0, 0.0)], 5.0),
            Err(CurveError::TooFewAnchors(1))
        );
        assert_eq!(
            CurveDefinition::new(
                vec![Point::new(0.0, 0.0), Point::new(f64::NAN, 1.0)],
                5.0
            ),
            Err(CurveError::NonFiniteAnchor(1))
        );
        assert!(matches!(
            CurveDefinition::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)], -1.0),
            Err(CurveError::InvalidRadius(_))
        ));
        assert_eq!(
            CurveDefinition::new(REFERENCE_ANCHORS.to_vec(), REFERENCE_RADIUS),
            Ok(CurveDefinition::reference())
        );
    }

    #[test]
    fn test_smoothed_path_shape() {
        let curve = CurveDefinition::reference();
        let path = curve.smoothed_path();
        let elements = path.elements();

        assert_eq!(elements.len(), 1 + 9 + 1);
        assert_eq!(elements[0], PathEl::MoveTo((50.0, 150.0).into()));
        assert_eq!(
            elements[1],
            PathEl::QuadTo((50.0, 150.0).into(), (75.0, 115.0).into())
        );
        assert_eq!(
            elements[9],
            PathEl::QuadTo((150.0, 250.0).into(), (50.0, 150.0).into())
        );
        assert_eq!(elements[10], PathEl::ClosePath);
    }

    #[test]
    fn test_new_flow_population() {
        let mut rng = StdRng::seed_from_u64(11);
        let flow = CurveFlow::new(&mut rng);
        assert_eq!(flow.particles().len(), PARTICLE_COUNT);
        for p in flow.particles() {
            assert!((0.0..1.0).contains(&p.progress));
            assert!((0.0005..0.0015).contains(&p.speed));
            assert!((3.0..7.0).contains(&p.size));
            assert!(PARTICLE_COLORS.contains(&p.color));
        }
    }

    #[test]
    fn test_render_draws_tube_and_particles() {
        let particle = Particle {
            progress: 0.0,
            speed: 0.001,
            size: 5.0,
            color: PARTICLE_COLORS[0],
        };
        let flow = CurveFlow::with_particles(CurveDefinition::reference(), vec![particle]);
        let mut canvas = Canvas::new(surface_size(), 500, 300).unwrap();
        canvas.paint(|c| flow.render(c));

        let corner = canvas.pixel(0, 0).unwrap();
        assert!((corner.a - 0.95).abs() < 0.01);

        // The particle sits on anchor 0 and is cyan.
        let at_particle = canvas.pixel(50, 150).unwrap();
        assert!(at_particle.g > 0.5 && at_particle.b > 0.5 && at_particle.r < 0.2);

        // Away from particles the tube casing adds coverage over the backdrop.
        let on_tube = canvas.pixel(200, 60).unwrap();
        assert!(on_tube.a > corner.a);
    }

    #[test]
    fn test_update_ignores_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut a = CurveFlow::new(&mut rng);
        let mut b = a.clone();
        a.update(Size::new(0.0, 0.0));
        b.update(Size::new(1920.0, 1080.0));
        assert_eq!(a.particles(), b.particles());
        assert!(!a.tracks_viewport());
    }

    proptest! {
        #[test]
        fn prop_sample_is_convex_combination(t in 0.0f64..1.0) {
            let curve = CurveDefinition::reference();
            let anchors = curve.anchors();
            let (index, local) = curve.segment_at(t);
            prop_assert!(index < anchors.len());
            prop_assert_eq!(index, ((t * 9.0).floor() as usize).min(8));
            prop_assert!((0.0..=1.0).contains(&local));

            let a = anchors[index];
            let b = anchors[(index + 1) % anchors.len()];
            let p = curve.position_at(t);
            prop_assert!(near(p, a.lerp(b, local)));
            prop_assert!(p.x >= a.x.min(b.x) - 1e-9 && p.x <= a.x.max(b.x) + 1e-9);
            prop_assert!(p.y >= a.y.min(b.y) - 1e-9 && p.y <= a.y.max(b.y) + 1e-9);
        }

        #[test]
        fn prop_progress_stays_in_unit_interval(
            start in 0.0f64..1.0,
            speed in 0.0f64..0.5,
            frames in 1usize..2000,
        ) {
            let mut particle = Particle {
                progress: start,
                speed,
                size: 3.0,
                color: PARTICLE_COLORS[1],
            };
            for _ in 0..frames {
                particle.advance();
                prop_assert!((0.0..1.0).contains(&particle.progress));
            }
        }
    }
}
