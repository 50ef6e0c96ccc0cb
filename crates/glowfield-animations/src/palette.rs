//! Color constants for the backdrops.

use glowfield_core::Rgba;

/// Backdrop behind the nebula glows (`#0a0a0f`).
pub const NEBULA_BACKDROP: Rgba = Rgba::new(10.0 / 255.0, 10.0 / 255.0, 15.0 / 255.0, 1.0);

/// Bottom-darkening overlay drawn over the nebula.
pub const VIGNETTE: [(f32, Rgba); 3] = [
    (0.0, Rgba::TRANSPARENT),
    (0.5, Rgba::TRANSPARENT),
    (1.0, Rgba::new(0.0, 0.0, 0.0, 0.3)),
];

/// Backdrop behind the flow tube, slightly translucent.
pub const FLOW_BACKDROP: Rgba = Rgba::new(10.0 / 255.0, 10.0 / 255.0, 15.0 / 255.0, 0.95);

/// Outer casing of the tube.
pub const TUBE_CASING: Rgba = Rgba::new(20.0 / 255.0, 20.0 / 255.0, 30.0 / 255.0, 0.7);

/// Inner bore of the tube.
pub const TUBE_BORE: Rgba = Rgba::new(10.0 / 255.0, 10.0 / 255.0, 15.0 / 255.0, 0.5);

/// Particle colors: cyan, light blue, violet, sky blue, royal blue.
pub const PARTICLE_COLORS: [Rgba; 5] = [
    Rgba::new(0.0, 1.0, 1.0, 0.8),
    Rgba::new(80.0 / 255.0, 200.0 / 255.0, 1.0, 0.8),
    Rgba::new(138.0 / 255.0, 43.0 / 255.0, 226.0 / 255.0, 0.7),
    Rgba::new(0.0, 191.0 / 255.0, 1.0, 0.8),
    Rgba::new(30.0 / 255.0, 144.0 / 255.0, 1.0, 0.7),
];

/// Alpha of a particle's outer glow.
pub const GLOW_ALPHA: f32 = 0.3;
