//! Color type and HSL conversion shared by the canvas and the animations.

/// A straight-alpha RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Create a color from float components.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from 8-bit channels and a float alpha, like CSS `rgba()`.
    pub fn rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a.clamp(0.0, 1.0),
        )
    }

    /// Create an opaque color from a `0xRRGGBB` value.
    pub fn hex(rgb: u32) -> Self {
        Self::rgba8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 1.0)
    }

    /// Create a color from hue (degrees), saturation, lightness and alpha,
    /// like CSS `hsla()`. Saturation and lightness are fractions.
    pub fn hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        let (r, g, b) = hsl_to_rgb(h, s, l);
        Self::new(r, g, b, a.clamp(0.0, 1.0))
    }

    /// The same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Composite `self` over `dst` (Porter-Duff source-over).
    pub fn over(self, dst: Self) -> Self {
        let src_a = self.a;
        if src_a >= 1.0 {
            return self;
        }
        if src_a <= 0.0 {
            return dst;
        }
        let out_a = src_a + dst.a * (1.0 - src_a);
        if out_a <= 0.0 {
            return Self::TRANSPARENT;
        }
        let channel = |s: f32, d: f32| (s * src_a + d * dst.a * (1.0 - src_a)) / out_a;
        Self::new(
            channel(self.r, dst.r),
            channel(self.g, dst.g),
            channel(self.b, dst.b),
            out_a,
        )
    }

    /// Quantize to 8-bit RGB after flattening onto an opaque backdrop.
    pub fn to_rgb8_over(self, backdrop: Self) -> (u8, u8, u8) {
        let flat = self.over(backdrop.with_alpha(1.0));
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (q(flat.r), q(flat.g), q(flat.b))
    }
}

/// Convert HSL to RGB components in `0.0..=1.0`.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    if s == 0.0 {
        return (l, l, l);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let h = h.rem_euclid(360.0) / 360.0;

    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
