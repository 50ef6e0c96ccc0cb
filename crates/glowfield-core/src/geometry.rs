//! Points and sizes in logical surface coordinates.

/// A point in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation towards `other`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Point> for kurbo::Point {
    fn from(p: Point) -> Self {
        kurbo::Point::new(p.x, p.y)
    }
}

/// Width and height in logical pixels. Never negative, never NaN.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    /// Create a size, clamping negative or non-finite dimensions to zero.
    pub fn new(width: f64, height: f64) -> Self {
        let clamp = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self {
            width: clamp(width),
            height: clamp(height),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// True if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Scale both dimensions.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_clamps_malformed_dimensions() {
        let size = Size::new(-3.0, f64::NAN);
        assert_eq!(size.width(), 0.0);
        assert_eq!(size.height(), 0.0);
        assert!(size.is_empty());
        assert_eq!(Size::new(f64::INFINITY, 10.0).width(), 0.0);
    }

    #[test]
    fn test_point_helpers() {
        let a = Point::new(50.0, 150.0);
        let b = Point::new(100.0, 80.0);
        assert_eq!(a.midpoint(b), Point::new(75.0, 115.0));
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(kurbo::Point::from(a), kurbo::Point::new(50.0, 150.0));
    }
}
