//! Math utilities and types
//!
//! Provides fundamental math types for 2D world-space bookkeeping.

use serde::{Serialize, Deserialize};

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// Axis-aligned rectangle in world coordinates
///
/// Used for viewport bounds and conservative entity bounding boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum corner of the rectangle
    pub min: Vec2,
    /// Maximum corner of the rectangle
    pub max: Vec2,
}

impl Rect {
    /// Create a new rectangle from min and max corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create a rectangle centered at a point with given half-extents
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Get the center of the rectangle
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Get the half-extents (half-size) of the rectangle
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Width along the X axis
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height along the Y axis
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Area of the rectangle (zero or negative for degenerate rectangles)
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Whether the rectangle encloses zero area
    ///
    /// A degenerate viewport must cull everything rather than nothing.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Check if this rectangle contains a point
    pub fn contains_point(&self, point: Point2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y
    }

    /// Check if this rectangle intersects another rectangle
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y
    }

    /// Return a copy grown by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Rect {
        Self {
            min: Vec2::new(self.min.x - margin, self.min.y - margin),
            max: Vec2::new(self.max.x + margin, self.max.y + margin),
        }
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Wrap an angle into the (-PI, PI] range
    pub fn wrap_angle(radians: f32) -> f32 {
        let wrapped = radians % constants::TAU;
        if wrapped > constants::PI {
            wrapped - constants::TAU
        } else if wrapped <= -constants::PI {
            wrapped + constants::TAU
        } else {
            wrapped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rect_center_and_extents() {
        let rect = Rect::new(Vec2::new(-2.0, -4.0), Vec2::new(6.0, 4.0));

        assert_relative_eq!(rect.center(), Vec2::new(2.0, 0.0));
        assert_relative_eq!(rect.half_extents(), Vec2::new(4.0, 4.0));
        assert_relative_eq!(rect.area(), 64.0);
    }

    #[test]
    fn test_rect_contains_point() {
        let rect = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));

        assert!(rect.contains_point(Point2::new(5.0, 5.0)));
        assert!(rect.contains_point(Point2::new(0.0, 10.0)));
        assert!(!rect.contains_point(Point2::new(10.1, 5.0)));
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Rect::new(Vec2::new(5.0, 5.0), Vec2::new(15.0, 15.0));
        let c = Rect::new(Vec2::new(20.0, 20.0), Vec2::new(30.0, 30.0));

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));

        // Touching edges count as intersecting
        let d = Rect::new(Vec2::new(10.0, 0.0), Vec2::new(20.0, 10.0));
        assert!(a.intersects(&d));
    }

    #[test]
    fn test_rect_expanded() {
        let rect = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let grown = rect.expanded(5.0);

        assert_relative_eq!(grown.min, Vec2::new(-5.0, -5.0));
        assert_relative_eq!(grown.max, Vec2::new(15.0, 15.0));
    }

    #[test]
    fn test_rect_degenerate() {
        let point = Rect::new(Vec2::new(3.0, 3.0), Vec2::new(3.0, 3.0));
        assert!(point.is_degenerate());

        let inverted = Rect::new(Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0));
        assert!(inverted.is_degenerate());

        let normal = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        assert!(!normal.is_degenerate());
    }

    #[test]
    fn test_wrap_angle() {
        assert_relative_eq!(utils::wrap_angle(0.0), 0.0);
        assert_relative_eq!(utils::wrap_angle(constants::TAU), 0.0);
        assert_relative_eq!(utils::wrap_angle(3.0 * constants::PI), constants::PI, epsilon = 1e-5);
        assert_relative_eq!(utils::wrap_angle(-3.0 * constants::PI), constants::PI, epsilon = 1e-5);
    }

    #[test]
    fn test_deg_rad_roundtrip() {
        assert_relative_eq!(utils::deg_to_rad(180.0), constants::PI);
        assert_relative_eq!(utils::rad_to_deg(constants::HALF_PI), 90.0);
        assert_relative_eq!(utils::rad_to_deg(utils::deg_to_rad(37.5)), 37.5, epsilon = 1e-5);
    }
}
