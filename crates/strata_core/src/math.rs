//! Mathematical types shared by the simulation and the render boundary.
//!
//! These are the canonical representations handed to hosts; both are
//! plain-old-data so a renderer can upload them without conversion.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 2D Vector - position, velocity, acceleration
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// Creates a new Vec2
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 2]) -> Self {
        Self::new(arr[0], arr[1])
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Distance squared (avoids sqrt)
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f32 {
        (self - other).length_squared()
    }

    /// Unit vector in the same direction, or zero for a (near-)zero vector
    #[must_use]
    pub fn normalized_or_zero(self) -> Self {
        let len = self.length();
        if len <= f32::EPSILON {
            Self::ZERO
        } else {
            Self::new(self.x / len, self.y / len)
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned bounding box in world pixels.
///
/// `min` is the top-left corner, `max` the bottom-right; y grows downward
/// as in screen space. An edge touching another edge does NOT overlap,
/// which keeps tile-aligned bodies from colliding with their own floor.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Aabb {
    /// Creates an AABB from explicit corners
    #[must_use]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Creates an AABB from a top-left corner and a size
    #[must_use]
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self::new(min, min + size)
    }

    /// Creates an AABB centered on a point
    #[must_use]
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center - size * 0.5, center + size * 0.5)
    }

    /// Creates the AABB covering one tile cell
    #[must_use]
    pub fn from_tile(tx: usize, ty: usize, tile_size: f32) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let min = Vec2::new(tx as f32 * tile_size, ty as f32 * tile_size);
        Self::from_min_size(min, Vec2::new(tile_size, tile_size))
    }

    /// Width of the box
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height of the box
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Center point
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    /// Strict overlap test (shared edges do not count)
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Whether a point lies inside (min-inclusive, max-exclusive)
    #[must_use]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// The same box shifted by a delta
    #[must_use]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.min + delta, self.max + delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_operations() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 6.0);

        let sum = a + b;
        assert_eq!(sum.x, 5.0);
        assert_eq!(sum.y, 8.0);

        let dot = a.dot(b);
        assert_eq!(dot, 16.0); // 1*4 + 2*6

        assert_eq!(b.distance_squared(a), 25.0);
    }

    #[test]
    fn test_vec2_normalize() {
        let v = Vec2::new(3.0, 4.0);
        let n = v.normalized_or_zero();
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert_eq!(Vec2::ZERO.normalized_or_zero(), Vec2::ZERO);
    }

    #[test]
    fn test_vec2_bytemuck() {
        let v = Vec2::new(1.0, 2.0);
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 8); // 2 * 4 bytes
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::from_min_size(Vec2::new(0.0, 0.0), Vec2::new(16.0, 16.0));
        let b = Aabb::from_min_size(Vec2::new(8.0, 8.0), Vec2::new(16.0, 16.0));
        let c = Aabb::from_min_size(Vec2::new(16.0, 0.0), Vec2::new(16.0, 16.0));

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // Shared edge is not an overlap
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_aabb_from_tile() {
        let t = Aabb::from_tile(2, 3, 16.0);
        assert_eq!(t.min, Vec2::new(32.0, 48.0));
        assert_eq!(t.max, Vec2::new(48.0, 64.0));
        assert_eq!(t.center(), Vec2::new(40.0, 56.0));
    }

    #[test]
    fn test_aabb_contains_point() {
        let a = Aabb::from_min_size(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(a.contains_point(Vec2::new(0.0, 0.0)));
        assert!(a.contains_point(Vec2::new(9.9, 9.9)));
        assert!(!a.contains_point(Vec2::new(10.0, 5.0)));
    }
}
