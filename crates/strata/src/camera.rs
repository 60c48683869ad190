//! # Camera
//!
//! Pure viewport math: a follow camera clamped to the map, plus the
//! world/screen transforms hosts and cursor targeting need. The
//! camera also defines the world-space view rectangle used to cull
//! drops, which is why it lives in the core rather than the host.

use strata_core::{Aabb, Vec2};

/// A clamped follow camera.
///
/// `offset` is the translation from world space to screen space:
/// `screen = world + offset`. It is always non-positive, because the
/// viewport never scrolls past the map's edges.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    /// Viewport size in world pixels.
    view: Vec2,
    /// Map size in world pixels.
    world: Vec2,
    /// Current world-to-screen translation.
    offset: Vec2,
}

impl Camera {
    /// Creates a camera for a viewport over a map.
    ///
    /// A viewport larger than the map pins to the map origin.
    #[must_use]
    pub const fn new(view: Vec2, world: Vec2) -> Self {
        Self {
            view,
            world,
            offset: Vec2::ZERO,
        }
    }

    /// Centers the viewport on a target point, clamped to map bounds.
    pub fn follow(&mut self, target: Vec2) {
        let lower_x = -(self.world.x - self.view.x).max(0.0);
        let lower_y = -(self.world.y - self.view.y).max(0.0);
        self.offset = Vec2::new(
            (self.view.x * 0.5 - target.x).clamp(lower_x, 0.0),
            (self.view.y * 0.5 - target.y).clamp(lower_y, 0.0),
        );
    }

    /// World-to-screen transform for a point.
    #[must_use]
    pub fn world_to_screen(&self, point: Vec2) -> Vec2 {
        point + self.offset
    }

    /// Screen-to-world transform for a point (cursor targeting).
    #[must_use]
    pub fn screen_to_world(&self, point: Vec2) -> Vec2 {
        point - self.offset
    }

    /// World-to-screen transform for a box.
    #[must_use]
    pub fn world_to_screen_rect(&self, rect: &Aabb) -> Aabb {
        rect.translated(self.offset)
    }

    /// The world-space rectangle currently visible.
    #[must_use]
    pub fn view_rect(&self) -> Aabb {
        Aabb::from_min_size(self.offset * -1.0, self.view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        // 400x300 viewport over a 6720x1920 map
        Camera::new(Vec2::new(400.0, 300.0), Vec2::new(6720.0, 1920.0))
    }

    #[test]
    fn test_follow_centers_on_target() {
        let mut cam = camera();
        cam.follow(Vec2::new(1000.0, 800.0));
        let view = cam.view_rect();
        assert_eq!(view.center(), Vec2::new(1000.0, 800.0));
    }

    #[test]
    fn test_follow_clamps_at_map_edges() {
        let mut cam = camera();

        cam.follow(Vec2::new(10.0, 10.0));
        assert_eq!(cam.view_rect().min, Vec2::ZERO);

        cam.follow(Vec2::new(6700.0, 1900.0));
        let view = cam.view_rect();
        assert_eq!(view.max, Vec2::new(6720.0, 1920.0));
    }

    #[test]
    fn test_point_transforms_round_trip() {
        let mut cam = camera();
        cam.follow(Vec2::new(1000.0, 800.0));
        let world = Vec2::new(950.0, 820.0);
        let screen = cam.world_to_screen(world);
        assert_eq!(cam.screen_to_world(screen), world);
        // Centered target lands mid-screen
        assert_eq!(
            cam.world_to_screen(Vec2::new(1000.0, 800.0)),
            Vec2::new(200.0, 150.0)
        );
    }

    #[test]
    fn test_rect_transform_follows_offset() {
        let mut cam = camera();
        cam.follow(Vec2::new(1000.0, 800.0));
        let rect = Aabb::from_min_size(Vec2::new(1000.0, 800.0), Vec2::new(16.0, 16.0));
        let on_screen = cam.world_to_screen_rect(&rect);
        assert_eq!(on_screen.min, Vec2::new(200.0, 150.0));
    }
}
