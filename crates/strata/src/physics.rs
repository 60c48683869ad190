//! # Tile Physics
//!
//! One body record plus free functions, shared by the player, drops,
//! and falling granular blocks. Behavior differences are expressed as
//! capability flags, not types: a magnetized drop simply clears its
//! gravity flag, a falling sand block carries the same flags as the
//! player.
//!
//! ## Integration & Collision
//!
//! Per tick: gravity adds to acceleration, velocity integrates the
//! acceleration, downward speed clamps below one tile, and the
//! position advances by `vel + acc / 2`. Collision is resolved
//! per-axis against the live grid: x moves and resolves first, then y
//! with the corrected x, which avoids tunneling and diagonal-corner
//! ambiguity. Each axis resolves against the first overlapping tile
//! only, snapping the body flush to it and zeroing that axis.
//!
//! Bodies that leave the map's extended bounds (one tile of margin to
//! the sides and below, no ceiling) are reported so the caller can
//! remove them.

use strata_core::{Aabb, Vec2, WorldConfig};

use crate::world::grid::WorldGrid;

/// Velocity magnitude below which a body counts as at rest.
const REST_EPSILON_SQUARED: f32 = 1e-4;

/// Capability flags selecting which physics a body experiences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BodyCaps(u8);

impl BodyCaps {
    /// No physics at all.
    pub const NONE: Self = Self(0);
    /// Gravity accelerates the body each tick.
    pub const GRAVITY: Self = Self(1 << 0);
    /// The body collides with live grid tiles.
    pub const COLLIDE: Self = Self(1 << 1);

    /// Whether a flag is set.
    #[inline]
    #[must_use]
    pub const fn has(self, flag: Self) -> bool {
        (self.0 & flag.0) != 0
    }

    /// This set with a flag added.
    #[inline]
    #[must_use]
    pub const fn with(self, flag: Self) -> Self {
        Self(self.0 | flag.0)
    }

    /// This set with a flag removed.
    #[inline]
    #[must_use]
    pub const fn without(self, flag: Self) -> Self {
        Self(self.0 & !flag.0)
    }
}

/// A moving axis-aligned body in world pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsBody {
    /// Top-left corner position.
    pub pos: Vec2,
    /// Velocity in pixels per tick.
    pub vel: Vec2,
    /// Acceleration accumulated this tick; cleared by the step.
    pub acc: Vec2,
    /// Hitbox size.
    pub size: Vec2,
    /// Which physics apply.
    pub caps: BodyCaps,
}

impl PhysicsBody {
    /// Creates a body at rest.
    #[must_use]
    pub const fn new(pos: Vec2, size: Vec2, caps: BodyCaps) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            size,
            caps,
        }
    }

    /// The body's current bounding box.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_min_size(self.pos, self.size)
    }

    /// The body's center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Whether the body has (effectively) stopped moving.
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.vel.length_squared() < REST_EPSILON_SQUARED
    }
}

/// What one integration step did to a body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// The body hit a tile horizontally and was snapped flush.
    pub hit_x: bool,
    /// The body hit a tile vertically and was snapped flush.
    pub hit_y: bool,
    /// The body left the map's extended bounds and should be removed.
    pub out_of_bounds: bool,
}

/// Advances a body one tick against the live grid.
///
/// Gravity, integration, fall clamp, then per-axis collision. The
/// acceleration is consumed; callers re-apply input forces next tick.
pub fn step_body(body: &mut PhysicsBody, grid: &WorldGrid, config: &WorldConfig) -> StepOutcome {
    let mut outcome = StepOutcome::default();

    if body.caps.has(BodyCaps::GRAVITY) {
        body.acc.y += config.gravity;
    }

    body.vel += body.acc;
    let terminal = config.terminal_fall_speed();
    if body.vel.y > terminal {
        body.vel.y = terminal;
    }
    let displacement = body.vel + body.acc * 0.5;
    body.acc = Vec2::ZERO;

    if body.caps.has(BodyCaps::COLLIDE) {
        body.pos.x += displacement.x;
        outcome.hit_x = resolve_x(body, grid);
        body.pos.y += displacement.y;
        outcome.hit_y = resolve_y(body, grid);
    } else {
        body.pos += displacement;
    }

    let margin = config.tile_size;
    let in_x = -margin < body.pos.x && body.pos.x < config.width_px() + margin;
    let in_y = body.pos.y < config.height_px() + margin;
    outcome.out_of_bounds = !(in_x && in_y);

    outcome
}

/// Whether a body stands on solid ground (one-pixel downward probe).
#[must_use]
pub fn is_grounded(body: &PhysicsBody, grid: &WorldGrid) -> bool {
    grid.overlaps_solid(&body.aabb().translated(Vec2::new(0.0, 1.0)))
}

/// Resolves a horizontal penetration against the first hit tile.
fn resolve_x(body: &mut PhysicsBody, grid: &WorldGrid) -> bool {
    let aabb = body.aabb();
    let Some(tile) = grid.first_solid_overlap(&aabb) else {
        return false;
    };
    if tile.min.x > aabb.min.x {
        // Hit from the left: snap flush against the tile's left face
        body.pos.x = tile.min.x - body.size.x;
    } else if tile.max.x < aabb.max.x {
        body.pos.x = tile.max.x;
    }
    body.vel.x = 0.0;
    true
}

/// Resolves a vertical penetration against the first hit tile.
fn resolve_y(body: &mut PhysicsBody, grid: &WorldGrid) -> bool {
    let aabb = body.aabb();
    let Some(tile) = grid.first_solid_overlap(&aabb) else {
        return false;
    };
    if tile.min.y > aabb.min.y {
        // Landing: snap the feet onto the tile's top face
        body.pos.y = tile.min.y - body.size.y;
    } else if tile.min.y < aabb.min.y {
        body.pos.y = tile.max.y;
    }
    body.vel.y = 0.0;
    true
}
