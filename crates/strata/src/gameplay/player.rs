//! # Player
//!
//! The player is a physics body with an inventory. Horizontal motion is
//! acceleration-plus-friction rather than direct velocity control,
//! which gives the slight slide the movement feel depends on; jumping
//! is gated by a one-pixel ground probe so walls cannot be climbed by
//! holding the key.

use strata_core::{Vec2, WorldConfig};

use crate::gameplay::inventory::Inventory;
use crate::physics::{self, BodyCaps, PhysicsBody};
use crate::world::grid::WorldGrid;

/// The player entity.
#[derive(Clone, Debug)]
pub struct Player {
    /// The player's physics body (1 x 1.5 tiles).
    pub body: PhysicsBody,
    /// Collected materials.
    pub inventory: Inventory,
}

impl Player {
    /// Creates a player standing at a world-pixel position.
    #[must_use]
    pub fn new(pos: Vec2, config: &WorldConfig) -> Self {
        Self {
            body: PhysicsBody::new(
                pos,
                config.player_size(),
                BodyCaps::GRAVITY.with(BodyCaps::COLLIDE),
            ),
            inventory: Inventory::new(config.inventory_cap),
        }
    }

    /// The player's center point, the anchor for camera follow,
    /// drop magnetism, and cursor targeting.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    /// Applies one tick of held movement input.
    ///
    /// Acceleration is input times speed plus velocity-proportional
    /// friction; the equilibrium of the two sets the top speed.
    pub fn apply_movement(&mut self, left: bool, right: bool, config: &WorldConfig) {
        let input = f32::from(i8::from(right) - i8::from(left));
        self.body.acc.x = input * config.player_speed + self.body.vel.x * config.player_friction;
    }

    /// Jumps if the player stands on solid ground.
    ///
    /// Returns whether the jump happened.
    pub fn try_jump(&mut self, grid: &WorldGrid, config: &WorldConfig) -> bool {
        if physics::is_grounded(&self.body, grid) {
            self.body.vel.y = -config.jump_speed;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::step_body;
    use strata_core::TileKind;
    use strata_procedural::Blueprint;

    fn test_config() -> WorldConfig {
        WorldConfig {
            width: 20,
            height: 12,
            horizon: 3,
            sector_width: 10,
            ..WorldConfig::default()
        }
    }

    fn floored_grid(config: &WorldConfig) -> WorldGrid {
        let mut bp = Blueprint::new(config.width, config.height);
        for x in 0..config.width {
            bp.set(x, 8, Some(TileKind::Stone));
        }
        let mut grid = WorldGrid::new(config, bp);
        grid.materialize_initial(0);
        grid
    }

    /// A player standing on the floor at column 4.
    fn standing_player(config: &WorldConfig) -> Player {
        // Floor top at y = 128, player is 24 px tall
        Player::new(Vec2::new(64.0, 104.0), config)
    }

    #[test]
    fn test_movement_reaches_a_top_speed() {
        let config = test_config();
        let grid = floored_grid(&config);
        let mut player = standing_player(&config);

        let mut previous = 0.0;
        for _ in 0..200 {
            player.apply_movement(false, true, &config);
            step_body(&mut player.body, &grid, &config);
            previous = player.body.vel.x;
        }
        // Friction balances input: v* = speed / |friction|
        let expected_top = config.player_speed / config.player_friction.abs();
        assert!((previous - expected_top).abs() < 0.2, "top speed ~{expected_top}, got {previous}");
    }

    #[test]
    fn test_friction_brakes_without_input() {
        let config = test_config();
        let grid = floored_grid(&config);
        let mut player = standing_player(&config);
        player.body.vel.x = 4.0;

        for _ in 0..200 {
            player.apply_movement(false, false, &config);
            step_body(&mut player.body, &grid, &config);
        }
        assert!(player.body.vel.x.abs() < 0.1, "player should coast to a stop");
    }

    #[test]
    fn test_jump_requires_ground() {
        let config = test_config();
        let grid = floored_grid(&config);

        let mut grounded = standing_player(&config);
        assert!(grounded.try_jump(&grid, &config));
        assert_eq!(grounded.body.vel.y, -config.jump_speed);

        let mut airborne = Player::new(Vec2::new(64.0, 40.0), &config);
        assert!(!airborne.try_jump(&grid, &config));
        assert_eq!(airborne.body.vel.y, 0.0);
    }

    #[test]
    fn test_jump_arc_returns_to_the_floor() {
        let config = test_config();
        let grid = floored_grid(&config);
        let mut player = standing_player(&config);
        let rest_y = player.body.pos.y;

        assert!(player.try_jump(&grid, &config));
        let mut peak = rest_y;
        let mut landed = false;
        for _ in 0..60 {
            player.apply_movement(false, false, &config);
            let outcome = step_body(&mut player.body, &grid, &config);
            peak = peak.min(player.body.pos.y);
            if outcome.hit_y && player.body.pos.y == rest_y {
                landed = true;
                break;
            }
        }
        assert!(peak < rest_y - 2.0 * config.tile_size, "jump should clear two tiles");
        assert!(landed, "player should land back on the floor");
    }
}
