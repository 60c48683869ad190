//! # Drops
//!
//! Free-floating pickups spawned from mined blocks.
//!
//! A drop falls under gravity and collides with the live grid (never
//! with the player's body). Once within magnet range of the player it
//! stops falling and homes in at a fixed speed; on touch it merges
//! into the inventory. Drops that leave the camera's view or the map
//! are culled.
//!
//! Crowding is handled with an explicit nearest-neighbor search over a
//! quadtree of drop centers: a drop closer than the minimum separation
//! to its nearest neighbor is nudged one pixel away. Candidates come
//! from a bounded query rectangle, so the pass stays cheap even with
//! a pile of drops.

use strata_core::{Aabb, Quadtree, TileKind, Vec2, WorldConfig};

use crate::events::{EventQueue, WorldEvent};
use crate::gameplay::player::Player;
use crate::physics::{self, BodyCaps, PhysicsBody};
use crate::world::grid::WorldGrid;

/// Half-width in pixels of the horizontal spawn jitter.
pub(crate) const SPAWN_JITTER: f32 = 0.5;

/// Pixels per tick a magnetized drop moves toward the player.
const MAGNET_SPEED: f32 = 2.0;

/// Squared distance under which neighboring drops push apart (5 px).
const SEPARATION_DISTANCE_SQUARED: f32 = 25.0;

/// Side length of the neighbor-candidate query box.
const NEIGHBOR_QUERY_SIZE: f32 = 40.0;

/// Per-entity quadtree capacity before a node subdivides.
const QUADTREE_CAPACITY: usize = 4;

/// One dropped pickup.
#[derive(Clone, Copy, Debug)]
pub struct Drop {
    /// Material this pickup carries.
    pub kind: TileKind,
    /// The drop's physics body.
    pub body: PhysicsBody,
    /// Whether the drop is homing toward the player.
    magnetized: bool,
}

impl Drop {
    /// Whether the drop is currently homing toward the player.
    #[must_use]
    pub const fn is_magnetized(&self) -> bool {
        self.magnetized
    }
}

/// Counters reported by one [`DropSet::update`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DropReport {
    /// Drops merged into the inventory this tick.
    pub collected: u32,
    /// Drops culled out of view or bounds this tick.
    pub culled: u32,
}

/// All live drops in the world.
#[derive(Debug, Default)]
pub struct DropSet {
    drops: Vec<Drop>,
}

impl DropSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { drops: Vec::new() }
    }

    /// Number of live drops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.drops.len()
    }

    /// Whether no drops are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    /// The live drops, for rendering.
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Drop> {
        self.drops.iter()
    }

    /// Spawns a pickup centered on a destroyed block's cell.
    ///
    /// `jitter` shifts the spawn horizontally so stacked mining does
    /// not produce perfectly overlapping drops.
    pub fn spawn(
        &mut self,
        kind: TileKind,
        center: Vec2,
        jitter: f32,
        config: &WorldConfig,
        events: &mut EventQueue,
    ) {
        let size = config.drop_size();
        let pos = center - size * 0.5 + Vec2::new(jitter, 0.0);
        self.drops.push(Drop {
            kind,
            body: PhysicsBody::new(pos, size, BodyCaps::GRAVITY.with(BodyCaps::COLLIDE)),
            magnetized: false,
        });
        events.push(WorldEvent::DropSpawned {
            kind,
            position: pos,
        });
    }

    /// Advances every drop one tick.
    ///
    /// Order per drop: view/bounds cull, physics, magnetism, pickup.
    /// Separation nudges are computed against a snapshot of this
    /// tick's starting positions and applied at the end, so the pass
    /// is independent of iteration order.
    pub fn update(
        &mut self,
        grid: &WorldGrid,
        player: &mut Player,
        view: Aabb,
        config: &WorldConfig,
        events: &mut EventQueue,
    ) -> DropReport {
        let mut report = DropReport::default();

        // Snapshot centers for the separation pass before anything moves.
        let index = self.build_index(config);
        let centers: Vec<Vec2> = self.drops.iter().map(|d| d.body.center()).collect();

        let player_aabb = player.body.aabb();
        let player_center = player.center();
        let magnet_range_sq = config.drop_magnet_range_squared();

        let mut keep = Vec::with_capacity(self.drops.len());
        for (i, mut drop) in self.drops.drain(..).enumerate() {
            if !drop.body.aabb().overlaps(&view) {
                report.culled += 1;
                events.push(WorldEvent::DropCulled { kind: drop.kind });
                tracing::warn!(kind = drop.kind.name(), "drop culled out of view");
                continue;
            }

            let outcome = physics::step_body(&mut drop.body, grid, config);
            if outcome.out_of_bounds {
                report.culled += 1;
                events.push(WorldEvent::DropCulled { kind: drop.kind });
                tracing::warn!(kind = drop.kind.name(), "drop culled out of bounds");
                continue;
            }

            let to_player = player_center - drop.body.center();
            if to_player.length_squared() < magnet_range_sq {
                drop.magnetized = true;
                drop.body.caps = drop.body.caps.without(BodyCaps::GRAVITY);
                drop.body.vel = Vec2::ZERO;
                drop.body.pos += to_player.normalized_or_zero() * MAGNET_SPEED;
            }

            if drop.body.aabb().overlaps(&player_aabb) {
                player.inventory.add(drop.kind);
                report.collected += 1;
                events.push(WorldEvent::DropCollected { kind: drop.kind });
                continue;
            }

            // Anti-stacking: push one pixel away from the nearest neighbor.
            if let Some(delta) = separation_nudge(i, &centers, &index) {
                drop.body.pos += delta;
            }

            keep.push(drop);
        }
        self.drops = keep;

        report
    }

    /// Indexes this tick's drop centers for neighbor queries.
    fn build_index(&self, config: &WorldConfig) -> Quadtree<usize> {
        let margin = config.tile_size;
        let boundary = Aabb::new(
            Vec2::new(-margin, -margin),
            Vec2::new(config.width_px() + margin, config.height_px() + margin),
        );
        let mut index = Quadtree::new(boundary, QUADTREE_CAPACITY);
        for (i, drop) in self.drops.iter().enumerate() {
            index.insert(drop.body.center(), i);
        }
        index
    }
}

/// Nudge away from the nearest neighboring drop, if one is too close.
///
/// The quadtree narrows candidates to a small box around the drop; the
/// exact nearest neighbor is then computed over that candidate set.
fn separation_nudge(i: usize, centers: &[Vec2], index: &Quadtree<usize>) -> Option<Vec2> {
    let center = centers[i];
    let query = Aabb::from_center(
        center,
        Vec2::new(NEIGHBOR_QUERY_SIZE, NEIGHBOR_QUERY_SIZE),
    );
    let nearest_sq = index
        .query(&query)
        .into_iter()
        .filter(|&j| j != i)
        .map(|j| (j, centers[j].distance_squared(center)))
        .min_by(|a, b| a.1.total_cmp(&b.1))?;

    let (j, dist_sq) = nearest_sq;
    if dist_sq <= 0.0 || dist_sq >= SEPARATION_DISTANCE_SQUARED {
        return None;
    }
    Some((center - centers[j]).normalized_or_zero())
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn wide_view() -> Aabb {
        Aabb::from_min_size(Vec2::new(-100.0, -100.0), Vec2::new(1000.0, 1000.0))
    }

    /// A player far from the action so magnetism stays off.
    fn distant_player(config: &WorldConfig) -> Player {
        Player::new(Vec2::new(288.0, 104.0), config)
    }

    #[test]
    fn test_drop_falls_and_rests_on_the_floor() {
        let config = test_config();
        let grid = floored_grid(&config);
        let mut player = distant_player(&config);
        let mut drops = DropSet::new();
        let mut events = EventQueue::new();

        drops.spawn(TileKind::Dirt, Vec2::new(40.0, 40.0), 0.0, &config, &mut events);
        assert!(matches!(
            events.take()[0],
            WorldEvent::DropSpawned { kind: TileKind::Dirt, .. }
        ));

        for _ in 0..60 {
            drops.update(&grid, &mut player, wide_view(), &config, &mut events);
        }
        assert_eq!(drops.len(), 1);
        let drop = drops.iter().next().unwrap();
        // Resting on the floor top at y = 128
        assert_eq!(drop.body.pos.y, 128.0 - drop.body.size.y);
        assert!(!drop.is_magnetized());
    }

    #[test]
    fn test_nearby_drop_magnetizes_and_collects() {
        let config = test_config();
        let grid = floored_grid(&config);
        // Player standing at column 4
        let mut player = Player::new(Vec2::new(64.0, 104.0), &config);
        let mut drops = DropSet::new();
        let mut events = EventQueue::new();

        // One tile beside the player, inside magnet range
        drops.spawn(TileKind::Ore, Vec2::new(90.0, 110.0), 0.0, &config, &mut events);
        events.take();

        let mut collected = 0;
        for _ in 0..40 {
            collected += drops.update(&grid, &mut player, wide_view(), &config, &mut events).collected;
            if collected > 0 {
                break;
            }
        }
        assert_eq!(collected, 1);
        assert!(drops.is_empty());
        assert_eq!(player.inventory.count(TileKind::Ore), 1);
        assert!(events
            .take()
            .iter()
            .any(|e| matches!(e, WorldEvent::DropCollected { kind: TileKind::Ore })));
    }

    #[test]
    fn test_drop_outside_view_is_culled() {
        let config = test_config();
        let grid = floored_grid(&config);
        let mut player = distant_player(&config);
        let mut drops = DropSet::new();
        let mut events = EventQueue::new();

        drops.spawn(TileKind::Dirt, Vec2::new(40.0, 40.0), 0.0, &config, &mut events);
        events.take();

        let narrow_view = Aabb::from_min_size(Vec2::new(200.0, 0.0), Vec2::new(100.0, 100.0));
        let report = drops.update(&grid, &mut player, narrow_view, &config, &mut events);
        assert_eq!(report.culled, 1);
        assert!(drops.is_empty());
    }

    #[test]
    fn test_overlapping_drops_push_apart() {
        let config = test_config();
        let grid = floored_grid(&config);
        let mut player = distant_player(&config);
        let mut drops = DropSet::new();
        let mut events = EventQueue::new();

        // Two drops two pixels apart, resting on the floor already
        drops.spawn(TileKind::Dirt, Vec2::new(40.0, 123.0), 0.0, &config, &mut events);
        drops.spawn(TileKind::Dirt, Vec2::new(42.0, 123.0), 0.0, &config, &mut events);
        events.take();

        for _ in 0..20 {
            drops.update(&grid, &mut player, wide_view(), &config, &mut events);
        }
        assert_eq!(drops.len(), 2);
        let centers: Vec<Vec2> = drops.iter().map(|d| d.body.center()).collect();
        assert!(
            centers[0].distance_squared(centers[1]) >= SEPARATION_DISTANCE_SQUARED,
            "drops should separate to at least 5 px, got {}",
            centers[0].distance(centers[1])
        );
    }
}
