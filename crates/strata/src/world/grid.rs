//! # World Grid & Sector Streaming
//!
//! The live counterpart of the blueprint: a 2D field of optional
//! [`Block`] entities, materialized only for the sectors near the
//! player.
//!
//! ## Streaming Model
//!
//! The map is divided into vertical sectors of `sector_width` columns.
//! At any time the active window is the player's sector plus one
//! neighbor on each side. [`WorldGrid::restream`] reconciles the live
//! field with a new window by symmetric difference: entering columns
//! materialize from the blueprint, exiting columns drop their entities.
//! That handles single-step crossings and arbitrary jumps (teleports)
//! the same way, and calling it with an unchanged sector is an exact
//! no-op.
//!
//! ## Mutation Discipline
//!
//! The blueprint stays the persistent truth: mining clears it, placing
//! and settling write it. Unloading a sector touches only the live
//! field, so a mined hole never grows back and a placed block survives
//! a stream-out/stream-in cycle.
//!
//! All point accessors are total; out-of-bounds coordinates read as
//! empty and refuse writes.

use std::ops::Range;

use strata_core::{Aabb, TileKind, Vec2, WorldConfig};
use strata_procedural::Blueprint;

use crate::gameplay::inventory::Inventory;
use crate::world::block::Block;

/// Result of one [`WorldGrid::mine`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MineOutcome {
    /// No block there, or the block is unbreakable.
    Nothing,
    /// The block took a hit but still stands.
    Damaged {
        /// Material of the damaged block.
        kind: TileKind,
        /// Hits remaining before it breaks.
        hits_left: i8,
    },
    /// The block broke; the cell and its blueprint entry are cleared.
    Destroyed {
        /// Material of the destroyed block.
        kind: TileKind,
        /// World-pixel center of the destroyed cell, for drop spawning.
        center: Vec2,
    },
}

/// Counters reported by one [`WorldGrid::restream`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RestreamStats {
    /// Block entities materialized from the blueprint.
    pub loaded: usize,
    /// Block entities dropped from the live field.
    pub unloaded: usize,
}

/// The live tile field with sector-based streaming.
#[derive(Debug)]
pub struct WorldGrid {
    /// Persistent tile record; survives streaming.
    blueprint: Blueprint,
    /// Live entities, row-major, `None` outside the active window.
    cells: Vec<Option<Block>>,
    /// Edge length of one tile in world pixels.
    tile_size: f32,
    /// Map width in tiles.
    width: usize,
    /// Map height in tiles.
    height: usize,
    /// Streaming sector width in columns.
    sector_width: usize,
    /// Number of sectors across the map.
    sector_count: usize,
    /// Sector the window is currently centered on.
    sector: usize,
    /// Columns currently materialized.
    active: Range<usize>,
}

impl WorldGrid {
    /// Creates an unmaterialized grid over a finished blueprint.
    ///
    /// The configuration must already be validated; streaming math
    /// assumes positive tile size and a sane sector width.
    #[must_use]
    pub fn new(config: &WorldConfig, blueprint: Blueprint) -> Self {
        let width = blueprint.width();
        let height = blueprint.height();
        Self {
            blueprint,
            cells: vec![None; width * height],
            tile_size: config.tile_size,
            width,
            height,
            sector_width: config.sector_width,
            sector_count: config.sector_count(),
            sector: 0,
            active: 0..0,
        }
    }

    /// The persistent tile record behind the live field.
    #[must_use]
    pub const fn blueprint(&self) -> &Blueprint {
        &self.blueprint
    }

    /// Map width in tiles.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Map height in tiles.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Edge length of one tile in world pixels.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    // ========================================================================
    // SECTOR STREAMING
    // ========================================================================

    /// Sector index containing a world-pixel x coordinate.
    ///
    /// Coordinates outside the map clamp to the edge sectors.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sector_of_x(&self, x: f32) -> usize {
        let map_width = self.width as f32 * self.tile_size;
        let raw = (x / map_width * self.sector_count as f32).floor();
        if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(self.sector_count - 1)
        }
    }

    /// Sector the streaming window is currently centered on.
    #[must_use]
    pub const fn current_sector(&self) -> usize {
        self.sector
    }

    /// Columns currently materialized.
    #[must_use]
    pub fn active_columns(&self) -> Range<usize> {
        self.active.clone()
    }

    /// The column window for a sector: itself plus one neighbor each side.
    fn window(&self, sector: usize) -> Range<usize> {
        let start = sector.saturating_sub(1) * self.sector_width;
        let end = ((sector + 2) * self.sector_width).min(self.width);
        start..end
    }

    /// Materializes the initial window around the player's sector.
    ///
    /// Returns the number of block entities created.
    pub fn materialize_initial(&mut self, sector: usize) -> usize {
        let sector = sector.min(self.sector_count - 1);
        let window = self.window(sector);
        let mut loaded = 0;
        for column in window.clone() {
            loaded += self.load_column(column);
        }
        self.sector = sector;
        self.active = window;
        tracing::debug!(sector, loaded, "initial sector window materialized");
        loaded
    }

    /// Reconciles the live field with a new player sector.
    ///
    /// Entering columns are materialized, then exiting columns are
    /// dropped. Calling with the current sector is a no-op.
    pub fn restream(&mut self, sector: usize) -> RestreamStats {
        let sector = sector.min(self.sector_count - 1);
        if sector == self.sector {
            return RestreamStats::default();
        }
        let target = self.window(sector);
        let current = self.active.clone();

        let mut stats = RestreamStats::default();
        for column in target.clone() {
            if !current.contains(&column) {
                stats.loaded += self.load_column(column);
            }
        }
        for column in current {
            if !target.contains(&column) {
                stats.unloaded += self.unload_column(column);
            }
        }

        tracing::debug!(
            from = self.sector,
            to = sector,
            loaded = stats.loaded,
            unloaded = stats.unloaded,
            "sector window restreamed"
        );
        self.sector = sector;
        self.active = target;
        stats
    }

    /// Materializes one column from the blueprint.
    fn load_column(&mut self, column: usize) -> usize {
        let mut loaded = 0;
        for y in 0..self.height {
            if let Some(kind) = self.blueprint.get(column, y) {
                self.cells[y * self.width + column] = Some(Block::new(kind));
                loaded += 1;
            }
        }
        loaded
    }

    /// Drops one column's live entities; the blueprint keeps the record.
    fn unload_column(&mut self, column: usize) -> usize {
        let mut unloaded = 0;
        for y in 0..self.height {
            if self.cells[y * self.width + column].take().is_some() {
                unloaded += 1;
            }
        }
        unloaded
    }

    // ========================================================================
    // POINT ACCESSORS
    // ========================================================================

    /// Returns the live block at a tile, or `None` outside the map,
    /// outside the active window, or where the cell is open.
    #[must_use]
    pub fn get(&self, tx: usize, ty: usize) -> Option<&Block> {
        if tx < self.width && ty < self.height {
            self.cells[ty * self.width + tx].as_ref()
        } else {
            None
        }
    }

    /// Mutable access to the live block at a tile.
    pub fn get_mut(&mut self, tx: usize, ty: usize) -> Option<&mut Block> {
        if tx < self.width && ty < self.height {
            self.cells[ty * self.width + tx].as_mut()
        } else {
            None
        }
    }

    /// Whether a tile currently holds a live block.
    #[must_use]
    pub fn is_solid(&self, tx: usize, ty: usize) -> bool {
        self.get(tx, ty).is_some()
    }

    /// Removes a live block without touching the blueprint.
    pub fn remove(&mut self, tx: usize, ty: usize) -> Option<Block> {
        if tx < self.width && ty < self.height {
            self.cells[ty * self.width + tx].take()
        } else {
            None
        }
    }

    /// Removes a live block and clears its blueprint entry.
    ///
    /// Used when a granular block wakes: while it falls it exists only
    /// as a moving body, so neither field may still claim the cell.
    pub fn release(&mut self, tx: usize, ty: usize) -> Option<Block> {
        let block = self.remove(tx, ty)?;
        self.blueprint.set(tx, ty, None);
        Some(block)
    }

    /// Places a block of a kind if the cell is open.
    ///
    /// Writes both the live field and the blueprint. Returns `false`
    /// for an occupied cell or out-of-bounds coordinates.
    pub fn place(&mut self, tx: usize, ty: usize, kind: TileKind) -> bool {
        if tx >= self.width || ty >= self.height || self.is_solid(tx, ty) {
            return false;
        }
        self.cells[ty * self.width + tx] = Some(Block::new(kind));
        self.blueprint.set(tx, ty, Some(kind));
        true
    }

    /// Places the inventory's selected kind, consuming one item.
    ///
    /// The placement and the decrement happen together or not at all:
    /// an occupied cell, an empty selection, or a zero count all refuse
    /// without touching either side. Returns the placed kind.
    pub fn place_from_inventory(
        &mut self,
        tx: usize,
        ty: usize,
        inventory: &mut Inventory,
    ) -> Option<TileKind> {
        let kind = inventory.selected_kind()?;
        if tx >= self.width || ty >= self.height || self.is_solid(tx, ty) {
            return None;
        }
        if !inventory.remove_one(kind) {
            return None;
        }
        self.cells[ty * self.width + tx] = Some(Block::new(kind));
        self.blueprint.set(tx, ty, Some(kind));
        Some(kind)
    }

    /// Replaces a live block with a fresh one of another kind.
    ///
    /// Both fields are rewritten; hardness and age reset. Returns
    /// `false` when the cell holds no live block.
    pub fn convert(&mut self, tx: usize, ty: usize, kind: TileKind) -> bool {
        if !self.is_solid(tx, ty) {
            return false;
        }
        self.cells[ty * self.width + tx] = Some(Block::new(kind));
        self.blueprint.set(tx, ty, Some(kind));
        true
    }

    /// Applies one mining hit to a tile.
    ///
    /// Breakable blocks lose one hardness; at zero the block is
    /// destroyed and removed from both the live field and the
    /// blueprint, so it never restreams back.
    pub fn mine(&mut self, tx: usize, ty: usize) -> MineOutcome {
        let Some(block) = self.get_mut(tx, ty) else {
            return MineOutcome::Nothing;
        };
        if !block.kind.is_breakable() {
            return MineOutcome::Nothing;
        }
        block.hardness -= 1;
        if block.hardness > 0 {
            return MineOutcome::Damaged {
                kind: block.kind,
                hits_left: block.hardness,
            };
        }
        let kind = block.kind;
        self.cells[ty * self.width + tx] = None;
        self.blueprint.set(tx, ty, None);
        MineOutcome::Destroyed {
            kind,
            center: Aabb::from_tile(tx, ty, self.tile_size).center(),
        }
    }

    // ========================================================================
    // COORDINATE CONVERSION & COLLISION QUERIES
    // ========================================================================

    /// Tile containing a world-pixel point, or `None` outside the map.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn tile_of(&self, point: Vec2) -> Option<(usize, usize)> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let tx = (point.x / self.tile_size) as usize;
        let ty = (point.y / self.tile_size) as usize;
        (tx < self.width && ty < self.height).then_some((tx, ty))
    }

    /// Top-left world-pixel corner of a tile.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn tile_origin(&self, tx: usize, ty: usize) -> Vec2 {
        Vec2::new(tx as f32 * self.tile_size, ty as f32 * self.tile_size)
    }

    /// Snaps a cursor position to its containing tile, clamping the
    /// cursor inside the map first so edge aiming always targets a
    /// real cell.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn target_tile(&self, cursor: Vec2) -> (usize, usize) {
        let clamped = Vec2::new(
            cursor.x.clamp(0.0, self.width as f32 * self.tile_size - 1.0),
            cursor.y.clamp(0.0, self.height as f32 * self.tile_size - 1.0),
        );
        self.tile_of(clamped)
            .unwrap_or((self.width - 1, self.height - 1))
    }

    /// First live block whose tile strictly overlaps a box, as the
    /// tile's own box. Scans the covered cells row-major; the caller
    /// resolves against this single hit.
    #[must_use]
    pub fn first_solid_overlap(&self, aabb: &Aabb) -> Option<Aabb> {
        let (x_range, y_range) = self.covered_tiles(aabb);
        for ty in y_range {
            for tx in x_range.clone() {
                if self.is_solid(tx, ty) {
                    let tile = Aabb::from_tile(tx, ty, self.tile_size);
                    if tile.overlaps(aabb) {
                        return Some(tile);
                    }
                }
            }
        }
        None
    }

    /// Whether any live block strictly overlaps a box.
    #[must_use]
    pub fn overlaps_solid(&self, aabb: &Aabb) -> bool {
        self.first_solid_overlap(aabb).is_some()
    }

    /// Clamped tile ranges covered by a world-pixel box.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn covered_tiles(&self, aabb: &Aabb) -> (Range<usize>, Range<usize>) {
        let clamp_tile = |px: f32, limit: usize| -> usize {
            let t = (px / self.tile_size).floor();
            if t <= 0.0 {
                0
            } else {
                (t as usize).min(limit)
            }
        };
        let x0 = clamp_tile(aabb.min.x, self.width - 1);
        let x1 = clamp_tile(aabb.max.x, self.width - 1);
        let y0 = clamp_tile(aabb.min.y, self.height - 1);
        let y1 = clamp_tile(aabb.max.y, self.height - 1);
        (x0..x1 + 1, y0..y1 + 1)
    }

    /// Total number of live block entities.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> WorldConfig {
        WorldConfig {
            width: 40,
            height: 10,
            horizon: 3,
            sector_width: 10,
            ..WorldConfig::default()
        }
    }

    /// Blueprint with a solid floor at row 6 and stone borders.
    fn floored_blueprint(config: &WorldConfig) -> Blueprint {
        let mut bp = Blueprint::new(config.width, config.height);
        for x in 0..config.width {
            bp.set(x, 6, Some(TileKind::Dirt));
            bp.set(x, config.height - 1, Some(TileKind::Stone));
        }
        for y in 0..config.height {
            bp.set(0, y, Some(TileKind::Stone));
            bp.set(config.width - 1, y, Some(TileKind::Stone));
        }
        bp
    }

    fn grid() -> WorldGrid {
        let config = test_config();
        WorldGrid::new(&config, floored_blueprint(&config))
    }

    #[test]
    fn test_sector_of_x_clamps_to_map() {
        let g = grid();
        // 40 columns, sector width 10 -> 4 sectors over 640 px
        assert_eq!(g.sector_of_x(-50.0), 0);
        assert_eq!(g.sector_of_x(0.0), 0);
        assert_eq!(g.sector_of_x(320.0), 2);
        assert_eq!(g.sector_of_x(10_000.0), 3);
    }

    #[test]
    fn test_initial_window_covers_three_sectors() {
        let mut g = grid();
        g.materialize_initial(1);
        assert_eq!(g.active_columns(), 0..30);
        assert!(g.is_solid(5, 6));
        assert!(g.is_solid(29, 6));
        // Outside the window the blueprint exists but no entity does
        assert!(!g.is_solid(35, 6));
        assert!(g.blueprint().is_solid(35, 6));
    }

    #[test]
    fn test_edge_sector_window_is_truncated() {
        let mut g = grid();
        g.materialize_initial(0);
        assert_eq!(g.active_columns(), 0..20);
        g.restream(3);
        assert_eq!(g.active_columns(), 20..40);
    }

    #[test]
    fn test_restream_same_sector_is_a_no_op() {
        let mut g = grid();
        g.materialize_initial(1);
        let before = g.live_count();
        let stats = g.restream(1);
        assert_eq!(stats, RestreamStats::default());
        assert_eq!(g.live_count(), before);
    }

    #[test]
    fn test_restream_single_step_shifts_the_window() {
        let mut g = grid();
        g.materialize_initial(1);
        let stats = g.restream(2);
        assert_eq!(g.active_columns(), 10..40);
        assert!(stats.loaded > 0);
        assert!(stats.unloaded > 0);
        assert!(!g.is_solid(5, 6));
        assert!(g.is_solid(35, 6));
    }

    #[test]
    fn test_restream_handles_multi_sector_jumps() {
        let mut g = grid();
        g.materialize_initial(0);
        // Teleport across the whole map: old window fully unloads
        g.restream(3);
        assert_eq!(g.active_columns(), 20..40);
        assert!(!g.is_solid(5, 6));
        assert!(g.is_solid(35, 6));
        // And back again, with nothing lost from the blueprint
        g.restream(0);
        assert!(g.is_solid(5, 6));
    }

    #[test]
    fn test_mined_hole_survives_restreaming() {
        let mut g = grid();
        g.materialize_initial(0);
        assert!(matches!(g.mine(5, 6), MineOutcome::Destroyed { .. }));
        g.restream(3);
        g.restream(0);
        assert!(!g.is_solid(5, 6), "mined hole must not regenerate");
        assert!(g.is_solid(6, 6));
    }

    #[test]
    fn test_mine_hardness_and_unbreakable() {
        let config = test_config();
        let mut bp = floored_blueprint(&config);
        bp.set(5, 5, Some(TileKind::Ore));
        let mut g = WorldGrid::new(&config, bp);
        g.materialize_initial(0);

        // Ore takes three hits
        assert_eq!(
            g.mine(5, 5),
            MineOutcome::Damaged {
                kind: TileKind::Ore,
                hits_left: 2
            }
        );
        g.mine(5, 5);
        let outcome = g.mine(5, 5);
        let MineOutcome::Destroyed { kind, center } = outcome else {
            panic!("third hit should destroy ore, got {outcome:?}");
        };
        assert_eq!(kind, TileKind::Ore);
        assert_eq!(center, Vec2::new(5.0 * 16.0 + 8.0, 5.0 * 16.0 + 8.0));

        // Stone border shrugs off mining
        assert_eq!(g.mine(0, 5), MineOutcome::Nothing);
        assert!(g.is_solid(0, 5));
        // Out of bounds is a quiet no-op
        assert_eq!(g.mine(500, 500), MineOutcome::Nothing);
    }

    #[test]
    fn test_place_refuses_occupied_and_out_of_bounds() {
        let mut g = grid();
        g.materialize_initial(0);
        assert!(g.place(5, 5, TileKind::Dirt));
        assert!(!g.place(5, 5, TileKind::Sand), "occupied cell");
        assert!(!g.place(500, 5, TileKind::Dirt), "out of bounds");
        assert_eq!(g.blueprint().get(5, 5), Some(TileKind::Dirt));
    }

    #[test]
    fn test_inventory_gated_place_is_atomic() {
        let mut g = grid();
        g.materialize_initial(0);
        let mut inv = Inventory::new(999);
        inv.grant(TileKind::Dirt, 1);

        // Occupied target: nothing is consumed
        assert_eq!(g.place_from_inventory(5, 6, &mut inv), None);
        assert_eq!(inv.count(TileKind::Dirt), 1);

        // Open target: placed and consumed together
        assert_eq!(g.place_from_inventory(5, 5, &mut inv), Some(TileKind::Dirt));
        assert_eq!(inv.count(TileKind::Dirt), 0);

        // Empty inventory: refused, cell untouched
        assert_eq!(g.place_from_inventory(6, 5, &mut inv), None);
        assert!(!g.is_solid(6, 5));
    }

    #[test]
    fn test_convert_rewrites_both_fields() {
        let mut g = grid();
        g.materialize_initial(0);
        assert!(g.convert(5, 6, TileKind::Grass));
        assert_eq!(g.get(5, 6).unwrap().kind, TileKind::Grass);
        assert_eq!(g.get(5, 6).unwrap().hardness, TileKind::Grass.hardness());
        assert_eq!(g.blueprint().get(5, 6), Some(TileKind::Grass));
        // Open cells cannot be converted
        assert!(!g.convert(5, 5, TileKind::Grass));
    }

    #[test]
    fn test_release_clears_both_fields() {
        let mut g = grid();
        g.materialize_initial(0);
        let block = g.release(5, 6).expect("floor block exists");
        assert_eq!(block.kind, TileKind::Dirt);
        assert!(!g.is_solid(5, 6));
        assert_eq!(g.blueprint().get(5, 6), None);
    }

    #[test]
    fn test_collision_queries_are_bounds_safe() {
        let mut g = grid();
        g.materialize_initial(0);

        // A box straddling the floor row hits it
        let over_floor = Aabb::from_min_size(Vec2::new(40.0, 90.0), Vec2::new(16.0, 16.0));
        let hit = g.first_solid_overlap(&over_floor).expect("floor hit");
        assert_eq!(hit.min.y, 96.0);

        // A box resting exactly on the floor's edge does not overlap
        let resting = Aabb::from_min_size(Vec2::new(40.0, 80.0), Vec2::new(16.0, 16.0));
        assert!(g.first_solid_overlap(&resting).is_none());

        // Far outside the map: no hit, no panic
        let outside = Aabb::from_min_size(Vec2::new(-500.0, -500.0), Vec2::new(16.0, 16.0));
        assert!(!g.overlaps_solid(&outside));
    }

    #[test]
    fn test_target_tile_clamps_the_cursor() {
        let g = grid();
        assert_eq!(g.target_tile(Vec2::new(-20.0, -20.0)), (0, 0));
        assert_eq!(g.target_tile(Vec2::new(24.0, 40.0)), (1, 2));
        assert_eq!(g.target_tile(Vec2::new(9999.0, 9999.0)), (39, 9));
    }
}
