//! # Blueprint
//!
//! The static tile-type field produced by generation.
//!
//! The live world streams block entities in and out of sectors, but the
//! blueprint is the persistent truth: a cell mined away is cleared here
//! so it never comes back, and a cell placed or settled is written here
//! so it survives a stream-out/stream-in cycle.
//!
//! All accessors are total: out-of-bounds reads return open air and
//! out-of-bounds writes do nothing, because edge-of-map queries are
//! routine (neighbor counts, camera clamping, cursor targeting).

use strata_core::TileKind;

/// Static 2D field of optional tile kinds, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blueprint {
    /// Width in tiles.
    width: usize,
    /// Height in tiles.
    height: usize,
    /// Cells, `None` = open air.
    cells: Vec<Option<TileKind>>,
}

impl Blueprint {
    /// Creates an all-air blueprint.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Width in tiles.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Whether a tile coordinate lies inside the field.
    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Returns the kind at a cell, or `None` outside the field.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<TileKind> {
        if self.in_bounds(x, y) {
            self.cells[y * self.width + x]
        } else {
            None
        }
    }

    /// Writes a cell; out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, kind: Option<TileKind>) {
        if self.in_bounds(x, y) {
            self.cells[y * self.width + x] = kind;
        }
    }

    /// Whether a cell holds any tile.
    #[inline]
    #[must_use]
    pub fn is_solid(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some()
    }

    /// Counts solid cells among the 8 neighbors.
    ///
    /// Neighbors outside the field count as solid, which biases the
    /// automaton toward closed borders.
    #[must_use]
    pub fn solid_neighbors(&self, x: usize, y: usize) -> u8 {
        let mut count = 0;
        for dy in -1_isize..=1 {
            for dx in -1_isize..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let neighbor = match (x.checked_add_signed(dx), y.checked_add_signed(dy)) {
                    (Some(nx), Some(ny)) if self.in_bounds(nx, ny) => self.is_solid(nx, ny),
                    _ => true,
                };
                if neighbor {
                    count += 1;
                }
            }
        }
        count
    }

    /// Total number of solid cells.
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Iterates all cells as `(x, y, kind)`, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Option<TileKind>)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, kind)| (i % self.width, i / self.width, *kind))
    }

    /// Tile coordinates a player can stand at, searching above `horizon`.
    ///
    /// A candidate cell is open, has open air above it, and solid ground
    /// directly below it. Row 0 and the bottom row are never candidates.
    #[must_use]
    pub fn spawn_candidates(&self, horizon: usize) -> Vec<(usize, usize)> {
        let mut candidates = Vec::new();
        let last_row = horizon.min(self.height.saturating_sub(1));
        for y in 1..last_row {
            for x in 0..self.width {
                if !self.is_solid(x, y) && !self.is_solid(x, y - 1) && self.is_solid(x, y + 1) {
                    candidates.push((x, y));
                }
            }
        }
        candidates
    }

    /// Renders the field as one character per cell, rows separated by
    /// newlines. Stable across versions; used for snapshots and logs.
    #[must_use]
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(match self.get(x, y) {
                    None => '.',
                    Some(TileKind::Dirt) => '#',
                    Some(TileKind::Grass) => '"',
                    Some(TileKind::Sand) => '~',
                    Some(TileKind::Stone) => 'X',
                    Some(TileKind::Ore) => 'o',
                    Some(TileKind::Ruby) => '*',
                });
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_access_is_safe() {
        let mut bp = Blueprint::new(4, 4);
        assert_eq!(bp.get(4, 0), None);
        assert_eq!(bp.get(0, 100), None);

        bp.set(4, 0, Some(TileKind::Dirt));
        bp.set(100, 100, Some(TileKind::Dirt));
        assert_eq!(bp.solid_count(), 0);

        bp.set(1, 2, Some(TileKind::Ore));
        assert_eq!(bp.get(1, 2), Some(TileKind::Ore));
        assert_eq!(bp.solid_count(), 1);
    }

    #[test]
    fn test_corner_counts_outside_neighbors_as_solid() {
        // An empty 3x3 field: the corner's five outside neighbors count.
        let bp = Blueprint::new(3, 3);
        assert_eq!(bp.solid_neighbors(0, 0), 5);
        assert_eq!(bp.solid_neighbors(2, 2), 5);
        // Edge cell: three outside neighbors
        assert_eq!(bp.solid_neighbors(1, 0), 3);
        // Center cell: fully inside, all air
        assert_eq!(bp.solid_neighbors(1, 1), 0);
    }

    #[test]
    fn test_neighbor_count_mixes_inside_and_outside() {
        let mut bp = Blueprint::new(3, 3);
        bp.set(1, 1, Some(TileKind::Dirt));
        bp.set(1, 0, Some(TileKind::Dirt));
        // Corner sees 5 outside + center + top-middle
        assert_eq!(bp.solid_neighbors(0, 0), 7);
    }

    #[test]
    fn test_spawn_candidates_require_headroom_and_ground() {
        let mut bp = Blueprint::new(5, 8);
        // Ground row at y=4; one column blocked overhead
        for x in 0..5 {
            bp.set(x, 4, Some(TileKind::Dirt));
        }
        bp.set(2, 2, Some(TileKind::Dirt));

        let candidates = bp.spawn_candidates(6);
        assert!(candidates.contains(&(0, 3)));
        assert!(candidates.contains(&(4, 3)));
        // Standing cell is open but the cell above it is not
        assert!(!candidates.contains(&(2, 3)));
        for (_, y) in candidates {
            assert_eq!(y, 3);
        }
    }

    #[test]
    fn test_spawn_candidates_empty_when_no_surface() {
        let bp = Blueprint::new(5, 8);
        assert!(bp.spawn_candidates(6).is_empty());
    }

    #[test]
    fn test_ascii_round_trip_shape() {
        let mut bp = Blueprint::new(3, 2);
        bp.set(0, 0, Some(TileKind::Stone));
        bp.set(2, 1, Some(TileKind::Sand));
        assert_eq!(bp.to_ascii(), "X..\n..~\n");
    }
}
