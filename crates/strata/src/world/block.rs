//! A materialized block entity in the live grid.

use strata_core::TileKind;

/// One live block occupying a grid cell.
///
/// Blocks exist only while their sector is streamed in; the blueprint
/// remains the persistent record. Hardness and age are per-entity state
/// and reset when a sector is unloaded and reloaded, matching the
/// streaming granularity of everything else.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    /// Material of this block.
    pub kind: TileKind,
    /// Mining hits left before the block breaks. Negative = unbreakable.
    pub hardness: i8,
    /// Ticks of sun exposure accumulated toward the grass transition.
    pub age: u32,
}

impl Block {
    /// Creates a fresh block of a kind with full hardness.
    #[must_use]
    pub const fn new(kind: TileKind) -> Self {
        Self {
            kind,
            hardness: kind.hardness(),
            age: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_block_takes_kind_hardness() {
        assert_eq!(Block::new(TileKind::Dirt).hardness, 1);
        assert_eq!(Block::new(TileKind::Ruby).hardness, 5);
        assert!(Block::new(TileKind::Stone).hardness < 0);
        assert_eq!(Block::new(TileKind::Sand).age, 0);
    }
}
