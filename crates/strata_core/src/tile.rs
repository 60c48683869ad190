//! # Tile Kinds
//!
//! The material table for everything a grid cell can hold.
//!
//! A cell is `Option<TileKind>`: `None` is open air. Each kind carries
//! its mining hardness, render color, and behavior flags as const data
//! so callers never need a lookup table of their own.

/// Tile materials in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TileKind {
    /// Plain earth, the bulk of the underground
    Dirt = 0,
    /// Surface variant of dirt (open air above, support below)
    Grass = 1,
    /// Granular material that falls when unsupported
    Sand = 2,
    /// Indestructible border material
    Stone = 3,
    /// Common metal deposit found in enclosed pockets
    Ore = 4,
    /// Rare gem, slow to mine
    Ruby = 5,
}

/// Number of tile kinds.
pub const TILE_KIND_COUNT: usize = 6;

impl TileKind {
    /// All kinds in fixed order; inventory slots and HUD cycling use this.
    pub const ALL: [Self; TILE_KIND_COUNT] = [
        Self::Dirt,
        Self::Grass,
        Self::Sand,
        Self::Stone,
        Self::Ore,
        Self::Ruby,
    ];

    /// Mining hits needed to break a block of this kind.
    ///
    /// Negative means unbreakable.
    #[must_use]
    pub const fn hardness(self) -> i8 {
        match self {
            Self::Dirt | Self::Grass | Self::Sand => 1,
            Self::Stone => -1,
            Self::Ore => 3,
            Self::Ruby => 5,
        }
    }

    /// Returns whether mining can ever destroy this kind.
    #[must_use]
    pub const fn is_breakable(self) -> bool {
        self.hardness() >= 0
    }

    /// Returns whether this kind falls when the cell below is open.
    #[must_use]
    pub const fn is_granular(self) -> bool {
        matches!(self, Self::Sand)
    }

    /// Returns the RGB color a host should draw this kind with.
    #[must_use]
    pub const fn color(self) -> [u8; 3] {
        match self {
            Self::Dirt => [100, 60, 20],
            Self::Grass => [60, 150, 0],
            Self::Sand => [250, 200, 100],
            Self::Stone => [60, 60, 60],
            Self::Ore => [92, 92, 130],
            Self::Ruby => [130, 0, 20],
        }
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dirt => "dirt",
            Self::Grass => "grass",
            Self::Sand => "sand",
            Self::Stone => "stone",
            Self::Ore => "ore",
            Self::Ruby => "ruby",
        }
    }

    /// Index into [`TileKind::ALL`], for slot-array storage.
    #[must_use]
    pub const fn slot(self) -> usize {
        self as usize
    }

    /// Converts from u8.
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Dirt,
            1 => Self::Grass,
            2 => Self::Sand,
            3 => Self::Stone,
            4 => Self::Ore,
            _ => Self::Ruby,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardness_table() {
        assert_eq!(TileKind::Dirt.hardness(), 1);
        assert_eq!(TileKind::Ore.hardness(), 3);
        assert_eq!(TileKind::Ruby.hardness(), 5);
        assert!(TileKind::Stone.hardness() < 0);
        assert!(!TileKind::Stone.is_breakable());
        assert!(TileKind::Grass.is_breakable());
    }

    #[test]
    fn test_granular_flag() {
        assert!(TileKind::Sand.is_granular());
        assert!(!TileKind::Dirt.is_granular());
        assert!(!TileKind::Stone.is_granular());
    }

    #[test]
    fn test_u8_round_trip() {
        for kind in TileKind::ALL {
            assert_eq!(TileKind::from_u8(kind as u8), kind);
            assert_eq!(TileKind::ALL[kind.slot()], kind);
        }
    }
}
