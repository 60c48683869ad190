//! # World Events
//!
//! The outward face of the simulation: everything observable that
//! happened during a tick, queued as plain data for the host to drain
//! and turn into particles, sounds, or HUD updates.
//!
//! The queue is a simple vector because the simulation is
//! single-threaded; the host drains it once per tick after
//! [`crate::Simulation::tick`] returns.

use strata_core::{TileKind, Vec2};

/// One observable simulation occurrence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WorldEvent {
    // =========================================================================
    // Mining & placement
    // =========================================================================
    /// A block took a mining hit but still stands.
    BlockDamaged {
        /// Material of the block.
        kind: TileKind,
        /// Tile coordinates of the block.
        tile: (usize, usize),
        /// Hits remaining before it breaks.
        hits_left: i8,
    },
    /// A block was mined away.
    BlockMined {
        /// Material that was destroyed.
        kind: TileKind,
        /// Tile coordinates of the destroyed block.
        tile: (usize, usize),
    },
    /// A block was placed from the player's inventory.
    BlockPlaced {
        /// Material that was placed.
        kind: TileKind,
        /// Tile coordinates of the new block.
        tile: (usize, usize),
    },

    // =========================================================================
    // Drops
    // =========================================================================
    /// A pickup spawned from a mined block.
    DropSpawned {
        /// Material the drop carries.
        kind: TileKind,
        /// World-pixel position it spawned at.
        position: Vec2,
    },
    /// A pickup merged into the player's inventory.
    DropCollected {
        /// Material collected.
        kind: TileKind,
    },
    /// A pickup left the view or the map and was removed.
    DropCulled {
        /// Material lost.
        kind: TileKind,
    },

    // =========================================================================
    // World dynamics
    // =========================================================================
    /// A granular block lost its support and started falling.
    GranularWoken {
        /// Material of the falling block.
        kind: TileKind,
        /// Tile it fell out of.
        tile: (usize, usize),
    },
    /// A falling granular block came to rest in a grid cell.
    GranularSettled {
        /// Material of the settled block.
        kind: TileKind,
        /// Tile it now occupies.
        tile: (usize, usize),
    },
    /// A sun-exposed dirt block aged into grass.
    GrassGrown {
        /// Tile that converted.
        tile: (usize, usize),
    },
    /// The player crossed into a different streaming sector.
    SectorChanged {
        /// Sector the window was centered on before.
        from: usize,
        /// Sector it is centered on now.
        to: usize,
    },
}

/// Per-tick queue of [`WorldEvent`]s, drained by the host.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<WorldEvent>,
}

impl EventQueue {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Appends an event.
    #[inline]
    pub fn push(&mut self, event: WorldEvent) {
        self.events.push(event);
    }

    /// Takes every queued event, leaving the queue empty.
    #[must_use]
    pub fn take(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events queued since the last drain.
    #[must_use]
    pub fn pending(&self) -> &[WorldEvent] {
        &self.events
    }

    /// Number of queued events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
