//! # Inventory
//!
//! One fixed slot per tile kind, capped counts, and a selection cursor
//! that cycles through the kinds currently held. Slot order follows
//! [`TileKind::ALL`] so HUD layout and placement selection stay stable
//! no matter what order items were collected in.

use strata_core::{TileKind, TILE_KIND_COUNT};

/// The player's material inventory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inventory {
    /// Count per tile kind, indexed by [`TileKind::slot`].
    counts: [u16; TILE_KIND_COUNT],
    /// Saturation limit per slot.
    cap: u16,
    /// Selection cursor into [`TileKind::ALL`].
    selected: usize,
}

impl Inventory {
    /// Creates an empty inventory with a per-slot cap.
    #[must_use]
    pub const fn new(cap: u16) -> Self {
        Self {
            counts: [0; TILE_KIND_COUNT],
            cap,
            selected: 0,
        }
    }

    /// Count held of a kind.
    #[must_use]
    pub const fn count(&self, kind: TileKind) -> u16 {
        self.counts[kind.slot()]
    }

    /// Total items held across all kinds.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.iter().map(|&c| u32::from(c)).sum()
    }

    /// Whether nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Adds one item of a kind, saturating at the cap.
    pub fn add(&mut self, kind: TileKind) {
        let slot = &mut self.counts[kind.slot()];
        *slot = slot.saturating_add(1).min(self.cap);
    }

    /// Grants a batch of items, saturating at the cap. Setup helper
    /// for scenarios and debug worlds.
    pub fn grant(&mut self, kind: TileKind, amount: u16) {
        let slot = &mut self.counts[kind.slot()];
        *slot = slot.saturating_add(amount).min(self.cap);
    }

    /// Removes one item of a kind. Returns `false` if none is held.
    pub fn remove_one(&mut self, kind: TileKind) -> bool {
        let slot = &mut self.counts[kind.slot()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// The kind placement would consume, if anything is held.
    ///
    /// The cursor's own kind when it still has stock, otherwise the
    /// first held kind in fixed order.
    #[must_use]
    pub fn selected_kind(&self) -> Option<TileKind> {
        if self.counts[self.selected] > 0 {
            return Some(TileKind::ALL[self.selected]);
        }
        TileKind::ALL.into_iter().find(|kind| self.count(*kind) > 0)
    }

    /// Advances the selection cursor to the next held kind, wrapping.
    ///
    /// Does nothing while the inventory is empty.
    pub fn cycle(&mut self) {
        for step in 1..=TILE_KIND_COUNT {
            let candidate = (self.selected + step) % TILE_KIND_COUNT;
            if self.counts[candidate] > 0 {
                self.selected = candidate;
                return;
            }
        }
    }

    /// Held kinds with their counts, in fixed slot order (HUD data).
    pub fn iter_held(&self) -> impl Iterator<Item = (TileKind, u16)> + '_ {
        TileKind::ALL
            .into_iter()
            .filter_map(|kind| (self.count(kind) > 0).then(|| (kind, self.count(kind))))
    }
}
