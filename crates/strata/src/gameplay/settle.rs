//! # Granular Settling and Grass Growth
//!
//! Background processes that run over the streamed window each tick.
//!
//! Granular tiles (sand) with nothing underneath are released from the
//! grid into free-falling movers, then written back as tiles once they
//! come to rest. Release and re-anchor both go through the blueprint,
//! so a settled pile survives the sector being streamed out and back.
//!
//! A mover whose landing cell is already occupied stays suspended and
//! retries each tick; it re-anchors as soon as the cell frees up.
//!
//! The same scan ages sun-exposed dirt into grass.

use strata_core::{TileKind, Vec2, WorldConfig};

use crate::events::{EventQueue, WorldEvent};
use crate::physics::{self, BodyCaps, PhysicsBody};
use crate::world::grid::WorldGrid;

/// A released granular tile falling as a physics body.
#[derive(Clone, Copy, Debug)]
pub struct GranularMover {
    /// Material of the released tile.
    pub kind: TileKind,
    /// The mover's physics body, one tile in size.
    pub body: PhysicsBody,
    /// At rest over an occupied cell, waiting for it to free up.
    suspended: bool,
}

/// Counters reported by one [`Settler::update`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SettleReport {
    /// Tiles released into movers this tick.
    pub woken: u32,
    /// Movers written back as tiles this tick.
    pub settled: u32,
    /// Movers that fell out of the world this tick.
    pub lost: u32,
    /// Dirt tiles converted to grass this tick.
    pub grass_grown: u32,
}

/// Owns the in-flight granular movers and the grass-aging pass.
#[derive(Debug, Default)]
pub struct Settler {
    movers: Vec<GranularMover>,
}

impl Settler {
    /// Creates a settler with no movers in flight.
    #[must_use]
    pub const fn new() -> Self {
        Self { movers: Vec::new() }
    }

    /// Number of movers currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.movers.len()
    }

    /// The in-flight movers, for rendering.
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, GranularMover> {
        self.movers.iter()
    }

    /// Runs one settling tick over the streamed window.
    ///
    /// Order matters: movers advance before the wake scan, so a tile
    /// released this tick starts falling next tick and a settling
    /// column collapses one cell per tick from the bottom up.
    pub fn update(
        &mut self,
        grid: &mut WorldGrid,
        config: &WorldConfig,
        events: &mut EventQueue,
    ) -> SettleReport {
        let mut report = SettleReport::default();

        self.advance_movers(grid, config, events, &mut report);
        self.wake_unsupported(grid, events, &mut report);
        report.grass_grown = age_dirt_into_grass(grid, config, events);

        report
    }

    /// Steps every mover and anchors the ones that came to rest.
    ///
    /// A suspended mover is frozen in place rather than stepped, so it
    /// cannot be squeezed through the block occupying its cell. It
    /// re-anchors the tick its cell frees up, or resumes falling if
    /// the cell frees with nothing underneath.
    fn advance_movers(
        &mut self,
        grid: &mut WorldGrid,
        config: &WorldConfig,
        events: &mut EventQueue,
        report: &mut SettleReport,
    ) {
        let mut keep = Vec::with_capacity(self.movers.len());
        for mut mover in self.movers.drain(..) {
            if mover.suspended {
                if Self::retry_anchor(&mut mover, grid, events) {
                    report.settled += 1;
                } else {
                    keep.push(mover);
                }
                continue;
            }

            let outcome = physics::step_body(&mut mover.body, grid, config);
            if outcome.out_of_bounds {
                report.lost += 1;
                tracing::warn!(kind = mover.kind.name(), "granular mover fell out of the world");
                continue;
            }
            if !(outcome.hit_y && mover.body.is_at_rest()) {
                keep.push(mover);
                continue;
            }

            match grid.tile_of(mover.body.center()) {
                Some((tx, ty)) if grid.place(tx, ty, mover.kind) => {
                    report.settled += 1;
                    events.push(WorldEvent::GranularSettled {
                        kind: mover.kind,
                        tile: (tx, ty),
                    });
                }
                _ => {
                    // Landing cell occupied; hold position and retry.
                    mover.suspended = true;
                    keep.push(mover);
                }
            }
        }
        self.movers = keep;
    }

    /// One retry for a suspended mover. Returns `true` when it anchors.
    fn retry_anchor(
        mover: &mut GranularMover,
        grid: &mut WorldGrid,
        events: &mut EventQueue,
    ) -> bool {
        let Some((tx, ty)) = grid.tile_of(mover.body.center()) else {
            return false;
        };
        if grid.is_solid(tx, ty) {
            return false;
        }
        // Cell freed up. Anchor if supported, otherwise fall again.
        let supported = ty + 1 >= grid.height() || grid.is_solid(tx, ty + 1);
        if supported && grid.place(tx, ty, mover.kind) {
            events.push(WorldEvent::GranularSettled {
                kind: mover.kind,
                tile: (tx, ty),
            });
            return true;
        }
        mover.suspended = false;
        false
    }

    /// Releases every streamed granular tile with an open cell below.
    ///
    /// The scan snapshots coordinates first, so a stacked column wakes
    /// one tile per tick rather than all at once.
    fn wake_unsupported(
        &mut self,
        grid: &mut WorldGrid,
        events: &mut EventQueue,
        report: &mut SettleReport,
    ) {
        let mut unsupported = Vec::new();
        for tx in grid.active_columns() {
            // The bottom row rests on the map edge.
            for ty in 0..grid.height().saturating_sub(1) {
                let granular = grid
                    .get(tx, ty)
                    .is_some_and(|block| block.kind.is_granular());
                if granular && !grid.is_solid(tx, ty + 1) {
                    unsupported.push((tx, ty));
                }
            }
        }

        for (tx, ty) in unsupported {
            let Some(block) = grid.release(tx, ty) else {
                continue;
            };
            let size = Vec2::new(grid.tile_size(), grid.tile_size());
            self.movers.push(GranularMover {
                kind: block.kind,
                body: PhysicsBody::new(
                    grid.tile_origin(tx, ty),
                    size,
                    BodyCaps::GRAVITY.with(BodyCaps::COLLIDE),
                ),
                suspended: false,
            });
            report.woken += 1;
            events.push(WorldEvent::GranularWoken {
                kind: block.kind,
                tile: (tx, ty),
            });
        }
    }
}

/// Ages sun-exposed dirt and converts it to grass past the threshold.
///
/// Exposure means an open cell directly above (the top row always
/// counts as exposed) and solid ground directly below (the bottom row
/// rests on the map edge). Burying a dirt tile resets nothing; age
/// only advances while exposed, matching slow regrowth after digging.
fn age_dirt_into_grass(
    grid: &mut WorldGrid,
    config: &WorldConfig,
    events: &mut EventQueue,
) -> u32 {
    let mut exposed = Vec::new();
    for tx in grid.active_columns() {
        for ty in 0..grid.height() {
            let dirt = grid
                .get(tx, ty)
                .is_some_and(|block| block.kind == TileKind::Dirt);
            let open_above = ty == 0 || !grid.is_solid(tx, ty - 1);
            let grounded = ty + 1 >= grid.height() || grid.is_solid(tx, ty + 1);
            if dirt && open_above && grounded {
                exposed.push((tx, ty));
            }
        }
    }

    let mut grown = 0;
    for (tx, ty) in exposed {
        let ripe = match grid.get_mut(tx, ty) {
            Some(block) => {
                block.age += 1;
                block.age >= config.grass_age_threshold
            }
            None => false,
        };
        if ripe && grid.convert(tx, ty, TileKind::Grass) {
            grown += 1;
            events.push(WorldEvent::GrassGrown { tile: (tx, ty) });
        }
    }
    grown
}
