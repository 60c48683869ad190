//! # Tick Orchestrator
//!
//! [`Simulation`] owns the whole world and advances it one fixed step
//! per [`Simulation::tick`] call.
//!
//! ## Lifecycle
//!
//! A new simulation starts in the `Generating` phase and runs one cave
//! generation phase per tick, so a host can draw a progress bar while
//! the map carves itself. When the last phase lands, the blueprint is
//! sealed, a spawn cell is chosen, the initial sector window streams
//! in, and the simulation flips to `Running`. A seed whose terrain has
//! no standable spawn fails the transition; the simulation is then
//! spent and every further call errors.
//!
//! ## Tick Order (Running)
//!
//! Restream sectors, settle granular blocks, move the player, apply
//! mining and placement, advance drops, follow with the camera. The
//! order is load-bearing: settling sees the grid before the player
//! edits it, and drops see the edits from the same tick.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use strata_core::{Aabb, Vec2, WorldConfig};
use strata_procedural::{pick_spawn, Blueprint, CaveGenerator, GenError, GenProgress, WorldSeed};

use crate::camera::Camera;
use crate::events::{EventQueue, WorldEvent};
use crate::gameplay::drops::{self, DropSet};
use crate::gameplay::player::Player;
use crate::gameplay::settle::Settler;
use crate::physics;
use crate::world::grid::{MineOutcome, WorldGrid};

/// Errors that end a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// World generation or the spawn search failed.
    #[error("world generation failed: {0}")]
    Generation(#[from] GenError),

    /// A previous failure left the simulation unusable.
    #[error("simulation already failed and cannot continue")]
    Spent,
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

/// Which stage of its life the simulation is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimPhase {
    /// The cave generator is still carving the map.
    Generating,
    /// The world is live and playable.
    Running,
}

/// The host's intent for one tick.
///
/// Cursor positions are in world pixels; hosts convert from screen
/// space with [`Camera::screen_to_world`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputFrame {
    /// Move left this tick.
    pub left: bool,
    /// Move right this tick.
    pub right: bool,
    /// Try to jump this tick.
    pub jump: bool,
    /// Swing at this world-pixel position.
    pub mine_at: Option<Vec2>,
    /// Place the selected block at this world-pixel position.
    pub place_at: Option<Vec2>,
    /// Advance the inventory selection to the next held kind.
    pub cycle_selection: bool,
}

/// Lifetime counters, exposed for HUDs and the headless harness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimStats {
    /// Ticks executed in the `Running` phase.
    pub ticks: u64,
    /// Blocks destroyed by mining.
    pub blocks_mined: u32,
    /// Blocks placed from the inventory.
    pub blocks_placed: u32,
    /// Drops merged into the inventory.
    pub drops_collected: u32,
    /// Drops culled out of view or bounds.
    pub drops_culled: u32,
    /// Granular blocks released into movers.
    pub granular_woken: u32,
    /// Movers written back as tiles.
    pub granular_settled: u32,
    /// Movers that fell out of the world.
    pub granular_lost: u32,
    /// Dirt tiles converted to grass.
    pub grass_grown: u32,
    /// Streaming sector boundary crossings.
    pub sectors_crossed: u32,
}

/// The live half of the simulation, built once generation finishes.
#[derive(Debug)]
struct RunningWorld {
    grid: WorldGrid,
    player: Player,
    drops: DropSet,
    settler: Settler,
    camera: Camera,
    /// Seed-derived stream for drop-spawn jitter.
    jitter_rng: ChaCha8Rng,
}

#[derive(Debug)]
enum Lifecycle {
    Generating(CaveGenerator),
    Running(Box<RunningWorld>),
    Spent,
}

/// The whole sandbox world behind one tick-driven handle.
#[derive(Debug)]
pub struct Simulation {
    config: WorldConfig,
    seed: WorldSeed,
    lifecycle: Lifecycle,
    events: EventQueue,
    stats: SimStats,
}

impl Simulation {
    /// Creates a simulation that will generate its world tick by tick.
    ///
    /// # Errors
    ///
    /// Returns a configuration error wrapped in [`SimError::Generation`]
    /// when the config fails validation.
    pub fn new(config: &WorldConfig, seed: WorldSeed) -> SimResult<Self> {
        let generator = CaveGenerator::new(config, seed)?;
        Ok(Self {
            config: config.clone(),
            seed,
            lifecycle: Lifecycle::Generating(generator),
            events: EventQueue::new(),
            stats: SimStats::default(),
        })
    }

    /// Creates a simulation over a ready-made blueprint, skipping
    /// generation. Used by tests and tools that need exact terrain.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Generation`] for an invalid config or a
    /// blueprint with no standable spawn cell.
    pub fn with_blueprint(
        config: &WorldConfig,
        seed: WorldSeed,
        blueprint: Blueprint,
    ) -> SimResult<Self> {
        config.validate().map_err(GenError::Config)?;
        let world = start_world(config, seed, blueprint)?;
        Ok(Self {
            config: config.clone(),
            seed,
            lifecycle: Lifecycle::Running(Box::new(world)),
            events: EventQueue::new(),
            stats: SimStats::default(),
        })
    }

    /// Which stage of its life the simulation is in.
    ///
    /// A spent simulation still reports `Generating`; its next tick
    /// returns the error again.
    #[must_use]
    pub fn phase(&self) -> SimPhase {
        match self.lifecycle {
            Lifecycle::Running(_) => SimPhase::Running,
            Lifecycle::Generating(_) | Lifecycle::Spent => SimPhase::Generating,
        }
    }

    /// Generation progress, while generating.
    #[must_use]
    pub fn progress(&self) -> Option<GenProgress> {
        match &self.lifecycle {
            Lifecycle::Generating(generator) => Some(generator.progress()),
            _ => None,
        }
    }

    /// Lifetime counters.
    #[must_use]
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// The seed this world derives from.
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Drains the events queued since the last drain.
    pub fn take_events(&mut self) -> Vec<WorldEvent> {
        self.events.take()
    }

    /// The live grid, once running.
    #[must_use]
    pub fn world(&self) -> Option<&WorldGrid> {
        match &self.lifecycle {
            Lifecycle::Running(world) => Some(&world.grid),
            _ => None,
        }
    }

    /// Mutable access to the live grid, once running.
    pub fn world_mut(&mut self) -> Option<&mut WorldGrid> {
        match &mut self.lifecycle {
            Lifecycle::Running(world) => Some(&mut world.grid),
            _ => None,
        }
    }

    /// The player, once running.
    #[must_use]
    pub fn player(&self) -> Option<&Player> {
        match &self.lifecycle {
            Lifecycle::Running(world) => Some(&world.player),
            _ => None,
        }
    }

    /// Mutable access to the player, once running.
    pub fn player_mut(&mut self) -> Option<&mut Player> {
        match &mut self.lifecycle {
            Lifecycle::Running(world) => Some(&mut world.player),
            _ => None,
        }
    }

    /// The live drops, once running.
    #[must_use]
    pub fn drops(&self) -> Option<&DropSet> {
        match &self.lifecycle {
            Lifecycle::Running(world) => Some(&world.drops),
            _ => None,
        }
    }

    /// The camera, once running.
    #[must_use]
    pub fn camera(&self) -> Option<&Camera> {
        match &self.lifecycle {
            Lifecycle::Running(world) => Some(&world.camera),
            _ => None,
        }
    }

    /// Advances the world one step and reports the phase it is now in.
    ///
    /// While generating, one tick runs one generation phase and the
    /// input frame is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Generation`] if the finished terrain offers
    /// no spawn cell, and [`SimError::Spent`] on every call after that.
    pub fn tick(&mut self, input: &InputFrame) -> SimResult<SimPhase> {
        match &mut self.lifecycle {
            Lifecycle::Generating(generator) => {
                generator.step();
                if generator.is_done() {
                    self.go_live()?;
                }
                Ok(self.phase())
            }
            Lifecycle::Running(world) => {
                run_tick(
                    world,
                    input,
                    &self.config,
                    &mut self.events,
                    &mut self.stats,
                );
                Ok(SimPhase::Running)
            }
            Lifecycle::Spent => Err(SimError::Spent),
        }
    }

    /// Seals the blueprint and brings the world up.
    fn go_live(&mut self) -> SimResult<()> {
        let Lifecycle::Generating(generator) =
            std::mem::replace(&mut self.lifecycle, Lifecycle::Spent)
        else {
            return Err(SimError::Spent);
        };
        let blueprint = generator.try_finish()?;
        let world = start_world(&self.config, self.seed, blueprint)?;
        self.lifecycle = Lifecycle::Running(Box::new(world));
        Ok(())
    }
}

/// Builds the running world: spawn search, initial streaming, camera.
fn start_world(
    config: &WorldConfig,
    seed: WorldSeed,
    blueprint: Blueprint,
) -> Result<RunningWorld, GenError> {
    let (spawn_x, spawn_y) = pick_spawn(&blueprint, config.horizon, seed)?;

    // The spawn cell's floor is at (spawn_y + 1) tiles; the player is a
    // tile and a half tall, so their feet land exactly on it.
    #[allow(clippy::cast_precision_loss)]
    let spawn = Vec2::new(
        spawn_x as f32 * config.tile_size,
        spawn_y as f32 * config.tile_size - config.tile_size * 0.5,
    );
    let player = Player::new(spawn, config);

    let mut grid = WorldGrid::new(config, blueprint);
    let sector = grid.sector_of_x(player.center().x);
    let loaded = grid.materialize_initial(sector);

    let mut camera = Camera::new(
        Vec2::new(config.view_width, config.view_height),
        Vec2::new(config.width_px(), config.height_px()),
    );
    camera.follow(player.center());

    tracing::info!(
        seed = seed.value(),
        spawn_x,
        spawn_y,
        sector,
        loaded,
        "world is live"
    );

    Ok(RunningWorld {
        grid,
        player,
        drops: DropSet::new(),
        settler: Settler::new(),
        camera,
        // Purpose 3: drop-spawn jitter stream
        jitter_rng: seed.derive(3).rng(),
    })
}

/// One running-phase step.
fn run_tick(
    world: &mut RunningWorld,
    input: &InputFrame,
    config: &WorldConfig,
    events: &mut EventQueue,
    stats: &mut SimStats,
) {
    restream_around_player(world, events, stats);

    let settle = world.settler.update(&mut world.grid, config, events);
    stats.granular_woken += settle.woken;
    stats.granular_settled += settle.settled;
    stats.granular_lost += settle.lost;
    stats.grass_grown += settle.grass_grown;

    world.player.apply_movement(input.left, input.right, config);
    if input.jump {
        world.player.try_jump(&world.grid, config);
    }
    physics::step_body(&mut world.player.body, &world.grid, config);

    if let Some(cursor) = input.mine_at {
        mine_at(world, cursor, config, events, stats);
    }
    if let Some(cursor) = input.place_at {
        place_at(world, cursor, events, stats);
    }
    if input.cycle_selection {
        world.player.inventory.cycle();
    }

    let view = world.camera.view_rect();
    let report = world
        .drops
        .update(&world.grid, &mut world.player, view, config, events);
    stats.drops_collected += report.collected;
    stats.drops_culled += report.culled;

    world.camera.follow(world.player.center());
    stats.ticks += 1;
}

/// Streams the sector window after the player's movement last tick.
fn restream_around_player(world: &mut RunningWorld, events: &mut EventQueue, stats: &mut SimStats) {
    let sector = world.grid.sector_of_x(world.player.center().x);
    let from = world.grid.current_sector();
    if sector != from {
        world.grid.restream(sector);
        events.push(WorldEvent::SectorChanged { from, to: sector });
        stats.sectors_crossed += 1;
    }
}

/// One mining swing at a cursor position.
fn mine_at(
    world: &mut RunningWorld,
    cursor: Vec2,
    config: &WorldConfig,
    events: &mut EventQueue,
    stats: &mut SimStats,
) {
    let (tx, ty) = world.grid.target_tile(cursor);
    match world.grid.mine(tx, ty) {
        MineOutcome::Nothing => {}
        MineOutcome::Damaged { kind, hits_left } => {
            events.push(WorldEvent::BlockDamaged {
                kind,
                tile: (tx, ty),
                hits_left,
            });
        }
        MineOutcome::Destroyed { kind, center } => {
            stats.blocks_mined += 1;
            events.push(WorldEvent::BlockMined {
                kind,
                tile: (tx, ty),
            });
            let jitter = world
                .jitter_rng
                .gen_range(-drops::SPAWN_JITTER..drops::SPAWN_JITTER);
            world.drops.spawn(kind, center, jitter, config, events);
        }
    }
}

/// One placement attempt at a cursor position.
///
/// A cell the player's body overlaps is refused; a block may not be
/// placed inside them.
fn place_at(
    world: &mut RunningWorld,
    cursor: Vec2,
    events: &mut EventQueue,
    stats: &mut SimStats,
) {
    let (tx, ty) = world.grid.target_tile(cursor);
    let cell = Aabb::from_tile(tx, ty, world.grid.tile_size());
    if cell.overlaps(&world.player.body.aabb()) {
        return;
    }
    if let Some(kind) = world
        .grid
        .place_from_inventory(tx, ty, &mut world.player.inventory)
    {
        stats.blocks_placed += 1;
        events.push(WorldEvent::BlockPlaced {
            kind,
            tile: (tx, ty),
        });
    }
}
