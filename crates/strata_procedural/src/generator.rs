//! # Cave Generator
//!
//! Incremental cellular-automaton carving of the world blueprint.
//!
//! ## Phase Model
//!
//! Generation runs as a fixed sequence of phases, one per call to
//! [`CaveGenerator::step`]:
//!
//! ```text
//! Seed -> Smooth(0..N) -> Shape -> Grass -> Treasure -> Done
//! ```
//!
//! The caller owns the cadence: a host that wants a loading bar calls
//! `step` once per frame and reads [`CaveGenerator::progress`]; a
//! headless tool calls [`CaveGenerator::run_to_completion`]. Nothing
//! blocks and nothing runs in the background; the generator is a
//! resumable state machine, not a coroutine.
//!
//! Every phase reads the previous field and writes a fresh one, so no
//! pass ever observes its own partial output.
//!
//! ## The Automaton
//!
//! Cells outside the map count as solid neighbors, which biases the
//! smoothing rule toward closed cave walls at the map edge. The rule is
//! asymmetric on purpose: solid cells survive at 3+ solid neighbors
//! while open cells solidify only at 4+, which carves connected caverns
//! instead of uniform noise.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use strata_core::{ConfigError, TileKind, WorldConfig};

use crate::blueprint::Blueprint;
use crate::seed::WorldSeed;

/// Errors produced during world generation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenError {
    /// Configuration failed validation before any generation work.
    #[error("configuration rejected: {0}")]
    Config(#[from] ConfigError),

    /// A finished blueprint was requested before all phases ran.
    #[error("generation incomplete: {completed}/{total} phases done")]
    Incomplete {
        /// Phases already executed
        completed: u32,
        /// Phases in the whole pipeline
        total: u32,
    },

    /// The generated terrain has no standable surface to spawn on.
    #[error("seed {seed} produced no valid spawn position")]
    NoSpawnPoint {
        /// The offending world seed
        seed: u64,
    },
}

/// Result type for generation operations.
pub type GenResult<T> = Result<T, GenError>;

/// The phase the generator will execute next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenPhase {
    /// Scatter solid cells below the horizon.
    Seed,
    /// One automaton smoothing iteration (0-based).
    Smooth(u32),
    /// Clear the sky and stamp the indestructible border.
    Shape,
    /// Convert exposed surface dirt to grass.
    Grass,
    /// Fill almost-enclosed pockets with ore.
    Treasure,
    /// Everything has run; the blueprint is final.
    Done,
}

impl GenPhase {
    /// Short label for progress displays.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Seed => "seeding",
            Self::Smooth(_) => "smoothing",
            Self::Shape => "shaping",
            Self::Grass => "growing grass",
            Self::Treasure => "placing treasure",
            Self::Done => "done",
        }
    }
}

/// Progress report for a loading indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenProgress {
    /// Phases already executed.
    pub completed: u32,
    /// Total phases in the pipeline.
    pub total: u32,
}

impl GenProgress {
    /// Completion as a fraction in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f32 / self.total as f32
        }
    }
}

/// Incremental cave generator over one blueprint.
///
/// Holds the evolving field plus an explicit phase cursor; see the
/// module docs for the phase sequence.
#[derive(Debug)]
pub struct CaveGenerator {
    /// Tunables captured at construction.
    config: WorldConfig,
    /// Seed this world derives from, kept for error reporting.
    seed: WorldSeed,
    /// Random stream for the seeding phase.
    rng: ChaCha8Rng,
    /// The field being generated.
    field: Blueprint,
    /// Next phase to execute.
    phase: GenPhase,
    /// Phases executed so far.
    completed: u32,
}

impl CaveGenerator {
    /// Creates a generator for a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Config`] if the configuration is invalid; this
    /// is the startup gate, nothing later re-validates.
    pub fn new(config: &WorldConfig, seed: WorldSeed) -> GenResult<Self> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            seed,
            // Purpose 1: cave seeding stream
            rng: seed.derive(1).rng(),
            field: Blueprint::new(config.width, config.height),
            phase: GenPhase::Seed,
            completed: 0,
        })
    }

    /// The phase that the next [`CaveGenerator::step`] will run.
    #[must_use]
    pub const fn phase(&self) -> GenPhase {
        self.phase
    }

    /// Whether every phase has executed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.phase == GenPhase::Done
    }

    /// Step counter and total for loading displays.
    #[must_use]
    pub const fn progress(&self) -> GenProgress {
        GenProgress {
            completed: self.completed,
            total: self.config.smoothing_steps + 4,
        }
    }

    /// Read access to the evolving field, e.g. for a generation preview.
    #[must_use]
    pub const fn blueprint(&self) -> &Blueprint {
        &self.field
    }

    /// Executes one phase and returns the phase now pending.
    ///
    /// Calling after completion is a no-op that returns
    /// [`GenPhase::Done`].
    pub fn step(&mut self) -> GenPhase {
        let current = self.phase;
        let next = match current {
            GenPhase::Seed => {
                self.run_seed();
                if self.config.smoothing_steps > 0 {
                    GenPhase::Smooth(0)
                } else {
                    GenPhase::Shape
                }
            }
            GenPhase::Smooth(i) => {
                self.field = smooth_pass(
                    &self.field,
                    self.config.death_limit,
                    self.config.birth_limit,
                );
                if i + 1 < self.config.smoothing_steps {
                    GenPhase::Smooth(i + 1)
                } else {
                    GenPhase::Shape
                }
            }
            GenPhase::Shape => {
                self.run_shape();
                GenPhase::Grass
            }
            GenPhase::Grass => {
                self.field = grass_pass(&self.field);
                GenPhase::Treasure
            }
            GenPhase::Treasure => {
                self.field = treasure_pass(&self.field, self.config.treasure_limit);
                GenPhase::Done
            }
            GenPhase::Done => return GenPhase::Done,
        };

        self.completed += 1;
        self.phase = next;
        tracing::debug!(
            phase = current.label(),
            completed = self.completed,
            total = self.progress().total,
            "generation phase complete"
        );
        if next == GenPhase::Done {
            tracing::info!(
                seed = self.seed.value(),
                solid = self.field.solid_count(),
                "world generation finished"
            );
        }
        next
    }

    /// Runs every remaining phase back to back.
    pub fn run_to_completion(&mut self) {
        while !self.is_done() {
            self.step();
        }
    }

    /// Consumes the generator, yielding the finished blueprint.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Incomplete`] if phases remain.
    pub fn try_finish(self) -> GenResult<Blueprint> {
        if self.is_done() {
            Ok(self.field)
        } else {
            let progress = self.progress();
            Err(GenError::Incomplete {
                completed: progress.completed,
                total: progress.total,
            })
        }
    }

    /// Scatters solid cells below the horizon, leaving the bottom row
    /// for the border stamp.
    fn run_seed(&mut self) {
        let last_row = self.field.height().saturating_sub(1);
        for y in self.config.horizon..last_row {
            for x in 0..self.field.width() {
                if self.rng.gen::<f64>() < self.config.fill_probability {
                    self.field.set(x, y, Some(TileKind::Dirt));
                }
            }
        }
    }

    /// Clears everything above the horizon, then seals the left, right,
    /// and bottom edges with unbreakable stone. The side walls run the
    /// full map height, sky included.
    fn run_shape(&mut self) {
        let width = self.field.width();
        let height = self.field.height();
        for y in 0..self.config.horizon.min(height) {
            for x in 0..width {
                self.field.set(x, y, None);
            }
        }
        for y in 0..height {
            self.field.set(0, y, Some(TileKind::Stone));
            self.field.set(width - 1, y, Some(TileKind::Stone));
        }
        for x in 0..width {
            self.field.set(x, height - 1, Some(TileKind::Stone));
        }
    }
}

/// One automaton iteration: pure function from field to field.
fn smooth_pass(field: &Blueprint, death_limit: u8, birth_limit: u8) -> Blueprint {
    let mut next = Blueprint::new(field.width(), field.height());
    for y in 0..field.height() {
        for x in 0..field.width() {
            let neighbors = field.solid_neighbors(x, y);
            let alive = if field.is_solid(x, y) {
                neighbors >= death_limit
            } else {
                neighbors >= birth_limit
            };
            if alive {
                next.set(x, y, field.get(x, y).or(Some(TileKind::Dirt)));
            }
        }
    }
    next
}

/// Surface detection: interior solid cells with open air above and
/// support below become grass.
fn grass_pass(field: &Blueprint) -> Blueprint {
    let mut next = field.clone();
    for y in 1..field.height().saturating_sub(1) {
        for x in 1..field.width().saturating_sub(1) {
            if field.is_solid(x, y) && !field.is_solid(x, y - 1) && field.is_solid(x, y + 1) {
                next.set(x, y, Some(TileKind::Grass));
            }
        }
    }
    next
}

/// Enclosure detection: interior open cells with `treasure_limit` or
/// more solid neighbors become ore deposits.
fn treasure_pass(field: &Blueprint, treasure_limit: u8) -> Blueprint {
    let mut next = field.clone();
    for y in 1..field.height().saturating_sub(1) {
        for x in 1..field.width().saturating_sub(1) {
            if !field.is_solid(x, y) && field.solid_neighbors(x, y) >= treasure_limit {
                next.set(x, y, Some(TileKind::Ore));
            }
        }
    }
    next
}

/// Picks the spawn tile for a freshly generated world.
///
/// The choice is uniform over all standable surface cells above the
/// horizon, drawn from a seed-derived stream so it is reproducible.
///
/// # Errors
///
/// Returns [`GenError::NoSpawnPoint`] when the terrain offers no
/// standable cell, which makes the seed unusable rather than spawning
/// the player inside rock.
pub fn pick_spawn(
    blueprint: &Blueprint,
    horizon: usize,
    seed: WorldSeed,
) -> GenResult<(usize, usize)> {
    let candidates = blueprint.spawn_candidates(horizon);
    if candidates.is_empty() {
        return Err(GenError::NoSpawnPoint { seed: seed.value() });
    }
    // Purpose 2: spawn choice stream
    let mut rng = seed.derive(2).rng();
    let choice = rng.gen_range(0..candidates.len());
    tracing::info!(
        x = candidates[choice].0,
        y = candidates[choice].1,
        candidates = candidates.len(),
        "spawn position selected"
    );
    Ok(candidates[choice])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> WorldConfig {
        WorldConfig {
            width: 40,
            height: 30,
            horizon: 10,
            sector_width: 10,
            smoothing_steps: 5,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn test_phases_advance_in_order() {
        let config = WorldConfig {
            smoothing_steps: 2,
            ..small_config()
        };
        let mut gen = CaveGenerator::new(&config, WorldSeed::new(7)).unwrap();
        assert_eq!(gen.phase(), GenPhase::Seed);

        assert_eq!(gen.step(), GenPhase::Smooth(0));
        assert_eq!(gen.step(), GenPhase::Smooth(1));
        assert_eq!(gen.step(), GenPhase::Shape);
        assert_eq!(gen.step(), GenPhase::Grass);
        assert_eq!(gen.step(), GenPhase::Treasure);
        assert_eq!(gen.step(), GenPhase::Done);
        assert!(gen.is_done());
        assert_eq!(gen.progress().completed, gen.progress().total);

        // Stepping past the end stays done and counts nothing
        assert_eq!(gen.step(), GenPhase::Done);
        assert_eq!(gen.progress().completed, gen.progress().total);
    }

    #[test]
    fn test_invalid_config_is_rejected_up_front() {
        let config = WorldConfig {
            width: 2,
            height: 2,
            ..WorldConfig::default()
        };
        assert!(matches!(
            CaveGenerator::new(&config, WorldSeed::new(1)),
            Err(GenError::Config(_))
        ));
    }

    #[test]
    fn test_unfinished_blueprint_is_withheld() {
        let mut gen = CaveGenerator::new(&small_config(), WorldSeed::new(7)).unwrap();
        gen.step();
        let err = gen.try_finish().unwrap_err();
        assert!(matches!(err, GenError::Incomplete { completed: 1, .. }));
    }

    #[test]
    fn test_seeding_respects_horizon_and_bottom_row() {
        let config = small_config();
        let mut gen = CaveGenerator::new(&config, WorldSeed::new(42)).unwrap();
        gen.step();

        let field = gen.blueprint();
        assert!(field.solid_count() > 0, "p=0.38 over 40x19 cells");
        for y in 0..config.horizon {
            for x in 0..config.width {
                assert_eq!(field.get(x, y), None, "sky seeded at ({x}, {y})");
            }
        }
        for x in 0..config.width {
            assert_eq!(field.get(x, config.height - 1), None);
        }
    }

    #[test]
    fn test_generation_is_deterministic_per_seed() {
        let config = small_config();

        let mut a = CaveGenerator::new(&config, WorldSeed::new(42)).unwrap();
        a.run_to_completion();
        let mut b = CaveGenerator::new(&config, WorldSeed::new(42)).unwrap();
        b.run_to_completion();
        assert_eq!(
            a.try_finish().unwrap(),
            b.try_finish().unwrap(),
            "same seed must give identical worlds"
        );

        let mut c = CaveGenerator::new(&config, WorldSeed::new(43)).unwrap();
        c.run_to_completion();
        let mut d = CaveGenerator::new(&config, WorldSeed::new(42)).unwrap();
        d.run_to_completion();
        assert_ne!(c.try_finish().unwrap(), d.try_finish().unwrap());
    }

    #[test]
    fn test_sky_and_border_invariants() {
        let config = small_config();
        let mut gen = CaveGenerator::new(&config, WorldSeed::new(42)).unwrap();
        gen.run_to_completion();
        let field = gen.try_finish().unwrap();

        // Interior sky is empty; the side walls may cut through it
        for y in 0..config.horizon {
            for x in 1..config.width - 1 {
                assert_eq!(field.get(x, y), None, "sky not clear at ({x}, {y})");
            }
        }
        for y in 0..config.height {
            assert_eq!(field.get(0, y), Some(TileKind::Stone));
            assert_eq!(field.get(config.width - 1, y), Some(TileKind::Stone));
        }
        for x in 0..config.width {
            assert_eq!(field.get(x, config.height - 1), Some(TileKind::Stone));
        }
    }

    #[test]
    fn test_smooth_pass_applies_asymmetric_rule() {
        // A lone solid cell dies (0 real neighbors, interior)
        let mut field = Blueprint::new(7, 7);
        field.set(3, 3, Some(TileKind::Dirt));
        let next = smooth_pass(&field, 3, 4);
        assert!(!next.is_solid(3, 3));

        // A cell with 3 neighbors survives but an open cell with 3 stays open
        let mut field = Blueprint::new(7, 7);
        field.set(3, 3, Some(TileKind::Dirt));
        field.set(2, 3, Some(TileKind::Dirt));
        field.set(4, 3, Some(TileKind::Dirt));
        field.set(3, 2, Some(TileKind::Dirt));
        let next = smooth_pass(&field, 3, 4);
        assert!(next.is_solid(3, 3), "3 neighbors keeps a solid cell alive");
        assert!(!next.is_solid(3, 4), "3 neighbors is below the birth limit");

        // An open cell with 4 neighbors is born
        let mut field = Blueprint::new(7, 7);
        field.set(2, 3, Some(TileKind::Dirt));
        field.set(4, 3, Some(TileKind::Dirt));
        field.set(3, 2, Some(TileKind::Dirt));
        field.set(3, 4, Some(TileKind::Dirt));
        let next = smooth_pass(&field, 3, 4);
        assert!(next.is_solid(3, 3), "4 neighbors births an open cell");
    }

    #[test]
    fn test_grass_needs_air_above_and_support_below() {
        let mut field = Blueprint::new(5, 5);
        field.set(2, 2, Some(TileKind::Dirt));
        field.set(2, 3, Some(TileKind::Dirt));
        let next = grass_pass(&field);
        assert_eq!(next.get(2, 2), Some(TileKind::Grass));
        // Supported from below but covered from above: stays dirt
        assert_eq!(next.get(2, 3), Some(TileKind::Dirt));
    }

    #[test]
    fn test_grass_converts_only_the_exposed_surface() {
        // A vertical column: only the top cell has open air above it,
        // the buried cells must stay dirt.
        let mut field = Blueprint::new(5, 6);
        for y in 2..5 {
            field.set(2, y, Some(TileKind::Dirt));
        }
        let next = grass_pass(&field);
        assert_eq!(next.get(2, 2), Some(TileKind::Grass));
        assert_eq!(next.get(2, 3), Some(TileKind::Dirt));
        assert_eq!(next.get(2, 4), Some(TileKind::Dirt));
    }

    #[test]
    fn test_treasure_fills_enclosed_pockets_only() {
        // Pocket at (2,2) with all 8 neighbors solid
        let mut field = Blueprint::new(5, 5);
        for y in 1..4 {
            for x in 1..4 {
                field.set(x, y, Some(TileKind::Dirt));
            }
        }
        field.set(2, 2, None);
        let next = treasure_pass(&field, 5);
        assert_eq!(next.get(2, 2), Some(TileKind::Ore));

        // Remove enough walls to fall under the limit
        let mut open_field = field.clone();
        open_field.set(1, 1, None);
        open_field.set(2, 1, None);
        open_field.set(3, 1, None);
        open_field.set(1, 2, None);
        let next = treasure_pass(&open_field, 5);
        assert_eq!(next.get(2, 2), None, "4 neighbors is under the limit");
    }

    #[test]
    fn test_pick_spawn_surfaces_hopeless_seeds() {
        let empty = Blueprint::new(10, 10);
        let err = pick_spawn(&empty, 5, WorldSeed::new(9)).unwrap_err();
        assert_eq!(err, GenError::NoSpawnPoint { seed: 9 });
    }

    #[test]
    fn test_pick_spawn_is_deterministic_and_standable() {
        let mut field = Blueprint::new(10, 10);
        for x in 0..10 {
            field.set(x, 4, Some(TileKind::Grass));
        }
        let a = pick_spawn(&field, 5, WorldSeed::new(42)).unwrap();
        let b = pick_spawn(&field, 5, WorldSeed::new(42)).unwrap();
        assert_eq!(a, b);

        let (x, y) = a;
        assert!(!field.is_solid(x, y));
        assert!(!field.is_solid(x, y - 1));
        assert!(field.is_solid(x, y + 1));
    }
}
