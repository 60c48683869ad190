//! # STRATA Procedural Generation
//!
//! Deterministic cave generation for reproducible sandbox worlds.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same world
//! 2. **Incremental**: One generation phase per call, never block a tick
//! 3. **Pure passes**: Every phase maps the previous field to a fresh one
//! 4. **Total accessors**: Out-of-bounds reads are open air, never faults
//!
//! ## Core Components
//!
//! - `WorldSeed`: One u64 every random stream derives from
//! - `Blueprint`: The static tile field the live world streams from
//! - `CaveGenerator`: Cellular-automaton carving as a resumable state machine
//! - `pick_spawn`: Standable-surface discovery with fail-fast errors
//!
//! ## Example
//!
//! ```
//! use strata_core::WorldConfig;
//! use strata_procedural::{pick_spawn, CaveGenerator, WorldSeed};
//!
//! let config = WorldConfig::default();
//! let seed = WorldSeed::new(42);
//!
//! let mut generator = CaveGenerator::new(&config, seed).expect("valid config");
//! while !generator.is_done() {
//!     let progress = generator.progress();
//!     assert!(progress.completed < progress.total);
//!     generator.step();
//! }
//!
//! let blueprint = generator.try_finish().expect("generation ran to the end");
//! let (x, y) = pick_spawn(&blueprint, config.horizon, seed).expect("standable surface");
//! assert!(blueprint.is_solid(x, y + 1));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod blueprint;
pub mod generator;
pub mod seed;

pub use blueprint::Blueprint;
pub use generator::{pick_spawn, CaveGenerator, GenError, GenPhase, GenProgress, GenResult};
pub use seed::WorldSeed;
