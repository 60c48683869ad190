//! # STRATA Simulation
//!
//! The running sandbox world: a procedurally carved tile map streamed
//! in sectors around the player, with tile physics, granular settling,
//! mining, drops, and an inventory.
//!
//! ## Architecture
//!
//! ```text
//! CaveGenerator ──(Blueprint)──> WorldGrid <──── collisions ──── physics
//!                                   │  ▲
//!                     sector stream │  │ settle / mine / place
//!                                   ▼  │
//!              Simulation tick: settle -> player -> mine/place -> drops
//!                                   │
//!                                   └──> EventQueue (drained by the host)
//! ```
//!
//! Everything is single-threaded and fixed-timestep: one call to
//! [`Simulation::tick`] is one simulation step. The only multi-tick
//! construct is world generation, which runs one phase per tick while
//! the simulation is in its `Generating` phase.
//!
//! Hosts draw the world from plain data (positions, tile kinds, colors)
//! and feed back an [`InputFrame`] per tick; nothing here touches a
//! window, GPU, or input device.
//!
//! ## Example
//!
//! ```
//! use strata::{InputFrame, SimPhase, Simulation};
//! use strata_core::WorldConfig;
//! use strata_procedural::WorldSeed;
//!
//! let config = WorldConfig {
//!     width: 60,
//!     height: 40,
//!     horizon: 10,
//!     sector_width: 20,
//!     ..WorldConfig::default()
//! };
//! let mut sim = Simulation::new(&config, WorldSeed::new(42)).expect("valid config");
//!
//! // Drive generation one phase per tick, then play.
//! let input = InputFrame::default();
//! while sim.phase() == SimPhase::Generating {
//!     sim.tick(&input).expect("seed 42 offers a spawn");
//! }
//! assert_eq!(sim.phase(), SimPhase::Running);
//! sim.tick(&input).expect("running world ticks");
//! assert_eq!(sim.stats().ticks, 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod camera;
pub mod events;
pub mod gameplay;
pub mod physics;
pub mod sim;
pub mod world;

pub use camera::Camera;
pub use events::{EventQueue, WorldEvent};
pub use gameplay::drops::{Drop, DropSet};
pub use gameplay::inventory::Inventory;
pub use gameplay::player::Player;
pub use gameplay::settle::Settler;
pub use physics::{BodyCaps, PhysicsBody, StepOutcome};
pub use sim::{InputFrame, SimError, SimPhase, SimResult, SimStats, Simulation};
pub use world::grid::{MineOutcome, WorldGrid};
