//! # Strata Core
//!
//! Foundation types for the STRATA sandbox simulation.
//!
//! ## Design Principles
//!
//! - **Host-agnostic**: nothing here knows about windows, GPUs, or input
//!   devices; hosts consume plain data (positions, kinds, colors).
//! - **Fail fast**: configuration is validated once, before any world
//!   work begins, so simulation code never re-checks its invariants.
//! - **Deterministic**: no hidden global state; identical inputs give
//!   identical results on every platform.
//!
//! ## Core Components
//!
//! - [`math`]: 2D vector and AABB types shared with the render boundary
//! - [`tile`]: the material table (hardness, color, granular behavior)
//! - [`config`]: validated world configuration with TOML loading
//! - [`quadtree`]: spatial index for proximity queries
//!
//! ## Example
//!
//! ```
//! use strata_core::{TileKind, WorldConfig};
//!
//! let config = WorldConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.sector_count(), 30);
//! assert!(TileKind::Sand.is_granular());
//! assert!(!TileKind::Stone.is_breakable());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod math;
pub mod quadtree;
pub mod tile;

pub use config::{ConfigError, ConfigResult, WorldConfig};
pub use math::{Aabb, Vec2};
pub use quadtree::Quadtree;
pub use tile::{TileKind, TILE_KIND_COUNT};
