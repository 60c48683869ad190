//! The live world: block entities and the sector-streamed grid.

pub mod block;
pub mod grid;

pub use block::Block;
pub use grid::{MineOutcome, RestreamStats, WorldGrid};
