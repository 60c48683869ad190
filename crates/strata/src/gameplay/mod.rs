//! Player-facing entities and behaviors: the player body, inventory,
//! dropped pickups, and granular settling.

pub mod drops;
pub mod inventory;
pub mod player;
pub mod settle;

pub use drops::{Drop, DropSet};
pub use inventory::Inventory;
pub use player::Player;
pub use settle::Settler;
