//! # World Configuration
//!
//! All tunables for generation, physics, and streaming in one validated
//! struct. Loaded once at startup; nothing reads environment state later.
//!
//! Validation is fail-fast: a config that passes [`WorldConfig::validate`]
//! cannot make the simulation index out of range or divide by zero, so the
//! hot path carries no re-checks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::Vec2;

/// Errors produced by configuration validation or parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Map smaller than the 3x3 minimum border stamping needs.
    #[error("map of {width}x{height} tiles is too small, minimum is 3x3")]
    MapTooSmall {
        /// Configured width in tiles
        width: usize,
        /// Configured height in tiles
        height: usize,
    },

    /// Horizon row at or below the bottom of the map.
    #[error("horizon row {horizon} must be below the map height of {height} rows")]
    HorizonOutOfRange {
        /// Configured horizon row
        horizon: usize,
        /// Configured height in tiles
        height: usize,
    },

    /// Tile size must be a positive pixel count.
    #[error("tile size must be positive, got {0}")]
    NonPositiveTileSize(f32),

    /// Cave fill probability outside the unit interval.
    #[error("fill probability {0} is outside [0, 1]")]
    ProbabilityOutOfRange(f64),

    /// A neighbor-count threshold outside the 8-neighborhood range.
    #[error("{name} of {value} is outside the neighbor range 0..=8")]
    NeighborLimitOutOfRange {
        /// Which threshold failed
        name: &'static str,
        /// The offending value
        value: u8,
    },

    /// Sector width of zero or wider than the whole map.
    #[error("sector width {sector_width} is invalid for a {width}-column map")]
    BadSectorWidth {
        /// Configured sector width in columns
        sector_width: usize,
        /// Configured map width in tiles
        width: usize,
    },

    /// A quantity that must be strictly positive was not.
    #[error("{name} must be positive, got {value}")]
    NonPositive {
        /// Which field failed
        name: &'static str,
        /// The offending value
        value: f32,
    },

    /// Friction must damp velocity, so it is strictly negative.
    #[error("player friction must be negative, got {0}")]
    NonNegativeFriction(f32),

    /// The TOML text could not be parsed at all.
    #[error("config parse failure: {0}")]
    Parse(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Complete tunable surface of the sandbox core.
///
/// Defaults reproduce the reference world: a 420x120 tile map with
/// 16 px tiles, a sky horizon at row 20, and 30 streaming sectors of
/// 14 columns each.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Edge length of one square tile in world pixels.
    pub tile_size: f32,
    /// Map width in tiles.
    pub width: usize,
    /// Map height in tiles.
    pub height: usize,
    /// First row that generation may fill; everything above is sky.
    pub horizon: usize,
    /// Streaming sector width in tile columns.
    pub sector_width: usize,

    /// Probability that a cell below the horizon seeds as solid.
    pub fill_probability: f64,
    /// A solid cell survives a smoothing step at this many solid neighbors.
    pub death_limit: u8,
    /// An open cell solidifies at this many solid neighbors.
    pub birth_limit: u8,
    /// An open cell this enclosed becomes an ore deposit.
    pub treasure_limit: u8,
    /// Number of smoothing iterations.
    pub smoothing_steps: u32,

    /// Downward acceleration applied to gravity-affected bodies, per tick.
    pub gravity: f32,
    /// Horizontal acceleration applied per tick of held input.
    pub player_speed: f32,
    /// Velocity-proportional horizontal damping (negative).
    pub player_friction: f32,
    /// Upward impulse applied on a grounded jump.
    pub jump_speed: f32,

    /// Maximum count an inventory slot can hold.
    pub inventory_cap: u16,
    /// Ticks of sun exposure before dirt turns to grass.
    pub grass_age_threshold: u32,

    /// Host viewport width in world pixels, for camera clamping.
    pub view_width: f32,
    /// Host viewport height in world pixels.
    pub view_height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tile_size: 16.0,
            width: 420,
            height: 120,
            horizon: 20,
            sector_width: 14,
            fill_probability: 0.38,
            death_limit: 3,
            birth_limit: 4,
            treasure_limit: 5,
            smoothing_steps: 5,
            gravity: 1.0,
            player_speed: 0.5,
            player_friction: -0.12,
            jump_speed: 10.0,
            inventory_cap: 999,
            grass_age_threshold: 600,
            view_width: 400.0,
            view_height: 300.0,
        }
    }
}

impl WorldConfig {
    /// Parses a TOML document and validates the result.
    ///
    /// Missing keys fall back to defaults, so hosts may ship partial files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML, otherwise any
    /// validation error for the parsed values.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every invariant the simulation depends on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width < 3 || self.height < 3 {
            return Err(ConfigError::MapTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        if self.horizon >= self.height {
            return Err(ConfigError::HorizonOutOfRange {
                horizon: self.horizon,
                height: self.height,
            });
        }
        if self.tile_size <= 0.0 {
            return Err(ConfigError::NonPositiveTileSize(self.tile_size));
        }
        if !(0.0..=1.0).contains(&self.fill_probability) {
            return Err(ConfigError::ProbabilityOutOfRange(self.fill_probability));
        }
        for (name, value) in [
            ("death limit", self.death_limit),
            ("birth limit", self.birth_limit),
            ("treasure limit", self.treasure_limit),
        ] {
            if value > 8 {
                return Err(ConfigError::NeighborLimitOutOfRange { name, value });
            }
        }
        if self.sector_width == 0 || self.sector_width > self.width {
            return Err(ConfigError::BadSectorWidth {
                sector_width: self.sector_width,
                width: self.width,
            });
        }
        for (name, value) in [
            ("gravity", self.gravity),
            ("player speed", self.player_speed),
            ("jump speed", self.jump_speed),
            ("view width", self.view_width),
            ("view height", self.view_height),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if self.player_friction >= 0.0 {
            return Err(ConfigError::NonNegativeFriction(self.player_friction));
        }
        Ok(())
    }

    /// Map width in world pixels.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn width_px(&self) -> f32 {
        self.width as f32 * self.tile_size
    }

    /// Map height in world pixels.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn height_px(&self) -> f32 {
        self.height as f32 * self.tile_size
    }

    /// Number of streaming sectors across the map.
    ///
    /// A trailing partial strip counts as a full sector.
    #[must_use]
    pub fn sector_count(&self) -> usize {
        self.width.div_ceil(self.sector_width)
    }

    /// Largest downward speed a body may reach, in pixels per tick.
    ///
    /// Kept under one tile so a falling body cannot skip a floor.
    #[must_use]
    pub fn terminal_fall_speed(&self) -> f32 {
        self.tile_size / 2.0 - 1.0
    }

    /// Player hitbox size: one tile wide, one and a half tall.
    #[must_use]
    pub fn player_size(&self) -> Vec2 {
        Vec2::new(self.tile_size, self.tile_size * 1.5)
    }

    /// Dropped-item hitbox size.
    #[must_use]
    pub fn drop_size(&self) -> Vec2 {
        Vec2::new(self.tile_size * 0.625, self.tile_size * 0.625)
    }

    /// Squared distance at which drops start homing toward the player.
    #[must_use]
    pub fn drop_magnet_range_squared(&self) -> f32 {
        self.tile_size * self.tile_size * 3.0
    }
}
