use std::str::FromStr;

use crate::game::constants::world;
use crate::util::vec2::Vec2;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("max_cells must be at least 1")]
    ZeroCellCap,
    #[error("cell spawn interval must be a non-negative number of seconds, got {0}")]
    InvalidSpawnInterval(f64),
    #[error("viewport must be positive, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
    #[error("world must be positive, got {width}x{height}")]
    InvalidWorldSize { width: f32, height: f32 },
    #[error("tick rate must be at least 1 Hz")]
    ZeroTickRate,
}

/// Simulation configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldConfig {
    /// Minimum seconds between two cell spawns
    pub cell_spawn_interval: f64,
    /// Cell population cap
    pub max_cells: usize,
    /// Spawn attempts per tick (each still gated by the interval)
    pub spawn_attempts_per_tick: usize,
    pub grid_width: usize,
    pub grid_height: usize,
    /// Enemies are topped up to this count, one per tick
    pub max_enemies: usize,
    /// Enemy visibility window radius, in buckets
    pub vision_radius: usize,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Draw per-bucket occupancy counts
    pub debug: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            cell_spawn_interval: world::CELL_SPAWN_INTERVAL,
            max_cells: world::MAX_CELLS,
            spawn_attempts_per_tick: world::SPAWN_ATTEMPTS_PER_TICK,
            grid_width: world::GRID_SIZE,
            grid_height: world::GRID_SIZE,
            max_enemies: world::MAX_ENEMIES,
            vision_radius: world::VISION_RADIUS,
            viewport_width: world::VIEWPORT_WIDTH,
            viewport_height: world::VIEWPORT_HEIGHT,
            debug: false,
        }
    }
}

impl WorldConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        env_override("CELL_SPAWN_INTERVAL", &mut config.cell_spawn_interval);
        env_override("MAX_CELLS", &mut config.max_cells);
        env_override("CELLS_PER_TICK", &mut config.spawn_attempts_per_tick);
        env_override("GRID_WIDTH", &mut config.grid_width);
        env_override("GRID_HEIGHT", &mut config.grid_height);
        env_override("MAX_ENEMIES", &mut config.max_enemies);
        env_override("VISION_RADIUS", &mut config.vision_radius);
        env_override("VIEWPORT_WIDTH", &mut config.viewport_width);
        env_override("VIEWPORT_HEIGHT", &mut config.viewport_height);

        if let Ok(debug) = std::env::var("DEBUG") {
            config.debug = matches!(debug.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if self.max_cells == 0 {
            return Err(ConfigError::ZeroCellCap);
        }
        if !(self.cell_spawn_interval.is_finite() && self.cell_spawn_interval >= 0.0) {
            return Err(ConfigError::InvalidSpawnInterval(self.cell_spawn_interval));
        }
        if !(self.viewport_width > 0.0 && self.viewport_height > 0.0) {
            return Err(ConfigError::InvalidViewport {
                width: self.viewport_width,
                height: self.viewport_height,
            });
        }
        Ok(())
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.viewport_width, self.viewport_height)
    }
}

/// Headless driver configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub world_width: f32,
    pub world_height: f32,
    /// Ticks per second
    pub tick_rate: u32,
    /// Stop after this many ticks (or earlier, on player death)
    pub max_ticks: u64,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            world_width: 2000.0,
            world_height: 2000.0,
            tick_rate: 30,
            max_ticks: 900,
            seed: None,
        }
    }
}

impl RunConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        env_override("WORLD_WIDTH", &mut config.world_width);
        env_override("WORLD_HEIGHT", &mut config.world_height);
        env_override("TICK_RATE", &mut config.tick_rate);
        env_override("MAX_TICKS", &mut config.max_ticks);

        if let Ok(seed) = std::env::var("SEED") {
            match seed.parse::<u64>() {
                Ok(parsed) => config.seed = Some(parsed),
                Err(_) => tracing::warn!("Invalid SEED '{}', using a random seed", seed),
            }
        }

        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.world_width.is_finite()
            && self.world_height.is_finite()
            && self.world_width > 0.0
            && self.world_height > 0.0)
        {
            return Err(ConfigError::InvalidWorldSize {
                width: self.world_width,
                height: self.world_height,
            });
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        Ok(())
    }
}

/// Overwrite `target` with the parsed value of `key`, keeping the default on parse failure
fn env_override<T: FromStr>(key: &str, target: &mut T) {
    if let Ok(raw) = std::env::var(key) {
        match raw.parse::<T>() {
            Ok(parsed) => *target = parsed,
            Err(_) => tracing::warn!("Invalid {} '{}', using default", key, raw),
        }
    }
}
