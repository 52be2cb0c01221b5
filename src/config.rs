use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::weighted::WeightError;

pub const APP_DIR_NAME: &str = "grid-snake";
const CONFIG_FILE_NAME: &str = "config.json";
const LOG_FILE_NAME: &str = "grid-snake.log";

/// Grid side length used when nothing else is configured.
pub const DEFAULT_GRID_SIDE: u16 = 20;

/// Base tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 75;

/// Default score file, relative to the working directory.
pub const DEFAULT_SCORES_PATH: &str = "scores.txt";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be non-zero (got {width}x{height})")]
    EmptyGrid { width: u16, height: u16 },
    #[error("tick interval must be at least 1 ms")]
    ZeroTickInterval,
    #[error("tick rate {field} must be non-zero")]
    ZeroTickRate { field: &'static str },
    #[error("food spawn chance {0} is outside [0, 1]")]
    SpawnChance(f64),
    #[error("invalid cell weights: {0}")]
    Weights(#[from] WeightError),
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Square grid with `side` cells per axis.
    #[must_use]
    pub fn square(side: u16) -> Self {
        Self::new(side, side)
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::square(10)
    }
}

/// Probabilities for each generated cell type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellWeights {
    pub empty: f64,
    pub block: f64,
    pub food: f64,
}

impl Default for CellWeights {
    fn default() -> Self {
        Self {
            empty: 0.90,
            block: 0.02,
            food: 0.08,
        }
    }
}

/// When and how often new food appears during play.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodSpawn {
    /// Spawning starts once the tick counter exceeds this value.
    pub activation_tick: u64,
    /// Per-tick probability of a spawn.
    pub chance: f64,
}

impl Default for FoodSpawn {
    fn default() -> Self {
        Self {
            activation_tick: 80,
            chance: 0.05,
        }
    }
}

/// Constants for `max(floor, base - length / divisor)`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickRate {
    pub base: u32,
    pub divisor: u32,
    pub floor: u32,
}

impl Default for TickRate {
    fn default() -> Self {
        Self {
            base: 6,
            divisor: 6,
            floor: 2,
        }
    }
}

impl TickRate {
    /// Number of ticks between moves for a snake of `length`.
    #[must_use]
    pub fn ticks_per_move(self, length: u32) -> u32 {
        self.base
            .saturating_sub(length / self.divisor)
            .max(self.floor)
    }
}

/// Full runtime configuration. Every field has a default, so partial JSON files work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid: GridSize,
    pub tick_interval_ms: u64,
    pub cell_weights: CellWeights,
    pub food_spawn: FoodSpawn,
    pub tick_rate: TickRate,
    pub snake_speed: u32,
    pub scores_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: GridSize::square(DEFAULT_GRID_SIDE),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            cell_weights: CellWeights::default(),
            food_spawn: FoodSpawn::default(),
            tick_rate: TickRate::default(),
            snake_speed: 1,
            scores_path: PathBuf::from(DEFAULT_SCORES_PATH),
        }
    }
}

impl GameConfig {
    /// Loads configuration from `path`, or from the user config file when one exists.
    ///
    /// An explicit path must exist; the implicit location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_path(path),
            None => match user_config_path() {
                Some(path) if path.is_file() => Self::from_path(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks every field that would otherwise panic or silently misbehave at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid.width,
                height: self.grid.height,
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.tick_rate.divisor == 0 {
            return Err(ConfigError::ZeroTickRate { field: "divisor" });
        }
        if self.tick_rate.floor == 0 {
            return Err(ConfigError::ZeroTickRate { field: "floor" });
        }
        let chance = self.food_spawn.chance;
        if !chance.is_finite() || !(0.0..=1.0).contains(&chance) {
            return Err(ConfigError::SpawnChance(chance));
        }
        crate::grid::cell_table(self.cell_weights)?;

        Ok(())
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Returns `<config_dir>/grid-snake/config.json` when the platform has a config dir.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    Some(base)
}

/// Returns the platform-correct log file path.
#[must_use]
pub fn default_log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(LOG_FILE_NAME);
    base
}
