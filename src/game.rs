use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::config::GameConfig;
use crate::grid::{Cell, Grid};
use crate::input::GameInput;
use crate::snake::{Direction, PositionMemory, Snake};
use crate::weighted::WeightError;

/// Errors raised while setting up a session.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("generated grid has no empty cell to spawn the snake in")]
    NoSpawnCell,
    #[error("invalid cell weights: {0}")]
    Weights(#[from] WeightError),
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EndReason {
    WallCollision,
    SelfCollision,
    Quit,
    Abort,
}

impl EndReason {
    /// Whether the player is offered to save their score.
    #[must_use]
    pub fn saves_score(self) -> bool {
        !matches!(self, Self::Abort)
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::WallCollision | Self::SelfCollision => "==[ YOU DIED! ]==",
            Self::Quit => "==[ QUIT ]==",
            Self::Abort => "==[ ABORTED ]==",
        }
    }
}

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Running,
    GameOver(EndReason),
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    pub grid: Grid,
    pub snake: Snake,
    pub memory: PositionMemory,
    pub tick_count: u64,
    pub status: GameStatus,
    config: GameConfig,
    pending_input: Option<GameInput>,
    rng: StdRng,
}

impl GameState {
    /// Creates a session with a freshly generated grid seeded from entropy.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::from_rng(config, StdRng::from_entropy())
    }

    /// Creates a deterministic state for tests and reproducible sessions.
    pub fn new_with_seed(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::from_rng(config, StdRng::seed_from_u64(seed))
    }

    fn from_rng(config: GameConfig, mut rng: StdRng) -> Result<Self, GameError> {
        let grid = Grid::generate(&mut rng, config.grid, config.cell_weights)?;
        let spawn = grid.first_empty().ok_or(GameError::NoSpawnCell)?;
        debug!("spawning snake at cell {spawn}");

        let mut snake = Snake::new(grid.position_of(spawn), Direction::Right);
        snake.speed = config.snake_speed;

        Ok(Self::with_grid(config, grid, snake, rng))
    }

    /// Assembles a state from explicit parts, for scripted scenarios.
    #[must_use]
    pub fn with_grid(config: GameConfig, grid: Grid, snake: Snake, rng: StdRng) -> Self {
        Self {
            grid,
            snake,
            memory: PositionMemory::new(),
            tick_count: 0,
            status: GameStatus::Running,
            config,
            pending_input: None,
            rng,
        }
    }

    /// Stores a key for the next tick. A later key replaces an unconsumed earlier one.
    pub fn record_input(&mut self, input: GameInput) {
        self.pending_input = Some(input);
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::GameOver(_))
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Ticks between moves at the current length.
    #[must_use]
    pub fn tick_rate(&self) -> u64 {
        u64::from(self.config.tick_rate.ticks_per_move(self.snake.length))
    }

    /// Advances simulation by one fixed-interval tick. No-op once the game is over.
    pub fn tick(&mut self) {
        if self.is_over() {
            return;
        }

        if let Some(input) = self.pending_input.take() {
            match input {
                GameInput::Turn(rotation) => self.snake.turn(rotation),
                GameInput::Quit => return self.finish(EndReason::Quit),
                GameInput::Abort => return self.finish(EndReason::Abort),
            }
        }

        self.grid.clear_transient();

        let head = self.grid.index_of(self.snake.position);
        match self.grid.cell(head) {
            Cell::Block => return self.finish(EndReason::WallCollision),
            Cell::Food => self.snake.grow(),
            _ => {}
        }

        if self.memory.contains(head) {
            return self.finish(EndReason::SelfCollision);
        }

        // Overwrites food under the head, so it is eaten once.
        self.grid.set(head, Cell::Head(self.snake.direction));
        for index in self.memory.iter() {
            self.grid.set(index, Cell::Body);
        }

        if self.tick_count % self.tick_rate() == 0 {
            self.memory.advance(head, self.snake.length);
            self.snake.advance(self.grid.size());
        }

        self.maybe_spawn_food();

        self.tick_count += 1;
    }

    fn maybe_spawn_food(&mut self) {
        let spawn = self.config.food_spawn;
        if self.tick_count <= spawn.activation_tick {
            return;
        }
        if self.rng.gen_range(0.0..1.0) > spawn.chance {
            return;
        }

        if let Some(index) = self.grid.random_empty_index(&mut self.rng) {
            debug!("tick {}: food spawned at cell {index}", self.tick_count);
            self.grid.set(index, Cell::Food);
        }
    }

    fn finish(&mut self, reason: EndReason) {
        info!(
            "game over after {} ticks: {reason:?}, length {}",
            self.tick_count, self.snake.length
        );
        self.status = GameStatus::GameOver(reason);
    }
}
