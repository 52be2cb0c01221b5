use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use grid_snake::config::{GameConfig, GridSize, default_log_path};
use grid_snake::error::AppError;
use grid_snake::game::{EndReason, GameState, GameStatus};
use grid_snake::input::InputHandler;
use grid_snake::logging;
use grid_snake::renderer;
use grid_snake::score::{append_score, prompt_player_name};
use grid_snake::terminal_runtime::{TerminalSession, install_panic_hook};
use log::{error, info};

#[derive(Debug, Parser)]
#[command(name = "grid-snake", version, about = "Snake on a wrap-around grid")]
struct Cli {
    /// JSON configuration file (defaults to the user config dir when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Square grid side; overridden per axis by --width/--height.
    #[arg(long)]
    size: Option<u16>,

    #[arg(long)]
    width: Option<u16>,

    #[arg(long)]
    height: Option<u16>,

    /// Milliseconds between ticks.
    #[arg(long = "tick-ms")]
    tick_ms: Option<u64>,

    /// File that score lines are appended to.
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Seed for a reproducible layout.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Also log snake and food spawns.
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut GameConfig) {
        if let Some(side) = self.size {
            config.grid = GridSize::square(side);
        }
        if let Some(width) = self.width {
            config.grid.width = width;
        }
        if let Some(height) = self.height {
            config.grid.height = height;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if let Some(scores) = &self.scores {
            config.scores_path.clone_from(scores);
        }
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("grid-snake: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    if let Err(error) = logging::init_file_logger(&log_path, logging::level_for(cli.verbose)) {
        eprintln!("grid-snake: continuing without a log file: {error}");
    }

    let mut config = GameConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    config.validate()?;
    info!("starting with {config:?}");

    let state = match cli.seed {
        Some(seed) => GameState::new_with_seed(config, seed)?,
        None => GameState::new(config)?,
    };

    install_panic_hook();
    let session = TerminalSession::enter()?;
    let (state, session) = play(state, session)?;
    session.leave()?;

    let GameStatus::GameOver(reason) = state.status else {
        return Ok(());
    };
    finish(&state, reason);
    Ok(())
}

/// Drives ticks at a fixed interval, reading keys while waiting for each deadline.
fn play(
    mut state: GameState,
    mut session: TerminalSession,
) -> io::Result<(GameState, TerminalSession)> {
    let mut input = InputHandler::new();
    let interval = state.config().tick_interval();
    let mut next_tick = Instant::now();

    while !state.is_over() {
        let timeout = next_tick.saturating_duration_since(Instant::now());
        if let Some(game_input) = input.poll_input(timeout)? {
            state.record_input(game_input);
        }

        if Instant::now() < next_tick {
            continue;
        }

        state.tick();
        if !state.is_over() {
            session.draw(|frame| renderer::render(frame, &state))?;
        }
        next_tick = next_deadline(next_tick, interval, Instant::now());
    }

    Ok((state, session))
}

fn finish(state: &GameState, reason: EndReason) {
    println!("{}\n", reason.message());

    if !reason.saves_score() {
        return;
    }

    let player_name = prompt_player_name(&mut io::stdin().lock(), &mut io::stdout());
    let path = &state.config().scores_path;
    match append_score(path, &player_name, state.snake.length) {
        Ok(()) => println!("\t-> Saved to '{}'.", path.display()),
        Err(err) => {
            error!("{err}");
            eprintln!("ERROR SAVING SCORE: {err}");
        }
    }
}

/// Schedules the tick after `scheduled`, never in the past, so a stall does not cause a burst.
fn next_deadline(scheduled: Instant, interval: Duration, now: Instant) -> Instant {
    (scheduled + interval).max(now)
}
