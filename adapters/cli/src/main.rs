#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the QuakeSafe grid game.

mod config;
mod play;
mod solve;

use std::{
    io::{self, BufReader},
    path::PathBuf,
    time::Instant,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use quakesafe_core::GridConfig;
use quakesafe_rendering::TextPresenter;
use quakesafe_system_persistence::{JsonFileScoreStore, Persistence};
use quakesafe_world::GameSession;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{play::PlayLoop, solve::Format};

/// Navigate an earthquake-damaged grid from A to B and collect points.
#[derive(Debug, Parser)]
#[command(name = "quakesafe", version)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Play interactively from the terminal.
    Play {
        #[command(flatten)]
        board: BoardArgs,
        /// File holding the best score across sessions.
        #[arg(long, default_value = "quakesafe-best-score.json")]
        best_score_file: PathBuf,
        /// Overlay the cheapest route from the player to the goal.
        #[arg(long)]
        show_path: bool,
    },
    /// Print a board together with its cheapest corner-to-corner route.
    Solve {
        #[command(flatten)]
        board: BoardArgs,
        /// Emit the route as JSON instead of drawing the board.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
struct BoardArgs {
    /// Seed for board generation; a random seed is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Side length of the square board.
    #[arg(long)]
    size: Option<u32>,
    /// TOML file with board generation parameters.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl BoardArgs {
    fn resolve(&self) -> Result<(GridConfig, u64)> {
        let config = config::load(self.config.as_deref(), self.size)?;
        let seed = self.seed.unwrap_or_else(rand::random);
        info!("board seed {seed}, size {}", config.size);
        Ok((config, seed))
    }
}

/// Entry point for the QuakeSafe command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut presenter = TextPresenter::new(io::stdout());
    let mut out = io::stdout();

    match cli.mode {
        Mode::Play {
            board,
            best_score_file,
            show_path,
        } => {
            let (config, seed) = board.resolve()?;
            let persistence = Persistence::new(JsonFileScoreStore::new(best_score_file));
            let best_score = persistence
                .load_best_score()
                .context("failed to load best score")?;
            let session = GameSession::new(config, best_score, ChaCha8Rng::seed_from_u64(seed))?;

            let mut last_tick = Instant::now();
            let clock = move || {
                let now = Instant::now();
                let dt = now.duration_since(last_tick);
                last_tick = now;
                dt
            };

            PlayLoop::new(session, persistence, show_path).run(
                BufReader::new(io::stdin()),
                &mut presenter,
                &mut out,
                clock,
            )
        }
        Mode::Solve { board, json } => {
            let (config, seed) = board.resolve()?;
            let format = if json { Format::Json } else { Format::Text };
            solve::run(config, seed, format, &mut presenter, &mut out)
        }
    }
}
