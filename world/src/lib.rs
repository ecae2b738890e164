#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game session state for the QuakeSafe mini-game.

mod grid;

use std::time::Duration;

use log::{debug, info};
use quakesafe_core::{
    CellCoord, Command, ConfigError, Direction, Event, GridConfig, GridView, MoveRejection,
    TileKind,
};
use rand::Rng;

pub use grid::Grid;

/// Live, mutable interactive-play state.
///
/// A session owns its board and the random source used to regenerate it on
/// reset. It is `Active` until the player reaches the goal, after which only a
/// [`Command::Reset`] restarts play.
#[derive(Debug)]
pub struct GameSession<R> {
    config: GridConfig,
    grid: Grid,
    rng: R,
    player: CellCoord,
    score: u32,
    best_score: u32,
    clock: Duration,
    elapsed: Duration,
    ended: bool,
}

impl<R> GameSession<R>
where
    R: Rng,
{
    /// Starts a session on a freshly generated board.
    ///
    /// `best_score` is the value previously loaded from the score store.
    pub fn new(config: GridConfig, best_score: u32, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::generate(&config, &mut rng);
        Ok(Self::assemble(config, grid, best_score, rng))
    }

    /// Starts a session on a prepared board.
    ///
    /// Later resets regenerate a board of the same size using the default
    /// generation probabilities.
    pub fn from_grid(grid: Grid, best_score: u32, rng: R) -> Result<Self, ConfigError> {
        let config = GridConfig {
            size: grid.size(),
            ..GridConfig::default()
        };
        config.validate()?;
        Ok(Self::assemble(config, grid, best_score, rng))
    }

    fn assemble(config: GridConfig, grid: Grid, best_score: u32, rng: R) -> Self {
        let player = grid.start();
        Self {
            config,
            grid,
            rng,
            player,
            score: 0,
            best_score,
            clock: Duration::ZERO,
            elapsed: Duration::ZERO,
            ended: false,
        }
    }

    fn move_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if self.ended {
            out_events.push(Event::MoveRejected {
                direction,
                reason: MoveRejection::SessionEnded,
            });
            return;
        }

        let (columns, rows) = self.grid.dimensions();
        let from = self.player;
        let to = from.clamped_step(direction, columns, rows);

        let Some(tile) = self.grid.tile_mut(to) else {
            return;
        };

        if tile.is_obstacle() {
            debug!("move {direction:?} from {from} blocked by obstacle at {to}");
            out_events.push(Event::MoveRejected {
                direction,
                reason: MoveRejection::Obstacle,
            });
            return;
        }

        let first_visit = tile.visit();
        let kind = tile.kind();
        self.player = to;
        out_events.push(Event::PlayerMoved { from, to });

        if first_visit {
            self.score = apply_score_delta(self.score, kind.score_delta());
            match kind {
                TileKind::Bonus => out_events.push(Event::BonusCollected {
                    cell: to,
                    score: self.score,
                }),
                TileKind::Penalty => out_events.push(Event::PenaltyApplied {
                    cell: to,
                    score: self.score,
                }),
                TileKind::Plain | TileKind::Obstacle => {}
            }
        }

        if to == self.grid.goal() {
            self.finish(out_events);
        }
    }

    fn finish(&mut self, out_events: &mut Vec<Event>) {
        self.ended = true;
        self.elapsed = round_to_seconds(self.clock);
        info!(
            "goal reached with score {} in {}s",
            self.score,
            self.elapsed.as_secs()
        );
        out_events.push(Event::GoalReached {
            score: self.score,
            elapsed: self.elapsed,
        });

        if self.score > self.best_score {
            self.best_score = self.score;
            out_events.push(Event::BestScoreImproved {
                best_score: self.best_score,
            });
        }
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.grid = Grid::generate(&self.config, &mut self.rng);
        self.player = self.grid.start();
        self.score = 0;
        self.clock = Duration::ZERO;
        self.elapsed = Duration::ZERO;
        self.ended = false;
        info!("session reset; best score remains {}", self.best_score);
        out_events.push(Event::SessionReset);
    }
}

/// Applies the provided command to the session, mutating state deterministically.
pub fn apply<R>(session: &mut GameSession<R>, command: Command, out_events: &mut Vec<Event>)
where
    R: Rng,
{
    match command {
        Command::Move { direction } => session.move_player(direction, out_events),
        Command::Tick { dt } => {
            if !session.ended {
                session.clock = session.clock.saturating_add(dt);
            }
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::Reset => session.reset(out_events),
    }
}

fn apply_score_delta(score: u32, delta: i32) -> u32 {
    if delta >= 0 {
        score.saturating_add(delta.unsigned_abs())
    } else {
        score.saturating_sub(delta.unsigned_abs())
    }
}

fn round_to_seconds(duration: Duration) -> Duration {
    let seconds = (duration.as_millis() + 500) / 1_000;
    Duration::from_secs(u64::try_from(seconds).unwrap_or(u64::MAX))
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use std::time::Duration;

    use super::{GameSession, Grid};
    use quakesafe_core::{CellCoord, GridConfig, SessionSnapshot, Tile, WELCOME_BANNER};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner() -> &'static str {
        WELCOME_BANNER
    }

    /// Captures the render-facing state of the session.
    #[must_use]
    pub fn state<R>(session: &GameSession<R>) -> SessionSnapshot {
        SessionSnapshot {
            player: session.player,
            score: session.score,
            best_score: session.best_score,
            ended: session.ended,
            elapsed: session.elapsed,
        }
    }

    /// Provides read-only access to the current board.
    ///
    /// Path queries must complete before the next command is applied.
    #[must_use]
    pub fn grid<R>(session: &GameSession<R>) -> &Grid {
        &session.grid
    }

    /// All tiles of the current board in row-major order.
    #[must_use]
    pub fn tiles<R>(session: &GameSession<R>) -> &[Tile] {
        session.grid.tiles()
    }

    /// Tile the player must reach to end the session.
    #[must_use]
    pub fn goal<R>(session: &GameSession<R>) -> CellCoord {
        session.grid.goal()
    }

    /// Configuration used when the board is regenerated.
    #[must_use]
    pub fn config<R>(session: &GameSession<R>) -> &GridConfig {
        &session.config
    }

    /// Time accumulated by ticks since the session started; frozen once ended.
    #[must_use]
    pub fn running_time<R>(session: &GameSession<R>) -> Duration {
        session.clock
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{apply_score_delta, round_to_seconds};

    #[test]
    fn penalties_clamp_at_zero() {
        assert_eq!(apply_score_delta(3, -5), 0);
        assert_eq!(apply_score_delta(12, -5), 7);
        assert_eq!(apply_score_delta(0, 10), 10);
    }

    #[test]
    fn elapsed_time_rounds_to_nearest_second() {
        assert_eq!(
            round_to_seconds(Duration::from_millis(1_499)),
            Duration::from_secs(1)
        );
        assert_eq!(
            round_to_seconds(Duration::from_millis(1_500)),
            Duration::from_secs(2)
        );
        assert_eq!(round_to_seconds(Duration::ZERO), Duration::ZERO);
    }
}
