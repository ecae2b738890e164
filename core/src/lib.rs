#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the QuakeSafe grid engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative game session, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the session executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. The path engine only ever sees a board through
//! the read-only [`GridView`] trait.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "QuakeSafe: navigate the grid from A to B and collect points!";

/// Side length of the board the mini-game ships with.
pub const DEFAULT_GRID_SIZE: u32 = 15;

/// One-time score delta granted by a bonus tile.
pub const BONUS_SCORE: i32 = 10;

/// One-time score delta applied by a penalty tile.
pub const PENALTY_SCORE: i32 = -5;

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that the player advance a single tile in the provided direction.
    Move {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Advances the session clock by the provided wall-clock delta.
    Tick {
        /// Duration of real time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Discards the current board and starts a fresh session.
    Reset,
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the session clock advanced.
    TimeAdvanced {
        /// Duration of real time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player entered a tile.
    PlayerMoved {
        /// Tile the player occupied before moving.
        from: CellCoord,
        /// Tile the player occupies after the move. Equal to `from` when the
        /// move was clamped against the border.
        to: CellCoord,
    },
    /// Reports that a move request was rejected and the player did not move.
    MoveRejected {
        /// Direction requested by the rejected move.
        direction: Direction,
        /// Specific reason the move was rejected.
        reason: MoveRejection,
    },
    /// Reports that the player entered an unvisited bonus tile.
    BonusCollected {
        /// Tile that granted the bonus.
        cell: CellCoord,
        /// Running score after the bonus was applied.
        score: u32,
    },
    /// Reports that the player entered an unvisited penalty tile.
    PenaltyApplied {
        /// Tile that applied the penalty.
        cell: CellCoord,
        /// Running score after the clamped penalty was applied.
        score: u32,
    },
    /// Announces that the player arrived at the goal and the session ended.
    GoalReached {
        /// Final score of the session.
        score: u32,
        /// Time taken to reach the goal, rounded to whole seconds.
        elapsed: Duration,
    },
    /// Announces that the session produced a new best score that must be persisted.
    BestScoreImproved {
        /// Best score to persist.
        best_score: u32,
    },
    /// Confirms that a fresh board was generated and the session restarted.
    SessionReset,
}

/// Reasons a move request may be rejected by the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// The destination tile is an obstacle.
    Obstacle,
    /// The session already ended; only a reset restarts play.
    SessionEnded,
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Column and row offsets applied by a step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Resolves a unit offset back into a direction.
    ///
    /// Returns `None` for anything other than the four cardinal unit vectors.
    #[must_use]
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Self::North),
            (1, 0) => Some(Self::East),
            (0, 1) => Some(Self::South),
            (-1, 0) => Some(Self::West),
            _ => None,
        }
    }
}

/// Location of a single tile expressed as column (`x`) and row (`y`) coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Neighbouring tile in the provided direction, if it lies within the bounds.
    #[must_use]
    pub fn offset(self, direction: Direction, columns: u32, rows: u32) -> Option<CellCoord> {
        let (dx, dy) = direction.delta();
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        (column < columns && row < rows).then_some(CellCoord::new(column, row))
    }

    /// Tile reached by stepping in the provided direction, clamped to the bounds.
    ///
    /// Stepping into the border yields the current tile.
    #[must_use]
    pub fn clamped_step(self, direction: Direction, columns: u32, rows: u32) -> CellCoord {
        let (dx, dy) = direction.delta();
        let column = clamp_axis(self.column, dx, columns);
        let row = clamp_axis(self.row, dy, rows);
        CellCoord::new(column, row)
    }
}

fn clamp_axis(value: u32, delta: i32, extent: u32) -> u32 {
    let upper = extent.saturating_sub(1);
    value.saturating_add_signed(delta).min(upper)
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Cumulative movement cost measured in entered tiles.
///
/// [`Cost::INFINITE`] marks impassable tiles and unreachable goals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cost(u32);

impl Cost {
    /// Cost of standing still.
    pub const ZERO: Cost = Cost(0);
    /// Cost of entering a passable tile.
    pub const STEP: Cost = Cost(1);
    /// Sentinel for impassable tiles and unreachable goals.
    pub const INFINITE: Cost = Cost(u32::MAX);

    /// Creates a finite cost. `u32::MAX` is reserved for [`Cost::INFINITE`].
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the cost.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the cost describes a reachable tile.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Adds two costs, absorbing into [`Cost::INFINITE`].
    #[must_use]
    pub const fn saturating_add(self, other: Cost) -> Cost {
        Cost(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_finite() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "inf")
        }
    }
}

/// Mutually exclusive tile categories.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Passable tile without score effect.
    #[default]
    Plain,
    /// Impassable tile.
    Obstacle,
    /// One-time positive score modifier.
    Bonus,
    /// One-time negative score modifier.
    Penalty,
}

impl TileKind {
    /// Movement cost paid when entering a tile of this kind.
    #[must_use]
    pub const fn cost(self) -> Cost {
        match self {
            Self::Obstacle => Cost::INFINITE,
            Self::Plain | Self::Bonus | Self::Penalty => Cost::STEP,
        }
    }

    /// One-time score delta granted by a tile of this kind.
    #[must_use]
    pub const fn score_delta(self) -> i32 {
        match self {
            Self::Bonus => BONUS_SCORE,
            Self::Penalty => PENALTY_SCORE,
            Self::Plain | Self::Obstacle => 0,
        }
    }
}

/// One cell of the game grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    cell: CellCoord,
    kind: TileKind,
    visited: bool,
}

impl Tile {
    /// Creates an unvisited tile of the provided kind.
    #[must_use]
    pub const fn new(cell: CellCoord, kind: TileKind) -> Self {
        Self {
            cell,
            kind,
            visited: false,
        }
    }

    /// Coordinate of the tile.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Category assigned to the tile at generation time.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    /// Whether the player already entered the tile during this session.
    #[must_use]
    pub const fn visited(&self) -> bool {
        self.visited
    }

    /// Whether the tile is impassable.
    #[must_use]
    pub const fn is_obstacle(&self) -> bool {
        matches!(self.kind, TileKind::Obstacle)
    }

    /// Whether the tile grants a one-time bonus.
    #[must_use]
    pub const fn is_bonus(&self) -> bool {
        matches!(self.kind, TileKind::Bonus)
    }

    /// Whether the tile applies a one-time penalty.
    #[must_use]
    pub const fn is_penalty(&self) -> bool {
        matches!(self.kind, TileKind::Penalty)
    }

    /// Marks the tile as visited, returning `true` on the first visit only.
    pub fn visit(&mut self) -> bool {
        !std::mem::replace(&mut self.visited, true)
    }
}

/// Read-only cost and score accessors over a rectangular board.
///
/// Implementations must answer out-of-bounds queries with the sentinels
/// [`Cost::INFINITE`] and `0` instead of panicking.
pub trait GridView {
    /// Number of columns and rows contained in the board.
    fn dimensions(&self) -> (u32, u32);

    /// Movement cost paid when entering the tile.
    fn cost(&self, cell: CellCoord) -> Cost;

    /// One-time score delta of the tile, independent of visited state.
    fn score(&self, cell: CellCoord) -> i32;

    /// Reports whether the coordinate lies within the board.
    fn contains(&self, cell: CellCoord) -> bool {
        let (columns, rows) = self.dimensions();
        cell.column() < columns && cell.row() < rows
    }
}

/// Board generation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Side length of the square board.
    pub size: u32,
    /// Probability that a tile becomes an obstacle.
    pub obstacle_probability: f64,
    /// Probability that a non-obstacle tile becomes a bonus.
    pub bonus_probability: f64,
    /// Probability that a tile that is neither obstacle nor bonus becomes a penalty.
    pub penalty_probability: f64,
}

impl GridConfig {
    /// Creates a configuration with explicit parameters.
    #[must_use]
    pub const fn new(
        size: u32,
        obstacle_probability: f64,
        bonus_probability: f64,
        penalty_probability: f64,
    ) -> Self {
        Self {
            size,
            obstacle_probability,
            bonus_probability,
            penalty_probability,
        }
    }

    /// Checks that the board is non-empty and every probability lies in `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::EmptyGrid);
        }

        let probabilities = [
            ("obstacle_probability", self.obstacle_probability),
            ("bonus_probability", self.bonus_probability),
            ("penalty_probability", self.penalty_probability),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }

        Ok(())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE, 0.08, 0.1, 0.1)
    }
}

/// Reasons a [`GridConfig`] may be rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The board must contain at least one tile.
    #[error("grid size must be at least 1")]
    EmptyGrid,
    /// A probability was outside `[0, 1]` or not a number.
    #[error("{name} must lie within [0, 1], got {value}")]
    InvalidProbability {
        /// Name of the offending field.
        name: &'static str,
        /// Value supplied for the field.
        value: f64,
    },
}

/// Search state recorded for a tile on a computed path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathNode {
    /// Tile visited by the path.
    pub cell: CellCoord,
    /// Cumulative movement cost from the start, excluding the start tile.
    pub cost: Cost,
    /// Cumulative score from the start, including the start tile.
    pub score: i32,
}

/// Outcome of a path query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
    /// Tiles from start to goal inclusive. Empty when the goal is unreachable.
    pub path: Vec<PathNode>,
    /// Total movement cost, or [`Cost::INFINITE`] when the goal is unreachable.
    pub total_cost: Cost,
    /// Unclamped score accumulated along the path, start tile included.
    pub total_score: i32,
}

impl PathResult {
    /// Result reported when no path connects start and goal.
    #[must_use]
    pub const fn unreachable() -> Self {
        Self {
            path: Vec::new(),
            total_cost: Cost::INFINITE,
            total_score: 0,
        }
    }

    /// Reports whether the query found a path.
    #[must_use]
    pub const fn is_reachable(&self) -> bool {
        self.total_cost.is_finite()
    }

    /// Iterator over the tiles visited by the path in order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.path.iter().map(|node| node.cell)
    }
}

/// Read-only snapshot of the interactive session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Tile currently occupied by the player.
    pub player: CellCoord,
    /// Running score, never negative.
    pub score: u32,
    /// Highest final score recorded across sessions.
    pub best_score: u32,
    /// Whether the player reached the goal.
    pub ended: bool,
    /// Time taken to reach the goal in whole seconds; zero while playing.
    pub elapsed: Duration,
}

/// Storage collaborator that persists the best score across sessions.
pub trait ScoreStore {
    /// Loads the persisted best score, or `0` when nothing was stored yet.
    fn load_best_score(&self) -> Result<u32, StoreError>;

    /// Persists a new best score.
    fn save_best_score(&mut self, best_score: u32) -> Result<(), StoreError>;
}

/// Failures reported by [`ScoreStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage medium could not be read or written.
    #[error("score storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// The stored record could not be interpreted.
    #[error("stored best score is malformed: {reason}")]
    Malformed {
        /// Description of the decoding failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::{
        CellCoord, ConfigError, Cost, Direction, GridConfig, Tile, TileKind, DEFAULT_GRID_SIZE,
    };

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn direction_deltas_resolve_back_to_directions() {
        for direction in [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ] {
            let (dx, dy) = direction.delta();
            assert_eq!(Direction::from_delta(dx, dy), Some(direction));
        }
        assert_eq!(Direction::from_delta(1, 1), None);
        assert_eq!(Direction::from_delta(0, 0), None);
        assert_eq!(Direction::from_delta(0, 2), None);
    }

    #[test]
    fn offset_stays_within_bounds() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.offset(Direction::North, 3, 3), None);
        assert_eq!(corner.offset(Direction::West, 3, 3), None);
        assert_eq!(
            corner.offset(Direction::South, 3, 3),
            Some(CellCoord::new(0, 1))
        );

        let far = CellCoord::new(2, 2);
        assert_eq!(far.offset(Direction::East, 3, 3), None);
        assert_eq!(far.offset(Direction::South, 3, 3), None);
    }

    #[test]
    fn clamped_step_pins_to_border() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.clamped_step(Direction::West, 4, 4), corner);
        assert_eq!(corner.clamped_step(Direction::North, 4, 4), corner);
        assert_eq!(
            corner.clamped_step(Direction::East, 4, 4),
            CellCoord::new(1, 0)
        );

        let far = CellCoord::new(3, 3);
        assert_eq!(far.clamped_step(Direction::East, 4, 4), far);
        assert_eq!(far.clamped_step(Direction::South, 4, 4), far);
    }

    #[test]
    fn infinite_cost_absorbs_additions() {
        assert_eq!(Cost::STEP.saturating_add(Cost::STEP), Cost::new(2));
        assert_eq!(Cost::new(7).saturating_add(Cost::INFINITE), Cost::INFINITE);
        assert!(!Cost::INFINITE.is_finite());
        assert!(Cost::ZERO < Cost::STEP);
        assert_eq!(Cost::INFINITE.to_string(), "inf");
    }

    #[test]
    fn tile_kinds_map_to_cost_and_score() {
        assert_eq!(TileKind::Obstacle.cost(), Cost::INFINITE);
        assert_eq!(TileKind::Plain.cost(), Cost::STEP);
        assert_eq!(TileKind::Bonus.score_delta(), 10);
        assert_eq!(TileKind::Penalty.score_delta(), -5);
        assert_eq!(TileKind::Plain.score_delta(), 0);
        assert_eq!(TileKind::Obstacle.score_delta(), 0);
    }

    #[test]
    fn tile_visit_reports_first_entry_only() {
        let mut tile = Tile::new(CellCoord::new(1, 1), TileKind::Bonus);
        assert!(!tile.visited());
        assert!(tile.visit());
        assert!(!tile.visit());
        assert!(tile.visited());
    }

    #[test]
    fn default_config_matches_shipped_board() {
        let config = GridConfig::default();
        assert_eq!(config.size, DEFAULT_GRID_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_out_of_range_values() {
        let mut config = GridConfig::default();
        config.size = 0;
        assert_eq!(config.validate(), Err(ConfigError::EmptyGrid));

        let mut config = GridConfig::default();
        config.bonus_probability = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability {
                name: "bonus_probability",
                ..
            })
        ));

        let mut config = GridConfig::default();
        config.penalty_probability = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: GridConfig =
            serde_json::from_str(r#"{ "size": 6 }"#).expect("config deserializes");
        assert_eq!(config.size, 6);
        assert_eq!(
            config.obstacle_probability,
            GridConfig::default().obstacle_probability
        );
    }
}
