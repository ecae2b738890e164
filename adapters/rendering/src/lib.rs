#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for QuakeSafe adapters.

use std::{io::Write, time::Duration};

use anyhow::Result as AnyResult;
use quakesafe_core::{CellCoord, Event, MoveRejection, PathResult, SessionSnapshot, Tile, TileKind};
use thiserror::Error;

/// Visual classification of a single board cell.
///
/// Variants are listed in drawing precedence: the player hides the goal, the
/// goal hides the tile underneath it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellGlyph {
    /// Cell currently occupied by the player.
    Player,
    /// Cell the player must reach.
    Goal,
    /// Impassable cell.
    Obstacle,
    /// Cell carrying a bonus.
    Bonus,
    /// Cell carrying a penalty.
    Penalty,
    /// Cell without special meaning.
    Plain,
}

impl CellGlyph {
    /// Character drawn for the glyph by text presenters.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Player => '@',
            Self::Goal => 'G',
            Self::Obstacle => '#',
            Self::Bonus => '+',
            Self::Penalty => '-',
            Self::Plain => '.',
        }
    }
}

/// Symbol drawn for plain cells covered by the advisory path overlay.
pub const PATH_SYMBOL: char = '*';

/// Immutable description of one board cell within the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneCell {
    /// Coordinate of the cell.
    pub cell: CellCoord,
    /// Classification used when drawing the cell.
    pub glyph: CellGlyph,
    /// Whether the advisory path overlay covers the cell.
    pub on_path: bool,
}

impl SceneCell {
    /// Character drawn for the cell, accounting for the path overlay.
    #[must_use]
    pub const fn symbol(&self) -> char {
        match (self.glyph, self.on_path) {
            (CellGlyph::Plain, true) => PATH_SYMBOL,
            (glyph, _) => glyph.symbol(),
        }
    }
}

/// Score panel presented alongside the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Running score of the session.
    pub score: u32,
    /// Best score across sessions.
    pub best_score: u32,
    /// Time taken once the goal was reached.
    pub elapsed: Option<Duration>,
    /// Score of the overlaid cost-optimal path, when one is shown.
    pub path_score: Option<i32>,
}

/// Declarative description of everything an adapter needs to draw a frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    size: u32,
    cells: Vec<SceneCell>,
    hud: Hud,
}

impl Scene {
    /// Builds a scene from the board tiles, the session snapshot and an optional
    /// path overlay.
    pub fn build(
        tiles: &[Tile],
        size: u32,
        goal: CellCoord,
        snapshot: &SessionSnapshot,
        overlay: Option<&PathResult>,
    ) -> Result<Self, RenderingError> {
        let expected = u64::from(size) * u64::from(size);
        if tiles.len() as u64 != expected {
            return Err(RenderingError::TileCountMismatch {
                size,
                tiles: tiles.len(),
            });
        }

        let path: Vec<CellCoord> = overlay.map(|route| route.cells().collect()).unwrap_or_default();
        let cells = tiles
            .iter()
            .map(|tile| SceneCell {
                cell: tile.cell(),
                glyph: classify(tile, goal, snapshot.player),
                on_path: path.contains(&tile.cell()),
            })
            .collect();

        let hud = Hud {
            score: snapshot.score,
            best_score: snapshot.best_score,
            elapsed: snapshot.ended.then_some(snapshot.elapsed),
            path_score: overlay
                .filter(|route| route.is_reachable())
                .map(|route| route.total_score),
        };

        Ok(Self { size, cells, hud })
    }

    /// Side length of the board.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[SceneCell] {
        &self.cells
    }

    /// Score panel contents.
    #[must_use]
    pub const fn hud(&self) -> &Hud {
        &self.hud
    }

    /// Renders the board as one line of symbols per row followed by the score panel.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        let width = usize::try_from(self.size).unwrap_or(usize::MAX).max(1);
        for row in self.cells.chunks(width) {
            text.extend(row.iter().map(SceneCell::symbol));
            text.push('\n');
        }

        text.push_str(&format!(
            "Score: {}  Best: {}",
            self.hud.score, self.hud.best_score
        ));
        if let Some(elapsed) = self.hud.elapsed {
            text.push_str(&format!("  Time: {}s", elapsed.as_secs()));
        }
        if let Some(path_score) = self.hud.path_score {
            text.push_str(&format!("  Path score: {path_score}"));
        }
        text.push('\n');
        text
    }
}

fn classify(tile: &Tile, goal: CellCoord, player: CellCoord) -> CellGlyph {
    if tile.cell() == player {
        return CellGlyph::Player;
    }
    if tile.cell() == goal {
        return CellGlyph::Goal;
    }
    match tile.kind() {
        TileKind::Obstacle => CellGlyph::Obstacle,
        TileKind::Bonus => CellGlyph::Bonus,
        TileKind::Penalty => CellGlyph::Penalty,
        TileKind::Plain => CellGlyph::Plain,
    }
}

/// Player-facing message announcing the outcome of an event, if it warrants one.
#[must_use]
pub fn describe(event: &Event) -> Option<String> {
    match event {
        Event::BonusCollected { .. } => Some("You found a bonus item! +10".to_owned()),
        Event::PenaltyApplied { .. } => Some("You hit a penalty zone. -5".to_owned()),
        Event::MoveRejected {
            reason: MoveRejection::Obstacle,
            ..
        } => Some("Rubble blocks the way.".to_owned()),
        Event::MoveRejected {
            reason: MoveRejection::SessionEnded,
            ..
        } => Some("The round is over; reset to play again.".to_owned()),
        Event::GoalReached { score, elapsed } => Some(format!(
            "You reached the goal! Final score: {score}  Time: {}s",
            elapsed.as_secs()
        )),
        Event::BestScoreImproved { best_score } => Some(format!("New best score: {best_score}")),
        Event::SessionReset => Some("Navigate from A to B and collect points!".to_owned()),
        Event::TimeAdvanced { .. } | Event::PlayerMoved { .. } => None,
    }
}

/// Output surface capable of presenting scenes.
pub trait Presenter {
    /// Presents a single frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Presenter that writes the plain-text form of each scene to a writer.
#[derive(Debug)]
pub struct TextPresenter<W> {
    writer: W,
}

impl<W> TextPresenter<W>
where
    W: Write,
{
    /// Creates a presenter writing to `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the presenter, yielding the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> Presenter for TextPresenter<W>
where
    W: Write,
{
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        self.writer.write_all(scene.to_text().as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum RenderingError {
    /// The tile slice does not describe a `size × size` board.
    #[error("expected {size}x{size} tiles, got {tiles}")]
    TileCountMismatch {
        /// Side length the caller declared.
        size: u32,
        /// Number of tiles supplied.
        tiles: usize,
    },
}
