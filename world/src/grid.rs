//! Procedurally generated tile field backing a game session.

use log::debug;
use quakesafe_core::{CellCoord, Cost, GridConfig, GridView, Tile, TileKind};
use rand::Rng;

/// Square `size × size` field of classified tiles stored in row-major order.
///
/// Cost and score accessors never consult the visited flags, so the same board
/// serves interactive play and path queries alike.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: u32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Generates a board by sampling every tile independently.
    ///
    /// Each tile draws from `rng` in a fixed precedence: obstacle first, then
    /// bonus, then penalty, otherwise plain. A draw is only taken when every
    /// earlier category was rejected, so a fixed seed always yields the same
    /// board. The start and goal corners receive no special treatment.
    pub fn generate<R>(config: &GridConfig, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let grid = Self::from_fn(config.size, |_| sample_kind(config, rng));
        debug!(
            "generated {size}x{size} grid: {obstacles} obstacles, {bonuses} bonuses, {penalties} penalties",
            size = grid.size,
            obstacles = grid.count(TileKind::Obstacle),
            bonuses = grid.count(TileKind::Bonus),
            penalties = grid.count(TileKind::Penalty),
        );
        grid
    }

    /// Builds a board whose tile kinds are supplied by `kind_at`, visited in
    /// row-major order.
    pub fn from_fn<F>(size: u32, mut kind_at: F) -> Self
    where
        F: FnMut(CellCoord) -> TileKind,
    {
        let capacity = usize::try_from(u64::from(size) * u64::from(size)).unwrap_or(0);
        let mut tiles = Vec::with_capacity(capacity);
        for row in 0..size {
            for column in 0..size {
                let cell = CellCoord::new(column, row);
                tiles.push(Tile::new(cell, kind_at(cell)));
            }
        }
        Self { size, tiles }
    }

    /// Side length of the board.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Tile at which every session starts.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        CellCoord::new(0, 0)
    }

    /// Tile the player must reach to end the session.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        let last = self.size.saturating_sub(1);
        CellCoord::new(last, last)
    }

    /// All tiles in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile stored at the provided coordinate, if it lies within the board.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<&Tile> {
        self.index(cell).and_then(|index| self.tiles.get(index))
    }

    pub(crate) fn tile_mut(&mut self, cell: CellCoord) -> Option<&mut Tile> {
        self.index(cell).and_then(|index| self.tiles.get_mut(index))
    }

    /// Movement cost of entering the tile; [`Cost::INFINITE`] for obstacles and
    /// out-of-bounds coordinates.
    #[must_use]
    pub fn cost(&self, cell: CellCoord) -> Cost {
        self.tile(cell)
            .map_or(Cost::INFINITE, |tile| tile.kind().cost())
    }

    /// One-time score delta of the tile; `0` for out-of-bounds coordinates.
    #[must_use]
    pub fn score(&self, cell: CellCoord) -> i32 {
        self.tile(cell).map_or(0, |tile| tile.kind().score_delta())
    }

    fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|tile| tile.kind() == kind).count()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.size || cell.row() >= self.size {
            return None;
        }

        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let width = usize::try_from(self.size).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

impl GridView for Grid {
    fn dimensions(&self) -> (u32, u32) {
        (self.size, self.size)
    }

    fn cost(&self, cell: CellCoord) -> Cost {
        Grid::cost(self, cell)
    }

    fn score(&self, cell: CellCoord) -> i32 {
        Grid::score(self, cell)
    }
}

fn sample_kind<R>(config: &GridConfig, rng: &mut R) -> TileKind
where
    R: Rng + ?Sized,
{
    if rng.gen::<f64>() < config.obstacle_probability {
        TileKind::Obstacle
    } else if rng.gen::<f64>() < config.bonus_probability {
        TileKind::Bonus
    } else if rng.gen::<f64>() < config.penalty_probability {
        TileKind::Penalty
    } else {
        TileKind::Plain
    }
}
