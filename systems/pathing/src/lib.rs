#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Uniform-cost path engine that finds the cheapest route across a board and
//! reports the score collected along that exact route.
//!
//! The engine is a pure function of a [`GridView`]: it holds no state between
//! calls and never observes visited flags. The reported score belongs to the
//! cost-optimal path; it is not a separately maximised score.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use log::debug;
use quakesafe_core::{CellCoord, Cost, Direction, GridView, PathNode, PathResult};

/// Order in which neighbours are expanded: down, right, up, left.
///
/// Together with first-in-first-out tie-breaking this fixes which of several
/// equal-cost paths is returned.
pub const EXPANSION_ORDER: [Direction; 4] = [
    Direction::South,
    Direction::East,
    Direction::North,
    Direction::West,
];

/// Computes the minimum-cost path from `start` to `goal`.
///
/// Nodes are settled in nondecreasing cumulative cost; equal costs settle in
/// insertion order. Obstacles are never enqueued. An unreachable goal, or a
/// start or goal outside the board, yields [`PathResult::unreachable`].
#[must_use]
pub fn query<G>(grid: &G, start: CellCoord, goal: CellCoord) -> PathResult
where
    G: GridView + ?Sized,
{
    if !grid.contains(start) || !grid.contains(goal) {
        debug!("path query {start} -> {goal} lies outside the board");
        return PathResult::unreachable();
    }

    let (columns, rows) = grid.dimensions();
    let Some(mut search) = Search::new(columns, rows) else {
        return PathResult::unreachable();
    };

    search.push(
        PathNode {
            cell: start,
            cost: Cost::ZERO,
            score: grid.score(start),
        },
        None,
    );

    while let Some(Reverse(entry)) = search.frontier.pop() {
        let Some(index) = search.index(entry.node.cell) else {
            continue;
        };
        if search.settled[index].is_some() {
            continue;
        }
        search.settled[index] = Some(Settled {
            node: entry.node,
            parent: entry.parent,
        });

        if entry.node.cell == goal {
            let result = search.reconstruct(index);
            debug!(
                "path query {start} -> {goal}: cost {}, score {}, {} enqueued",
                result.total_cost, result.total_score, search.sequence
            );
            return result;
        }

        for direction in EXPANSION_ORDER {
            let Some(neighbor) = entry.node.cell.offset(direction, columns, rows) else {
                continue;
            };
            let step = grid.cost(neighbor);
            if !step.is_finite() {
                continue;
            }
            if search.is_settled(neighbor) {
                continue;
            }

            search.push(
                PathNode {
                    cell: neighbor,
                    cost: entry.node.cost.saturating_add(step),
                    score: entry.node.score.saturating_add(grid.score(neighbor)),
                },
                Some(index),
            );
        }
    }

    debug!("path query {start} -> {goal}: goal unreachable");
    PathResult::unreachable()
}

/// Computes the cost-optimal route between the board's opposite corners.
///
/// Its `total_score` is the board's reference score: the score of the
/// cheapest route, which is not necessarily the best achievable score.
#[must_use]
pub fn reference_route<G>(grid: &G) -> PathResult
where
    G: GridView + ?Sized,
{
    let (columns, rows) = grid.dimensions();
    if columns == 0 || rows == 0 {
        return PathResult::unreachable();
    }

    query(
        grid,
        CellCoord::new(0, 0),
        CellCoord::new(columns - 1, rows - 1),
    )
}

#[derive(Debug)]
struct Search {
    width: usize,
    settled: Vec<Option<Settled>>,
    frontier: BinaryHeap<Reverse<FrontierEntry>>,
    sequence: u64,
}

impl Search {
    fn new(columns: u32, rows: u32) -> Option<Self> {
        let width = usize::try_from(columns).ok()?;
        let height = usize::try_from(rows).ok()?;
        let node_count = width.checked_mul(height)?;
        Some(Self {
            width,
            settled: vec![None; node_count],
            frontier: BinaryHeap::new(),
            sequence: 0,
        })
    }

    fn push(&mut self, node: PathNode, parent: Option<usize>) {
        self.frontier.push(Reverse(FrontierEntry {
            sequence: self.sequence,
            node,
            parent,
        }));
        self.sequence += 1;
    }

    fn is_settled(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.settled.get(index))
            .map_or(false, Option::is_some)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        row.checked_mul(self.width)?.checked_add(column)
    }

    fn reconstruct(&self, goal_index: usize) -> PathResult {
        let mut path = Vec::new();
        let mut cursor = Some(goal_index);
        while let Some(index) = cursor {
            let Some(settled) = self.settled.get(index).copied().flatten() else {
                break;
            };
            path.push(settled.node);
            cursor = settled.parent;
        }
        path.reverse();

        match path.last() {
            Some(goal) => PathResult {
                total_cost: goal.cost,
                total_score: goal.score,
                path,
            },
            None => PathResult::unreachable(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Settled {
    node: PathNode,
    parent: Option<usize>,
}

/// Frontier entry ordered by `(cumulative cost, insertion sequence)`.
#[derive(Clone, Copy, Debug)]
struct FrontierEntry {
    sequence: u64,
    node: PathNode,
    parent: Option<usize>,
}

impl FrontierEntry {
    fn key(&self) -> (Cost, u64) {
        (self.node.cost, self.sequence)
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}
