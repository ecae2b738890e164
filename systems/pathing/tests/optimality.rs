use std::collections::VecDeque;

use quakesafe_core::{CellCoord, Command, Cost, Direction, GridConfig, PathResult, TileKind};
use quakesafe_system_pathing::{query, reference_route};
use quakesafe_world::{self as world, GameSession, Grid};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Breadth-first distance in entered tiles, ignoring scores.
fn brute_force_distance(grid: &Grid, start: CellCoord, goal: CellCoord) -> Option<u32> {
    let size = grid.size();
    let mut distances = vec![None; (size * size) as usize];
    let mut queue = VecDeque::new();
    distances[(start.row() * size + start.column()) as usize] = Some(0_u32);
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        let distance = distances[(cell.row() * size + cell.column()) as usize]?;
        if cell == goal {
            return Some(distance);
        }
        let candidates = [
            (cell.column().checked_sub(1), Some(cell.row())),
            (Some(cell.column() + 1), Some(cell.row())),
            (Some(cell.column()), cell.row().checked_sub(1)),
            (Some(cell.column()), Some(cell.row() + 1)),
        ];
        for (column, row) in candidates {
            let (Some(column), Some(row)) = (column, row) else {
                continue;
            };
            if column >= size || row >= size {
                continue;
            }
            let neighbor = CellCoord::new(column, row);
            let slot = &mut distances[(row * size + column) as usize];
            if slot.is_some() || !grid.cost(neighbor).is_finite() {
                continue;
            }
            *slot = Some(distance + 1);
            queue.push_back(neighbor);
        }
    }

    None
}

fn assert_path_is_consistent(grid: &Grid, result: &PathResult, start: CellCoord, goal: CellCoord) {
    let cells: Vec<CellCoord> = result.cells().collect();
    assert_eq!(cells.first(), Some(&start));
    assert_eq!(cells.last(), Some(&goal));
    assert_eq!(cells.len() as u32, result.total_cost.get() + 1);

    for pair in cells.windows(2) {
        assert_eq!(pair[0].manhattan_distance(pair[1]), 1, "path must be 4-connected");
    }
    for cell in &cells[1..] {
        assert!(grid.cost(*cell).is_finite(), "path crosses obstacle at {cell}");
    }

    let summed: i32 = cells.iter().map(|cell| grid.score(*cell)).sum();
    assert_eq!(summed, result.total_score);

    let mut running_score = 0;
    for (steps, node) in result.path.iter().enumerate() {
        running_score += grid.score(node.cell);
        assert_eq!(node.cost, Cost::new(steps as u32));
        assert_eq!(node.score, running_score);
    }
}

#[test]
fn engine_matches_breadth_first_distance_on_small_boards() {
    let config = GridConfig::new(6, 0.3, 0.15, 0.15);
    let start = CellCoord::new(0, 0);
    let goal = CellCoord::new(5, 5);

    for seed in 0..256 {
        let grid = Grid::generate(&config, &mut ChaCha8Rng::seed_from_u64(seed));
        let result = query(&grid, start, goal);

        let goal_open = grid.cost(goal).is_finite();
        match brute_force_distance(&grid, start, goal).filter(|_| goal_open) {
            Some(distance) => {
                assert_eq!(result.total_cost, Cost::new(distance), "seed {seed}");
                assert_path_is_consistent(&grid, &result, start, goal);
            }
            None => {
                assert_eq!(result, PathResult::unreachable(), "seed {seed}");
            }
        }
    }
}

#[test]
fn engine_handles_interior_endpoints() {
    let config = GridConfig::new(6, 0.2, 0.2, 0.2);
    let start = CellCoord::new(2, 3);
    let goal = CellCoord::new(4, 1);

    for seed in 0..64 {
        let grid = Grid::generate(&config, &mut ChaCha8Rng::seed_from_u64(seed));
        let result = query(&grid, start, goal);
        let expected = brute_force_distance(&grid, start, goal).filter(|_| grid.cost(goal).is_finite());
        assert_eq!(result.total_cost, expected.map_or(Cost::INFINITE, Cost::new));
        if result.is_reachable() {
            assert_path_is_consistent(&grid, &result, start, goal);
        }
    }
}

#[test]
fn full_obstacle_column_blocks_every_route() {
    let grid = Grid::from_fn(5, |cell| {
        if cell.column() == 2 {
            TileKind::Obstacle
        } else {
            TileKind::Bonus
        }
    });

    let result = reference_route(&grid);

    assert!(result.path.is_empty());
    assert_eq!(result.total_cost, Cost::INFINITE);
    assert_eq!(result.total_score, 0);
}

#[test]
fn open_board_route_has_manhattan_cost() {
    let grid = Grid::from_fn(15, |_| TileKind::Plain);
    let result = reference_route(&grid);
    assert_eq!(result.total_cost, Cost::new(28));
    assert_eq!(result.total_score, 0);
}

#[test]
fn path_queries_ignore_visited_state() {
    let bonus = CellCoord::new(0, 1);
    let grid = Grid::from_fn(3, |cell| {
        if cell == bonus {
            TileKind::Bonus
        } else {
            TileKind::Plain
        }
    });
    let mut session = GameSession::from_grid(grid, 0, ChaCha8Rng::seed_from_u64(5))
        .expect("fixture board is valid");
    let before = reference_route(world::query::grid(&session));

    let mut events = Vec::new();
    world::apply(
        &mut session,
        Command::Move {
            direction: Direction::South,
        },
        &mut events,
    );
    let visited = world::query::grid(&session)
        .tile(bonus)
        .map(|tile| tile.visited());
    assert_eq!(visited, Some(true));

    let after = reference_route(world::query::grid(&session));
    assert_eq!(before, after);
    assert_eq!(after.total_score, 10);
}
