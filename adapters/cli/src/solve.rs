//! Non-interactive board solver.

use std::io::Write;

use anyhow::{Context, Result};
use quakesafe_core::GridConfig;
use quakesafe_rendering::Presenter;
use quakesafe_system_pathing::reference_route;
use quakesafe_world::{query, GameSession};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::play::build_scene;

/// Output format requested for the solved route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Format {
    Text,
    Json,
}

/// Generates the board for `seed` and reports its cost-optimal corner-to-corner route.
pub(crate) fn run<P, W>(
    config: GridConfig,
    seed: u64,
    format: Format,
    presenter: &mut P,
    out: &mut W,
) -> Result<()>
where
    P: Presenter,
    W: Write,
{
    let session = GameSession::new(config, 0, ChaCha8Rng::seed_from_u64(seed))
        .context("board configuration is invalid")?;
    let route = reference_route(query::grid(&session));

    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, &route)
                .context("failed to serialise route")?;
            writeln!(out)?;
        }
        Format::Text => {
            presenter.present(&build_scene(&session, Some(&route))?)?;
            if route.is_reachable() {
                writeln!(
                    out,
                    "Seed {seed}: cheapest route costs {} moves and scores {}.",
                    route.total_cost, route.total_score
                )?;
            } else {
                writeln!(out, "Seed {seed}: the goal is unreachable.")?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quakesafe_core::PathResult;
    use quakesafe_rendering::TextPresenter;

    #[test]
    fn json_output_round_trips_the_route() {
        let config = GridConfig::new(6, 0.1, 0.2, 0.2);
        let mut presenter = TextPresenter::new(Vec::new());
        let mut out = Vec::new();

        run(config, 17, Format::Json, &mut presenter, &mut out).expect("solve succeeds");

        let route: PathResult = serde_json::from_slice(&out).expect("valid json");
        let session = GameSession::new(config, 0, ChaCha8Rng::seed_from_u64(17))
            .expect("valid config");
        assert_eq!(route, reference_route(query::grid(&session)));
        assert!(presenter.into_inner().is_empty());
    }

    #[test]
    fn open_board_reports_manhattan_cost() {
        let config = GridConfig::new(4, 0.0, 0.0, 0.0);
        let mut presenter = TextPresenter::new(Vec::new());
        let mut out = Vec::new();

        run(config, 1, Format::Text, &mut presenter, &mut out).expect("solve succeeds");

        let summary = String::from_utf8(out).expect("utf8 output");
        assert_eq!(summary, "Seed 1: cheapest route costs 6 moves and scores 0.\n");
        let frame = String::from_utf8(presenter.into_inner()).expect("utf8 output");
        assert!(frame.starts_with("@...\n*...\n*...\n***G\n"));
    }

    #[test]
    fn blocked_board_reports_unreachable_goal() {
        let config = GridConfig::new(3, 1.0, 0.0, 0.0);
        let mut presenter = TextPresenter::new(Vec::new());
        let mut out = Vec::new();

        run(config, 5, Format::Text, &mut presenter, &mut out).expect("solve succeeds");

        let summary = String::from_utf8(out).expect("utf8 output");
        assert_eq!(summary, "Seed 5: the goal is unreachable.\n");
    }
}
