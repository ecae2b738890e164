//! Interactive terminal session.

use std::{
    io::{BufRead, Write},
    time::Duration,
};

use anyhow::{Context, Result};
use quakesafe_core::{Command, Direction, Event, PathResult, ScoreStore};
use quakesafe_rendering::{describe, Presenter, Scene};
use quakesafe_system_pathing::query as find_path;
use quakesafe_system_persistence::Persistence;
use quakesafe_world::{self as world, query, GameSession};
use rand::Rng;

/// Player instruction decoded from a line of input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    Move(Direction),
    Reset,
    TogglePath,
    Quit,
}

/// Decodes a line of terminal input.
pub(crate) fn parse_input(line: &str) -> Option<Input> {
    let input = match line.trim().to_ascii_lowercase().as_str() {
        "w" | "k" | "up" => Input::Move(Direction::North),
        "d" | "l" | "right" => Input::Move(Direction::East),
        "s" | "j" | "down" => Input::Move(Direction::South),
        "a" | "h" | "left" => Input::Move(Direction::West),
        "r" | "reset" => Input::Reset,
        "p" | "path" => Input::TogglePath,
        "q" | "quit" | "exit" => Input::Quit,
        _ => return None,
    };
    Some(input)
}

/// Owns the session together with the collaborators reacting to its events.
#[derive(Debug)]
pub(crate) struct PlayLoop<G, S> {
    session: GameSession<G>,
    persistence: Persistence<S>,
    show_path: bool,
}

impl<G, S> PlayLoop<G, S>
where
    G: Rng,
    S: ScoreStore,
{
    pub(crate) fn new(session: GameSession<G>, persistence: Persistence<S>, show_path: bool) -> Self {
        Self {
            session,
            persistence,
            show_path,
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        world::apply(&mut self.session, command, &mut events);
        self.persistence
            .handle(&events)
            .context("failed to persist best score")?;
        Ok(events)
    }

    fn scene(&self) -> Result<Scene> {
        let overlay = self.show_path.then(|| {
            let state = query::state(&self.session);
            find_path(query::grid(&self.session), state.player, query::goal(&self.session))
        });
        build_scene(&self.session, overlay.as_ref())
    }

    /// Reads instructions until input ends or the player quits.
    ///
    /// `clock` reports the wall-clock time elapsed since it was last called.
    pub(crate) fn run<I, P, W, C>(
        &mut self,
        input: I,
        presenter: &mut P,
        out: &mut W,
        mut clock: C,
    ) -> Result<()>
    where
        I: BufRead,
        P: Presenter,
        W: Write,
        C: FnMut() -> Duration,
    {
        writeln!(out, "{}", query::welcome_banner())?;
        writeln!(
            out,
            "Controls: w/a/s/d to move, r to reset, p to toggle the advisory path, q to quit."
        )?;
        presenter.present(&self.scene()?)?;

        for line in input.lines() {
            let line = line.context("failed to read player input")?;
            let Some(instruction) = parse_input(&line) else {
                writeln!(out, "Unrecognised input {:?}", line.trim())?;
                continue;
            };

            let command = match instruction {
                Input::Quit => break,
                Input::TogglePath => {
                    self.show_path = !self.show_path;
                    None
                }
                Input::Reset => Some(Command::Reset),
                Input::Move(direction) => Some(Command::Move { direction }),
            };

            let _ = self.dispatch(Command::Tick { dt: clock() })?;
            if let Some(command) = command {
                for event in self.dispatch(command)? {
                    if let Some(message) = describe(&event) {
                        writeln!(out, "{message}")?;
                    }
                }
            }
            presenter.present(&self.scene()?)?;
        }

        Ok(())
    }
}

/// Builds the scene for the session's current board with an optional path overlay.
pub(crate) fn build_scene<G>(session: &GameSession<G>, overlay: Option<&PathResult>) -> Result<Scene> {
    let grid = query::grid(session);
    Scene::build(
        query::tiles(session),
        grid.size(),
        query::goal(session),
        &query::state(session),
        overlay,
    )
    .context("failed to build scene")
}
