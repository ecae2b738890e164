#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Best-score persistence collaborator for the QuakeSafe session.
//!
//! The session never touches storage. It announces improvements through
//! [`Event::BestScoreImproved`] and the [`Persistence`] system forwards them to
//! a [`ScoreStore`].

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use quakesafe_core::{Event, ScoreStore, StoreError};
use serde::{Deserialize, Serialize};

/// Pure system that persists best-score improvements announced by the session.
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
}

impl<S> Persistence<S>
where
    S: ScoreStore,
{
    /// Creates a persistence system writing to the provided store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads the best score the next session should start with.
    pub fn load_best_score(&self) -> Result<u32, StoreError> {
        self.store.load_best_score()
    }

    /// Consumes session events and saves every announced best score.
    ///
    /// Stops at the first failed save and returns its error.
    pub fn handle(&mut self, events: &[Event]) -> Result<(), StoreError> {
        for event in events {
            if let Event::BestScoreImproved { best_score } = event {
                if let Err(error) = self.store.save_best_score(*best_score) {
                    warn!("failed to persist best score {best_score}: {error}");
                    return Err(error);
                }
                debug!("persisted best score {best_score}");
            }
        }
        Ok(())
    }

    /// Provides read-only access to the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Store that keeps the best score in process memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryScoreStore {
    best_score: u32,
}

impl MemoryScoreStore {
    /// Creates a store pre-populated with the provided best score.
    #[must_use]
    pub const fn new(best_score: u32) -> Self {
        Self { best_score }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load_best_score(&self) -> Result<u32, StoreError> {
        Ok(self.best_score)
    }

    fn save_best_score(&mut self, best_score: u32) -> Result<(), StoreError> {
        self.best_score = best_score;
        Ok(())
    }
}

/// Store that keeps the best score in a small JSON document on disk.
///
/// A missing file reads as a best score of zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JsonFileScoreStore {
    path: PathBuf,
}

impl JsonFileScoreStore {
    /// Creates a store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredBestScore {
    best_score: u32,
}

impl ScoreStore for JsonFileScoreStore {
    fn load_best_score(&self) -> Result<u32, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(error) => return Err(error.into()),
        };

        let stored: StoredBestScore =
            serde_json::from_str(&contents).map_err(|error| StoreError::Malformed {
                reason: error.to_string(),
            })?;
        Ok(stored.best_score)
    }

    fn save_best_score(&mut self, best_score: u32) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&StoredBestScore { best_score }).map_err(
            |error| StoreError::Malformed {
                reason: error.to_string(),
            },
        )?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
