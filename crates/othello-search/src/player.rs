//! Move selection strategies.
//!
//! A [`Player`] looks at a position and picks a placement, or `None` when it
//! has to pass. The driver in [`crate::play_turn`] applies the choice to a
//! session.

use std::{
    fmt,
    time::{Duration, Instant},
};

use othello_engine::{Move, Snapshot};
use rand::{Rng as _, SeedableRng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;

use crate::{
    deepening::search_with_deadline,
    minimax::{SearchReport, search},
};

/// Something that chooses moves.
pub trait Player: fmt::Debug {
    /// Short label used in logs and game records.
    fn name(&self) -> String;

    /// Picks a legal move for the side to move, or `None` to pass.
    fn select_move(&mut self, snapshot: &Snapshot) -> Option<Move>;
}

/// Plays the move found by alpha-beta search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPlayer {
    depth: u32,
    time_limit: Option<Duration>,
}

impl SearchPlayer {
    /// Fixed-depth search. A depth of zero is raised to one so a move is
    /// always produced.
    #[must_use]
    pub fn new(depth: u32) -> Self {
        Self {
            depth: depth.max(1),
            time_limit: None,
        }
    }

    /// Iterative deepening up to the configured depth, bounded by `limit` per move.
    #[must_use]
    pub fn with_time_limit(self, limit: Duration) -> Self {
        Self {
            time_limit: Some(limit),
            ..self
        }
    }

    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[must_use]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Searches `snapshot` and returns the full report.
    #[must_use]
    pub fn analyze(&self, snapshot: &Snapshot) -> SearchReport {
        match self.time_limit {
            Some(limit) => search_with_deadline(snapshot, self.depth, Instant::now() + limit),
            None => search(snapshot, self.depth),
        }
    }
}

impl Player for SearchPlayer {
    fn name(&self) -> String {
        match self.time_limit {
            Some(limit) => format!("search(depth={}, {}ms)", self.depth, limit.as_millis()),
            None => format!("search(depth={})", self.depth),
        }
    }

    fn select_move(&mut self, snapshot: &Snapshot) -> Option<Move> {
        if snapshot.valid_moves().is_empty() {
            return None;
        }
        self.analyze(snapshot).best_move
    }
}

/// Picks a uniformly random legal move.
#[derive(Debug, Clone)]
pub struct RandomPlayer {
    rng: Pcg32,
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPlayer {
    /// For deterministic play, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Deterministic player: the same seed replays the same choices.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn name(&self) -> String {
        "random".to_owned()
    }

    fn select_move(&mut self, snapshot: &Snapshot) -> Option<Move> {
        snapshot.valid_moves().choose(&mut self.rng).copied()
    }
}
