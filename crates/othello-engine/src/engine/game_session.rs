use crate::{
    MoveError, PassError, UndoError,
    core::{Move, MoveList, Side},
};

use super::snapshot::{Outcome, Snapshot, SnapshotError, SnapshotRecord};

/// A live game: the current position plus every position that led to it.
///
/// The history is append-only apart from [`undo`](Self::undo). It always
/// holds at least one snapshot, and its last entry is the current state.
/// A new snapshot is appended after every placement and every pass.
///
/// A session is a plain owned value; callers that run several games keep one
/// session per game.
#[derive(Debug, Clone)]
pub struct GameSession {
    state: Snapshot,
    history: Vec<Snapshot>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Creates a session at the opening position.
    #[must_use]
    pub fn new() -> Self {
        Self::from_snapshot(Snapshot::initial())
    }

    /// Creates a session whose history starts at `snapshot`.
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            state: snapshot,
            history: vec![snapshot],
        }
    }

    /// Resets to the opening position and clears the history.
    pub fn start(&mut self) {
        *self = Self::new();
    }

    #[must_use]
    pub fn current_state(&self) -> &Snapshot {
        &self.state
    }

    /// Replaces the game with the position described by `record`.
    ///
    /// The record is validated before anything changes; on success the
    /// history restarts from the new position.
    pub fn set_state(&mut self, record: SnapshotRecord) -> Result<(), SnapshotError> {
        let snapshot = Snapshot::try_from(record)?;
        *self = Self::from_snapshot(snapshot);
        Ok(())
    }

    /// Snapshots from the oldest to the current one.
    #[must_use]
    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    #[must_use]
    pub fn side_to_move(&self) -> Side {
        self.state.side_to_move()
    }

    #[must_use]
    pub fn is_valid_move(&self, x: usize, y: usize, side: Side) -> bool {
        self.state.is_legal_move(x, y, side)
    }

    #[must_use]
    pub fn valid_moves(&self) -> MoveList {
        self.state.valid_moves()
    }

    /// Places a piece for the side to move at `(x, y)`.
    ///
    /// Fails without touching the session when the coordinate is off the
    /// board, the cell is occupied, or the placement captures nothing.
    pub fn add(&mut self, x: usize, y: usize) -> Result<(), MoveError> {
        let mv = Move::new(x, y).ok_or(MoveError::OutOfBounds { x, y })?;
        let next = self.state.apply_move(mv)?;
        self.push(next);
        Ok(())
    }

    /// Hands the turn to the opponent.
    ///
    /// Only allowed when the side to move has no legal placement and the game
    /// is not over; the board is left as it is.
    pub fn pass(&mut self) -> Result<(), PassError> {
        if self.state.is_game_over() {
            return Err(PassError::GameOver);
        }
        let side = self.state.side_to_move();
        if self.state.has_moves(side) {
            return Err(PassError::MovesAvailable { side });
        }
        self.push(self.state.passed());
        Ok(())
    }

    /// Drops the latest snapshot and restores the one before it.
    pub fn undo(&mut self) -> Result<(), UndoError> {
        if self.history.len() <= 1 {
            return Err(UndoError);
        }
        self.history.pop();
        if let Some(&previous) = self.history.last() {
            self.state = previous;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Winner by piece count, or `None` while the game is running.
    #[must_use]
    pub fn winner(&self) -> Option<Outcome> {
        self.state.outcome()
    }

    #[must_use]
    pub fn score_board(&self, maximizing_side: Side) -> i32 {
        self.state.score(maximizing_side)
    }

    fn push(&mut self, next: Snapshot) {
        self.state = next;
        self.history.push(next);
    }
}
