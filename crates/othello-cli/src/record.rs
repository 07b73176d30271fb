use std::{ops::Deref, path::PathBuf};

use chrono::Utc;
use othello_engine::{
    GameSession, Move, MoveError, PassError, Side, Snapshot, SnapshotError, SnapshotRecord,
    UndoError,
};
use othello_search::{ComputerMove, TurnError, player::Player};

use crate::{
    schema::record::{GameRecord, PlayerInfo, TurnAction, TurnRecord},
    util::Output,
};

/// A wrapper around [`GameSession`] that records every placement and pass.
///
/// Undo drops the matching turn record, so the recorded moves always replay
/// from the initial state to the current position.
#[derive(Debug, Clone)]
pub struct RecordingSession {
    session: GameSession,
    initial_state: Snapshot,
    moves: Vec<TurnRecord>,
}

/// Provides read-only access to the underlying `GameSession`.
///
/// `DerefMut` is not implemented: mutations must go through the methods
/// below so that turns are recorded.
impl Deref for RecordingSession {
    type Target = GameSession;

    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSession {
    pub fn new() -> Self {
        Self {
            session: GameSession::new(),
            initial_state: Snapshot::initial(),
            moves: vec![],
        }
    }

    pub fn moves(&self) -> &[TurnRecord] {
        &self.moves
    }

    pub fn start(&mut self) {
        *self = Self::new();
    }

    /// Replaces the position; the recording restarts from it.
    pub fn set_state(&mut self, record: SnapshotRecord) -> Result<(), SnapshotError> {
        self.session.set_state(record)?;
        self.initial_state = *self.session.current_state();
        self.moves.clear();
        Ok(())
    }

    pub fn add(&mut self, x: usize, y: usize) -> Result<(), MoveError> {
        let side = self.session.side_to_move();
        let mv = Move::new(x, y).ok_or(MoveError::OutOfBounds { x, y })?;
        self.session.add(x, y)?;
        self.record(side, TurnAction::Place(mv));
        Ok(())
    }

    pub fn pass(&mut self) -> Result<(), PassError> {
        let side = self.session.side_to_move();
        self.session.pass()?;
        self.record(side, TurnAction::Pass);
        Ok(())
    }

    pub fn undo(&mut self) -> Result<(), UndoError> {
        self.session.undo()?;
        self.moves.pop();
        Ok(())
    }

    /// Lets `player` act for the side to move and records what it did.
    pub fn play_turn(&mut self, player: &mut dyn Player) -> Result<ComputerMove, TurnError> {
        let side = self.session.side_to_move();
        let played = othello_search::play_turn(&mut self.session, player)?;
        match played {
            ComputerMove::Placed(mv) => self.record(side, TurnAction::Place(mv)),
            ComputerMove::Passed => self.record(side, TurnAction::Pass),
            ComputerMove::GameOver => {}
        }
        Ok(played)
    }

    pub fn to_record(&self, black: PlayerInfo, white: PlayerInfo) -> GameRecord {
        GameRecord {
            recorded_at: Utc::now(),
            black,
            white,
            initial_state: self.initial_state,
            moves: self.moves.clone(),
            final_state: *self.session.current_state(),
            outcome: self.session.winner(),
        }
    }

    /// Writes the game record as JSON to `path`.
    pub fn save(&self, path: PathBuf, black: PlayerInfo, white: PlayerInfo) -> anyhow::Result<()> {
        Output::save_json(&self.to_record(black, white), Some(path))
    }

    fn record(&mut self, side: Side, action: TurnAction) {
        self.moves.push(TurnRecord {
            turn: self.moves.len(),
            side,
            action,
        });
    }
}
