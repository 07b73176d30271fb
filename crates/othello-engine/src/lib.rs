//! Othello (Reversi) rules engine.
//!
//! - [`core`] holds the board: cells, sides, coordinates and the directional
//!   capture scan that defines move legality.
//! - [`engine`] holds game state: immutable [`Snapshot`] values and the
//!   [`GameSession`] that owns the current position and its undo history.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Why a placement was rejected. A rejected placement never mutates state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum MoveError {
    #[display("({x}, {y}) is outside the board")]
    OutOfBounds { x: usize, y: usize },
    #[display("{mv} is already occupied")]
    Occupied {
        #[error(not(source))]
        mv: Move,
    },
    #[display("{mv} does not capture any piece")]
    NoCapture {
        #[error(not(source))]
        mv: Move,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cannot undo past the initial state")]
pub struct UndoError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum PassError {
    #[display("{side} has a legal move and cannot pass")]
    MovesAvailable {
        #[error(not(source))]
        side: Side,
    },
    #[display("the game is already over")]
    GameOver,
}
