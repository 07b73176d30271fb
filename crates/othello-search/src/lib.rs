//! Computer opponents for the Othello engine.
//!
//! - [`minimax`] - Depth-limited minimax with alpha-beta pruning
//! - [`deepening`] - Iterative deepening bounded by a deadline
//! - [`player`] - [`Player`](player::Player) strategies: search and random
//!
//! [`computer_move`] and [`play_turn`] apply a player's decision to a
//! [`GameSession`], passing when the side to move has nothing to play.

use othello_engine::{GameSession, Move, MoveError, PassError};
use tracing::info;

use self::player::{Player, SearchPlayer};

pub mod deepening;
pub mod minimax;
pub mod player;

/// What a computer turn did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum ComputerMove {
    #[display("placed at {_0}")]
    Placed(Move),
    #[display("passed")]
    Passed,
    /// The game was already over; the session is unchanged.
    #[display("game over")]
    GameOver,
}

/// A player chose something the session refused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum TurnError {
    #[display("{_0}")]
    Move(MoveError),
    #[display("{_0}")]
    Pass(PassError),
}

/// Lets alpha-beta search play one turn for the side to move.
///
/// `depth` is the search horizon in plies; zero is treated as one.
///
/// # Example
///
/// ```
/// use othello_engine::{GameSession, Side};
/// use othello_search::{ComputerMove, computer_move};
///
/// let mut session = GameSession::new();
/// let played = computer_move(&mut session, 2).unwrap();
///
/// assert!(played.is_placed());
/// assert_eq!(session.side_to_move(), Side::White);
/// ```
pub fn computer_move(session: &mut GameSession, depth: u32) -> Result<ComputerMove, TurnError> {
    play_turn(session, &mut SearchPlayer::new(depth))
}

/// Asks `player` for a move and applies it, or passes when it has none.
pub fn play_turn(
    session: &mut GameSession,
    player: &mut dyn Player,
) -> Result<ComputerMove, TurnError> {
    if session.is_game_over() {
        return Ok(ComputerMove::GameOver);
    }
    let side = session.side_to_move();
    match player.select_move(session.current_state()) {
        Some(mv) => {
            session.add(mv.x(), mv.y())?;
            info!(%side, %mv, player = %player.name(), "move played");
            Ok(ComputerMove::Placed(mv))
        }
        None => {
            session.pass()?;
            info!(%side, player = %player.name(), "turn passed");
            Ok(ComputerMove::Passed)
        }
    }
}
