//! Game state and session management.
//!
//! - [`Snapshot`] - Immutable position: board, side to move and piece counts
//! - [`SnapshotRecord`] - Wire form of a snapshot, validated on conversion
//! - [`GameSession`] - Live game with append-only history and undo
//! - [`Outcome`] - Result of a finished game
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] (already at the opening position)
//! 2. Place pieces with [`GameSession::add`]
//! 3. When the side to move has no legal placement, call [`GameSession::pass`]
//! 4. Stop once [`GameSession::is_game_over`] reports `true`
//!
//! # Example
//!
//! ```
//! use othello_engine::{GameSession, Side};
//!
//! let mut session = GameSession::new();
//! session.add(2, 3).unwrap();
//!
//! assert_eq!(session.current_state().count(Side::Black), 4);
//! assert_eq!(session.current_state().count(Side::White), 1);
//! assert_eq!(session.side_to_move(), Side::White);
//!
//! session.undo().unwrap();
//! assert_eq!(session.side_to_move(), Side::Black);
//! ```

pub use self::{game_session::*, snapshot::*};

mod game_session;
mod snapshot;
