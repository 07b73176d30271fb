use othello_engine::{Move, Outcome, Side, Snapshot};
use othello_search::minimax::SearchReport;
use serde::{Deserialize, Serialize};

/// Result of `othello analyze` for a single position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionAnalysis {
    pub side_to_move: Side,
    /// `None` when the side to move has to pass or the game is over
    pub best_move: Option<Move>,
    /// Piece difference from the side to move's point of view
    pub score: i32,
    /// Deepest completed search depth
    pub depth: u32,
    pub nodes: u64,
    pub valid_moves: Vec<Move>,
    pub game_over: bool,
    pub outcome: Option<Outcome>,
}

impl PositionAnalysis {
    pub fn new(snapshot: &Snapshot, report: &SearchReport) -> Self {
        Self {
            side_to_move: snapshot.side_to_move(),
            best_move: report.best_move,
            score: report.score,
            depth: report.depth,
            nodes: report.nodes,
            valid_moves: snapshot.valid_moves().to_vec(),
            game_over: snapshot.is_game_over(),
            outcome: snapshot.outcome(),
        }
    }
}
