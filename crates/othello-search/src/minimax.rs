//! Depth-limited minimax with alpha-beta pruning.

use std::time::Instant;

use othello_engine::{Move, Side, Snapshot};
use tracing::debug;

/// Lower bound used as "minus infinity" for scores.
pub const NEG_INFINITY: i32 = i32::MIN;
/// Upper bound used as "plus infinity" for scores.
pub const INFINITY: i32 = i32::MAX;

/// How many nodes are visited between two deadline checks.
const TIME_CHECK_INTERVAL: u64 = 1024;

/// Value of a searched position and the move that achieves it.
///
/// `best_move` is only filled in at maximizing layers that expanded at least
/// one move; terminal nodes, passes and minimizing layers report `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub score: i32,
    pub best_move: Option<Move>,
}

impl SearchResult {
    const fn leaf(score: i32) -> Self {
        Self {
            score,
            best_move: None,
        }
    }
}

/// Outcome of a root search, with statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    /// Deepest fully completed search depth.
    pub depth: u32,
    pub score: i32,
    pub best_move: Option<Move>,
    /// Nodes visited, including interrupted iterations.
    pub nodes: u64,
}

/// Runs minimax with alpha-beta pruning from `snapshot`.
///
/// Scores are always from `maximizing_side`'s point of view
/// ([`Snapshot::score`]). At a maximizing layer the first move reaching the
/// best score wins ties, following row-major move order. A side without a
/// legal move passes, which costs one ply of depth.
///
/// # Example
///
/// ```
/// use othello_engine::{Move, Side, Snapshot};
/// use othello_search::minimax::{INFINITY, NEG_INFINITY, minimax};
///
/// let start = Snapshot::initial();
/// let result = minimax(&start, 1, Side::Black, NEG_INFINITY, INFINITY, true);
///
/// // Every opening move flips one piece; the first one in row-major order is kept.
/// assert_eq!(result.score, 3);
/// assert_eq!(result.best_move, Move::new(3, 2));
/// ```
#[must_use]
pub fn minimax(
    snapshot: &Snapshot,
    depth: u32,
    maximizing_side: Side,
    alpha: i32,
    beta: i32,
    is_maximizing_turn: bool,
) -> SearchResult {
    Searcher::new().minimax(
        snapshot,
        depth,
        maximizing_side,
        alpha,
        beta,
        is_maximizing_turn,
    )
}

/// Searches `snapshot` to `depth` plies for the side to move.
#[must_use]
pub fn search(snapshot: &Snapshot, depth: u32) -> SearchReport {
    let mut searcher = Searcher::new();
    let result = searcher.search_root(snapshot, depth);
    let report = SearchReport {
        depth,
        score: result.score,
        best_move: result.best_move,
        nodes: searcher.nodes(),
    };
    debug!(
        depth,
        score = report.score,
        nodes = report.nodes,
        best_move = ?report.best_move,
        "search completed"
    );
    report
}

/// Per-search bookkeeping: node counter and optional deadline.
#[derive(Debug, Clone)]
pub(crate) struct Searcher {
    nodes: u64,
    deadline: Option<Instant>,
    stopped: bool,
}

impl Searcher {
    pub(crate) fn new() -> Self {
        Self {
            nodes: 0,
            deadline: None,
            stopped: false,
        }
    }

    pub(crate) fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            ..Self::new()
        }
    }

    pub(crate) fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Whether the deadline interrupted the search. Results of a stopped
    /// search are meaningless.
    pub(crate) fn stopped(&self) -> bool {
        self.stopped
    }

    pub(crate) fn search_root(&mut self, snapshot: &Snapshot, depth: u32) -> SearchResult {
        self.minimax(
            snapshot,
            depth,
            snapshot.side_to_move(),
            NEG_INFINITY,
            INFINITY,
            true,
        )
    }

    fn check_deadline(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        if let Some(deadline) = self.deadline {
            if self.nodes % TIME_CHECK_INTERVAL == 0 && Instant::now() >= deadline {
                self.stopped = true;
            }
        }
        self.stopped
    }

    fn minimax(
        &mut self,
        snapshot: &Snapshot,
        depth: u32,
        maximizing_side: Side,
        mut alpha: i32,
        mut beta: i32,
        is_maximizing_turn: bool,
    ) -> SearchResult {
        self.nodes += 1;

        if depth == 0 {
            return SearchResult::leaf(snapshot.score(maximizing_side));
        }
        // Same as `Snapshot::is_game_over`, reusing the move list.
        let moves = snapshot.valid_moves();
        let game_over = snapshot.empty_count() == 0
            || (moves.is_empty() && !snapshot.has_moves(snapshot.side_to_move().opponent()));
        if game_over || self.check_deadline() {
            return SearchResult::leaf(snapshot.score(maximizing_side));
        }

        if moves.is_empty() {
            // Forced pass: the opponent has a move.
            let child = self.minimax(
                &snapshot.passed(),
                depth - 1,
                maximizing_side,
                alpha,
                beta,
                !is_maximizing_turn,
            );
            return SearchResult::leaf(child.score);
        }

        if is_maximizing_turn {
            let mut best = SearchResult::leaf(NEG_INFINITY);
            for mv in moves {
                let child = snapshot
                    .apply_move(mv)
                    .expect("enumerated moves are legal");
                let score = self
                    .minimax(&child, depth - 1, maximizing_side, alpha, beta, false)
                    .score;
                if score > best.score {
                    best = SearchResult {
                        score,
                        best_move: Some(mv),
                    };
                }
                alpha = alpha.max(score);
                if beta <= alpha || self.stopped {
                    break;
                }
            }
            best
        } else {
            let mut best = SearchResult::leaf(INFINITY);
            for mv in moves {
                let child = snapshot
                    .apply_move(mv)
                    .expect("enumerated moves are legal");
                let score = self
                    .minimax(&child, depth - 1, maximizing_side, alpha, beta, true)
                    .score;
                best.score = best.score.min(score);
                beta = beta.min(score);
                if beta <= alpha || self.stopped {
                    break;
                }
            }
            best
        }
    }
}

#[cfg(test)]
mod tests {
    use othello_engine::BoardState;

    use super::*;

    /// Plain minimax without pruning, used as the reference for equivalence.
    fn full_minimax(snapshot: &Snapshot, depth: u32, side: Side, maximizing: bool) -> i32 {
        if depth == 0 || snapshot.is_game_over() {
            return snapshot.score(side);
        }
        let moves = snapshot.valid_moves();
        if moves.is_empty() {
            return full_minimax(&snapshot.passed(), depth - 1, side, !maximizing);
        }
        let scores = moves.iter().map(|&mv| {
            let child = snapshot.apply_move(mv).unwrap();
            full_minimax(&child, depth - 1, side, !maximizing)
        });
        if maximizing {
            scores.max().unwrap()
        } else {
            scores.min().unwrap()
        }
    }

    fn first_move_line(plies: usize) -> Snapshot {
        let mut snapshot = Snapshot::initial();
        for _ in 0..plies {
            snapshot = match snapshot.valid_moves().first() {
                Some(&mv) => snapshot.apply_move(mv).unwrap(),
                None => snapshot.passed(),
            };
        }
        snapshot
    }

    fn blocked_black() -> Snapshot {
        let board = BoardState::from_ascii(
            "
            W B . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            ",
        );
        Snapshot::from_board(board, Side::Black)
    }

    #[test]
    fn test_depth_zero_is_static_evaluation() {
        for snapshot in [Snapshot::initial(), first_move_line(7), blocked_black()] {
            for side in Side::ALL {
                for turn in [true, false] {
                    let result = minimax(&snapshot, 0, side, NEG_INFINITY, INFINITY, turn);
                    assert_eq!(result, SearchResult::leaf(snapshot.score(side)));
                }
            }
        }
    }

    #[test]
    fn test_first_best_move_wins_ties() {
        let result = minimax(
            &Snapshot::initial(),
            1,
            Side::Black,
            NEG_INFINITY,
            INFINITY,
            true,
        );
        assert_eq!(result.score, 3);
        assert_eq!(result.best_move, Move::new(3, 2));
    }

    #[test]
    fn test_pruned_search_matches_full_minimax() {
        let positions = [
            Snapshot::initial(),
            first_move_line(5),
            first_move_line(12),
            first_move_line(20),
        ];
        for snapshot in positions {
            let side = snapshot.side_to_move();
            for depth in 1..=4 {
                let pruned = minimax(&snapshot, depth, side, NEG_INFINITY, INFINITY, true);
                let full = full_minimax(&snapshot, depth, side, true);
                assert_eq!(pruned.score, full, "depth {depth} on {snapshot:?}");
            }
        }
    }

    #[test]
    fn test_best_move_achieves_reported_score() {
        let snapshot = first_move_line(9);
        let side = snapshot.side_to_move();
        let result = minimax(&snapshot, 3, side, NEG_INFINITY, INFINITY, true);
        let mv = result.best_move.unwrap();
        let child = snapshot.apply_move(mv).unwrap();
        assert_eq!(full_minimax(&child, 2, side, false), result.score);
    }

    #[test]
    fn test_pass_rule() {
        let snapshot = blocked_black();
        let result = minimax(&snapshot, 2, Side::Black, NEG_INFINITY, INFINITY, true);
        // Black passes, white takes (2, 0) and wipes black out.
        assert_eq!(result, SearchResult::leaf(-3));

        // With a single ply the pass consumes the whole budget.
        let result = minimax(&snapshot, 1, Side::Black, NEG_INFINITY, INFINITY, true);
        assert_eq!(result, SearchResult::leaf(0));
    }

    #[test]
    fn test_game_over_root_returns_no_move() {
        let board = BoardState::from_ascii(
            "
            B B . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            ",
        );
        let snapshot = Snapshot::from_board(board, Side::White);
        let result = minimax(&snapshot, 5, Side::White, NEG_INFINITY, INFINITY, true);
        assert_eq!(result, SearchResult::leaf(-2));
    }

    #[test]
    fn test_full_board_is_terminal_at_any_depth() {
        let board = BoardState::from_ascii(
            "
            B B B B B B B B
            B B B B B B B B
            B B B B B B B B
            B B B B B B B B
            W W W W W W W W
            W W W W W W W W
            W W W W W W W W
            W W W W W W W B
            ",
        );
        let snapshot = Snapshot::from_board(board, Side::White);
        assert!(snapshot.is_game_over());
        for depth in 1..=4 {
            let report = search(&snapshot, depth);
            assert_eq!(report.score, -2);
            assert_eq!(report.best_move, None);
            assert_eq!(report.nodes, 1);
        }
    }

    #[test]
    fn test_terminal_detection_matches_snapshot() {
        let mut positions = vec![blocked_black(), blocked_black().passed()];
        positions.extend((0..60).map(first_move_line));
        for snapshot in positions {
            let report = search(&snapshot, 1);
            if snapshot.is_game_over() {
                assert_eq!(report.nodes, 1, "{snapshot:?}");
                assert_eq!(report.best_move, None);
            } else {
                assert!(report.nodes > 1, "{snapshot:?}");
            }
        }
    }

    #[test]
    fn test_search_counts_nodes() {
        let report = search(&Snapshot::initial(), 3);
        assert_eq!(report.depth, 3);
        assert!(report.best_move.is_some());
        // Root plus at least one full line.
        assert!(report.nodes > 3);

        let shallow = search(&Snapshot::initial(), 1);
        assert_eq!(shallow.nodes, 5);
    }

    #[test]
    fn test_search_root_uses_side_to_move() {
        let snapshot = first_move_line(1);
        assert_eq!(snapshot.side_to_move(), Side::White);
        let report = search(&snapshot, 2);
        let direct = minimax(&snapshot, 2, Side::White, NEG_INFINITY, INFINITY, true);
        assert_eq!(report.score, direct.score);
        assert_eq!(report.best_move, direct.best_move);
    }
}
