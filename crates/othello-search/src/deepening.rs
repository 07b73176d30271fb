//! Iterative deepening under a wall-clock deadline.
//!
//! Searches depth 1, 2, 3, ... up to a maximum, keeping the result of the
//! deepest iteration that finished before the deadline. An iteration cut off
//! by the deadline is thrown away. Depth 1 ignores the deadline so a move is
//! always available.

use std::time::Instant;

use othello_engine::Snapshot;
use tracing::{debug, trace};

use crate::minimax::{SearchReport, Searcher};

/// Searches `snapshot` with increasing depth until `max_depth` or `deadline`.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
///
/// use othello_engine::Snapshot;
/// use othello_search::deepening::search_with_deadline;
///
/// let deadline = Instant::now() + Duration::from_millis(50);
/// let report = search_with_deadline(&Snapshot::initial(), 6, deadline);
///
/// assert!(report.depth >= 1);
/// assert!(report.best_move.is_some());
/// ```
#[must_use]
pub fn search_with_deadline(snapshot: &Snapshot, max_depth: u32, deadline: Instant) -> SearchReport {
    let mut searcher = Searcher::new();
    let result = searcher.search_root(snapshot, 1);
    let mut nodes = searcher.nodes();
    let mut best = SearchReport {
        depth: 1,
        score: result.score,
        best_move: result.best_move,
        nodes,
    };

    for depth in 2..=max_depth {
        if Instant::now() >= deadline {
            break;
        }
        let mut searcher = Searcher::with_deadline(deadline);
        let result = searcher.search_root(snapshot, depth);
        nodes += searcher.nodes();
        if searcher.stopped() {
            trace!(depth, "iteration interrupted by deadline");
            break;
        }
        trace!(depth, score = result.score, best_move = ?result.best_move, "iteration completed");
        best = SearchReport {
            depth,
            score: result.score,
            best_move: result.best_move,
            nodes,
        };
    }

    best.nodes = nodes;
    debug!(
        depth = best.depth,
        score = best.score,
        nodes = best.nodes,
        best_move = ?best.best_move,
        "deadline search completed"
    );
    best
}
