use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    MoveError,
    core::{BOARD_SIZE, BoardState, CELL_COUNT, Cell, Move, MoveList, Side},
};

/// Result of a finished game.
///
/// Serialized as `"B"`, `"W"` or `"T"`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(into = "char", try_from = "char")]
pub enum Outcome {
    #[display("{} wins", _0.name())]
    Winner(Side),
    #[display("tie")]
    Tie,
}

impl From<Outcome> for char {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Winner(side) => side.cell().as_char(),
            Outcome::Tie => 'T',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid outcome {found:?} (expected B, W or T)")]
pub struct ParseOutcomeError {
    #[error(not(source))]
    found: char,
}

impl TryFrom<char> for Outcome {
    type Error = ParseOutcomeError;

    fn try_from(found: char) -> Result<Self, Self::Error> {
        match found {
            'B' => Ok(Outcome::Winner(Side::Black)),
            'W' => Ok(Outcome::Winner(Side::White)),
            'T' => Ok(Outcome::Tie),
            _ => Err(ParseOutcomeError { found }),
        }
    }
}

/// Immutable captured state of one position.
///
/// A snapshot holds the board, the side to move and the piece counts. Counts
/// are always derived from or checked against the board, so
/// `black + white + empty == 64` holds for every value of this type.
///
/// Transitions return new snapshots and never modify `self`, which lets the
/// search build disposable copies freely.
///
/// # Example
///
/// ```
/// use othello_engine::{Move, Side, Snapshot};
///
/// let start = Snapshot::initial();
/// let next = start.apply_move(Move::new(2, 3).unwrap()).unwrap();
///
/// assert_eq!(start.empty_count(), 60);
/// assert_eq!(next.empty_count(), 59);
/// assert_eq!(next.score(Side::Black), 3);
/// assert_eq!(next.side_to_move(), Side::White);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SnapshotRecord", into = "SnapshotRecord")]
pub struct Snapshot {
    board: BoardState,
    side_to_move: Side,
    empty_count: u8,
    black_count: u8,
    white_count: u8,
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("board", &self.board)
            .field("side_to_move", &self.side_to_move)
            .field("empty_count", &self.empty_count)
            .field("black_count", &self.black_count)
            .field("white_count", &self.white_count)
            .finish()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        write!(
            f,
            "Black: {}  White: {}  Empty: {}  ({} to move)",
            self.black_count,
            self.white_count,
            self.empty_count,
            self.side_to_move.name()
        )
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::initial()
    }
}

impl Snapshot {
    /// Opening position with black to move.
    #[must_use]
    pub fn initial() -> Self {
        Self::from_board(BoardState::INITIAL, Side::Black)
    }

    /// Builds a snapshot whose counts are taken from `board`.
    #[must_use]
    pub fn from_board(board: BoardState, side_to_move: Side) -> Self {
        Self {
            board,
            side_to_move,
            empty_count: board.count(Cell::Empty),
            black_count: board.count(Cell::Black),
            white_count: board.count(Cell::White),
        }
    }

    #[must_use]
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    #[must_use]
    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    #[must_use]
    pub fn empty_count(&self) -> u8 {
        self.empty_count
    }

    #[must_use]
    pub fn count(&self, side: Side) -> u8 {
        match side {
            Side::Black => self.black_count,
            Side::White => self.white_count,
        }
    }

    fn count_mut(&mut self, side: Side) -> &mut u8 {
        match side {
            Side::Black => &mut self.black_count,
            Side::White => &mut self.white_count,
        }
    }

    #[must_use]
    pub fn is_legal_move(&self, x: usize, y: usize, side: Side) -> bool {
        self.board.is_legal_move(x, y, side)
    }

    /// Legal moves for the side to move, in row-major order.
    #[must_use]
    pub fn valid_moves(&self) -> MoveList {
        self.board.valid_moves(self.side_to_move)
    }

    #[must_use]
    pub fn has_moves(&self, side: Side) -> bool {
        self.board.has_legal_move(side)
    }

    /// Plays `mv` for the side to move and returns the resulting position.
    pub fn apply_move(&self, mv: Move) -> Result<Self, MoveError> {
        let mover = self.side_to_move;
        if !self.board.at(mv).is_empty() {
            return Err(MoveError::Occupied { mv });
        }
        if !self.board.is_legal_move(mv.x(), mv.y(), mover) {
            return Err(MoveError::NoCapture { mv });
        }

        let mut next = *self;
        // Fewer than 64 pieces can flip, so the cast cannot truncate.
        #[expect(clippy::cast_possible_truncation)]
        let captured = next.board.place(mv, mover) as u8;
        next.empty_count -= 1;
        *next.count_mut(mover) += 1 + captured;
        *next.count_mut(mover.opponent()) -= captured;
        next.side_to_move = mover.opponent();
        Ok(next)
    }

    /// Same position with the turn handed to the opponent.
    #[must_use]
    pub fn passed(&self) -> Self {
        Self {
            side_to_move: self.side_to_move.opponent(),
            ..*self
        }
    }

    /// The game ends when the board is full or neither side can move.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        if self.empty_count == 0 {
            return true;
        }
        !self.has_moves(self.side_to_move) && !self.has_moves(self.side_to_move.opponent())
    }

    /// Winner by piece count, or `None` while the game is still running.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.is_game_over() {
            return None;
        }
        Some(match self.black_count.cmp(&self.white_count) {
            std::cmp::Ordering::Greater => Outcome::Winner(Side::Black),
            std::cmp::Ordering::Less => Outcome::Winner(Side::White),
            std::cmp::Ordering::Equal => Outcome::Tie,
        })
    }

    /// Static evaluation: own pieces minus opponent pieces.
    #[must_use]
    pub fn score(&self, maximizing_side: Side) -> i32 {
        i32::from(self.count(maximizing_side)) - i32::from(self.count(maximizing_side.opponent()))
    }
}

/// Wire form of a [`Snapshot`].
///
/// Rows are strings of `.`, `B` and `W`, top to bottom:
///
/// ```json
/// {
///   "board": ["........", "........", "........", "...WB...",
///             "...BW...", "........", "........", "........"],
///   "side_to_move": "B",
///   "empty_count": 60,
///   "black_count": 2,
///   "white_count": 2
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub board: Vec<String>,
    pub side_to_move: Side,
    pub empty_count: u8,
    pub black_count: u8,
    pub white_count: u8,
}

/// A [`SnapshotRecord`] that does not describe a valid position.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SnapshotError {
    #[display("board: expected {BOARD_SIZE} rows, got {found}")]
    RowCount { found: usize },
    #[display("board[{row}]: expected {BOARD_SIZE} cells, got {found}")]
    RowWidth { row: usize, found: usize },
    #[display("board[{y}][{x}]: invalid cell {found:?} (expected '.', 'B' or 'W')")]
    InvalidCell { x: usize, y: usize, found: char },
    #[display("empty_count: board has {actual} empty cells, record says {claimed}")]
    EmptyCount { claimed: u8, actual: u8 },
    #[display("black_count: board has {actual} black pieces, record says {claimed}")]
    BlackCount { claimed: u8, actual: u8 },
    #[display("white_count: board has {actual} white pieces, record says {claimed}")]
    WhiteCount { claimed: u8, actual: u8 },
}

fn parse_board(rows: &[String]) -> Result<BoardState, SnapshotError> {
    if rows.len() != BOARD_SIZE {
        return Err(SnapshotError::RowCount { found: rows.len() });
    }
    let mut art = String::with_capacity(CELL_COUNT + BOARD_SIZE);
    for (y, row) in rows.iter().enumerate() {
        let found = row.chars().count();
        if found != BOARD_SIZE {
            return Err(SnapshotError::RowWidth { row: y, found });
        }
        if let Some((x, found)) = row
            .chars()
            .enumerate()
            .find(|&(_, c)| Cell::from_char(c).is_none())
        {
            return Err(SnapshotError::InvalidCell { x, y, found });
        }
        art.push_str(row);
        art.push('\n');
    }
    Ok(BoardState::from_ascii(&art))
}

impl TryFrom<SnapshotRecord> for Snapshot {
    type Error = SnapshotError;

    fn try_from(record: SnapshotRecord) -> Result<Self, Self::Error> {
        let board = parse_board(&record.board)?;
        let snapshot = Snapshot::from_board(board, record.side_to_move);
        if snapshot.empty_count != record.empty_count {
            return Err(SnapshotError::EmptyCount {
                claimed: record.empty_count,
                actual: snapshot.empty_count,
            });
        }
        if snapshot.black_count != record.black_count {
            return Err(SnapshotError::BlackCount {
                claimed: record.black_count,
                actual: snapshot.black_count,
            });
        }
        if snapshot.white_count != record.white_count {
            return Err(SnapshotError::WhiteCount {
                claimed: record.white_count,
                actual: snapshot.white_count,
            });
        }
        Ok(snapshot)
    }
}

impl From<Snapshot> for SnapshotRecord {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            board: snapshot.board.row_strings().collect(),
            side_to_move: snapshot.side_to_move,
            empty_count: snapshot.empty_count,
            black_count: snapshot.black_count,
            white_count: snapshot.white_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(x: usize, y: usize) -> Move {
        Move::new(x, y).unwrap()
    }

    fn assert_counts_consistent(snapshot: &Snapshot) {
        let board = snapshot.board();
        assert_eq!(snapshot.empty_count(), board.count(Cell::Empty));
        assert_eq!(snapshot.count(Side::Black), board.count(Cell::Black));
        assert_eq!(snapshot.count(Side::White), board.count(Cell::White));
        let total = usize::from(snapshot.empty_count())
            + usize::from(snapshot.count(Side::Black))
            + usize::from(snapshot.count(Side::White));
        assert_eq!(total, CELL_COUNT);
    }

    #[test]
    fn test_initial_snapshot() {
        let snapshot = Snapshot::initial();
        assert_eq!(snapshot.side_to_move(), Side::Black);
        assert_eq!(snapshot.empty_count(), 60);
        assert_eq!(snapshot.count(Side::Black), 2);
        assert_eq!(snapshot.count(Side::White), 2);
        assert!(!snapshot.is_game_over());
        assert_eq!(snapshot.outcome(), None);
        assert_counts_consistent(&snapshot);
    }

    #[test]
    fn test_opening_capture_updates_counts() {
        let start = Snapshot::initial();
        let next = start.apply_move(mv(2, 3)).unwrap();
        assert_eq!(next.count(Side::Black), 4);
        assert_eq!(next.count(Side::White), 1);
        assert_eq!(next.empty_count(), 59);
        assert_eq!(next.side_to_move(), Side::White);
        assert_eq!(next.board().at(mv(3, 3)), Cell::Black);
        assert_counts_consistent(&next);
        // The original value is untouched.
        assert_eq!(start, Snapshot::initial());
    }

    #[test]
    fn test_apply_move_rejections() {
        let start = Snapshot::initial();
        assert_eq!(
            start.apply_move(mv(3, 3)),
            Err(MoveError::Occupied { mv: mv(3, 3) })
        );
        assert_eq!(
            start.apply_move(mv(0, 0)),
            Err(MoveError::NoCapture { mv: mv(0, 0) })
        );
        // Legal for white but not for black, who is to move.
        assert_eq!(
            start.apply_move(mv(4, 2)),
            Err(MoveError::NoCapture { mv: mv(4, 2) })
        );
    }

    #[test]
    fn test_passed_only_toggles_side() {
        let start = Snapshot::initial();
        let passed = start.passed();
        assert_eq!(passed.side_to_move(), Side::White);
        assert_eq!(passed.board(), start.board());
        assert_eq!(passed.empty_count(), start.empty_count());
        assert_eq!(passed.passed(), start);
    }

    #[test]
    fn test_game_over_with_empty_cells() {
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
        assert_eq!(snapshot.empty_count(), 62);
        assert!(snapshot.is_game_over());
        assert_eq!(snapshot.outcome(), Some(Outcome::Winner(Side::Black)));
    }

    #[test]
    fn test_game_over_tie() {
        let board = BoardState::from_ascii(
            "
            B . . . . . . W
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            ",
        );
        let snapshot = Snapshot::from_board(board, Side::Black);
        assert!(snapshot.is_game_over());
        assert_eq!(snapshot.outcome(), Some(Outcome::Tie));
    }

    #[test]
    fn test_one_side_blocked_is_not_game_over() {
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
        let snapshot = Snapshot::from_board(board, Side::Black);
        assert!(!snapshot.has_moves(Side::Black));
        assert!(snapshot.has_moves(Side::White));
        assert!(!snapshot.is_game_over());
        assert_eq!(snapshot.outcome(), None);
    }

    #[test]
    fn test_full_board_is_game_over() {
        let row = "B B B B W W W W\n";
        let board = BoardState::from_ascii(&row.repeat(BOARD_SIZE));
        let snapshot = Snapshot::from_board(board, Side::Black);
        assert_eq!(snapshot.empty_count(), 0);
        assert!(snapshot.is_game_over());
        assert_eq!(snapshot.outcome(), Some(Outcome::Tie));
    }

    #[test]
    fn test_score_is_antisymmetric() {
        let next = Snapshot::initial().apply_move(mv(2, 3)).unwrap();
        assert_eq!(next.score(Side::Black), 3);
        assert_eq!(next.score(Side::White), -3);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let snapshot = Snapshot::initial().apply_move(mv(2, 3)).unwrap();
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_serialized_layout() {
        let value = serde_json::to_value(Snapshot::initial()).unwrap();
        assert_eq!(value["board"][3], "...WB...");
        assert_eq!(value["board"][4], "...BW...");
        assert_eq!(value["side_to_move"], "B");
        assert_eq!(value["empty_count"], 60);
        assert_eq!(value["black_count"], 2);
        assert_eq!(value["white_count"], 2);
    }

    #[test]
    fn test_record_validation_errors() {
        let valid = SnapshotRecord::from(Snapshot::initial());

        let mut record = valid.clone();
        record.board.pop();
        assert_eq!(
            Snapshot::try_from(record),
            Err(SnapshotError::RowCount { found: 7 })
        );

        let mut record = valid.clone();
        record.board[2] = ".......".to_owned();
        assert_eq!(
            Snapshot::try_from(record),
            Err(SnapshotError::RowWidth { row: 2, found: 7 })
        );

        let mut record = valid.clone();
        record.board[5] = "..x.....".to_owned();
        assert_eq!(
            Snapshot::try_from(record),
            Err(SnapshotError::InvalidCell {
                x: 2,
                y: 5,
                found: 'x'
            })
        );

        let mut record = valid.clone();
        record.empty_count = 64;
        assert_eq!(
            Snapshot::try_from(record),
            Err(SnapshotError::EmptyCount {
                claimed: 64,
                actual: 60
            })
        );

        let mut record = valid.clone();
        record.black_count = 3;
        assert_eq!(
            Snapshot::try_from(record),
            Err(SnapshotError::BlackCount {
                claimed: 3,
                actual: 2
            })
        );

        let mut record = valid;
        record.white_count = 1;
        assert_eq!(
            Snapshot::try_from(record),
            Err(SnapshotError::WhiteCount {
                claimed: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn test_deserialize_rejects_malformed_json() {
        let json = r#"{
            "board": ["........", "........", "........", "...WB...",
                      "...BW...", "........", "........", "........"],
            "side_to_move": "B",
            "empty_count": 60,
            "black_count": 2,
            "white_count": 3
        }"#;
        let err = serde_json::from_str::<Snapshot>(json).unwrap_err();
        assert!(err.to_string().contains("white_count"), "{err}");
    }

    #[test]
    fn test_outcome_serialization() {
        assert_eq!(
            serde_json::to_string(&Outcome::Winner(Side::Black)).unwrap(),
            "\"B\""
        );
        assert_eq!(serde_json::to_string(&Outcome::Tie).unwrap(), "\"T\"");
        let parsed: Outcome = serde_json::from_str("\"W\"").unwrap();
        assert_eq!(parsed, Outcome::Winner(Side::White));
        assert!(serde_json::from_str::<Outcome>("\"X\"").is_err());
    }
}
