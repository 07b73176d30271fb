use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::MoveError;

use super::side::{Cell, Side};

/// Width and height of the board.
pub const BOARD_SIZE: usize = 8;

/// Total number of cells on the board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// The eight scan directions as `(dx, dy)` offsets.
pub const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A placement coordinate on the board.
///
/// Both coordinates are always within `0..8`; `x` is the column and `y` the row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[display("({x}, {y})")]
#[serde(try_from = "RawMove")]
pub struct Move {
    // Field order makes the derived `Ord` row-major.
    y: usize,
    x: usize,
}

#[derive(Deserialize)]
struct RawMove {
    x: usize,
    y: usize,
}

impl TryFrom<RawMove> for Move {
    type Error = MoveError;

    fn try_from(RawMove { x, y }: RawMove) -> Result<Self, Self::Error> {
        Move::new(x, y).ok_or(MoveError::OutOfBounds { x, y })
    }
}

impl Move {
    /// Creates a move, returning `None` if either coordinate is off the board.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Option<Self> {
        if x < BOARD_SIZE && y < BOARD_SIZE {
            Some(Self { y, x })
        } else {
            None
        }
    }

    #[must_use]
    pub const fn x(self) -> usize {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> usize {
        self.y
    }

    /// Iterates over every coordinate in row-major order (`y` outer, `x` inner).
    pub fn all() -> impl Iterator<Item = Move> {
        (0..BOARD_SIZE).flat_map(|y| (0..BOARD_SIZE).map(move |x| Move { y, x }))
    }
}

/// Legal moves of one position, in row-major order.
pub type MoveList = ArrayVec<Move, CELL_COUNT>;

/// The 8×8 grid of cells.
///
/// `BoardState` is plain data plus the directional capture scan that defines
/// Othello legality. It does not know whose turn it is; callers pass the
/// mover explicitly.
///
/// # Example
///
/// ```
/// use othello_engine::{BoardState, Side};
///
/// let board = BoardState::INITIAL;
///
/// // Placing black at (2, 3) captures the white piece at (3, 3).
/// assert_eq!(board.would_capture(2, 3, Side::Black, 1, 0), 1);
/// assert!(board.is_legal_move(2, 3, Side::Black));
/// assert!(!board.is_legal_move(0, 0, Side::Black));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardState {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl fmt::Debug for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.row_strings()).finish()
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for x in 0..BOARD_SIZE {
            write!(f, " {x}")?;
        }
        writeln!(f)?;
        for (y, row) in self.rows().enumerate() {
            write!(f, "{y}")?;
            for cell in row {
                write!(f, " {}", cell.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl BoardState {
    pub const EMPTY: Self = Self {
        cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
    };

    /// Standard opening: white on the (3, 3)/(4, 4) diagonal, black on (4, 3)/(3, 4).
    pub const INITIAL: Self = {
        let mut cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        cells[3][3] = Cell::White;
        cells[3][4] = Cell::Black;
        cells[4][3] = Cell::Black;
        cells[4][4] = Cell::White;
        Self { cells }
    };

    /// Returns the cell at `(x, y)`, or `None` outside the board.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.cells.get(y)?.get(x).copied()
    }

    #[must_use]
    pub fn at(&self, mv: Move) -> Cell {
        self.cells[mv.y][mv.x]
    }

    pub(crate) fn set(&mut self, mv: Move, cell: Cell) {
        self.cells[mv.y][mv.x] = cell;
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_SIZE]> {
        self.cells.iter()
    }

    /// Renders each row as a string of `.`, `B` and `W`.
    pub fn row_strings(&self) -> impl Iterator<Item = String> + '_ {
        self.rows()
            .map(|row| row.iter().map(|cell| cell.as_char()).collect())
    }

    /// Number of cells holding `cell`.
    #[must_use]
    pub fn count(&self, cell: Cell) -> u8 {
        let mut count = 0;
        for row in &self.cells {
            for &c in row {
                if c == cell {
                    count += 1;
                }
            }
        }
        count
    }

    fn cell_at_offset(&self, x: usize, y: usize, dx: isize, dy: isize) -> Option<Cell> {
        let x = x.checked_add_signed(dx)?;
        let y = y.checked_add_signed(dy)?;
        self.cell(x, y)
    }

    /// Counts opponent pieces `mover` would capture along `(dx, dy)` from `(x, y)`.
    ///
    /// The scan starts one step away from `(x, y)` and walks over contiguous
    /// opponent pieces. The run only counts if it is closed by one of `mover`'s
    /// own pieces; running off the board or into an empty cell yields 0. An own
    /// piece directly adjacent also yields 0.
    #[must_use]
    pub fn would_capture(&self, x: usize, y: usize, mover: Side, dx: isize, dy: isize) -> usize {
        if dx == 0 && dy == 0 {
            return 0;
        }
        let own = mover.cell();
        let opponent = mover.opponent().cell();
        let mut count = 0;
        let mut step = 1;
        loop {
            let Some(cell) = self.cell_at_offset(x, y, dx * step, dy * step) else {
                return 0;
            };
            if cell == opponent {
                count += 1;
            } else if cell == own {
                return count;
            } else {
                return 0;
            }
            step += 1;
        }
    }

    /// Returns `true` if `(x, y)` is empty and placing there captures in at least one direction.
    #[must_use]
    pub fn is_legal_move(&self, x: usize, y: usize, mover: Side) -> bool {
        self.cell(x, y) == Some(Cell::Empty)
            && DIRECTIONS
                .iter()
                .any(|&(dx, dy)| self.would_capture(x, y, mover, dx, dy) > 0)
    }

    /// All legal moves for `mover`, in row-major order.
    #[must_use]
    pub fn valid_moves(&self, mover: Side) -> MoveList {
        Move::all()
            .filter(|mv| self.is_legal_move(mv.x, mv.y, mover))
            .collect()
    }

    #[must_use]
    pub fn has_legal_move(&self, mover: Side) -> bool {
        Move::all().any(|mv| self.is_legal_move(mv.x, mv.y, mover))
    }

    /// Places a piece for `mover` and flips every captured run.
    ///
    /// Returns the number of flipped pieces. The caller must have checked
    /// legality; on an illegal target this still places the piece.
    pub(crate) fn place(&mut self, mv: Move, mover: Side) -> usize {
        let captures = DIRECTIONS.map(|(dx, dy)| self.would_capture(mv.x, mv.y, mover, dx, dy));
        self.set(mv, mover.cell());
        let mut total = 0;
        for (&(dx, dy), &count) in DIRECTIONS.iter().zip(&captures) {
            let (mut x, mut y) = (mv.x, mv.y);
            for _ in 0..count {
                x = x.wrapping_add_signed(dx);
                y = y.wrapping_add_signed(dy);
                self.cells[y][x] = mover.cell();
            }
            total += count;
        }
        total
    }

    /// Creates a `BoardState` from ASCII art for tests and fixtures.
    ///
    /// Each non-blank line is a row, top to bottom; `.` is empty, `B` black
    /// and `W` white. Whitespace inside a line is ignored.
    ///
    /// # Panics
    ///
    /// Panics unless the art is exactly 8 rows of 8 valid cells.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut board = Self::EMPTY;
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert_eq!(
            lines.len(),
            BOARD_SIZE,
            "Board must have exactly {BOARD_SIZE} rows, got {}",
            lines.len()
        );

        for (y, line) in lines.iter().enumerate() {
            let cells: Vec<Cell> = line
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| Cell::from_char(c).unwrap_or_else(|| panic!("Invalid cell {c:?} at row {y}")))
                .collect();
            assert_eq!(
                cells.len(),
                BOARD_SIZE,
                "Each row must have exactly {BOARD_SIZE} cells, got {} at row {y}",
                cells.len()
            );
            board.cells[y].copy_from_slice(&cells);
        }
        board
    }
}
