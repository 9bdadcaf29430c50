//! The game grid and piece placement

use serde::{Deserialize, Serialize};

use crate::error::{Error, MoveRejection};
use crate::{HEIGHT, WIDTH};

/// The contents of a single cell
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Piece {
    #[default]
    Empty,
    PlayerA,
    PlayerB,
}

impl Piece {
    pub fn is_empty(&self) -> bool {
        matches!(self, Piece::Empty)
    }

    /// The piece of the other side, `Empty` has no opponent
    pub fn opponent(&self) -> Piece {
        match self {
            Piece::PlayerA => Piece::PlayerB,
            Piece::PlayerB => Piece::PlayerA,
            Piece::Empty => Piece::Empty,
        }
    }

    fn from_char(c: char) -> Option<Piece> {
        match c {
            '.' | '_' => Some(Piece::Empty),
            'A' | 'X' | 'R' => Some(Piece::PlayerA),
            'B' | 'O' | 'Y' => Some(Piece::PlayerB),
            _ => None,
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Piece::Empty => '.',
            Piece::PlayerA => 'A',
            Piece::PlayerB => 'B',
        }
    }
}

/// A connect 4 grid with `rows` x `cols` cells
///
/// Row 0 is the top of the board and row `rows - 1` the bottom. Pieces fall to
/// the lowest empty cell of a column, so a column never has a gap below a piece.
///
/// Boards are plain values: [`Board::drop_piece`] returns a new board and leaves
/// the original untouched.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Piece>, // cells are stored top-to-bottom, left-to-right
    heights: Vec<usize>,
}

impl Board {
    /// Creates an empty board with the default dimensions
    pub fn new() -> Self {
        Self {
            rows: HEIGHT,
            cols: WIDTH,
            cells: vec![Piece::Empty; HEIGHT * WIDTH],
            heights: vec![0; WIDTH],
        }
    }

    /// Creates an empty board with the given dimensions
    pub fn with_dimensions(rows: usize, cols: usize) -> Result<Self, Error> {
        if rows == 0 || cols == 0 {
            return Err(Error::Configuration(format!(
                "board dimensions must be non-zero, got {}x{}",
                rows, cols
            )));
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![Piece::Empty; rows * cols],
            heights: vec![0; cols],
        })
    }

    /// Builds a default-sized board from a string of 1-indexed columns,
    /// alternating pieces starting with `PlayerA`
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self, Error> {
        let mut board = Self::new();
        let mut piece = Piece::PlayerA;

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=WIDTH) => {
                    board = board.drop_piece(column - 1, piece)?;
                    piece = piece.opponent();
                }
                Some(column) => {
                    return Err(Error::InvalidMove {
                        column,
                        reason: MoveRejection::OutOfRange,
                    })
                }
                None => {
                    return Err(Error::Parse(format!(
                        "could not parse '{}' as a valid move",
                        column_char
                    )))
                }
            }
        }
        Ok(board)
    }

    /// Builds a board from a diagram, top row first
    ///
    /// `.` is empty, `A`/`X` is `PlayerA` and `B`/`O` is `PlayerB`.
    pub fn from_rows<S: AsRef<str>>(diagram: &[S]) -> Result<Self, Error> {
        let rows = diagram.len();
        let cols = diagram.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        let mut board = Self::with_dimensions(rows, cols)?;

        for (row, line) in diagram.iter().enumerate() {
            let line = line.as_ref();
            if line.chars().count() != cols {
                return Err(Error::Parse(format!(
                    "row {} has {} cells, expected {}",
                    row,
                    line.chars().count(),
                    cols
                )));
            }
            for (col, c) in line.chars().enumerate() {
                let piece = Piece::from_char(c)
                    .ok_or_else(|| Error::Parse(format!("unknown cell '{}'", c)))?;
                board.cells[row * cols + col] = piece;
            }
        }

        // recompute column heights and reject floating pieces
        for col in 0..cols {
            let height = (0..rows)
                .rev()
                .take_while(|&row| !board.get(row, col).is_empty())
                .count();
            if (0..rows - height).any(|row| !board.get(row, col).is_empty()) {
                return Err(Error::Parse(format!(
                    "column {} has a piece above an empty cell",
                    col
                )));
            }
            board.heights[col] = height;
        }
        Ok(board)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The index of the center column
    pub fn center_col(&self) -> usize {
        self.cols / 2
    }

    /// Get the piece at a position, row 0 is the top
    pub fn get(&self, row: usize, col: usize) -> Piece {
        self.cells[row * self.cols + col]
    }

    pub fn playable(&self, column: usize) -> bool {
        column < self.cols && self.heights[column] < self.rows
    }

    /// The row a piece dropped in `column` would land on
    pub fn open_row(&self, column: usize) -> Option<usize> {
        if self.playable(column) {
            Some(self.rows - 1 - self.heights[column])
        } else {
            None
        }
    }

    /// Columns that can still take a piece, in ascending order
    pub fn valid_moves(&self) -> Vec<usize> {
        (0..self.cols).filter(|&c| self.playable(c)).collect()
    }

    /// Returns a new board with `piece` dropped into `column`
    pub fn drop_piece(&self, column: usize, piece: Piece) -> Result<Board, Error> {
        if piece.is_empty() {
            return Err(Error::Configuration("cannot drop an empty piece".into()));
        }
        if column >= self.cols {
            return Err(Error::InvalidMove {
                column,
                reason: MoveRejection::OutOfRange,
            });
        }
        let row = self.open_row(column).ok_or(Error::InvalidMove {
            column,
            reason: MoveRejection::ColumnFull,
        })?;

        let mut next = self.clone();
        next.cells[row * self.cols + column] = piece;
        next.heights[column] += 1;
        Ok(next)
    }

    pub fn is_full(&self) -> bool {
        self.valid_moves().is_empty()
    }

    pub fn piece_count(&self) -> usize {
        self.heights.iter().sum()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.rows {
            let line: String = (0..self.cols).map(|col| self.get(row, col).to_char()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
