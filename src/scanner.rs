//! Four-in-a-row detection and window enumeration
//!
//! Both win detection and the heuristic evaluator look at the board through
//! 4-cell windows. Windows are always produced in the same order:
//!
//! 1. horizontal, each row top to bottom, left to right
//! 2. vertical, each column left to right, top to bottom
//! 3. diagonal up (bottom-left to top-right), anchored on its bottom-left cell
//! 4. diagonal down (top-left to bottom-right), anchored on its top-left cell
//!
//! [`find_four`] reports the first matching window in this order.

use crate::board::{Board, Piece};
use crate::WIN_LENGTH;

/// A cell position, row 0 is the top of the board
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Direction {
    Horizontal,
    Vertical,
    DiagonalUp,
    DiagonalDown,
}

impl Direction {
    /// All directions in scan order
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::DiagonalUp,
        Direction::DiagonalDown,
    ];

    // (row step, col step) from the anchor cell
    fn step(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::DiagonalUp => (-1, 1),
            Direction::DiagonalDown => (1, 1),
        }
    }

    /// Range of anchor rows and columns for a board of the given size
    fn anchors(self, rows: usize, cols: usize) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
        let span = WIN_LENGTH - 1;
        let row_range = |lo: usize| if rows > span { lo..rows - span + lo } else { 0..0 };
        let col_range = if cols > span { 0..cols - span } else { 0..0 };
        match self {
            Direction::Horizontal => (0..rows, col_range),
            Direction::Vertical => (row_range(0), 0..cols),
            Direction::DiagonalUp => (row_range(span), col_range),
            Direction::DiagonalDown => (row_range(0), col_range),
        }
    }
}

/// Four collinear cells
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Window {
    pub direction: Direction,
    pub cells: [Coord; WIN_LENGTH],
}

impl Window {
    fn new(direction: Direction, anchor: Coord) -> Self {
        let (dr, dc) = direction.step();
        let mut cells = [anchor; WIN_LENGTH];
        for (i, cell) in cells.iter_mut().enumerate() {
            cell.row = (anchor.row as isize + dr * i as isize) as usize;
            cell.col = (anchor.col as isize + dc * i as isize) as usize;
        }
        Self { direction, cells }
    }

    /// The pieces under this window
    pub fn pieces(&self, board: &Board) -> [Piece; WIN_LENGTH] {
        let mut pieces = [Piece::Empty; WIN_LENGTH];
        for (piece, cell) in pieces.iter_mut().zip(self.cells.iter()) {
            *piece = board.get(cell.row, cell.col);
        }
        pieces
    }

    pub fn count(&self, board: &Board, piece: Piece) -> usize {
        self.cells
            .iter()
            .filter(|c| board.get(c.row, c.col) == piece)
            .count()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains(&coord)
    }
}

/// Lazy iterator over every window of a board, in scan order
pub struct Windows {
    rows: usize,
    cols: usize,
    phase: usize,
    row: usize,
    col: usize,
}

impl Windows {
    fn new(rows: usize, cols: usize) -> Self {
        let mut windows = Self {
            rows,
            cols,
            phase: 0,
            row: 0,
            col: 0,
        };
        windows.enter_phase(0);
        windows
    }

    fn enter_phase(&mut self, phase: usize) {
        self.phase = phase;
        if let Some(&direction) = Direction::ALL.get(phase) {
            let (rows, cols) = direction.anchors(self.rows, self.cols);
            self.row = rows.start;
            self.col = cols.start;
        }
    }
}

impl Iterator for Windows {
    type Item = Window;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&direction) = Direction::ALL.get(self.phase) {
            let (rows, cols) = direction.anchors(self.rows, self.cols);
            if rows.is_empty() || cols.is_empty() {
                self.enter_phase(self.phase + 1);
                continue;
            }

            let anchor = Coord::new(self.row, self.col);
            // vertical windows are walked column by column, the rest row by row
            if direction == Direction::Vertical {
                self.row += 1;
                if self.row >= rows.end {
                    self.row = rows.start;
                    self.col += 1;
                }
                if self.col >= cols.end {
                    self.enter_phase(self.phase + 1);
                }
            } else {
                self.col += 1;
                if self.col >= cols.end {
                    self.col = cols.start;
                    self.row += 1;
                }
                if self.row >= rows.end {
                    self.enter_phase(self.phase + 1);
                }
            }
            return Some(Window::new(direction, anchor));
        }
        None
    }
}

/// Every 4-cell window of the board, in scan order
pub fn windows(board: &Board) -> Windows {
    Windows::new(board.rows(), board.cols())
}

/// The number of windows on a board of the given size
pub fn window_count(rows: usize, cols: usize) -> usize {
    Windows::new(rows, cols).count()
}

/// Finds the first run of four `piece`s in scan order
pub fn find_four(board: &Board, piece: Piece) -> Option<Window> {
    if piece.is_empty() {
        return None;
    }
    windows(board).find(|window| window.count(board, piece) == WIN_LENGTH)
}

/// Returns the winning piece and its run, checking `PlayerA` first
pub fn winner(board: &Board) -> Option<(Piece, Window)> {
    [Piece::PlayerA, Piece::PlayerB]
        .iter()
        .find_map(|&piece| find_four(board, piece).map(|window| (piece, window)))
}
