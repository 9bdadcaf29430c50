//! A computer opponent for the board game 'Connect 4'
//!
//! The computer picks its moves with a bounded-depth minimax search with
//! alpha-beta pruning over a hand-written heuristic. The crate only holds the
//! game logic; front ends own the live [`Board`], apply moves with
//! [`Board::drop_piece`], check [`find_four`] after each move, and ask a
//! [`SearchEngine`] for the computer's column.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_minimax::{Board, Evaluator, Piece, SearchEngine, WIN_SCORE};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! // PlayerB has three in a row on the bottom row
//! let board = Board::from_moves("122334")?;
//! let mut engine = SearchEngine::seeded(Evaluator::default(), 42);
//! let result = engine.choose_move(&board, 4, Piece::PlayerB)?;
//!
//! assert_eq!(result.score, WIN_SCORE);
//! assert_eq!(result.column, Some(4));
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod error;

pub mod board;

pub mod scanner;

pub mod evaluator;

pub mod search;

pub mod config;

pub mod game;

pub mod arena;

mod test;

pub use board::{Board, Piece};
pub use error::{Error, MoveRejection};
pub use evaluator::{Evaluator, ThreatPolicy};
pub use scanner::{find_four, windows, Coord, Direction, Window};
pub use search::{SearchEngine, SearchResult, WIN_SCORE};

/// The default width of the game board in tiles
pub const WIDTH: usize = 7;

/// The default height of the game board in tiles
pub const HEIGHT: usize = 6;

/// The number of pieces in a row needed to win
pub const WIN_LENGTH: usize = 4;

/// The search depth used by the terminal game
pub const DEFAULT_DEPTH: usize = 4;

// the default board must fit a run in every direction, and move strings use one digit per column
const_assert!(WIDTH >= WIN_LENGTH && HEIGHT >= WIN_LENGTH);
const_assert!(WIDTH <= 9);
