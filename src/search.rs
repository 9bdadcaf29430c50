//! Bounded-depth minimax search with alpha-beta pruning

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::board::{Board, Piece};
use crate::error::Error;
use crate::evaluator::Evaluator;
use crate::scanner::find_four;

/// The score of a position where the maximizing piece has four in a row
pub const WIN_SCORE: i32 = 1_000_000;

/// The outcome of a search
///
/// `column` is `None` only when the board has no legal move left.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub column: Option<usize>,
    pub score: i32,
}

impl SearchResult {
    /// Whether the score is a forced win or loss rather than a heuristic value
    pub fn is_decisive(&self) -> bool {
        self.score.abs() >= WIN_SCORE
    }
}

/// An agent choosing moves by minimax search
///
/// # Notes
/// Every node of the search owns its own copy of the board. Columns are tried
/// in ascending order without any move ordering. Each node starts from a
/// uniformly random legal column which is replaced by the first column scoring
/// strictly better than what has been seen so far, so among equal scores the
/// lowest column wins.
///
/// # Position Scoring
/// A position where the maximizing piece has four in a row scores
/// [`WIN_SCORE`], one where its opponent has four in a row scores
/// `-WIN_SCORE`, whatever the remaining depth. Every other leaf is scored by the
/// [`Evaluator`] from the maximizing piece's point of view.
pub struct SearchEngine<R = StdRng> {
    evaluator: Evaluator,
    rng: R,

    /// The number of nodes visited by the last search (for diagnostics only)
    pub node_count: usize,
}

impl SearchEngine<StdRng> {
    /// Creates a new `SearchEngine` seeded from the operating system
    pub fn new(evaluator: Evaluator) -> Self {
        Self::with_rng(evaluator, StdRng::from_entropy())
    }

    /// Creates a new `SearchEngine` with reproducible tie-breaks
    pub fn seeded(evaluator: Evaluator, seed: u64) -> Self {
        Self::with_rng(evaluator, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SearchEngine<R> {
    /// Creates a new `SearchEngine` drawing tie-breaks from `rng`
    pub fn with_rng(evaluator: Evaluator, rng: R) -> Self {
        Self {
            evaluator,
            rng,
            node_count: 0,
        }
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Picks a column for `piece` looking `depth` plies ahead
    ///
    /// A depth of 0 scores the current position statically and returns a
    /// random legal column.
    pub fn choose_move(
        &mut self,
        board: &Board,
        depth: usize,
        piece: Piece,
    ) -> Result<SearchResult, Error> {
        if piece.is_empty() {
            return Err(Error::Configuration(
                "the maximizing piece cannot be empty".into(),
            ));
        }
        self.node_count = 0;

        let mut result = self.minimax(board, depth, i32::MIN, i32::MAX, true, piece)?;
        // leaf roots still get a move while one exists
        if result.column.is_none() {
            result.column = self.random_move(&board.valid_moves());
        }

        debug!(
            depth,
            column = ?result.column,
            score = result.score,
            nodes = self.node_count,
            "search complete"
        );
        Ok(result)
    }

    fn random_move(&mut self, moves: &[usize]) -> Option<usize> {
        if moves.is_empty() {
            None
        } else {
            Some(moves[self.rng.gen_range(0..moves.len())])
        }
    }

    /// Scores `board` for `piece`, returning the best column at this node
    fn minimax(
        &mut self,
        board: &Board,
        depth: usize,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        piece: Piece,
    ) -> Result<SearchResult, Error> {
        self.node_count += 1;

        let valid_moves = board.valid_moves();
        let won = find_four(board, piece).is_some();
        let lost = find_four(board, piece.opponent()).is_some();

        if depth == 0 || won || lost || valid_moves.is_empty() {
            let score = if won {
                WIN_SCORE
            } else if lost {
                -WIN_SCORE
            } else {
                self.evaluator.evaluate(board, piece)
            };
            return Ok(SearchResult {
                column: None,
                score,
            });
        }

        let mover = if maximizing { piece } else { piece.opponent() };
        let mut best = SearchResult {
            column: self.random_move(&valid_moves),
            score: if maximizing { i32::MIN } else { i32::MAX },
        };

        for column in valid_moves {
            let next = board.drop_piece(column, mover)?;
            let score = self
                .minimax(&next, depth - 1, alpha, beta, !maximizing, piece)?
                .score;

            if maximizing {
                if score > best.score {
                    best = SearchResult {
                        column: Some(column),
                        score,
                    };
                }
                alpha = alpha.max(best.score);
            } else {
                if score < best.score {
                    best = SearchResult {
                        column: Some(column),
                        score,
                    };
                }
                beta = beta.min(best.score);
            }

            // the other side already has a better alternative higher up
            if alpha >= beta {
                break;
            }
        }

        Ok(best)
    }
}
