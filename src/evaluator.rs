//! Static heuristic scoring of non-terminal positions

use serde::{Deserialize, Serialize};

use crate::board::{Board, Piece};
use crate::scanner::{self, Window};
use crate::WIN_LENGTH;

/// Bonus for each own piece in the center column
pub const CENTER_WEIGHT: i32 = 3;
/// A completed run of four own pieces
pub const FOUR_WEIGHT: i32 = 100;
/// Three own pieces and an empty cell
pub const THREE_WEIGHT: i32 = 10;
/// Two own pieces and two empty cells
pub const TWO_WEIGHT: i32 = 5;
/// Three threatening pieces and an empty cell
pub const OPPONENT_THREE_WEIGHT: i32 = -80;

/// Which piece the threat term of the window score looks for
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatPolicy {
    /// The opponent of the piece being evaluated
    #[default]
    Opponent,
    /// Always the given piece, whichever side is being evaluated
    Fixed(Piece),
}

impl ThreatPolicy {
    fn threat_piece(self, piece: Piece) -> Piece {
        match self {
            ThreatPolicy::Opponent => piece.opponent(),
            ThreatPolicy::Fixed(threat) => threat,
        }
    }
}

/// Heuristic evaluator
///
/// The score of a position for `piece` is the sum of a center column bonus and
/// a score for every 4-cell window on the board:
///
/// | own | threat | empty | score |
/// |-----|--------|-------|-------|
/// | 4   |        |       | +100  |
/// | 3   |        | 1     | +10   |
/// | 2   |        | 2     | +5    |
/// |     | 3      | 1     | -80   |
///
/// The own-piece row and the threat row are scored independently.
#[derive(Copy, Clone, Debug, Default)]
pub struct Evaluator {
    threat_policy: ThreatPolicy,
}

impl Evaluator {
    pub fn new(threat_policy: ThreatPolicy) -> Self {
        Self { threat_policy }
    }

    pub fn threat_policy(&self) -> ThreatPolicy {
        self.threat_policy
    }

    /// Scores `board` from the point of view of `piece`
    pub fn evaluate(&self, board: &Board, piece: Piece) -> i32 {
        let threat = self.threat_policy.threat_piece(piece);

        let center = board.center_col();
        let center_count = (0..board.rows())
            .filter(|&row| board.get(row, center) == piece)
            .count() as i32;

        let windows: i32 = scanner::windows(board)
            .map(|window| self.score_window(board, &window, piece, threat))
            .sum();

        center_count * CENTER_WEIGHT + windows
    }

    fn score_window(&self, board: &Board, window: &Window, piece: Piece, threat: Piece) -> i32 {
        let (mut own, mut opposing, mut empty) = (0, 0, 0);
        for cell in window.pieces(board).iter() {
            if *cell == piece {
                own += 1;
            }
            if *cell == threat {
                opposing += 1;
            }
            if cell.is_empty() {
                empty += 1;
            }
        }

        let mut score = match (own, empty) {
            (4, _) => FOUR_WEIGHT,
            (3, 1) => THREE_WEIGHT,
            (2, 2) => TWO_WEIGHT,
            _ => 0,
        };
        if opposing == WIN_LENGTH - 1 && empty == 1 {
            score += OPPONENT_THREE_WEIGHT;
        }
        score
    }

    /// The inclusive range of scores a non-terminal board of this size can get
    ///
    /// Without a completed four no window can score more than
    /// [`THREE_WEIGHT`] or less than [`OPPONENT_THREE_WEIGHT`].
    pub fn bounds(rows: usize, cols: usize) -> (i32, i32) {
        let windows = scanner::window_count(rows, cols) as i32;
        let low = windows * OPPONENT_THREE_WEIGHT;
        let high = windows * THREE_WEIGHT + rows as i32 * CENTER_WEIGHT;
        (low, high)
    }
}
