//! A game session between a human and the computer
//!
//! `Game` holds the one live board of a match and the bookkeeping around it:
//! whose turn it is, whether the game has ended (and with which run of four),
//! the move history and a scoreboard kept across rematches.

use rand::Rng;
use tracing::info;

use crate::board::{Board, Piece};
use crate::config::EngineConfig;
use crate::error::Error;
use crate::scanner::{find_four, Window};
use crate::search::{SearchEngine, SearchResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Won { piece: Piece, window: Window },
    Draw,
}

impl GameState {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameState::Playing)
    }
}

/// Finished games per outcome
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub player_a: u32,
    pub player_b: u32,
    pub draws: u32,
}

impl Scoreboard {
    fn record(&mut self, state: &GameState) {
        match state {
            GameState::Won {
                piece: Piece::PlayerA,
                ..
            } => self.player_a += 1,
            GameState::Won {
                piece: Piece::PlayerB,
                ..
            } => self.player_b += 1,
            GameState::Draw => self.draws += 1,
            _ => {}
        }
    }
}

#[derive(Clone, Debug)]
pub struct Game {
    empty: Board,
    board: Board,
    to_move: Piece,
    computer: Piece,
    depth: usize,
    state: GameState,
    game: String,
    scoreboard: Scoreboard,
}

impl Game {
    /// Starts a game on an empty board, `PlayerA` moves first
    pub fn new(config: &EngineConfig) -> Result<Self, Error> {
        let depth = config.search_depth()?;
        let empty = config.board()?;
        Ok(Self {
            board: empty.clone(),
            empty,
            to_move: Piece::PlayerA,
            computer: config.computer_piece,
            depth,
            state: GameState::Playing,
            game: String::new(),
            scoreboard: Scoreboard::default(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn to_move(&self) -> Piece {
        self.to_move
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn computer(&self) -> Piece {
        self.computer
    }

    pub fn human(&self) -> Piece {
        self.computer.opponent()
    }

    pub fn is_computer_turn(&self) -> bool {
        self.state == GameState::Playing && self.to_move == self.computer
    }

    pub fn scoreboard(&self) -> Scoreboard {
        self.scoreboard
    }

    /// The moves played so far as 1-indexed column digits
    pub fn moves(&self) -> &str {
        &self.game
    }

    /// Plays `column` for the side to move
    pub fn play(&mut self, column: usize) -> Result<GameState, Error> {
        if self.state.is_over() {
            return Err(Error::GameOver);
        }
        let piece = self.to_move;
        self.board = self.board.drop_piece(column, piece)?;
        self.game.push_str(&(column + 1).to_string());

        self.state = if let Some(window) = find_four(&self.board, piece) {
            GameState::Won { piece, window }
        } else if self.board.is_full() {
            GameState::Draw
        } else {
            GameState::Playing
        };

        if self.state.is_over() {
            self.scoreboard.record(&self.state);
            info!(state = ?self.state, moves = %self.game, "game finished");
        }
        self.to_move = piece.opponent();

        Ok(self.state)
    }

    /// Lets `engine` choose and play the computer's move at the configured depth
    ///
    /// Returns `None` if there was no move to make.
    pub fn computer_move<R: Rng>(
        &mut self,
        engine: &mut SearchEngine<R>,
    ) -> Result<Option<SearchResult>, Error> {
        if !self.state.is_over() && self.to_move != self.computer {
            return Err(Error::Configuration(format!(
                "{:?} is to move, not the computer",
                self.to_move
            )));
        }
        self.engine_move(engine, self.depth)
    }

    /// Lets `engine` choose and play a move for the side to move
    pub fn engine_move<R: Rng>(
        &mut self,
        engine: &mut SearchEngine<R>,
        depth: usize,
    ) -> Result<Option<SearchResult>, Error> {
        if self.state.is_over() {
            return Err(Error::GameOver);
        }
        let result = engine.choose_move(&self.board, depth, self.to_move)?;
        match result.column {
            Some(column) => {
                self.play(column)?;
                Ok(Some(result))
            }
            None => Ok(None),
        }
    }

    /// Clears the board for a rematch, keeping the scoreboard
    pub fn reset(&mut self) {
        self.board = self.empty.clone();
        self.to_move = Piece::PlayerA;
        self.state = GameState::Playing;
        self.game.clear();
    }
}
