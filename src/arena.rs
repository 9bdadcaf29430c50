//! Batches of computer-only games, for comparing search settings

use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::info;

use std::time::Instant;

use crate::board::Piece;
use crate::config::EngineConfig;
use crate::error::Error;
use crate::game::{Game, GameState};
use crate::search::SearchEngine;

/// A player in an arena game
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Contender {
    /// Minimax search to the given depth
    Engine { depth: usize },
    /// Uniformly random legal moves
    Random,
}

/// Results from the first contender's point of view
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub first_wins: u32,
    pub second_wins: u32,
    pub draws: u32,
}

impl Tally {
    pub fn games(&self) -> u32 {
        self.first_wins + self.second_wins + self.draws
    }

    fn merge(self, other: Tally) -> Tally {
        Tally {
            first_wins: self.first_wins + other.first_wins,
            second_wins: self.second_wins + other.second_wins,
            draws: self.draws + other.draws,
        }
    }
}

enum Outcome {
    First,
    Second,
    Draw,
}

pub struct Arena {
    config: EngineConfig,
    first: Contender,
    second: Contender,
    seed: u64,
    show_progress: bool,
}

impl Arena {
    /// The base seed comes from the configuration, or 0 if it has none
    pub fn new(config: EngineConfig, first: Contender, second: Contender) -> Self {
        Self {
            seed: config.seed.unwrap_or(0),
            config,
            first,
            second,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Plays `games` games in parallel, the contenders take turns moving first
    pub fn run(&self, games: u32) -> Result<Tally, Error> {
        self.config.validate()?;
        let start = Instant::now();

        let progress = if self.show_progress {
            let progress = ProgressBar::new(games as u64);
            progress.set_style(
                ProgressStyle::default_bar()
                    .template("Playing games: {bar:40.cyan/blue} {pos}/{len} ~{eta} remaining")
                    .progress_chars("█▓▒░  "),
            );
            progress
        } else {
            ProgressBar::hidden()
        };

        let tally = (0..games)
            .into_par_iter()
            .map(|index| {
                let outcome = self.play_one(index);
                progress.inc(1);
                outcome.map(|outcome| match outcome {
                    Outcome::First => Tally {
                        first_wins: 1,
                        ..Tally::default()
                    },
                    Outcome::Second => Tally {
                        second_wins: 1,
                        ..Tally::default()
                    },
                    Outcome::Draw => Tally {
                        draws: 1,
                        ..Tally::default()
                    },
                })
            })
            .try_reduce(Tally::default, |a, b| Ok(a.merge(b)))?;

        progress.finish();
        info!(
            first = ?self.first,
            second = ?self.second,
            first_wins = tally.first_wins,
            second_wins = tally.second_wins,
            draws = tally.draws,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "arena finished"
        );
        Ok(tally)
    }

    fn play_one(&self, index: u32) -> Result<Outcome, Error> {
        let seed = self.seed.wrapping_add(index as u64);
        let mut engine = SearchEngine::seeded(self.config.evaluator(), seed);
        // separate stream for random contenders so they don't shift the engine's tie-breaks
        let mut rng = StdRng::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15);
        let mut game = Game::new(&self.config)?;

        // the first contender plays PlayerA in even games
        let first_piece = if index % 2 == 0 {
            Piece::PlayerA
        } else {
            Piece::PlayerB
        };

        while !game.state().is_over() {
            let contender = if game.to_move() == first_piece {
                self.first
            } else {
                self.second
            };
            match contender {
                Contender::Engine { depth } => {
                    if game.engine_move(&mut engine, depth)?.is_none() {
                        break;
                    }
                }
                Contender::Random => {
                    let moves = game.board().valid_moves();
                    if moves.is_empty() {
                        break;
                    }
                    game.play(moves[rng.gen_range(0..moves.len())])?;
                }
            }
        }

        Ok(match game.state() {
            GameState::Won { piece, .. } if piece == first_piece => Outcome::First,
            GameState::Won { .. } => Outcome::Second,
            _ => Outcome::Draw,
        })
    }
}
