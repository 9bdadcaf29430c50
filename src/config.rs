//! Engine settings, loadable from TOML

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::board::{Board, Piece};
use crate::error::Error;
use crate::evaluator::{Evaluator, ThreatPolicy};
use crate::search::SearchEngine;
use crate::{DEFAULT_DEPTH, HEIGHT, WIDTH};

/// Board size, search depth and evaluator settings
///
/// ```toml
/// rows = 6
/// cols = 7
/// depth = 4
/// seed = 42
/// computer_piece = "player_b"
/// threat_policy = { fixed = "player_a" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rows: usize,
    pub cols: usize,
    /// Plies to search, kept signed so a negative value can be reported
    pub depth: i64,
    pub seed: Option<u64>,
    pub computer_piece: Piece,
    pub threat_policy: ThreatPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            rows: HEIGHT,
            cols: WIDTH,
            depth: DEFAULT_DEPTH as i64,
            seed: None,
            computer_piece: Piece::PlayerB,
            threat_policy: ThreatPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: EngineConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::Configuration(format!(
                "board dimensions must be non-zero, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.depth < 0 {
            return Err(Error::Configuration(format!(
                "depth must be >= 0, got {}",
                self.depth
            )));
        }
        if self.computer_piece.is_empty() {
            return Err(Error::Configuration(
                "computer_piece must be player_a or player_b".into(),
            ));
        }
        if let ThreatPolicy::Fixed(Piece::Empty) = self.threat_policy {
            return Err(Error::Configuration(
                "a fixed threat piece must be player_a or player_b".into(),
            ));
        }
        Ok(())
    }

    /// The validated search depth
    pub fn search_depth(&self) -> Result<usize, Error> {
        self.validate()?;
        Ok(self.depth as usize)
    }

    /// An empty board of the configured size
    pub fn board(&self) -> Result<Board, Error> {
        Board::with_dimensions(self.rows, self.cols)
    }

    pub fn evaluator(&self) -> Evaluator {
        Evaluator::new(self.threat_policy)
    }

    /// A search engine seeded from `seed` if one is configured
    pub fn engine(&self) -> SearchEngine {
        match self.seed {
            Some(seed) => SearchEngine::seeded(self.evaluator(), seed),
            None => SearchEngine::new(self.evaluator()),
        }
    }
}
