//! Perft suite files.
//!
//! A suite is a TOML file listing positions with the node count expected at
//! a given depth:
//!
//! ```toml
//! [[positions]]
//! name = "start"
//! fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
//! depth = 4
//! nodes = 197281
//! ```

use std::path::Path;

use gambit_engine::{EngineError, Position};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a suite file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the suite file from disk.
    #[error("Failed to read suite file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the suite file as valid TOML.
    #[error("Failed to parse suite: {0}")]
    ParseError(#[from] toml::de::Error),
    /// The suite lists no positions.
    #[error("Suite contains no positions")]
    Empty,
    /// An entry's FEN does not describe a valid position.
    #[error("Invalid position '{name}': {source}")]
    InvalidPosition {
        name: String,
        #[source]
        source: EngineError,
    },
}

/// One position in a suite.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SuiteEntry {
    /// Label printed in reports. Defaults to the FEN.
    #[serde(default)]
    pub name: String,
    pub fen: String,
    /// Search depth in plies. Defaults to 3.
    #[serde(default = "default_depth")]
    pub depth: u32,
    /// Expected leaf count. Entries without one are only reported.
    #[serde(default)]
    pub nodes: Option<u64>,
}

fn default_depth() -> u32 {
    3
}

impl SuiteEntry {
    /// Label for reports.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.fen
        } else {
            &self.name
        }
    }

    /// Parses the entry's FEN.
    pub fn position(&self) -> Result<Position, ConfigError> {
        Position::from_fen(&self.fen).map_err(|source| ConfigError::InvalidPosition {
            name: self.label().to_string(),
            source,
        })
    }
}

/// A list of perft positions.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
pub struct SuiteConfig {
    #[serde(default)]
    pub positions: Vec<SuiteEntry>,
}

impl SuiteConfig {
    /// Loads and validates a suite file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read,
    /// [`ConfigError::ParseError`] if it is not valid TOML, and
    /// [`ConfigError::Empty`] or [`ConfigError::InvalidPosition`] if its
    /// contents are unusable.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses and validates suite contents.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let suite: SuiteConfig = toml::from_str(content)?;
        if suite.positions.is_empty() {
            return Err(ConfigError::Empty);
        }
        for entry in &suite.positions {
            entry.position()?;
        }
        Ok(suite)
    }
}
