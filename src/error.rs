use std::path::PathBuf;

use thiserror::Error;

/// Problems with a participant's strategy tables, either while loading them
/// or while looking a hand up in them.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("strategy file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{table} table must be a JSON object of rows")]
    NotATable { table: &'static str },
    #[error("{table} table: invalid row key {row:?}")]
    InvalidRow { table: &'static str, row: String },
    #[error("{table} table: invalid dealer column {column:?} in row {row:?}")]
    InvalidColumn {
        table: &'static str,
        row: String,
        column: String,
    },
    #[error("{table} table: unknown action code {code:?} at ({row}, {column})")]
    InvalidCode {
        table: &'static str,
        row: String,
        column: String,
        code: String,
    },
    #[error("{table} table has no entry for ({row}, {column})")]
    MissingEntry {
        table: &'static str,
        row: String,
        column: u8,
    },
}

#[derive(Error, Debug)]
pub enum SimError {
    /// The reshuffle policy should keep this from ever happening.
    #[error("drew from an empty shoe ({deck_count} decks); reshuffle threshold too low for this table")]
    EmptyShoe { deck_count: u8 },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("strategy for {player}: {source}")]
    Strategy {
        player: String,
        #[source]
        source: StrategyError,
    },
    #[error("failed to write report {}: {source}", .path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SimError {
    pub fn strategy(player: impl Into<String>, source: StrategyError) -> Self {
        SimError::Strategy {
            player: player.into(),
            source,
        }
    }
}
