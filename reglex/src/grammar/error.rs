//! Errors raised while reading grammar documents

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrammarParseError {
    #[error("Invalid TOML grammar: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON grammar: {0}")]
    Json(#[from] serde_json::Error),
}
