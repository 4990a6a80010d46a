use crate::compiler::GrammarError;
use crate::grammar::GrammarParseError;
use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use std::path::PathBuf;

/// Errors raised by the end-to-end entry points
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Grammar compilation failed: {0}")]
    Grammar(#[from] GrammarError),

    #[error("Tokenization failed: {0}")]
    Lexical(#[from] LexerError),

    #[error("Failed to read grammar {path}: {source}")]
    GrammarRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load grammar {path}: {source}")]
    GrammarLoad {
        path: PathBuf,
        #[source]
        source: GrammarParseError,
    },

    #[error("Failed to open input {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::Grammar(err) => err.error_code(),
            Self::Lexical(err) => err.error_code(),
            Self::GrammarRead { .. } | Self::GrammarLoad { .. } => {
                codes::grammar::GRAMMAR_LOAD_FAILED
            }
            Self::Input { .. } => codes::stream::IO_FAILURE,
        }
    }
}
