//! Streaming tokenization of byte input against a compiled lexicon

pub mod buffer;
pub mod error;
pub mod options;
pub mod strategy;
pub mod tokenizer;

pub use buffer::{BufferState, Window};
pub use error::{LexResult, LexerError};
pub use options::TokenizerOptions;
pub use strategy::{strategy_for, DelimiterStrategy, RegexStrategy, Step, TokenizeStrategy};
pub use tokenizer::{StreamTokenizer, TokenizerState};
