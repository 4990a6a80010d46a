//! Token produced by the stream tokenizer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token type identifier; equals the tag id of the rule that produced it
pub type TokenId = i32;

/// Emitted for input no rule matches when the fallback group is disabled
pub const INVALID_TOKEN: TokenId = -1;

/// Reported once after the input stream is exhausted
pub const END_OF_STREAM_TOKEN: TokenId = -2;

/// One lexeme and the tag it was classified as
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub data: String,
}

impl Token {
    pub fn new(id: TokenId, data: impl Into<String>) -> Self {
        Self {
            id,
            data: data.into(),
        }
    }

    /// End-of-stream sentinel with empty data
    pub fn end_of_stream() -> Self {
        Self::new(END_OF_STREAM_TOKEN, String::new())
    }

    pub fn invalid(data: impl Into<String>) -> Self {
        Self::new(INVALID_TOKEN, data)
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.id == END_OF_STREAM_TOKEN
    }

    pub fn is_invalid(&self) -> bool {
        self.id == INVALID_TOKEN
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            END_OF_STREAM_TOKEN => write!(f, "<end of stream>"),
            INVALID_TOKEN => write!(f, "<invalid {:?}>", self.data),
            id => write!(f, "{:?}/{}", self.data, id),
        }
    }
}
