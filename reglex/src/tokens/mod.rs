//! Tokens and the reserved token ids
//!
//! A token id is the `TagId` of the rule that matched. Ids below 1 are
//! reserved for sentinels, which is why grammar tags must be positive.

pub mod token;

pub use token::{Token, TokenId, END_OF_STREAM_TOKEN, INVALID_TOKEN};
