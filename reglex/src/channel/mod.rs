//! Token delivery to the consumer
//!
//! A `TokenChannel` either drives the tokenizer on the calling thread or
//! hands it to one producer thread that feeds a `BlockingQueue`. In both
//! modes the consumer sees the same token sequence followed by a single end
//! (or failure).

pub mod queue;
pub mod token_channel;

pub use queue::BlockingQueue;
pub use token_channel::{Message, TokenChannel};
