//! Shared location types used by the tokenizer, its errors and the logger

pub mod span;

pub use span::{Position, Span, Spanned};
