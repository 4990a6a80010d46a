//! Grammar compiler
//!
//! Expands every token rule of a `GrammarModel` into a regex fragment and
//! joins the fragments into one anchored master pattern:
//!
//! ```text
//! \A(?:(rule_1)|(rule_2)|...|(whitespace)|(error))
//! ```
//!
//! Capture group `i + 1` identifies `token_type_ids[i]`. Fragments may not
//! contain capture groups of their own, which keeps that mapping exact.

pub mod error;
mod fragment;
pub mod lexicon;
pub mod options;
pub mod regex_compiler;

pub use error::{CompileResult, GrammarError};
pub use lexicon::{CompiledLexicon, CompiledRule, GroupRole, LexiconMode, Lookahead};
pub use options::{CompilerOptions, DEFAULT_WHITESPACE};
pub use regex_compiler::RegexCompiler;
