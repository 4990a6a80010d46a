//! reglex: compile a lexical grammar into one master regex and tokenize
//! byte streams with it in bounded memory.
//!
//! ```no_run
//! use reglex::{CompilerOptions, GrammarModel, RegexCompiler, TokenChannel, TokenizerOptions};
//! use std::sync::Arc;
//!
//! let grammar = GrammarModel::new()
//!     .literal_rule(1, "ident", r"\w+")
//!     .literal_rule(2, "operator", "[;+]");
//! let lexicon = RegexCompiler::new(CompilerOptions::new()).compile(&grammar)?;
//!
//! let input = std::io::Cursor::new(b"ab;cd".to_vec());
//! let channel = TokenChannel::new(input, Arc::new(lexicon), TokenizerOptions::new());
//! for token in channel {
//!     println!("{}", token?);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
#[macro_use]
pub mod logging;
pub mod channel;
pub mod compiler;
pub mod grammar;
pub mod lexical;
pub mod pipeline;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use channel::{BlockingQueue, Message, TokenChannel};
pub use compiler::{
    CompiledLexicon, CompiledRule, CompilerOptions, GrammarError, LexiconMode, RegexCompiler,
};
pub use grammar::{GrammarModel, GrammarToken, GroupKind, Rule, Tag, TagId};
pub use lexical::{LexerError, StreamTokenizer, TokenizerOptions};
pub use pipeline::{Lexer, PipelineError, TokenizationResult};
pub use tokens::{Token, TokenId, END_OF_STREAM_TOKEN, INVALID_TOKEN};
