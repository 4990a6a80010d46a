//! End-to-end entry points: grammar file -> lexicon -> tokens

mod error;
mod result;

pub use error::PipelineError;
pub use result::TokenizationResult;

use crate::channel::TokenChannel;
use crate::compiler::{CompiledLexicon, CompilerOptions, GrammarError, RegexCompiler};
use crate::config::LexerPreferences;
use crate::grammar::{GrammarModel, GrammarParseError};
use crate::lexical::{LexResult, TokenizerOptions};
use crate::logging::{codes, LoggingService};
use crate::tokens::Token;
use crate::{log_error, log_success};
use std::fs::{self, File};
use std::io::{BufReader, Cursor, Read};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// A compiled lexicon bundled with the options used to tokenize with it
#[derive(Debug, Clone)]
pub struct Lexer {
    lexicon: Arc<CompiledLexicon>,
    tokenizer_options: TokenizerOptions,
}

impl Lexer {
    /// Compile `grammar` with options taken from runtime preferences
    pub fn new(
        grammar: &GrammarModel,
        preferences: &LexerPreferences,
        logger: Arc<LoggingService>,
    ) -> Result<Self, GrammarError> {
        let compiler_options =
            CompilerOptions::from_preferences(preferences).with_logger(logger.clone());
        let tokenizer_options = TokenizerOptions::from_preferences(preferences).with_logger(logger);
        Self::with_options(grammar, compiler_options, tokenizer_options)
    }

    pub fn with_options(
        grammar: &GrammarModel,
        compiler_options: CompilerOptions,
        tokenizer_options: TokenizerOptions,
    ) -> Result<Self, GrammarError> {
        let lexicon = RegexCompiler::new(compiler_options).compile(grammar)?;
        Ok(Self {
            lexicon: Arc::new(lexicon),
            tokenizer_options,
        })
    }

    pub fn lexicon(&self) -> &Arc<CompiledLexicon> {
        &self.lexicon
    }

    pub fn tokenizer_options(&self) -> &TokenizerOptions {
        &self.tokenizer_options
    }

    /// Token channel over `reader`
    pub fn channel<R: Read + Send + 'static>(&self, reader: R) -> TokenChannel<R> {
        TokenChannel::new(
            reader,
            Arc::clone(&self.lexicon),
            self.tokenizer_options.clone(),
        )
    }

    pub fn tokenize_str(&self, input: &str) -> LexResult<Vec<Token>> {
        self.channel(Cursor::new(input.as_bytes().to_vec()))
            .collect_tokens()
    }

    /// Tokenize a whole file
    pub fn tokenize_file(&self, path: impl AsRef<Path>) -> Result<TokenizationResult, PipelineError> {
        let path = path.as_ref();
        let start = Instant::now();

        let file = File::open(path).map_err(|source| PipelineError::Input {
            path: path.to_path_buf(),
            source,
        })?;
        let input_bytes = file
            .metadata()
            .map(|metadata| metadata.len() as usize)
            .unwrap_or(0);

        let tokens = self.channel(BufReader::new(file)).collect_tokens()?;
        let result = TokenizationResult::new(tokens, input_bytes, start.elapsed());
        result.log_success(&self.tokenizer_options.logger, &path.display().to_string());
        Ok(result)
    }
}

/// Parse a grammar document; JSON when `text` starts with `{`, TOML otherwise
pub fn parse_grammar(text: &str) -> Result<GrammarModel, GrammarParseError> {
    GrammarModel::parse(text)
}

/// Load a grammar model from a TOML or JSON file
pub fn load_grammar(
    path: impl AsRef<Path>,
    logger: &LoggingService,
) -> Result<GrammarModel, PipelineError> {
    let path = path.as_ref();

    let loaded = fs::read_to_string(path)
        .map_err(|source| PipelineError::GrammarRead {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|text| {
            parse_grammar(&text).map_err(|source| PipelineError::GrammarLoad {
                path: path.to_path_buf(),
                source,
            })
        });

    match loaded {
        Ok(grammar) => {
            log_success!(logger, codes::success::GRAMMAR_LOADED, "Grammar loaded",
                "path" => path.display(),
                "tags" => grammar.tags.len(),
                "rules" => grammar.rules.len()
            );
            Ok(grammar)
        }
        Err(err) => {
            log_error!(logger, err.error_code(), &err.to_string(), "path" => path.display());
            Err(err)
        }
    }
}

/// Compile and tokenize in one call
pub fn tokenize_str(
    grammar: &GrammarModel,
    input: &str,
    preferences: &LexerPreferences,
) -> Result<Vec<Token>, PipelineError> {
    let lexer = Lexer::new(grammar, preferences, crate::logging::disabled())?;
    Ok(lexer.tokenize_str(input)?)
}
