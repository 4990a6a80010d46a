//! Streaming tokenizer
//!
//! Pulls bytes from any `Read` into a bounded buffer and turns them into
//! tokens one at a time. Memory use is bounded by the chunk size plus the
//! longest token in the input.
//!
//! A match is held back while the lexicon's prefix automaton is still alive
//! at the end of the buffered input, so the tokens produced do not depend on
//! where chunk boundaries fall. Lookahead is bounded by `max_token_length`
//! only.

use super::buffer::BufferState;
use super::error::{LexResult, LexerError};
use super::options::TokenizerOptions;
use super::strategy::{strategy_for, Step, TokenizeStrategy};
use crate::compiler::CompiledLexicon;
use crate::logging::{codes, preview};
use crate::tokens::{Token, TokenId, INVALID_TOKEN};
use crate::utils::{Span, Spanned};
use crate::{log_debug, log_error, log_success};
use std::io::Read;
use std::sync::Arc;

/// Where the tokenizer is in its read/match cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerState {
    /// Nothing read yet
    Filling,
    /// Matching against buffered input
    Matching,
    /// The open token needs more input
    ReBuffering,
    /// End of stream reported or a fatal error raised
    Ended,
}

pub struct StreamTokenizer<R: Read> {
    reader: R,
    lexicon: Arc<CompiledLexicon>,
    strategy: Box<dyn TokenizeStrategy>,
    buffer: BufferState,
    options: TokenizerOptions,
    state: TokenizerState,
    tokens_emitted: usize,
    invalid_tokens: usize,
}

impl<R: Read> StreamTokenizer<R> {
    pub fn new(reader: R, lexicon: Arc<CompiledLexicon>, options: TokenizerOptions) -> Self {
        let strategy = strategy_for(&lexicon);
        Self::with_strategy(reader, lexicon, strategy, options)
    }

    /// Tokenizer driven by an explicit strategy instead of the lexicon's mode
    pub fn with_strategy(
        reader: R,
        lexicon: Arc<CompiledLexicon>,
        strategy: Box<dyn TokenizeStrategy>,
        options: TokenizerOptions,
    ) -> Self {
        log_debug!(options.logger, "Tokenizer created",
            "strategy" => strategy.name(),
            "chunk_size" => options.chunk_size
        );

        Self {
            reader,
            buffer: BufferState::new(options.chunk_size),
            lexicon,
            strategy,
            options,
            state: TokenizerState::Filling,
            tokens_emitted: 0,
            invalid_tokens: 0,
        }
    }

    pub fn state(&self) -> TokenizerState {
        self.state
    }

    pub fn lexicon(&self) -> &CompiledLexicon {
        &self.lexicon
    }

    pub fn buffer(&self) -> &BufferState {
        &self.buffer
    }

    pub fn tokens_emitted(&self) -> usize {
        self.tokens_emitted
    }

    /// Next token, or `None` once the input is exhausted
    pub fn next_token(&mut self) -> LexResult<Option<Token>> {
        Ok(self.next_spanned()?.map(Spanned::into_inner))
    }

    /// Next token together with the input span it covers
    pub fn next_spanned(&mut self) -> LexResult<Option<Spanned<Token>>> {
        if self.state == TokenizerState::Ended {
            return Ok(None);
        }

        match self.advance() {
            Ok(Some(token)) => Ok(Some(token)),
            Ok(None) => {
                self.state = TokenizerState::Ended;
                log_success!(self.options.logger, codes::success::TOKENIZATION_COMPLETE,
                    "Tokenization complete",
                    "tokens" => self.tokens_emitted,
                    "invalid" => self.invalid_tokens,
                    "bytes" => self.buffer.position().offset
                );
                Ok(None)
            }
            Err(err) => {
                self.state = TokenizerState::Ended;
                log_error!(self.options.logger, err.error_code(), &err.to_string(),
                    "offset" => self.buffer.position().offset
                );
                Err(err)
            }
        }
    }

    fn advance(&mut self) -> LexResult<Option<Spanned<Token>>> {
        loop {
            match self.state {
                TokenizerState::Ended => return Ok(None),
                TokenizerState::Filling => {
                    self.buffer.fill(&mut self.reader)?;
                    self.state = TokenizerState::Matching;
                }
                TokenizerState::ReBuffering => {
                    let read = self
                        .buffer
                        .refill(&mut self.reader, self.options.max_token_length)?;
                    log_debug!(self.options.logger, "Rebuffered",
                        "pending" => self.buffer.pending(),
                        "read" => read,
                        "capacity" => self.buffer.capacity()
                    );
                    self.state = TokenizerState::Matching;
                }
                TokenizerState::Matching => {
                    if self.buffer.at_end() {
                        return Ok(None);
                    }

                    let step = {
                        let window = self.buffer.window()?;
                        if window.text.is_empty() {
                            Step::NeedMore
                        } else {
                            self.strategy.step(&self.lexicon, &window)
                        }
                    };

                    match step {
                        Step::NeedMore => self.state = TokenizerState::ReBuffering,
                        Step::Skip { len } => {
                            self.buffer.consume(len)?;
                        }
                        Step::Emit { id, len } => return self.emit(id, len).map(Some),
                        Step::Invalid { len } => {
                            self.invalid_tokens += 1;
                            return self.emit(INVALID_TOKEN, len).map(Some);
                        }
                        Step::Reject { len } => {
                            return Err(LexerError::InvalidToken {
                                text: self.buffer.peek(len)?,
                                position: self.buffer.position(),
                            });
                        }
                    }
                }
            }
        }
    }

    fn emit(&mut self, id: TokenId, len: usize) -> LexResult<Spanned<Token>> {
        let start = self.buffer.position();
        if len > self.options.max_token_length {
            return Err(LexerError::TokenTooLong {
                length: len,
                limit: self.options.max_token_length,
                position: start,
            });
        }

        let data = self.buffer.consume(len)?;
        self.tokens_emitted += 1;

        if id == INVALID_TOKEN {
            log_debug!(self.options.logger, "Unmatched input",
                "text" => preview(&data),
                "position" => start
            );
        }

        let span = Span::new(start, self.buffer.position());
        Ok(Spanned::new(Token::new(id, data), span))
    }
}

impl<R: Read> Iterator for StreamTokenizer<R> {
    type Item = LexResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}
