//! Pull-style token source over a synchronous or threaded tokenizer

use super::queue::BlockingQueue;
use crate::compiler::CompiledLexicon;
use crate::lexical::{LexResult, LexerError, StreamTokenizer, TokenizerOptions};
use crate::logging::{codes, LoggingService};
use crate::tokens::Token;
use crate::{log_debug, log_error, log_success};
use std::any::Any;
use std::io::Read;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// Item carried from the producer thread to the consumer
#[derive(Debug)]
pub enum Message {
    Token(Token),
    /// Input exhausted; always the last message
    End,
    /// Tokenization failed; always the last message
    Failed(LexerError),
}

struct Producer<R: Read> {
    tokenizer: Mutex<Option<StreamTokenizer<R>>>,
    queue: Arc<BlockingQueue<Message>>,
    started: AtomicBool,
    handle: Mutex<Option<JoinHandle<()>>>,
}

enum Mode<R: Read> {
    Synchronous(StreamTokenizer<R>),
    Threaded(Producer<R>),
}

pub struct TokenChannel<R: Read + Send + 'static> {
    mode: Mode<R>,
    finished: bool,
    last_error: Option<LexerError>,
    logger: Arc<LoggingService>,
}

impl<R: Read + Send + 'static> TokenChannel<R> {
    /// Build a tokenizer over `reader` and wrap it according to
    /// `options.multithreaded`
    pub fn new(reader: R, lexicon: Arc<CompiledLexicon>, options: TokenizerOptions) -> Self {
        let multithreaded = options.multithreaded;
        let logger = options.logger.clone();
        let tokenizer = StreamTokenizer::new(reader, lexicon, options);

        if multithreaded {
            Self::threaded(tokenizer, logger)
        } else {
            Self::synchronous(tokenizer, logger)
        }
    }

    /// Channel that tokenizes on the caller's thread
    pub fn synchronous(tokenizer: StreamTokenizer<R>, logger: Arc<LoggingService>) -> Self {
        Self {
            mode: Mode::Synchronous(tokenizer),
            finished: false,
            last_error: None,
            logger,
        }
    }

    /// Channel fed by a producer thread once `start` is called
    pub fn threaded(tokenizer: StreamTokenizer<R>, logger: Arc<LoggingService>) -> Self {
        Self {
            mode: Mode::Threaded(Producer {
                tokenizer: Mutex::new(Some(tokenizer)),
                queue: Arc::new(BlockingQueue::new()),
                started: AtomicBool::new(false),
                handle: Mutex::new(None),
            }),
            finished: false,
            last_error: None,
            logger,
        }
    }

    pub fn is_threaded(&self) -> bool {
        matches!(self.mode, Mode::Threaded(_))
    }

    pub fn is_started(&self) -> bool {
        match &self.mode {
            Mode::Synchronous(_) => false,
            Mode::Threaded(producer) => producer.started.load(Ordering::Acquire),
        }
    }

    /// End of stream or a failure has been delivered
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Spawn the producer thread. Only the first call has an effect, and
    /// synchronous channels ignore it.
    pub fn start(&self) {
        let Mode::Threaded(producer) = &self.mode else {
            return;
        };

        if producer
            .started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let tokenizer = producer
            .tokenizer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        let Some(tokenizer) = tokenizer else {
            return;
        };

        let queue = Arc::clone(&producer.queue);
        let spawned = thread::Builder::new()
            .name("reglex-producer".to_string())
            .spawn(move || produce(tokenizer, queue));

        match spawned {
            Ok(handle) => {
                *producer
                    .handle
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(handle);
                log_success!(self.logger, codes::success::PRODUCER_STARTED, "Token producer started");
            }
            Err(err) => {
                log_error!(self.logger, codes::stream::IO_FAILURE, "Failed to spawn token producer",
                    "error" => err
                );
                producer.queue.push(Message::Failed(LexerError::Io(err)));
            }
        }
    }

    /// Next token, or `None` after the end of the stream. A failure is
    /// returned once; later calls return `None`.
    pub fn next_token(&mut self) -> LexResult<Option<Token>> {
        if self.finished {
            return Ok(None);
        }

        let result = if self.is_threaded() {
            self.start();
            self.receive()
        } else if let Mode::Synchronous(tokenizer) = &mut self.mode {
            tokenizer.next_token()
        } else {
            Ok(None)
        };

        if !matches!(result, Ok(Some(_))) {
            self.finished = true;
        }
        result
    }

    fn receive(&self) -> LexResult<Option<Token>> {
        let Mode::Threaded(producer) = &self.mode else {
            return Ok(None);
        };

        match producer.queue.pop() {
            Message::Token(token) => Ok(Some(token)),
            Message::End => Ok(None),
            Message::Failed(err) => Err(err),
        }
    }

    /// Fill `token` with the next token. Returns `false` at the end of the
    /// stream or on failure, leaving the end-of-stream sentinel in `token`;
    /// the failure is kept for `take_error`.
    pub fn get_next_token(&mut self, token: &mut Token) -> bool {
        match self.next_token() {
            Ok(Some(next)) => {
                *token = next;
                true
            }
            Ok(None) => {
                *token = Token::end_of_stream();
                false
            }
            Err(err) => {
                *token = Token::end_of_stream();
                self.last_error = Some(err);
                false
            }
        }
    }

    /// Failure swallowed by `get_next_token`, if any
    pub fn take_error(&mut self) -> Option<LexerError> {
        self.last_error.take()
    }

    /// Drain the channel into a vector
    pub fn collect_tokens(mut self) -> LexResult<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}

impl<R: Read + Send + 'static> Iterator for TokenChannel<R> {
    type Item = LexResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

impl<R: Read + Send + 'static> Drop for TokenChannel<R> {
    fn drop(&mut self) {
        let Mode::Threaded(producer) = &self.mode else {
            return;
        };

        let handle = producer
            .handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        // The queue is unbounded, so the producer finishes without a consumer
        if let Some(handle) = handle {
            if handle.join().is_err() {
                log_debug!(self.logger, "Token producer exited abnormally");
            }
        }
    }
}

/// Producer loop: every token, then exactly one terminal message
fn produce<R: Read>(mut tokenizer: StreamTokenizer<R>, queue: Arc<BlockingQueue<Message>>) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| loop {
        match tokenizer.next_token() {
            Ok(Some(token)) => queue.push(Message::Token(token)),
            Ok(None) => return Message::End,
            Err(err) => return Message::Failed(err),
        }
    }));

    let terminal = outcome.unwrap_or_else(|payload| {
        Message::Failed(LexerError::ProducerPanicked {
            message: panic_message(payload.as_ref()),
        })
    });
    queue.push(terminal);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{CompilerOptions, RegexCompiler};
    use crate::grammar::GrammarModel;
    use crate::logging::{self, LogLevel};
    use crate::tokens::END_OF_STREAM_TOKEN;
    use assert_matches::assert_matches;
    use std::io::Cursor;

    fn lexicon(fallback: bool) -> Arc<CompiledLexicon> {
        let grammar = GrammarModel::new()
            .literal_rule(1, "ident", r"\w+")
            .literal_rule(2, "operator", "[;+]");
        let options = CompilerOptions::new().with_fallback_error(fallback);
        Arc::new(RegexCompiler::new(options).compile(&grammar).unwrap())
    }

    fn channel(input: &str, fallback: bool, multithreaded: bool) -> TokenChannel<Cursor<Vec<u8>>> {
        TokenChannel::new(
            Cursor::new(input.as_bytes().to_vec()),
            lexicon(fallback),
            TokenizerOptions::new()
                .with_chunk_size(3)
                .with_multithreaded(multithreaded),
        )
    }

    struct PanickingReader;

    impl Read for PanickingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            panic!("reader exploded");
        }
    }

    #[test]
    fn test_sync_and_threaded_agree() {
        let input = "alpha+beta; gamma delta;";
        let sync = channel(input, false, false).collect_tokens().unwrap();
        let threaded = channel(input, false, true).collect_tokens().unwrap();

        assert_eq!(sync.len(), 7);
        assert_eq!(sync, threaded);
    }

    #[test]
    fn test_end_of_stream_is_reported_exactly_once() {
        let mut channel = channel("ab cd", false, true);
        channel.start();
        channel.start();
        assert!(channel.is_started());

        assert_eq!(channel.next_token().unwrap(), Some(Token::new(1, "ab")));
        assert_eq!(channel.next_token().unwrap(), Some(Token::new(1, "cd")));
        assert_eq!(channel.next_token().unwrap(), None);
        assert!(channel.is_finished());

        let Mode::Threaded(producer) = &channel.mode else {
            panic!("expected threaded channel");
        };
        assert!(producer.queue.is_empty());

        // Further calls neither block nor produce tokens
        assert_eq!(channel.next_token().unwrap(), None);
        assert_eq!(channel.next_token().unwrap(), None);
    }

    #[test]
    fn test_next_token_starts_producer() {
        let mut channel = channel("x", false, true);
        assert!(!channel.is_started());
        assert_eq!(channel.next_token().unwrap(), Some(Token::new(1, "x")));
        assert!(channel.is_started());
    }

    #[test]
    fn test_start_is_ignored_by_synchronous_channel() {
        let channel = channel("x", false, false);
        channel.start();
        assert!(!channel.is_started());
        assert!(!channel.is_threaded());
    }

    #[test]
    fn test_failure_crosses_thread_boundary() {
        let mut channel = channel("ab#cd", true, true);

        assert_eq!(channel.next_token().unwrap(), Some(Token::new(1, "ab")));
        assert_matches!(
            channel.next_token(),
            Err(LexerError::InvalidToken { text, position }) if text == "#" && position.offset == 2
        );
        assert_eq!(channel.next_token().unwrap(), None);
    }

    #[test]
    fn test_get_next_token_adapter() {
        let mut channel = channel("ab;", false, true);
        let mut token = Token::default();

        assert!(channel.get_next_token(&mut token));
        assert_eq!(token, Token::new(1, "ab"));
        assert!(channel.get_next_token(&mut token));
        assert_eq!(token, Token::new(2, ";"));
        assert!(!channel.get_next_token(&mut token));
        assert_eq!(token.id, END_OF_STREAM_TOKEN);
        assert!(channel.take_error().is_none());
    }

    #[test]
    fn test_get_next_token_keeps_error() {
        let mut channel = channel("#", true, false);
        let mut token = Token::default();

        assert!(!channel.get_next_token(&mut token));
        assert!(token.is_end_of_stream());
        assert_matches!(channel.take_error(), Some(LexerError::InvalidToken { .. }));
    }

    #[test]
    fn test_producer_panic_becomes_error() {
        let (service, memory) = logging::memory(LogLevel::Info);
        let mut channel = TokenChannel::new(
            PanickingReader,
            lexicon(false),
            TokenizerOptions::new()
                .with_multithreaded(true)
                .with_logger(service),
        );

        assert_matches!(
            channel.next_token(),
            Err(LexerError::ProducerPanicked { message }) if message == "reader exploded"
        );
        assert_eq!(channel.next_token().unwrap(), None);
        assert!(memory.has_success_with_code(codes::success::PRODUCER_STARTED));
    }

    #[test]
    fn test_drop_without_consuming_joins_producer() {
        let input = "word ".repeat(1000);
        let channel = channel(&input, false, true);
        channel.start();
        drop(channel);
    }

    #[test]
    fn test_iterator() {
        let tokens: Vec<Token> = channel("a;b", false, true)
            .map(|token| token.unwrap())
            .collect();
        assert_eq!(tokens.len(), 3);
    }
}
