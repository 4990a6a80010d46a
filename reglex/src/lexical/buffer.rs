//! Growable read buffer for the stream tokenizer
//!
//! The buffer is a single byte arena addressed by integer offsets:
//!
//! ```text
//! 0 ........ cursor ........ fill_end ........ capacity
//!   consumed   unresolved input    free space
//! ```
//!
//! Refilling moves the unresolved bytes to offset 0 before reading, and grows
//! the arena by half a chunk when the unresolved bytes leave less than half a
//! chunk free. Once a grown token has been consumed the arena shrinks back to
//! the nominal chunk size.

use super::error::{LexResult, LexerError};
use crate::config::compile_time::buffering::MIN_CHUNK_SIZE;
use crate::utils::Position;
use std::io::{ErrorKind, Read};

/// Valid UTF-8 view of the unresolved input
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    pub text: &'a str,
    /// No byte after `text` can ever extend a match
    pub complete: bool,
    /// No refill can make the window longer
    pub saturated: bool,
}

#[derive(Debug)]
pub struct BufferState {
    data: Vec<u8>,
    cursor: usize,
    fill_end: usize,
    ended: bool,
    chunk_size: usize,
    position: Position,
}

impl BufferState {
    pub fn new(chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(MIN_CHUNK_SIZE);
        Self {
            data: vec![0; chunk_size],
            cursor: 0,
            fill_end: 0,
            ended: false,
            chunk_size,
            position: Position::start(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Bytes read but not yet consumed
    pub fn pending(&self) -> usize {
        self.fill_end - self.cursor
    }

    /// Position of the next unconsumed byte
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Input is exhausted and every byte has been consumed
    pub fn at_end(&self) -> bool {
        self.ended && self.cursor == self.fill_end
    }

    pub fn is_grown(&self) -> bool {
        self.data.len() > self.chunk_size
    }

    /// Read until the arena is full or the reader reports end of input
    pub fn fill<R: Read>(&mut self, reader: &mut R) -> LexResult<usize> {
        let mut total = 0;
        while !self.ended && self.fill_end < self.data.len() {
            match reader.read(&mut self.data[self.fill_end..]) {
                Ok(0) => self.ended = true,
                Ok(n) => {
                    self.fill_end += n;
                    total += n;
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(LexerError::Io(err)),
            }
        }
        Ok(total)
    }

    /// Move unresolved bytes to the front, grow if needed, and read more
    pub fn refill<R: Read>(&mut self, reader: &mut R, max_token_length: usize) -> LexResult<usize> {
        let pending = self.pending();
        if pending > max_token_length {
            return Err(LexerError::TokenTooLong {
                length: pending,
                limit: max_token_length,
                position: self.position,
            });
        }

        self.compact();

        let half_chunk = self.chunk_size / 2;
        if pending > self.data.len() - half_chunk {
            let grown = self.data.len() + half_chunk;
            self.data.resize(grown, 0);
        }

        self.fill(reader)
    }

    /// Decode the unresolved bytes, stopping before an incomplete trailing
    /// character while more input may still arrive
    pub fn window(&self) -> LexResult<Window<'_>> {
        let bytes = &self.data[self.cursor..self.fill_end];
        let saturated_by_size = self.cursor == 0 && self.fill_end == self.data.len();

        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(Window {
                text,
                complete: self.ended,
                saturated: self.ended || saturated_by_size,
            }),
            Err(err) => {
                let valid = err.valid_up_to();
                // A truncated character is only an error once input has ended
                let hard_stop = err.error_len().is_some() || self.ended;

                if valid == 0 && hard_stop {
                    return Err(LexerError::invalid_utf8(self.position));
                }

                let text = std::str::from_utf8(&bytes[..valid])
                    .map_err(|_| LexerError::invalid_utf8(self.position))?;

                Ok(Window {
                    text,
                    complete: hard_stop,
                    saturated: hard_stop || saturated_by_size,
                })
            }
        }
    }

    /// Consume `len` bytes of the window and return them as text
    pub fn consume(&mut self, len: usize) -> LexResult<String> {
        let end = self.cursor + len;
        let text = std::str::from_utf8(&self.data[self.cursor..end])
            .map_err(|_| LexerError::invalid_utf8(self.position))?
            .to_string();

        self.cursor = end;
        self.position = self.position.advance_str(&text);

        if self.is_grown() {
            self.shrink();
        }

        Ok(text)
    }

    /// Copy `len` bytes of the window without consuming them
    pub fn peek(&self, len: usize) -> LexResult<String> {
        std::str::from_utf8(&self.data[self.cursor..self.cursor + len])
            .map(str::to_string)
            .map_err(|_| LexerError::invalid_utf8(self.position))
    }

    fn compact(&mut self) {
        if self.cursor > 0 {
            self.data.copy_within(self.cursor..self.fill_end, 0);
            self.fill_end -= self.cursor;
            self.cursor = 0;
        }
    }

    /// Return to the nominal capacity, keeping any unconsumed remainder
    fn shrink(&mut self) {
        self.compact();
        let target = self.chunk_size.max(self.fill_end);
        self.data.truncate(target);
        self.data.shrink_to_fit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Cursor;

    /// Reader that returns at most `step` bytes per call
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
        interrupted: bool,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::new(ErrorKind::Interrupted, "retry"));
            }
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_fill_reads_until_full() {
        let mut reader = Trickle {
            data: b"abcdefgh",
            step: 1,
            interrupted: false,
        };
        let mut buffer = BufferState::new(4);

        assert_eq!(buffer.fill(&mut reader).unwrap(), 4);
        assert!(!buffer.is_ended());
        assert_eq!(buffer.window().unwrap().text, "abcd");
        assert!(buffer.window().unwrap().saturated);
    }

    #[test]
    fn test_end_of_input() {
        let mut reader = Cursor::new(b"ab".to_vec());
        let mut buffer = BufferState::new(8);
        buffer.fill(&mut reader).unwrap();

        let window = buffer.window().unwrap();
        assert_eq!(window.text, "ab");
        assert!(window.complete);

        buffer.consume(2).unwrap();
        assert!(buffer.at_end());
    }

    #[test]
    fn test_refill_grows_by_half_chunk_and_shrinks_back() {
        let mut reader = Cursor::new(b"aaaaaaaaaa".to_vec());
        let mut buffer = BufferState::new(4);
        buffer.fill(&mut reader).unwrap();

        buffer.refill(&mut reader, 64).unwrap();
        assert_eq!(buffer.capacity(), 6);
        assert_eq!(buffer.pending(), 6);

        buffer.consume(6).unwrap();
        assert_eq!(buffer.capacity(), 4);
        assert_eq!(buffer.position().offset, 6);
    }

    #[test]
    fn test_refill_compacts_without_growing() {
        let mut reader = Cursor::new(b"ab cdef".to_vec());
        let mut buffer = BufferState::new(4);
        buffer.fill(&mut reader).unwrap();
        buffer.consume(3).unwrap();

        buffer.refill(&mut reader, 64).unwrap();
        assert_eq!(buffer.capacity(), 4);
        assert_eq!(buffer.window().unwrap().text, "cdef");
    }

    #[test]
    fn test_incomplete_character_is_held_back() {
        let mut reader = Cursor::new("aé".as_bytes().to_vec());
        let mut buffer = BufferState::new(2);
        buffer.fill(&mut reader).unwrap();

        let window = buffer.window().unwrap();
        assert_eq!(window.text, "a");
        assert!(!window.complete);

        buffer.consume(1).unwrap();
        buffer.refill(&mut reader, 64).unwrap();
        assert_eq!(buffer.window().unwrap().text, "é");
    }

    #[test]
    fn test_invalid_utf8() {
        let mut reader = Cursor::new(vec![b'a', 0xff, b'b']);
        let mut buffer = BufferState::new(8);
        buffer.fill(&mut reader).unwrap();

        let window = buffer.window().unwrap();
        assert_eq!(window.text, "a");
        assert!(window.complete);

        buffer.consume(1).unwrap();
        assert_matches!(
            buffer.window(),
            Err(LexerError::InvalidUtf8 { offset: 1, .. })
        );
    }

    #[test]
    fn test_token_too_long() {
        let mut reader = Cursor::new(b"aaaaaaaa".to_vec());
        let mut buffer = BufferState::new(4);
        buffer.fill(&mut reader).unwrap();

        assert_matches!(
            buffer.refill(&mut reader, 3),
            Err(LexerError::TokenTooLong { length: 4, limit: 3, .. })
        );
    }
}
