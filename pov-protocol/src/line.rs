//! Line framing for the POV link.
//!
//! Messages are ASCII lines terminated by `\n`. A trailing `\r` is dropped so
//! either unit can be driven from a serial terminal during bring-up.

use heapless::Vec;

/// Maximum line length in bytes, excluding the terminator
pub const MAX_LINE_LEN: usize = 2048;

/// An owned, encoded line ready for transmission
pub type Line = heapless::String<MAX_LINE_LEN>;

/// Errors that can occur while assembling a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded [`MAX_LINE_LEN`]; input is skipped up to the next newline
    Overflow,
    /// Line is not valid UTF-8
    InvalidUtf8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Appending bytes to the current line
    Collecting,
    /// Dropping the tail of an oversized line
    Discarding,
    /// A complete line sits in the buffer
    Complete,
}

/// Byte-at-a-time line assembler
///
/// Feed received bytes with [`feed`](Self::feed); when it returns `Ok(true)`
/// the finished line is available from [`line`](Self::line) until the next
/// byte is fed.
#[derive(Debug, Clone)]
pub struct LineParser {
    buffer: Vec<u8, MAX_LINE_LEN>,
    state: ParseState,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    /// Create a new line parser
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            state: ParseState::Collecting,
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.state = ParseState::Collecting;
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(true)` when a complete non-empty line is ready,
    /// `Ok(false)` when more bytes are needed, or `Err` when the current line
    /// had to be dropped.
    pub fn feed(&mut self, byte: u8) -> Result<bool, LineError> {
        if self.state == ParseState::Complete {
            self.reset();
        }

        if self.state == ParseState::Discarding {
            if byte == b'\n' {
                self.state = ParseState::Collecting;
            }
            return Ok(false);
        }

        if byte != b'\n' {
            if self.buffer.push(byte).is_err() {
                self.buffer.clear();
                self.state = ParseState::Discarding;
                return Err(LineError::Overflow);
            }
            return Ok(false);
        }

        if self.buffer.last() == Some(&b'\r') {
            self.buffer.pop();
        }
        if self.buffer.is_empty() {
            return Ok(false);
        }

        if core::str::from_utf8(&self.buffer).is_err() {
            self.buffer.clear();
            return Err(LineError::InvalidUtf8);
        }

        self.state = ParseState::Complete;
        Ok(true)
    }

    /// The most recently completed line, or `""` if none is pending
    pub fn line(&self) -> &str {
        if self.state != ParseState::Complete {
            return "";
        }
        // Validated in `feed`
        core::str::from_utf8(&self.buffer).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(parser: &mut LineParser, bytes: &[u8]) -> Result<bool, LineError> {
        let mut done = false;
        for &b in bytes {
            done = parser.feed(b)?;
        }
        Ok(done)
    }

    #[test]
    fn test_single_line() {
        let mut parser = LineParser::new();
        assert_eq!(feed_all(&mut parser, b"a,b,test\n"), Ok(true));
        assert_eq!(parser.line(), "a,b,test");
    }

    #[test]
    fn test_line_cleared_after_next_byte() {
        let mut parser = LineParser::new();
        feed_all(&mut parser, b"a,b,test\n").unwrap();
        assert_eq!(parser.feed(b'x'), Ok(false));
        assert_eq!(parser.line(), "");
        assert_eq!(feed_all(&mut parser, b",y,lock,3\n"), Ok(true));
        assert_eq!(parser.line(), "x,y,lock,3");
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let mut parser = LineParser::new();
        assert_eq!(feed_all(&mut parser, b"\r\n\n"), Ok(false));
        assert_eq!(feed_all(&mut parser, b"a,b,test\r\n"), Ok(true));
        assert_eq!(parser.line(), "a,b,test");
    }

    #[test]
    fn test_overflow_discards_until_newline() {
        let mut parser = LineParser::new();
        let mut overflowed = false;
        for _ in 0..MAX_LINE_LEN + 10 {
            if parser.feed(b'x') == Err(LineError::Overflow) {
                overflowed = true;
            }
        }
        assert!(overflowed);

        // Rest of the oversized line is swallowed, the next one survives
        assert_eq!(feed_all(&mut parser, b"tail\n"), Ok(false));
        assert_eq!(feed_all(&mut parser, b"a,b,test\n"), Ok(true));
        assert_eq!(parser.line(), "a,b,test");
    }

    #[test]
    fn test_invalid_utf8() {
        let mut parser = LineParser::new();
        assert_eq!(
            feed_all(&mut parser, &[0xFF, 0xFE, b'\n']),
            Err(LineError::InvalidUtf8)
        );
        assert_eq!(feed_all(&mut parser, b"ok\n"), Ok(true));
        assert_eq!(parser.line(), "ok");
    }
}
