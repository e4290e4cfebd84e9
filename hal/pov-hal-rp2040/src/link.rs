//! Serial link framing
//!
//! Both units talk over a UART. Received bytes are assembled into lines by
//! [`LineParser`]; outgoing lines are written whole.

use embedded_io_async::{Read, Write};
use pov_protocol::{LineError, LineParser};

/// Bytes pulled from the UART per read
const RX_CHUNK: usize = 64;

/// Errors that can occur on the link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// UART read failed (framing, parity, overrun or break)
    Read,
    /// UART write failed
    Write,
    /// Received line was dropped
    Line(LineError),
}

/// Reads newline-terminated lines from an async byte stream
///
/// Cancelling [`read_line`](Self::read_line) loses no data: bytes already
/// pulled from the UART stay buffered here.
pub struct LineReader<R> {
    rx: R,
    parser: LineParser,
    buf: [u8; RX_CHUNK],
    pos: usize,
    len: usize,
}

impl<R: Read> LineReader<R> {
    pub fn new(rx: R) -> Self {
        Self {
            rx,
            parser: LineParser::new(),
            buf: [0; RX_CHUNK],
            pos: 0,
            len: 0,
        }
    }

    /// Wait for the next complete line
    ///
    /// The line is valid until the next call.
    pub async fn read_line(&mut self) -> Result<&str, LinkError> {
        loop {
            while self.pos < self.len {
                let byte = self.buf[self.pos];
                self.pos += 1;
                if self.parser.feed(byte).map_err(LinkError::Line)? {
                    return Ok(self.parser.line());
                }
            }

            self.len = self.rx.read(&mut self.buf).await.map_err(|_| LinkError::Read)?;
            self.pos = 0;
        }
    }
}

/// Write a complete line
pub async fn write_line<W: Write>(tx: &mut W, line: &str) -> Result<(), LinkError> {
    tx.write_all(line.as_bytes())
        .await
        .map_err(|_| LinkError::Write)
}
