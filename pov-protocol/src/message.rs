//! Message types for the POV link
//!
//! A line is decoded in two steps. [`Envelope::parse`] splits off the
//! positional header (sender, receiver, command word) and only fails when the
//! header itself is incomplete. [`Envelope::command`] then validates the
//! command-specific arguments. Keeping the steps apart lets a receiver answer
//! a malformed request with an `error` response addressed to its sender.

use core::fmt::{self, Write};

use heapless::String;

use crate::status::Status;

/// Number of angular slots in one revolution
pub const SLOT_COUNT: usize = 120;

/// Largest mask a slot can carry (one bit per output line)
pub const MAX_MASK: u32 = 0x00FF_FFFF;

/// Lock tokens are reduced modulo this value
pub const LOCK_TOKEN_MODULUS: u8 = 37;

// Command words
const CMD_DISPLAY: &str = "display";
const CMD_LOCK: &str = "lock";
const CMD_UNLOCK: &str = "unlock";
const CMD_TEST: &str = "test";
const CMD_RESPONSE: &str = "response";

/// Errors that can occur while decoding or encoding a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Line lacks the sender, receiver or command field
    TooFewFields,
    /// A required argument is missing
    MissingField,
    /// A decimal field did not parse
    InvalidNumber,
    /// Slot index outside `0..SLOT_COUNT`
    InvalidSlot,
    /// Mask is not hexadecimal or exceeds 24 bits
    InvalidMask,
    /// `display` ended with a slot index but no mask
    UnpairedField,
    /// Lock token outside `0..LOCK_TOKEN_MODULUS`
    InvalidToken,
    /// Unknown status word in a `response`
    InvalidStatus,
    /// Address is empty or contains a separator
    InvalidAddress,
    /// Encoded line does not fit the output buffer
    BufferTooSmall,
}

fn is_separator(c: char) -> bool {
    matches!(c, ',' | '\n' | '\r')
}

/// Iterator over the non-empty fields of a line
///
/// Consecutive separators collapse, so `a,,b` yields `a` then `b`.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    rest: &'a str,
}

impl<'a> Fields<'a> {
    fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl<'a> Iterator for Fields<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        while !self.rest.is_empty() {
            let end = self.rest.find(is_separator).unwrap_or(self.rest.len());
            let field = &self.rest[..end];
            // Separators are single-byte ASCII
            self.rest = if end < self.rest.len() {
                &self.rest[end + 1..]
            } else {
                ""
            };
            if !field.is_empty() {
                return Some(field);
            }
        }
        None
    }
}

/// The command word of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandWord<'a> {
    Display,
    Lock,
    Unlock,
    Test,
    Response,
    /// Any word this protocol version does not define
    Other(&'a str),
}

impl<'a> CommandWord<'a> {
    /// Classify a command word
    pub fn from_word(word: &'a str) -> Self {
        match word {
            CMD_DISPLAY => CommandWord::Display,
            CMD_LOCK => CommandWord::Lock,
            CMD_UNLOCK => CommandWord::Unlock,
            CMD_TEST => CommandWord::Test,
            CMD_RESPONSE => CommandWord::Response,
            other => CommandWord::Other(other),
        }
    }

    /// Convert to wire format word
    pub fn as_str(&self) -> &'a str {
        match *self {
            CommandWord::Display => CMD_DISPLAY,
            CommandWord::Lock => CMD_LOCK,
            CommandWord::Unlock => CMD_UNLOCK,
            CommandWord::Test => CMD_TEST,
            CommandWord::Response => CMD_RESPONSE,
            CommandWord::Other(word) => word,
        }
    }

    /// Returns true if a receiver must answer this command
    pub fn expects_response(&self) -> bool {
        !matches!(self, CommandWord::Test | CommandWord::Response)
    }
}

/// One slot assignment carried by a `display` message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlotUpdate {
    /// Slot index (0-119)
    pub index: u8,
    /// Output line mask (24 bits)
    pub mask: u32,
}

impl SlotUpdate {
    /// Decode a `<slot>,<HEXMASK>` pair
    pub fn parse(index: &str, mask: &str) -> Result<Self, ProtocolError> {
        let index: u16 = index.parse().map_err(|_| ProtocolError::InvalidNumber)?;
        if index as usize >= SLOT_COUNT {
            return Err(ProtocolError::InvalidSlot);
        }

        let mask = u32::from_str_radix(mask, 16).map_err(|_| ProtocolError::InvalidMask)?;
        if mask > MAX_MASK {
            return Err(ProtocolError::InvalidMask);
        }

        Ok(Self {
            index: index as u8,
            mask,
        })
    }
}

/// Validated arguments of a `display` message
///
/// Pairs are decoded lazily by [`iter`](Self::iter) in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayArgs<'a> {
    args: &'a str,
    pairs: usize,
}

impl<'a> DisplayArgs<'a> {
    /// Validate every pair up front so that applying them cannot fail halfway
    pub fn parse(args: &'a str) -> Result<Self, ProtocolError> {
        let mut fields = Fields::new(args);
        let mut pairs = 0;

        while let Some(index) = fields.next() {
            let mask = fields.next().ok_or(ProtocolError::UnpairedField)?;
            SlotUpdate::parse(index, mask)?;
            pairs += 1;
        }

        Ok(Self { args, pairs })
    }

    /// Number of slot updates
    pub fn len(&self) -> usize {
        self.pairs
    }

    /// Returns true if the message carries no slot updates
    pub fn is_empty(&self) -> bool {
        self.pairs == 0
    }

    /// Iterate over the slot updates in the order they were sent
    pub fn iter(&self) -> SlotUpdates<'a> {
        SlotUpdates {
            fields: Fields::new(self.args),
        }
    }
}

/// Iterator over the slot updates of a [`DisplayArgs`]
#[derive(Debug, Clone)]
pub struct SlotUpdates<'a> {
    fields: Fields<'a>,
}

impl<'a> Iterator for SlotUpdates<'a> {
    type Item = SlotUpdate;

    fn next(&mut self) -> Option<SlotUpdate> {
        let index = self.fields.next()?;
        let mask = self.fields.next()?;
        // Validated by DisplayArgs::parse
        SlotUpdate::parse(index, mask).ok()
    }
}

/// Decoded command with its arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    /// Assign masks to slots
    Display(DisplayArgs<'a>),
    /// Clear the frame and remember the token
    Lock { token: u8 },
    /// Release the lock if the token matches
    Unlock { token: u8 },
    /// Reserved no-op (also used as keepalive)
    Test,
    /// Reply to an earlier request
    Response {
        request: CommandWord<'a>,
        status: Status,
    },
    /// Command word not defined by this protocol
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    /// The command word this command is sent with
    pub fn word(&self) -> CommandWord<'a> {
        match *self {
            Command::Display(_) => CommandWord::Display,
            Command::Lock { .. } => CommandWord::Lock,
            Command::Unlock { .. } => CommandWord::Unlock,
            Command::Test => CommandWord::Test,
            Command::Response { .. } => CommandWord::Response,
            Command::Unknown(word) => CommandWord::Other(word),
        }
    }
}

fn parse_token(field: Option<&str>) -> Result<u8, ProtocolError> {
    let field = field.ok_or(ProtocolError::MissingField)?;
    let token: u16 = field.parse().map_err(|_| ProtocolError::InvalidNumber)?;
    if token >= LOCK_TOKEN_MODULUS as u16 {
        return Err(ProtocolError::InvalidToken);
    }
    Ok(token as u8)
}

/// Positional header of a message plus its undecoded arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Envelope<'a> {
    /// Address of the unit that sent the message
    pub sender: &'a str,
    /// Address of the unit the message is meant for
    pub receiver: &'a str,
    /// Command word
    pub word: CommandWord<'a>,
    args: &'a str,
}

impl<'a> Envelope<'a> {
    /// Split a line into header and arguments
    pub fn parse(line: &'a str) -> Result<Self, ProtocolError> {
        let mut fields = Fields::new(line);
        let sender = fields.next().ok_or(ProtocolError::TooFewFields)?;
        let receiver = fields.next().ok_or(ProtocolError::TooFewFields)?;
        let word = fields.next().ok_or(ProtocolError::TooFewFields)?;

        Ok(Self {
            sender,
            receiver,
            word: CommandWord::from_word(word),
            args: fields.rest,
        })
    }

    /// Decode and validate the command arguments
    pub fn command(&self) -> Result<Command<'a>, ProtocolError> {
        let mut args = Fields::new(self.args);

        match self.word {
            CommandWord::Display => DisplayArgs::parse(self.args).map(Command::Display),
            CommandWord::Lock => Ok(Command::Lock {
                token: parse_token(args.next())?,
            }),
            CommandWord::Unlock => Ok(Command::Unlock {
                token: parse_token(args.next())?,
            }),
            CommandWord::Test => Ok(Command::Test),
            CommandWord::Response => {
                let request = args.next().ok_or(ProtocolError::MissingField)?;
                let status = args.next().ok_or(ProtocolError::MissingField)?;
                Ok(Command::Response {
                    request: CommandWord::from_word(request),
                    status: Status::from_word(status).ok_or(ProtocolError::InvalidStatus)?,
                })
            }
            CommandWord::Other(word) => Ok(Command::Unknown(word)),
        }
    }
}

/// A fully decoded message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Message<'a> {
    pub sender: &'a str,
    pub receiver: &'a str,
    pub command: Command<'a>,
}

impl<'a> Message<'a> {
    /// Decode a line into a message
    pub fn parse(line: &'a str) -> Result<Self, ProtocolError> {
        let envelope = Envelope::parse(line)?;
        Ok(Self {
            sender: envelope.sender,
            receiver: envelope.receiver,
            command: envelope.command()?,
        })
    }

    /// Build a `lock` request
    pub fn lock(sender: &'a str, receiver: &'a str, token: u8) -> Self {
        Self {
            sender,
            receiver,
            command: Command::Lock { token },
        }
    }

    /// Build an `unlock` request
    pub fn unlock(sender: &'a str, receiver: &'a str, token: u8) -> Self {
        Self {
            sender,
            receiver,
            command: Command::Unlock { token },
        }
    }

    /// Build a `test` message
    pub fn test(sender: &'a str, receiver: &'a str) -> Self {
        Self {
            sender,
            receiver,
            command: Command::Test,
        }
    }

    /// Build a `response` to a request
    pub fn response(
        sender: &'a str,
        receiver: &'a str,
        request: CommandWord<'a>,
        status: Status,
    ) -> Self {
        Self {
            sender,
            receiver,
            command: Command::Response { request, status },
        }
    }

    /// Encode this message into a newline-terminated line
    pub fn encode<const N: usize>(&self) -> Result<String<N>, ProtocolError> {
        let mut writer = LineWriter::<N>::new(self.sender, self.receiver, self.command.word())?;

        match self.command {
            Command::Display(args) => {
                for update in args.iter() {
                    writer.slot(update)?;
                }
            }
            Command::Lock { token } | Command::Unlock { token } => writer.field(token)?,
            Command::Response { request, status } => {
                writer.field(request.as_str())?;
                writer.field(status.as_str())?;
            }
            Command::Test | Command::Unknown(_) => {}
        }

        writer.finish()
    }
}

/// Incremental encoder for outgoing lines
///
/// Used directly when the arguments are not already held in a
/// [`Message`], e.g. when serializing a composed frame.
#[derive(Debug, Clone)]
pub struct LineWriter<const N: usize> {
    line: String<N>,
}

fn check_address(address: &str) -> Result<(), ProtocolError> {
    if address.is_empty() || address.contains(is_separator) {
        return Err(ProtocolError::InvalidAddress);
    }
    Ok(())
}

impl<const N: usize> LineWriter<N> {
    /// Start a line with its header fields
    pub fn new(sender: &str, receiver: &str, word: CommandWord<'_>) -> Result<Self, ProtocolError> {
        check_address(sender)?;
        check_address(receiver)?;

        let mut line = String::new();
        write!(line, "{},{},{}", sender, receiver, word.as_str())
            .map_err(|_| ProtocolError::BufferTooSmall)?;
        Ok(Self { line })
    }

    /// Append one field
    pub fn field<T: fmt::Display>(&mut self, value: T) -> Result<(), ProtocolError> {
        write!(self.line, ",{}", value).map_err(|_| ProtocolError::BufferTooSmall)
    }

    /// Append a `<slot>,<HEXMASK>` pair
    pub fn slot(&mut self, update: SlotUpdate) -> Result<(), ProtocolError> {
        write!(self.line, ",{},{:X}", update.index, update.mask)
            .map_err(|_| ProtocolError::BufferTooSmall)
    }

    /// Terminate the line
    pub fn finish(mut self) -> Result<String<N>, ProtocolError> {
        self.line
            .push('\n')
            .map_err(|_| ProtocolError::BufferTooSmall)?;
        Ok(self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display() {
        let msg = Message::parse("10.0.0.1,10.0.0.2,display,0,800400,30,EC0400\n").unwrap();
        assert_eq!(msg.sender, "10.0.0.1");
        assert_eq!(msg.receiver, "10.0.0.2");

        let Command::Display(args) = msg.command else {
            panic!("expected display");
        };
        assert_eq!(args.len(), 2);

        let mut updates = args.iter();
        assert_eq!(
            updates.next(),
            Some(SlotUpdate {
                index: 0,
                mask: 0x800400
            })
        );
        assert_eq!(
            updates.next(),
            Some(SlotUpdate {
                index: 30,
                mask: 0xEC0400
            })
        );
        assert_eq!(updates.next(), None);
    }

    #[test]
    fn test_parse_display_lowercase_hex() {
        let msg = Message::parse("a,b,display,5,1fff").unwrap();
        let Command::Display(args) = msg.command else {
            panic!("expected display");
        };
        assert_eq!(args.iter().next().map(|u| u.mask), Some(0x1FFF));
    }

    #[test]
    fn test_parse_display_empty() {
        let msg = Message::parse("a,b,display\n").unwrap();
        let Command::Display(args) = msg.command else {
            panic!("expected display");
        };
        assert!(args.is_empty());
    }

    #[test]
    fn test_display_unpaired_field() {
        assert_eq!(
            Message::parse("a,b,display,1,FF,2\n"),
            Err(ProtocolError::UnpairedField)
        );
    }

    #[test]
    fn test_display_invalid_fields() {
        assert_eq!(
            Message::parse("a,b,display,120,FF"),
            Err(ProtocolError::InvalidSlot)
        );
        assert_eq!(
            Message::parse("a,b,display,x,FF"),
            Err(ProtocolError::InvalidNumber)
        );
        assert_eq!(
            Message::parse("a,b,display,1,GG"),
            Err(ProtocolError::InvalidMask)
        );
        assert_eq!(
            Message::parse("a,b,display,1,1000000"),
            Err(ProtocolError::InvalidMask)
        );
    }

    #[test]
    fn test_parse_lock_unlock() {
        let msg = Message::parse("10.0.0.1,10.0.0.2,lock,12\n").unwrap();
        assert_eq!(msg.command, Command::Lock { token: 12 });

        let msg = Message::parse("10.0.0.1,10.0.0.2,unlock,36").unwrap();
        assert_eq!(msg.command, Command::Unlock { token: 36 });
    }

    #[test]
    fn test_lock_token_errors() {
        assert_eq!(
            Message::parse("a,b,lock\n"),
            Err(ProtocolError::MissingField)
        );
        assert_eq!(
            Message::parse("a,b,lock,abc"),
            Err(ProtocolError::InvalidNumber)
        );
        assert_eq!(
            Message::parse("a,b,unlock,37"),
            Err(ProtocolError::InvalidToken)
        );
    }

    #[test]
    fn test_parse_response() {
        let msg = Message::parse("r,s,response,unlock,stillLOCKED\n").unwrap();
        assert_eq!(
            msg.command,
            Command::Response {
                request: CommandWord::Unlock,
                status: Status::StillLocked
            }
        );

        assert_eq!(
            Message::parse("r,s,response,unlock,maybe"),
            Err(ProtocolError::InvalidStatus)
        );
    }

    #[test]
    fn test_unknown_and_short() {
        let msg = Message::parse("a,b,reboot,now").unwrap();
        assert_eq!(msg.command, Command::Unknown("reboot"));
        assert_eq!(Message::parse("a,b"), Err(ProtocolError::TooFewFields));
        assert_eq!(Message::parse(""), Err(ProtocolError::TooFewFields));
    }

    #[test]
    fn test_empty_fields_collapse() {
        let msg = Message::parse("a,,b,,test,\n").unwrap();
        assert_eq!(msg.sender, "a");
        assert_eq!(msg.receiver, "b");
        assert_eq!(msg.command, Command::Test);
    }

    #[test]
    fn test_envelope_survives_bad_arguments() {
        let envelope = Envelope::parse("s,r,display,7").unwrap();
        assert_eq!(envelope.sender, "s");
        assert_eq!(envelope.word, CommandWord::Display);
        assert_eq!(envelope.command(), Err(ProtocolError::UnpairedField));
    }

    #[test]
    fn test_encode_response() {
        let msg = Message::response("10.0.0.2", "10.0.0.1", CommandWord::Lock, Status::Locked);
        let line: String<64> = msg.encode().unwrap();
        assert_eq!(line.as_str(), "10.0.0.2,10.0.0.1,response,lock,LOCKED\n");
    }

    #[test]
    fn test_encode_requests() {
        let line: String<64> = Message::lock("s", "r", 5).encode().unwrap();
        assert_eq!(line.as_str(), "s,r,lock,5\n");

        let line: String<64> = Message::test("s", "r").encode().unwrap();
        assert_eq!(line.as_str(), "s,r,test\n");
    }

    #[test]
    fn test_encode_display_reparses() {
        let msg = Message::parse("s,r,display,0,800400,119,800400").unwrap();
        let line: String<64> = msg.encode().unwrap();
        assert_eq!(line.as_str(), "s,r,display,0,800400,119,800400\n");
    }

    #[test]
    fn test_writer_rejects_bad_address() {
        assert_eq!(
            LineWriter::<32>::new("", "r", CommandWord::Test).err(),
            Some(ProtocolError::InvalidAddress)
        );
        assert_eq!(
            LineWriter::<32>::new("a,b", "r", CommandWord::Test).err(),
            Some(ProtocolError::InvalidAddress)
        );
    }

    #[test]
    fn test_writer_buffer_too_small() {
        let mut writer = LineWriter::<12>::new("s", "r", CommandWord::Display).unwrap();
        writer
            .slot(SlotUpdate {
                index: 1,
                mask: 0xFF,
            })
            .unwrap_err();
    }

    #[test]
    fn test_expects_response() {
        assert!(CommandWord::Display.expects_response());
        assert!(CommandWord::Other("x").expects_response());
        assert!(!CommandWord::Test.expects_response());
        assert!(!CommandWord::Response.expects_response());
    }
}
