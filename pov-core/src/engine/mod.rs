//! Protocol engines
//!
//! An engine takes one received line, decides what it means for this unit
//! and produces the reply line, if any. Engines never block and never touch
//! the link directly.

pub mod controller;
pub mod correlate;
pub mod rotor;

pub use controller::ControllerEngine;
pub use correlate::{RequestKind, ResponseCorrelator, ResponseHandler, MAX_PENDING};
pub use rotor::RotorEngine;

use pov_protocol::{Envelope, Line, Message, ProtocolError, Status};

/// An encoded reply line
///
/// Replies echo the sender and the command word, so they get the same room
/// as a received line.
pub type Reply = Line;

/// Errors that stop a line from being handled at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineError {
    /// Header incomplete, nobody to answer
    Dropped(ProtocolError),
    /// Reply could not be encoded
    Reply(ProtocolError),
}

/// What handling a line did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// `display` applied to the frame
    FrameUpdated { slots: u16 },
    /// `lock` accepted, frame cleared
    Locked { token: u8 },
    /// `unlock` token matched
    Unlocked { token: u8 },
    /// `unlock` token did not match
    UnlockRejected { token: u8 },
    /// Keepalive or reserved no-op
    Test,
    /// Arguments failed validation, answered with `error`
    Malformed(ProtocolError),
    /// Command word not understood, answered with `error`
    UnknownCommand,
    /// Command is valid but not accepted by this unit, answered with `error`
    NotAccepted,
    /// `response` matched an outstanding request
    Response { request: RequestKind, status: Status },
    /// `response` with no matching request
    UnexpectedResponse { status: Status },
    /// Receiver field names another unit, answered with `error`
    NotForUs,
}

/// Result of handling one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handled {
    pub event: Event,
    /// Line to send back to the peer
    pub reply: Option<Reply>,
}

impl Handled {
    fn silent(event: Event) -> Self {
        Self { event, reply: None }
    }
}

/// Split a line, dropping it when the header is incomplete
fn open_envelope(line: &str) -> Result<Envelope<'_>, EngineError> {
    Envelope::parse(line).map_err(EngineError::Dropped)
}

/// Encode the response to `envelope`
///
/// Called before any state changes so a reply that does not fit leaves the
/// unit untouched.
fn encode_reply(
    address: &str,
    envelope: &Envelope<'_>,
    status: Status,
) -> Result<Reply, EngineError> {
    Message::response(address, envelope.sender, envelope.word, status)
        .encode()
        .map_err(EngineError::Reply)
}

/// Answer `envelope` with `status`
fn respond(
    address: &str,
    envelope: &Envelope<'_>,
    status: Status,
    event: Event,
) -> Result<Handled, EngineError> {
    let reply = encode_reply(address, envelope, status)?;
    Ok(Handled {
        event,
        reply: Some(reply),
    })
}

/// Answer a line that cannot be acted on
///
/// Requests get an `error` response; a `response` or `test` is never
/// answered.
fn reject(address: &str, envelope: &Envelope<'_>, event: Event) -> Result<Handled, EngineError> {
    if envelope.word.expects_response() {
        respond(address, envelope, Status::Error, event)
    } else {
        Ok(Handled::silent(event))
    }
}

/// Request kind of an encoded outgoing line, if it expects a response
pub fn outgoing_request(line: &str) -> Option<RequestKind> {
    Envelope::parse(line)
        .ok()
        .and_then(|envelope| RequestKind::from_word(envelope.word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outgoing_request() {
        assert_eq!(
            outgoing_request("a,b,display,0,1\n"),
            Some(RequestKind::Display)
        );
        assert_eq!(outgoing_request("a,b,test\n"), None);
        assert_eq!(outgoing_request("garbage"), None);
    }
}
