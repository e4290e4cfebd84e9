//! Rotor side dispatch

use pov_protocol::{Command, Status};

use super::{encode_reply, open_envelope, reject, respond, EngineError, Event, Handled};
use crate::frame::FrameBuffer;
use crate::lock::{LockState, LockToken};

/// Handles requests from the static unit
///
/// Owns the lock state; the frame buffer is shared with the display loop.
pub struct RotorEngine<'a> {
    address: &'a str,
    frame: &'a FrameBuffer,
    lock: LockState,
}

impl<'a> RotorEngine<'a> {
    pub fn new(address: &'a str, frame: &'a FrameBuffer) -> Self {
        Self {
            address,
            frame,
            lock: LockState::new(),
        }
    }

    /// Current lock state
    pub fn lock_state(&self) -> &LockState {
        &self.lock
    }

    /// Handle one received line
    pub fn handle(&mut self, line: &str) -> Result<Handled, EngineError> {
        let envelope = open_envelope(line)?;
        if envelope.receiver != self.address {
            return reject(self.address, &envelope, Event::NotForUs);
        }

        let command = match envelope.command() {
            Ok(command) => command,
            Err(e) => return reject(self.address, &envelope, Event::Malformed(e)),
        };

        match command {
            Command::Display(args) => {
                let reply = encode_reply(self.address, &envelope, Status::Ok)?;
                let slots = self.frame.apply(args.iter()) as u16;
                Ok(Handled {
                    event: Event::FrameUpdated { slots },
                    reply: Some(reply),
                })
            }
            Command::Lock { token } => {
                let token = LockToken::from_wire(token);
                let reply = encode_reply(self.address, &envelope, Status::Locked)?;
                self.frame.clear();
                self.lock.lock(token);
                Ok(Handled {
                    event: Event::Locked {
                        token: token.value(),
                    },
                    reply: Some(reply),
                })
            }
            Command::Unlock { token } => {
                let token = LockToken::from_wire(token);
                let status = self.lock.unlock(token);
                let event = if status == Status::Unlocked {
                    Event::Unlocked {
                        token: token.value(),
                    }
                } else {
                    Event::UnlockRejected {
                        token: token.value(),
                    }
                };
                respond(self.address, &envelope, status, event)
            }
            Command::Test => Ok(Handled::silent(Event::Test)),
            Command::Response { status, .. } => {
                Ok(Handled::silent(Event::UnexpectedResponse { status }))
            }
            Command::Unknown(_) => respond(
                self.address,
                &envelope,
                Status::Error,
                Event::UnknownCommand,
            ),
        }
    }
}
