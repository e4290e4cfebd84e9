//! POV Clock Link Protocol
//!
//! This crate defines the text protocol spoken between the static unit
//! (clock face, motor control) and the rotor unit (LED display) of the
//! persistence-of-vision clock.
//!
//! # Protocol Overview
//!
//! Every message is a single ASCII line of comma-separated fields:
//! ```text
//! <sender>,<receiver>,<command>[,<field>]*\n
//! ```
//!
//! | command    | fields                         | reply status               |
//! |------------|--------------------------------|----------------------------|
//! | `display`  | `(<slot>,<HEXMASK>)*`          | `ok`                       |
//! | `lock`     | `<token>`                      | `LOCKED`                   |
//! | `unlock`   | `<token>`                      | `UNLOCKED` / `stillLOCKED` |
//! | `test`     | -                              | none                       |
//! | `response` | `<command>,<status>`           | -                          |
//!
//! Anything the receiver cannot act on is answered with the `error` status.

#![no_std]
#![deny(unsafe_code)]

pub mod line;
pub mod message;
pub mod status;

pub use line::{Line, LineError, LineParser, MAX_LINE_LEN};
pub use message::{
    Command, CommandWord, DisplayArgs, Envelope, LineWriter, Message, ProtocolError, SlotUpdate,
    SlotUpdates, LOCK_TOKEN_MODULUS, MAX_MASK, SLOT_COUNT,
};
pub use status::Status;
