//! Status words carried by `response` messages

/// Outcome reported in the last field of a `response`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// `display` applied
    Ok,
    /// `lock` accepted, frame cleared
    Locked,
    /// `unlock` token matched
    Unlocked,
    /// `unlock` token did not match the stored one
    StillLocked,
    /// Request was malformed or not understood
    Error,
}

// Wire format values
const STATUS_OK: &str = "ok";
const STATUS_LOCKED: &str = "LOCKED";
const STATUS_UNLOCKED: &str = "UNLOCKED";
const STATUS_STILL_LOCKED: &str = "stillLOCKED";
const STATUS_ERROR: &str = "error";

impl Status {
    /// Parse a status from its wire format word
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            STATUS_OK => Some(Status::Ok),
            STATUS_LOCKED => Some(Status::Locked),
            STATUS_UNLOCKED => Some(Status::Unlocked),
            STATUS_STILL_LOCKED => Some(Status::StillLocked),
            STATUS_ERROR => Some(Status::Error),
            _ => None,
        }
    }

    /// Convert to wire format word
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => STATUS_OK,
            Status::Locked => STATUS_LOCKED,
            Status::Unlocked => STATUS_UNLOCKED,
            Status::StillLocked => STATUS_STILL_LOCKED,
            Status::Error => STATUS_ERROR,
        }
    }

    /// Returns true if the peer rejected the request
    pub fn is_rejection(self) -> bool {
        matches!(self, Status::StillLocked | Status::Error)
    }
}
