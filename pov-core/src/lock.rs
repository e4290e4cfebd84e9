//! Display lock
//!
//! The static unit claims the rotor with a `lock` carrying a token derived
//! from its own address, and releases it with an `unlock` carrying the same
//! token. Only the rotor keeps lock state; it is the sole arbiter.

use pov_protocol::{Line, Message, ProtocolError, Status, LOCK_TOKEN_MODULUS};

/// Errors that can occur while deriving a lock token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockError {
    /// Address has an empty or non-numeric octet
    InvalidAddress,
}

/// Token identifying the lock holder, always below [`LOCK_TOKEN_MODULUS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LockToken(u8);

impl LockToken {
    /// Sum of the dotted octets of `address`, modulo 37
    pub fn from_address(address: &str) -> Result<Self, LockError> {
        let mut sum: u32 = 0;
        for octet in address.split('.') {
            let value: u8 = octet.parse().map_err(|_| LockError::InvalidAddress)?;
            sum += value as u32;
        }
        Ok(Self((sum % LOCK_TOKEN_MODULUS as u32) as u8))
    }

    /// Token as received on the wire
    pub fn from_wire(value: u8) -> Self {
        Self(value % LOCK_TOKEN_MODULUS)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Lock state held by the rotor
#[derive(Debug, Clone, Default)]
pub struct LockState {
    holder: Option<LockToken>,
}

impl LockState {
    pub fn new() -> Self {
        Self { holder: None }
    }

    /// Record the token of a new holder
    pub fn lock(&mut self, token: LockToken) {
        self.holder = Some(token);
    }

    /// Check an unlock request against the stored token
    ///
    /// A matching token is acknowledged with `UNLOCKED`; anything else,
    /// including an unlock before any lock, gets `stillLOCKED`. The stored
    /// token is kept in both cases.
    pub fn unlock(&self, token: LockToken) -> Status {
        if self.holder == Some(token) {
            Status::Unlocked
        } else {
            Status::StillLocked
        }
    }

    /// Token of the last lock, if any
    pub fn holder(&self) -> Option<LockToken> {
        self.holder
    }
}

/// Builds the lock and unlock requests sent by the static unit
#[derive(Debug, Clone, Copy)]
pub struct LockCoordinator<'a> {
    address: &'a str,
    peer: &'a str,
    token: LockToken,
}

impl<'a> LockCoordinator<'a> {
    /// Derive the token from our own address
    pub fn new(address: &'a str, peer: &'a str) -> Result<Self, LockError> {
        Ok(Self::with_token(address, peer, LockToken::from_address(address)?))
    }

    /// Use an explicit token
    pub fn with_token(address: &'a str, peer: &'a str, token: LockToken) -> Self {
        Self {
            address,
            peer,
            token,
        }
    }

    pub fn token(&self) -> LockToken {
        self.token
    }

    /// Encoded `lock` request
    pub fn lock_line(&self) -> Result<Line, ProtocolError> {
        Message::lock(self.address, self.peer, self.token.value()).encode()
    }

    /// Encoded `unlock` request
    pub fn unlock_line(&self) -> Result<Line, ProtocolError> {
        Message::unlock(self.address, self.peer, self.token.value()).encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_address() {
        // 192 + 168 + 1 + 10 = 371 = 10 * 37 + 1
        assert_eq!(LockToken::from_address("192.168.1.10").unwrap().value(), 1);
        assert_eq!(LockToken::from_address("10.0.0.2").unwrap().value(), 12);
        assert_eq!(LockToken::from_address("37").unwrap().value(), 0);
    }

    #[test]
    fn test_token_invalid_address() {
        assert_eq!(
            LockToken::from_address("192.168..1"),
            Err(LockError::InvalidAddress)
        );
        assert_eq!(
            LockToken::from_address("rotor.local"),
            Err(LockError::InvalidAddress)
        );
        assert_eq!(LockToken::from_address(""), Err(LockError::InvalidAddress));
    }

    #[test]
    fn test_unlock_match_and_mismatch() {
        let mut state = LockState::new();
        assert_eq!(state.unlock(LockToken::from_wire(5)), Status::StillLocked);

        state.lock(LockToken::from_wire(5));
        assert_eq!(state.unlock(LockToken::from_wire(6)), Status::StillLocked);
        assert_eq!(state.holder(), Some(LockToken::from_wire(5)));
        assert_eq!(state.unlock(LockToken::from_wire(5)), Status::Unlocked);
        assert_eq!(state.holder(), Some(LockToken::from_wire(5)));
    }

    #[test]
    fn test_coordinator_lines() {
        let coordinator = LockCoordinator::new("10.0.0.1", "10.0.0.2").unwrap();
        assert_eq!(coordinator.token().value(), 11);
        assert_eq!(
            coordinator.lock_line().unwrap().as_str(),
            "10.0.0.1,10.0.0.2,lock,11\n"
        );
        assert_eq!(
            coordinator.unlock_line().unwrap().as_str(),
            "10.0.0.1,10.0.0.2,unlock,11\n"
        );
    }
}
