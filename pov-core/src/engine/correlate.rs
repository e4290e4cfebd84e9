//! Request/response correlation on the static unit

use heapless::Deque;
use pov_protocol::{CommandWord, Status};

/// Requests remembered while waiting for their response
pub const MAX_PENDING: usize = 8;

/// Requests the static unit sends that expect a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestKind {
    Display,
    Lock,
    Unlock,
}

impl RequestKind {
    pub fn from_word(word: CommandWord<'_>) -> Option<Self> {
        match word {
            CommandWord::Display => Some(RequestKind::Display),
            CommandWord::Lock => Some(RequestKind::Lock),
            CommandWord::Unlock => Some(RequestKind::Unlock),
            _ => None,
        }
    }
}

/// Receives responses once they are matched to a request
///
/// This is where an integrator hooks in retries or user feedback. Both
/// methods default to doing nothing.
pub trait ResponseHandler {
    /// A response matched the oldest outstanding request of its kind
    fn on_response(&mut self, request: RequestKind, status: Status) {
        let _ = (request, status);
    }

    /// A response arrived that matches no outstanding request
    fn on_unexpected(&mut self, request: CommandWord<'_>, status: Status) {
        let _ = (request, status);
    }
}

/// FIFO of outstanding requests
#[derive(Debug, Clone, Default)]
pub struct ResponseCorrelator {
    pending: Deque<RequestKind, MAX_PENDING>,
    expired: u32,
}

impl ResponseCorrelator {
    pub fn new() -> Self {
        Self {
            pending: Deque::new(),
            expired: 0,
        }
    }

    /// Remember a request that was just sent
    ///
    /// When the queue is full the oldest request is given up on.
    pub fn record(&mut self, kind: RequestKind) {
        if self.pending.is_full() {
            self.pending.pop_front();
            self.expired = self.expired.saturating_add(1);
        }
        // Space was made above
        let _ = self.pending.push_back(kind);
    }

    /// Match a response against the oldest request with the same word
    ///
    /// Returns the matched request kind and hands the result to `handler`.
    pub fn resolve<H: ResponseHandler>(
        &mut self,
        request: CommandWord<'_>,
        status: Status,
        handler: &mut H,
    ) -> Option<RequestKind> {
        let matched = RequestKind::from_word(request).filter(|kind| self.take(*kind));
        match matched {
            Some(kind) => handler.on_response(kind, status),
            None => handler.on_unexpected(request, status),
        }
        matched
    }

    /// Remove the oldest pending `kind`, keeping the order of the rest
    fn take(&mut self, kind: RequestKind) -> bool {
        let mut found = false;
        for _ in 0..self.pending.len() {
            let Some(entry) = self.pending.pop_front() else {
                break;
            };
            if !found && entry == kind {
                found = true;
                continue;
            }
            let _ = self.pending.push_back(entry);
        }
        found
    }

    /// Requests still waiting for a response
    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }

    /// Requests dropped because the queue was full
    pub fn expired(&self) -> u32 {
        self.expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log {
        matched: heapless::Vec<(RequestKind, Status), 8>,
        unexpected: u8,
    }

    impl ResponseHandler for Log {
        fn on_response(&mut self, request: RequestKind, status: Status) {
            let _ = self.matched.push((request, status));
        }

        fn on_unexpected(&mut self, _request: CommandWord<'_>, _status: Status) {
            self.unexpected += 1;
        }
    }

    #[test]
    fn test_match_in_order() {
        let mut correlator = ResponseCorrelator::new();
        let mut log = Log::default();

        correlator.record(RequestKind::Lock);
        correlator.record(RequestKind::Display);
        assert_eq!(correlator.outstanding(), 2);

        assert_eq!(
            correlator.resolve(CommandWord::Display, Status::Ok, &mut log),
            Some(RequestKind::Display)
        );
        assert_eq!(
            correlator.resolve(CommandWord::Lock, Status::Locked, &mut log),
            Some(RequestKind::Lock)
        );
        assert_eq!(correlator.outstanding(), 0);
        assert_eq!(log.matched.len(), 2);
        assert_eq!(log.matched[1], (RequestKind::Lock, Status::Locked));
    }

    #[test]
    fn test_only_answered_words_are_requests() {
        assert_eq!(
            RequestKind::from_word(CommandWord::Unlock),
            Some(RequestKind::Unlock)
        );
        assert_eq!(RequestKind::from_word(CommandWord::Test), None);
        assert_eq!(RequestKind::from_word(CommandWord::Response), None);
    }

    #[test]
    fn test_unexpected_response() {
        let mut correlator = ResponseCorrelator::new();
        let mut log = Log::default();

        assert_eq!(
            correlator.resolve(CommandWord::Unlock, Status::Unlocked, &mut log),
            None
        );
        assert_eq!(
            correlator.resolve(CommandWord::Other("reboot"), Status::Error, &mut log),
            None
        );
        assert_eq!(log.unexpected, 2);
    }

    #[test]
    fn test_full_queue_expires_oldest() {
        let mut correlator = ResponseCorrelator::new();
        correlator.record(RequestKind::Lock);
        for _ in 0..MAX_PENDING {
            correlator.record(RequestKind::Display);
        }
        assert_eq!(correlator.outstanding(), MAX_PENDING);
        assert_eq!(correlator.expired(), 1);

        let mut log = Log::default();
        assert_eq!(
            correlator.resolve(CommandWord::Lock, Status::Locked, &mut log),
            None
        );
    }
}
