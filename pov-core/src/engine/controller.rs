//! Static unit dispatch

use pov_protocol::{Command, Status};

use super::correlate::{RequestKind, ResponseCorrelator, ResponseHandler};
use super::{open_envelope, reject, respond, EngineError, Event, Handled};

/// Handles traffic arriving at the static unit
///
/// The static unit only sends requests, so anything other than `response`
/// and `test` is answered with `error`.
pub struct ControllerEngine<'a, H> {
    address: &'a str,
    correlator: ResponseCorrelator,
    handler: H,
}

impl<'a, H: ResponseHandler> ControllerEngine<'a, H> {
    pub fn new(address: &'a str, handler: H) -> Self {
        Self {
            address,
            correlator: ResponseCorrelator::new(),
            handler,
        }
    }

    /// Note a request that was just written to the link
    pub fn request_sent(&mut self, kind: RequestKind) {
        self.correlator.record(kind);
    }

    /// Requests still waiting for a response
    pub fn outstanding(&self) -> usize {
        self.correlator.outstanding()
    }

    pub fn handler(&self) -> &H {
        &self.handler
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
            Command::Response { request, status } => {
                let event = match self.correlator.resolve(request, status, &mut self.handler) {
                    Some(request) => Event::Response { request, status },
                    None => Event::UnexpectedResponse { status },
                };
                Ok(Handled::silent(event))
            }
            Command::Test => Ok(Handled::silent(Event::Test)),
            Command::Unknown(_) => respond(
                self.address,
                &envelope,
                Status::Error,
                Event::UnknownCommand,
            ),
            Command::Display(_) | Command::Lock { .. } | Command::Unlock { .. } => respond(
                self.address,
                &envelope,
                Status::Error,
                Event::NotAccepted,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pov_protocol::CommandWord;

    #[derive(Default)]
    struct LastLock {
        status: Option<Status>,
        unexpected: u8,
    }

    impl ResponseHandler for LastLock {
        fn on_response(&mut self, request: RequestKind, status: Status) {
            if request == RequestKind::Lock {
                self.status = Some(status);
            }
        }

        fn on_unexpected(&mut self, _request: CommandWord<'_>, _status: Status) {
            self.unexpected += 1;
        }
    }

    #[test]
    fn test_response_correlated() {
        let mut engine = ControllerEngine::new("10.0.0.1", LastLock::default());
        engine.request_sent(RequestKind::Lock);

        let handled = engine
            .handle("10.0.0.2,10.0.0.1,response,lock,LOCKED\n")
            .unwrap();
        assert_eq!(
            handled.event,
            Event::Response {
                request: RequestKind::Lock,
                status: Status::Locked
            }
        );
        assert!(handled.reply.is_none());
        assert_eq!(engine.handler().status, Some(Status::Locked));
        assert_eq!(engine.outstanding(), 0);
    }

    #[test]
    fn test_uncorrelated_response() {
        let mut engine = ControllerEngine::new("10.0.0.1", LastLock::default());
        let handled = engine
            .handle("10.0.0.2,10.0.0.1,response,display,ok\n")
            .unwrap();
        assert_eq!(
            handled.event,
            Event::UnexpectedResponse { status: Status::Ok }
        );
        assert_eq!(engine.handler().unexpected, 1);
    }

    #[test]
    fn test_requests_rejected() {
        let mut engine = ControllerEngine::new("10.0.0.1", LastLock::default());
        let handled = engine.handle("10.0.0.2,10.0.0.1,lock,3\n").unwrap();
        assert_eq!(handled.event, Event::NotAccepted);
        assert_eq!(
            handled.reply.as_deref(),
            Some("10.0.0.1,10.0.0.2,response,lock,error\n")
        );

        let handled = engine.handle("10.0.0.2,10.0.0.1,blink\n").unwrap();
        assert_eq!(
            handled.reply.as_deref(),
            Some("10.0.0.1,10.0.0.2,response,blink,error\n")
        );
    }

    #[test]
    fn test_keepalive_is_silent() {
        let mut engine = ControllerEngine::new("10.0.0.1", LastLock::default());
        let handled = engine.handle("10.0.0.2,10.0.0.1,test\n").unwrap();
        assert_eq!(handled.event, Event::Test);
        assert!(handled.reply.is_none());
    }

    #[test]
    fn test_malformed_response_not_answered() {
        let mut engine = ControllerEngine::new("10.0.0.1", LastLock::default());
        engine.request_sent(RequestKind::Lock);

        let handled = engine
            .handle("10.0.0.2,10.0.0.1,response,lock,WAT\n")
            .unwrap();
        assert!(matches!(handled.event, Event::Malformed(_)));
        assert!(handled.reply.is_none());
        assert_eq!(engine.outstanding(), 1);
    }

    #[test]
    fn test_other_receiver() {
        let mut engine = ControllerEngine::new("10.0.0.1", LastLock::default());
        engine.request_sent(RequestKind::Lock);

        let handled = engine
            .handle("10.0.0.2,10.0.0.9,response,lock,LOCKED\n")
            .unwrap();
        assert_eq!(handled.event, Event::NotForUs);
        assert!(handled.reply.is_none());
        assert_eq!(engine.outstanding(), 1);

        let handled = engine.handle("10.0.0.2,10.0.0.9,display,0,1\n").unwrap();
        assert_eq!(handled.event, Event::NotForUs);
        assert_eq!(
            handled.reply.as_deref(),
            Some("10.0.0.1,10.0.0.2,response,display,error\n")
        );
    }
}
