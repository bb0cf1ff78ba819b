//! Session Actor - one per connected runtime client
//!
//! A session owns its client's socket. Each intent taken from its mailbox
//! is turned into one request frame, followed by a blocking read of exactly
//! one reply frame:
//!
//! ```text
//! AwaitingCommand --intent--> Sending --flush--> AwaitingReply --frame--> Delivering
//!        ^                                                                    |
//!        +--------------------------------------------------------------------+
//!
//! any I/O failure --> Closed  (SessionClosed posted to the coordinator once)
//! ```

use std::fmt;
use std::net::TcpStream;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::mailbox::{self, Actor, Address, Mailbox};
use super::messages::{CoordinatorMsg, SessionMsg};
use crate::protocol::{Command, DEFAULT_MAX_PAYLOAD, Frame, ProtocolError, read_frame, write_frame};

#[cfg(test)]
mod tests;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    fn next() -> Self {
        Self(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a session is in its request/reply cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingCommand,
    Sending,
    AwaitingReply,
    Delivering,
    Closed,
}

/// Per-connection limits taken from `[server]` config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    /// Largest reply payload accepted; larger frames close the session
    pub max_payload: u32,
    /// How long to wait for a reply; `None` waits forever
    pub reply_timeout: Option<Duration>,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_payload: DEFAULT_MAX_PAYLOAD,
            reply_timeout: None,
        }
    }
}

/// Session Actor - owns one client socket
pub struct Session {
    id: SessionId,
    host: String,
    stream: TcpStream,
    coordinator: Address<CoordinatorMsg>,
    max_payload: u32,
    state: SessionState,
}

impl Session {
    fn new(
        stream: TcpStream,
        coordinator: Address<CoordinatorMsg>,
        limits: SessionLimits,
    ) -> std::io::Result<Self> {
        let host = stream.peer_addr()?.ip().to_string();
        stream.set_read_timeout(limits.reply_timeout)?;

        Ok(Self {
            id: SessionId::next(),
            host,
            stream,
            coordinator,
            max_payload: limits.max_payload,
            state: SessionState::AwaitingCommand,
        })
    }

    fn set_state(&mut self, state: SessionState) {
        crate::debug!("session"; "{} {}: {:?} -> {:?}", self.id, self.host, self.state, state);
        self.state = state;
    }

    /// Send one request frame and handle the client's reply.
    fn exchange(&mut self, request: &Frame) -> Result<(), ProtocolError> {
        self.set_state(SessionState::Sending);
        write_frame(&mut self.stream, request)?;
        crate::debug!("session"; "{} sent code={} len={}", self.id, request.code, request.payload.len());

        self.set_state(SessionState::AwaitingReply);
        let reply = read_frame(&mut self.stream, self.max_payload)?;
        crate::debug!("session"; "{} received code={} len={}", self.id, reply.code, reply.payload.len());

        self.set_state(SessionState::Delivering);
        match reply.command() {
            Some(Command::Reply) => self.coordinator.post(CoordinatorMsg::MessageFromClient {
                session: self.id,
                text: reply.text(),
            }),
            // Only REPLY is defined client→server; anything else is skipped whole.
            _ => crate::debug!("session"; "{} ignoring reply with code {}", self.id, reply.code),
        }

        self.set_state(SessionState::AwaitingCommand);
        Ok(())
    }
}

impl Actor for Session {
    type Msg = SessionMsg;

    fn name(&self) -> String {
        format!("session-{}", self.id.0)
    }

    fn handle(&mut self, msg: SessionMsg) -> ControlFlow<()> {
        let request = match &msg {
            SessionMsg::RunProgram(source) | SessionMsg::RunSelection(source) => {
                Frame::run_script(source)
            }
            SessionMsg::Reset => Frame::reset(),
        };

        match self.exchange(&request) {
            Ok(()) => ControlFlow::Continue(()),
            Err(e) => {
                crate::log!("session"; "{} {} failed during {}: {}", self.id, self.host, msg.kind(), e);
                ControlFlow::Break(())
            }
        }
    }

    fn stopped(&mut self) {
        self.set_state(SessionState::Closed);
        self.coordinator.post(CoordinatorMsg::SessionClosed(self.id));
    }
}

// =============================================================================
// Construction / start
// =============================================================================

/// A session built by the listener but not running yet.
///
/// The coordinator starts it after registering it, so the session can never
/// report its closure before the coordinator knows about it.
pub struct PendingSession {
    session: Session,
    address: Address<SessionMsg>,
    mailbox: Mailbox<SessionMsg>,
}

impl PendingSession {
    pub fn new(
        stream: TcpStream,
        coordinator: Address<CoordinatorMsg>,
        limits: SessionLimits,
    ) -> std::io::Result<Self> {
        let session = Session::new(stream, coordinator, limits)?;
        let (address, mailbox) = mailbox::mailbox();
        Ok(Self {
            session,
            address,
            mailbox,
        })
    }

    pub fn id(&self) -> SessionId {
        self.session.id
    }

    pub fn host(&self) -> &str {
        &self.session.host
    }

    /// Spawn the session's worker thread.
    pub fn start(self) -> std::io::Result<SessionHandle> {
        let handle = SessionHandle {
            id: self.session.id,
            host: self.session.host.clone(),
            address: self.address,
        };
        // Worker threads are detached: a session blocked on an unresponsive
        // client must not hold up anyone else.
        mailbox::spawn(self.session, self.mailbox)?;
        Ok(handle)
    }
}

/// Coordinator-side view of a running session.
pub struct SessionHandle {
    id: SessionId,
    host: String,
    address: Address<SessionMsg>,
}

impl SessionHandle {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn post(&self, msg: SessionMsg) {
        self.address.post(msg);
    }
}
