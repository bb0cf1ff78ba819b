//! Coordinator Actor - central hub of the live-update server
//!
//! The coordinator owns the set of live sessions. It is the only thread that
//! touches that set, so no lock guards it: every mutation arrives as a
//! message in the coordinator's mailbox.
//!
//! ```text
//!  human intent ──┐
//!  Listener ──────┼──> Coordinator ──broadcast──> Session, Session, ...
//!  Sessions ──────┘         │
//!                           └──> StatusSink (display)
//! ```

use std::net::SocketAddr;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::{Context, Result};

use super::listener::{Listener, ListenerHandle};
use super::mailbox::{self, Actor, Address};
use super::messages::{CoordinatorMsg, SessionMsg};
use super::session::{PendingSession, SessionHandle, SessionId};
use super::status::StatusSink;
use crate::config::ServerConfig;


/// Coordinator - owns live sessions and fans commands out to them.
pub struct Coordinator {
    /// Live sessions in connection order (broadcast order)
    sessions: Vec<SessionHandle>,
    sink: Arc<dyn StatusSink>,
    listener: Option<ListenerHandle>,
}

impl Coordinator {
    /// Bind the server port, then start the listener and coordinator threads.
    ///
    /// A bind failure is returned here and is fatal for the server.
    pub fn start(config: &ServerConfig, sink: impl StatusSink) -> Result<CoordinatorHandle> {
        let listener = Listener::bind(config.socket_addr(), config.session_limits())?;
        let (address, mailbox) = mailbox::mailbox();

        let listener = listener.spawn(address.clone())?;
        let local_addr = listener.local_addr();

        let coordinator = Self {
            sessions: Vec::new(),
            sink: Arc::new(sink),
            listener: Some(listener),
        };
        coordinator.show("Server is running");

        let thread =
            mailbox::spawn(coordinator, mailbox).context("failed to spawn coordinator thread")?;

        Ok(CoordinatorHandle {
            address,
            local_addr,
            thread: Some(thread),
        })
    }

    fn show(&self, status: &str) {
        self.sink.show(status);
    }

    fn session_created(&mut self, pending: PendingSession) {
        let host = pending.host().to_string();
        match pending.start() {
            Ok(session) => {
                crate::debug!("server"; "session {} started ({} live)", session.id(), self.sessions.len() + 1);
                self.sessions.push(session);
                self.show(&format!("Client connected: {host}"));
            }
            Err(e) => crate::log!("server"; "failed to start session for {}: {}", host, e),
        }
    }

    fn session_closed(&mut self, id: SessionId) {
        match self.sessions.iter().position(|s| s.id() == id) {
            Some(index) => {
                let session = self.sessions.remove(index);
                self.show(&format!("Client has disconnected: {}", session.host()));
            }
            None => crate::debug!("server"; "session {} already removed", id),
        }
    }

    /// Post `msg` to every live session, in connection order.
    fn broadcast(&self, msg: SessionMsg) {
        for session in &self.sessions {
            crate::debug!("server"; "sending {} to session {} ({})", msg.kind(), session.id(), session.host());
            session.post(msg.clone());
        }
        self.show(&format!(
            "Sent {} to {} client(s)",
            msg.kind(),
            self.sessions.len()
        ));
    }

    /// Stop accepting clients and release every session.
    ///
    /// Sessions are not force-closed: dropping their addresses lets idle
    /// ones exit on their next receive, while one blocked on a reply keeps
    /// waiting until its read completes or fails.
    fn stop(&mut self) {
        if let Some(mut listener) = self.listener.take() {
            listener.stop();
        }
        self.sessions.clear();
        self.show("Server stopped");
    }
}

impl Actor for Coordinator {
    type Msg = CoordinatorMsg;

    fn name(&self) -> String {
        "coordinator".into()
    }

    fn handle(&mut self, msg: CoordinatorMsg) -> ControlFlow<()> {
        crate::debug!("server"; "got {}", msg.kind());

        match msg {
            CoordinatorMsg::SessionCreated(pending) => self.session_created(pending),
            CoordinatorMsg::SessionClosed(id) => self.session_closed(id),
            CoordinatorMsg::RunProgram(source) => self.broadcast(SessionMsg::RunProgram(source)),
            CoordinatorMsg::RunSelection(source) => {
                self.broadcast(SessionMsg::RunSelection(source))
            }
            CoordinatorMsg::ResetClients => self.broadcast(SessionMsg::Reset),
            CoordinatorMsg::MessageFromClient { session, text } => {
                crate::debug!("server"; "reply from session {}: {} bytes", session, text.len());
                self.show(&text);
            }
            CoordinatorMsg::ServerAddress(addr) => self.show(&format!("Listening on {addr}")),
            CoordinatorMsg::ServerStop => {
                self.stop();
                return ControlFlow::Break(());
            }
        }

        ControlFlow::Continue(())
    }
}

// =============================================================================
// Handle (human intent interface)
// =============================================================================

/// Handle to a running coordinator; every intent is a posted message.
pub struct CoordinatorHandle {
    address: Address<CoordinatorMsg>,
    local_addr: SocketAddr,
    thread: Option<JoinHandle<()>>,
}

impl CoordinatorHandle {
    /// Run a full program on every connected client.
    pub fn run_program(&self, source: impl Into<Arc<str>>) {
        self.address.post(CoordinatorMsg::RunProgram(source.into()));
    }

    /// Run an editor selection on every connected client.
    pub fn run_selection(&self, source: impl Into<Arc<str>>) {
        self.address.post(CoordinatorMsg::RunSelection(source.into()));
    }

    /// Reset every connected client.
    pub fn reset_clients(&self) {
        self.address.post(CoordinatorMsg::ResetClients);
    }

    /// Ask the server to stop. Returns immediately; see [`Self::join`].
    pub fn stop(&self) {
        self.address.post(CoordinatorMsg::ServerStop);
    }

    /// Address for posting from other threads (e.g. the Ctrl+C handler).
    pub fn address(&self) -> Address<CoordinatorMsg> {
        self.address.clone()
    }

    /// Address the listener is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Wait for the coordinator to stop.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
