//! Actor Message Definitions
//!
//! Message types for inter-actor communication.
//!
//! ```text
//! Listener --SessionCreated--> Coordinator --RunProgram/Reset--> Session
//!                                   ^                               |
//!                                   +--MessageFromClient/Closed-----+
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use super::session::{PendingSession, SessionId};

// =============================================================================
// Coordinator Messages
// =============================================================================

/// Messages to the Coordinator
pub enum CoordinatorMsg {
    /// Listener accepted a connection; the session is not started yet
    SessionCreated(PendingSession),
    /// Session worker exited (always posted exactly once per started session)
    SessionClosed(SessionId),
    /// Run a full program on every client
    RunProgram(Arc<str>),
    /// Run an editor selection on every client
    RunSelection(Arc<str>),
    /// Reset every client
    ResetClients,
    /// Reply text decoded from a client's REPLY frame
    MessageFromClient { session: SessionId, text: String },
    /// Listener is bound and accepting on this address
    ServerAddress(SocketAddr),
    /// Stop the server
    ServerStop,
}

impl CoordinatorMsg {
    /// Short name for logging
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SessionCreated(_) => "session-created",
            Self::SessionClosed(_) => "session-closed",
            Self::RunProgram(_) => "run-program",
            Self::RunSelection(_) => "run-selection",
            Self::ResetClients => "reset-clients",
            Self::MessageFromClient { .. } => "message-from-client",
            Self::ServerAddress(_) => "server-address",
            Self::ServerStop => "server-stop",
        }
    }
}

// =============================================================================
// Session Messages
// =============================================================================

/// Messages to a Session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMsg {
    /// Send a RUN_SCRIPT frame with a full program
    RunProgram(Arc<str>),
    /// Send a RUN_SCRIPT frame with a selection
    RunSelection(Arc<str>),
    /// Send a RESET frame
    Reset,
}

impl SessionMsg {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RunProgram(_) => "run-program",
            Self::RunSelection(_) => "run-selection",
            Self::Reset => "reset",
        }
    }
}
