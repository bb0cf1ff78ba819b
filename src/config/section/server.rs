//! `[server]` section configuration.
//!
//! Contains live-update server settings.
//!
//! # Example
//!
//! ```toml
//! [server]
//! interface = "0.0.0.0"       # Network interface (0.0.0.0 = all interfaces)
//! port = 55555                # TCP port runtime clients connect to
//! max_payload = 102400        # Largest reply frame payload accepted (bytes)
//! reply_timeout = 0           # Seconds to wait for a reply, 0 = forever
//! ```
//!
//! Clients usually run on a phone or emulator on the LAN, hence the
//! all-interfaces default.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::actor::session::SessionLimits;
use crate::protocol::{DEFAULT_MAX_PAYLOAD, DEFAULT_PORT};

/// Live-update server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Network interface to bind.
    pub interface: IpAddr,

    /// TCP port number.
    pub port: u16,

    /// Maximum payload length accepted in a client reply.
    /// Frames declaring more close the session.
    pub max_payload: u32,

    /// Seconds a session waits for a client reply.
    /// - `0` (default): wait forever
    pub reply_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            max_payload: DEFAULT_MAX_PAYLOAD,
            reply_timeout: 0,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.interface, self.port)
    }

    pub fn reply_timeout(&self) -> Option<Duration> {
        (self.reply_timeout > 0).then(|| Duration::from_secs(self.reply_timeout))
    }

    /// Per-session limits derived from this section.
    pub fn session_limits(&self) -> SessionLimits {
        SessionLimits {
            max_payload: self.max_payload,
            reply_timeout: self.reply_timeout(),
        }
    }
}
