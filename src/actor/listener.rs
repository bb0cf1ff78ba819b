//! Connection Listener
//!
//! Accepts runtime clients on the server port and hands every accepted
//! socket to the coordinator as a not-yet-started session.
//!
//! A std `TcpListener` cannot be closed from another thread, so the accept
//! loop runs non-blocking and polls a stop flag between attempts.

use std::io;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};

use super::mailbox::Address;
use super::messages::CoordinatorMsg;
use super::session::{PendingSession, SessionLimits};

/// Sleep between accept attempts when no client is waiting
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A bound, not yet accepting listener.
pub struct Listener {
    listener: TcpListener,
    local_addr: SocketAddr,
    limits: SessionLimits,
}

impl Listener {
    /// Bind the server port. Failure here is fatal for the server.
    pub fn bind(addr: SocketAddr, limits: SessionLimits) -> Result<Self> {
        let listener =
            TcpListener::bind(addr).with_context(|| format!("failed to bind {}", addr))?;
        let local_addr = listener.local_addr()?;
        listener.set_nonblocking(true)?;
        Ok(Self {
            listener,
            local_addr,
            limits,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Run the accept loop on its own thread.
    pub fn spawn(self, coordinator: Address<CoordinatorMsg>) -> Result<ListenerHandle> {
        let stop = Arc::new(AtomicBool::new(false));
        let local_addr = self.local_addr;

        coordinator.post(CoordinatorMsg::ServerAddress(local_addr));

        let stop_flag = Arc::clone(&stop);
        let thread = thread::Builder::new()
            .name("listener".into())
            .spawn(move || self.accept_loop(&coordinator, &stop_flag))
            .context("failed to spawn listener thread")?;

        Ok(ListenerHandle {
            local_addr,
            stop,
            thread: Some(thread),
        })
    }

    fn accept_loop(self, coordinator: &Address<CoordinatorMsg>, stop: &AtomicBool) {
        crate::debug!("server"; "waiting for clients on {}", self.local_addr);

        while !stop.load(Ordering::SeqCst) {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    crate::debug!("server"; "client connection accepted: {}", addr);

                    // accepted sockets may inherit non-blocking mode
                    if let Err(e) = stream.set_nonblocking(false) {
                        crate::log!("server"; "dropping {}: {}", addr, e);
                        continue;
                    }

                    match PendingSession::new(stream, coordinator.clone(), self.limits) {
                        Ok(session) => coordinator.post(CoordinatorMsg::SessionCreated(session)),
                        Err(e) => crate::log!("server"; "dropping {}: {}", addr, e),
                    }
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    // no retry: the listener ends here, running sessions are unaffected
                    crate::log!("server"; "accept failed: {}", e);
                    break;
                }
            }
        }

        crate::debug!("server"; "listener on {} closed", self.local_addr);
    }
}

/// Handle to a running accept loop.
pub struct ListenerHandle {
    local_addr: SocketAddr,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl ListenerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting and close the listening socket.
    ///
    /// Returns once the accept loop has exited (at most one poll interval).
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
