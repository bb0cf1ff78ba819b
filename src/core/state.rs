//! Process-wide shutdown state.
//!
//! `SHUTDOWN`: Has shutdown been requested? (Ctrl+C received)

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::actor::mailbox::Address;
use crate::actor::messages::CoordinatorMsg;

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Coordinator to notify on Ctrl+C
static COORDINATOR: OnceLock<Address<CoordinatorMsg>> = OnceLock::new();

// =============================================================================
// SHUTDOWN state
// =============================================================================

/// Setup the global Ctrl+C handler. Call once at program start
///
/// The handler behavior depends on whether a coordinator has been registered:
/// - Before `register_coordinator()`: exit immediately, nothing to drain
/// - After `register_coordinator()`: post `ServerStop` and let the server wind down
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        // second Ctrl+C while stopping: give up waiting
        if SHUTDOWN.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }

        match COORDINATOR.get() {
            Some(coordinator) => {
                crate::log!("server"; "shutting down...");
                coordinator.post(CoordinatorMsg::ServerStop);
            }
            None => std::process::exit(0),
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the running coordinator for graceful shutdown
pub fn register_coordinator(coordinator: Address<CoordinatorMsg>) {
    let _ = COORDINATOR.set(coordinator);
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_shutdown_by_default() {
        assert!(!is_shutdown());
    }
}
