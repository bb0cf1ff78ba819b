//! Actor System for Live Updates
//!
//! Message-passing concurrency, one OS thread per actor:
//!
//! ```text
//! Listener --SessionCreated--> Coordinator --RunProgram/Reset--> Session (x N)
//! (accept)                     (fan-out)                          (socket I/O)
//! ```
//!
//! # Module Structure
//!
//! - `mailbox` - Generic mailbox + worker loop every actor is built on
//! - `messages` - Message types for inter-actor communication
//! - `listener` - TCP accept loop
//! - `session` - Per-client socket actor
//! - `coordinator` - Owns live sessions, broadcasts, reports status
//! - `status` - Display sink for human-readable status

pub mod coordinator;
pub mod listener;
pub mod mailbox;
pub mod messages;
pub mod session;
pub mod status;

pub use coordinator::{Coordinator, CoordinatorHandle};
pub use status::{ConsoleSink, StatusSink};
