//! Display sink for human-readable server status.
//!
//! The coordinator reports every connect, disconnect, broadcast and client
//! reply through a [`StatusSink`]. Showing status is best-effort and must
//! never block protocol progress.

/// Receiver of status strings (console, GUI, test recorder).
pub trait StatusSink: Send + Sync + 'static {
    fn show(&self, status: &str);
}

impl<F> StatusSink for F
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn show(&self, status: &str) {
        self(status)
    }
}

/// Prints status through the timestamped console status log.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn show(&self, status: &str) {
        crate::logger::status(status);
    }
}
