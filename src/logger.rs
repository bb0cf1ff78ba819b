//! Logging utilities with colored output and status display.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro, only printed with `--verbose`
//! - `StatusLog` for timestamped, user-facing server status lines
//!
//! # Example
//!
//! ```ignore
//! log!("server"; "listening on {}", addr);
//! debug!("session"; "frame header: code={} len={}", code, len);
//! logger::status("Client connected: 10.0.0.7");
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stdout},
    sync::LazyLock,
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    execute!(stdout, cursor::MoveToColumn(0), Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "server" => prefix.bright_blue().bold().to_string(),
        "session" => prefix.bright_cyan().bold().to_string(),
        "client" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Status Log (timestamped server status)
// ============================================================================

/// Get current time formatted as HH:MM:SS (UTC)
fn now() -> String {
    use std::time::SystemTime;
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let hours = (secs / 3600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Timestamped status output for the interactive console.
///
/// Every line is kept (client replies are history, not progress), but the
/// console prompt is cleared first so status never interleaves with it.
pub struct StatusLog;

/// Global status log shared by every status sink.
static STATUS_LOG: LazyLock<Mutex<StatusLog>> = LazyLock::new(|| Mutex::new(StatusLog::new()));

impl StatusLog {
    pub const fn new() -> Self {
        Self
    }

    /// Display an info message (● prefix, blue).
    pub fn info(&mut self, message: &str) {
        self.display(format!("{}", "●".blue()), message);
    }

    /// Display error message (✗ prefix, red).
    pub fn error(&mut self, message: &str) {
        self.display(format!("{}", "✗".red()), message);
    }

    fn display(&self, symbol: String, message: &str) {
        let mut stdout = stdout().lock();
        execute!(stdout, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();

        let timestamp = format!("[{}]", now()).dimmed().to_string();
        writeln!(stdout, "{}", format_line(&timestamp, &symbol, message)).ok();
        stdout.flush().ok();
    }
}

/// Indent continuation lines so multi-line replies stay readable.
fn format_line(timestamp: &str, symbol: &str, message: &str) -> String {
    let body = message.replace('\n', "\n           ");
    if symbol.is_empty() {
        format!("{timestamp} {body}")
    } else {
        format!("{timestamp} {symbol} {body}")
    }
}

/// Global status: info
pub fn status(message: &str) {
    STATUS_LOG.lock().info(message);
}

/// Global status: error
pub fn status_error(message: &str) {
    STATUS_LOG.lock().error(message);
}

// ============================================================================
// Tests
// ============================================================================
