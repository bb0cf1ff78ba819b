//! Live-update server with an interactive console.

mod console;

use std::thread;

use anyhow::{Context, Result};

use crate::actor::{ConsoleSink, Coordinator};
use crate::config::LiveConfig;
use crate::core::register_coordinator;

/// Run the server until `stop` is entered or Ctrl+C is pressed.
///
/// A bind failure is returned before any thread is started.
pub fn serve(config: &LiveConfig) -> Result<()> {
    let handle = Coordinator::start(&config.server, ConsoleSink)?;
    register_coordinator(handle.address());

    let address = handle.address();
    // console thread is left behind on shutdown, blocked on stdin
    thread::Builder::new()
        .name("console".into())
        .spawn(move || console::run(&address))
        .context("failed to spawn console thread")?;

    handle.join();
    Ok(())
}
