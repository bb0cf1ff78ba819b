//! Loopback runtime client.
//!
//! Stands in for an embedded Lua runtime: connects to the server, prints
//! each command it receives and answers with a short REPLY.

use std::io::{Read, Write};
use std::net::TcpStream;

use anyhow::{Context, Result};

use crate::cli::ClientArgs;
use crate::config::LiveConfig;
use crate::protocol::{Command, Frame, ProtocolError, read_frame, write_frame};
use crate::{debug, log};

/// Scripts larger than this are refused.
const MAX_SCRIPT: u32 = 16 * 1024 * 1024;

/// Connect and answer commands until the server goes away.
pub fn run_client(args: &ClientArgs, config: &LiveConfig) -> Result<()> {
    let port = args.port.unwrap_or(config.server.port);
    let mut stream = TcpStream::connect((args.host.as_str(), port))
        .with_context(|| format!("failed to connect to {}:{}", args.host, port))?;

    log!("client"; "connected to {}", stream.peer_addr()?);
    serve_connection(&mut stream)?;
    log!("client"; "server closed the connection");
    Ok(())
}

/// Answer frames on `stream` until it closes.
fn serve_connection<S: Read + Write>(stream: &mut S) -> Result<()> {
    loop {
        let frame = match read_frame(stream, MAX_SCRIPT) {
            Ok(frame) => frame,
            Err(ProtocolError::Closed) => return Ok(()),
            Err(e) => return Err(e).context("failed to read command"),
        };

        if let Some(reply) = respond(&frame) {
            write_frame(stream, &reply).context("failed to send reply")?;
        }
    }
}

/// Reply for one received frame, `None` when no reply is owed.
fn respond(frame: &Frame) -> Option<Frame> {
    match frame.command() {
        Some(Command::RunScript) => {
            let source = frame.text();
            log!("client"; "run ({} bytes)", frame.payload.len());
            for line in source.lines() {
                log!("client"; "  {}", line);
            }
            Some(Frame::reply(&format!("ok: {} bytes", frame.payload.len())))
        }
        Some(Command::Reset) => {
            log!("client"; "reset");
            Some(Frame::reply("reset"))
        }
        Some(Command::Reply) | None => {
            debug!("client"; "ignoring frame with code {}", frame.code);
            None
        }
    }
}
