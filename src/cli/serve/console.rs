//! Interactive console: reads intents from stdin and posts them to the coordinator.
//!
//! ```text
//! run <path>    run a script file on every client
//! sel <code>    run a code snippet on every client
//! reset         reset every client
//! stop | quit   stop the server
//! help          show this list
//! ```

use std::fs;
use std::io::BufRead;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::actor::mailbox::Address;
use crate::actor::messages::CoordinatorMsg;
use crate::core::is_shutdown;
use crate::{log, logger};

const HELP: &str = "commands: run <path> | sel <code> | reset | stop | help";

/// One parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Send a whole script file as a program
    RunFile(PathBuf),
    /// Send inline code as a selection
    RunSelection(String),
    Reset,
    Stop,
    Help,
    /// Blank line
    Empty,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "" => Self::Empty,
            "run" if rest.is_empty() => return Err(ParseError::MissingArgument("run")),
            "run" => Self::RunFile(PathBuf::from(shellexpand::tilde(rest).as_ref())),
            "sel" if rest.is_empty() => return Err(ParseError::MissingArgument("sel")),
            "sel" => Self::RunSelection(rest.to_string()),
            "reset" => Self::Reset,
            "stop" | "quit" | "exit" => Self::Stop,
            "help" | "?" => Self::Help,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

/// Read commands until stdin closes or `stop` is entered.
pub fn run(coordinator: &Address<CoordinatorMsg>) {
    log!("server"; "{}", HELP);

    for line in std::io::stdin().lock().lines() {
        if is_shutdown() {
            return;
        }
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                logger::status_error(&format!("console input failed: {e}"));
                return;
            }
        };

        match ConsoleCommand::parse(&line) {
            Ok(command) => {
                if execute(command, coordinator).is_break() {
                    return;
                }
            }
            Err(e) => logger::status_error(&e.to_string()),
        }
    }

    crate::debug!("server"; "console input closed");
}

/// Turn one command into a coordinator message.
pub fn execute(command: ConsoleCommand, coordinator: &Address<CoordinatorMsg>) -> ControlFlow<()> {
    match command {
        ConsoleCommand::RunFile(path) => match fs::read_to_string(&path) {
            Ok(source) => coordinator.post(CoordinatorMsg::RunProgram(Arc::from(source))),
            Err(e) => logger::status_error(&format!("cannot read {}: {}", path.display(), e)),
        },
        ConsoleCommand::RunSelection(code) => {
            coordinator.post(CoordinatorMsg::RunSelection(Arc::from(code)))
        }
        ConsoleCommand::Reset => coordinator.post(CoordinatorMsg::ResetClients),
        ConsoleCommand::Stop => {
            coordinator.post(CoordinatorMsg::ServerStop);
            return ControlFlow::Break(());
        }
        ConsoleCommand::Help => log!("server"; "{}", HELP),
        ConsoleCommand::Empty => {}
    }
    ControlFlow::Continue(())
}
