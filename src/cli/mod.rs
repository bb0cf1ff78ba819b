//! Command-line interface module.

mod args;
pub mod client;
pub mod serve;

pub use args::{ClientArgs, Cli, Commands, ServerArgs};
