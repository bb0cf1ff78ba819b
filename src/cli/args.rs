//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// LuaLive server CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: lualive.toml)
    #[arg(short = 'C', long, global = true, default_value = "lualive.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the live-update server with an interactive console
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        server_args: ServerArgs,
    },

    /// Connect a loopback runtime client (for testing the server)
    #[command(visible_alias = "c")]
    Client {
        #[command(flatten)]
        args: ClientArgs,
    },
}

/// Server arguments; each one overrides its `[server]` config value
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ServerArgs {
    /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
    #[arg(short, long)]
    pub interface: Option<std::net::IpAddr>,

    /// Port number to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Largest reply payload accepted from a client, in bytes
    #[arg(short, long)]
    pub max_payload: Option<u32>,

    /// Seconds to wait for a client reply (0 = forever)
    #[arg(short, long)]
    pub reply_timeout: Option<u64>,
}

/// Loopback client arguments
#[derive(clap::Args, Debug, Clone)]
pub struct ClientArgs {
    /// Server host to connect to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Server port (default: `[server] port`)
    #[arg(short, long)]
    pub port: Option<u16>,
}
