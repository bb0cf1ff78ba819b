//! Server configuration management for `lualive.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   └── server     # [server]
//! ├── error          # ConfigError
//! ├── util           # Config file discovery
//! └── mod.rs         # LiveConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section    | Purpose                                          |
//! |------------|--------------------------------------------------|
//! | `[server]` | Interface, port, reply size limit, reply timeout |
//!
//! The config file is optional; without one every value is its default.
//! CLI flags override whatever the file says.

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::ServerConfig;

use util::find_config_file;

use crate::{
    cli::{Cli, Commands, ServerArgs},
    log,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing lualive.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiveConfig {
    /// Absolute path to the config file, empty when running on defaults
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Live-update server settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl LiveConfig {
    /// Load configuration for the given CLI invocation.
    ///
    /// Searches upward from cwd for the config file; a missing file is not
    /// an error.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = path;
                config
            }
            None => {
                crate::debug!("config"; "{} not found, using defaults", cli.config.display());
                Self::default()
            }
        };

        config.apply_command_options(cli);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::from)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} (ignored):", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Serve { server_args } => self.apply_server_args(server_args),
            // Client only reads the server port as its default
            Commands::Client { .. } => {}
        }
    }

    /// Apply server arguments from CLI.
    fn apply_server_args(&mut self, args: &ServerArgs) {
        Self::update_option(&mut self.server.interface, args.interface.as_ref());
        Self::update_option(&mut self.server.port, args.port.as_ref());
        Self::update_option(&mut self.server.max_payload, args.max_payload.as_ref());
        Self::update_option(&mut self.server.reply_timeout, args.reply_timeout.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.server.max_payload == 0 {
            return Err(ConfigError::Validation(
                "[server] max_payload must be greater than 0".into(),
            )
            .into());
        }
        Ok(())
    }
}

/// Parse a config snippet, failing the test on unknown fields.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> LiveConfig {
    let (parsed, ignored) = LiveConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
