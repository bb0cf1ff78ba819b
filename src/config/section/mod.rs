//! Configuration section definitions.
//!
//! Each module corresponds to a section in `lualive.toml`:
//!
//! | Module   | TOML Section | Purpose                          |
//! |----------|--------------|----------------------------------|
//! | `server` | `[server]`   | Listening address, frame limits  |

mod server;

pub use server::ServerConfig;
