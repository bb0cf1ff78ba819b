//! LuaLive Wire Protocol
//!
//! Binary framing spoken between the server and runtime clients over a raw
//! TCP socket. Every request and reply is one frame:
//!
//! ```text
//! bytes 0-3   command code    (u32, little-endian)
//! bytes 4-7   payload length  (u32, little-endian)
//! bytes 8..   payload         (exactly `length` bytes)
//! ```
//!
//! # Commands
//!
//! | Code | Name         | Direction       | Payload             |
//! |------|--------------|-----------------|---------------------|
//! | 1    | `RunScript`  | server → client | Lua source (Latin-1)|
//! | 2    | `Reset`      | server → client | empty               |
//! | 3    | `Reply`      | client → server | result text         |

mod frame;
pub mod latin1;

pub use frame::{Frame, read_frame, write_frame};

use thiserror::Error;

/// TCP port the server listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 55555;

/// Fixed size of the frame header (command code + payload length).
pub const HEADER_LEN: usize = 8;

/// Largest payload accepted from a client by default.
pub const DEFAULT_MAX_PAYLOAD: u32 = 100 * 1024;

/// Frame command codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Command {
    /// Run the attached Lua source
    RunScript = 1,
    /// Reset the client's Lua state
    Reset = 2,
    /// Result of the last command
    Reply = 3,
}

impl Command {
    /// Map a raw wire code to a known command.
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::RunScript),
            2 => Some(Self::Reset),
            3 => Some(Self::Reply),
            _ => None,
        }
    }

    pub const fn code(self) -> u32 {
        self as u32
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::RunScript => "RUN_SCRIPT",
            Self::Reset => "RESET",
            Self::Reply => "REPLY",
        }
    }
}

/// Errors produced while reading or writing frames
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection closed by peer")]
    Closed,

    #[error("frame declares {declared} payload bytes (max {max})")]
    PayloadTooLarge { declared: u64, max: u64 },
}

/// Encode a 32-bit value as 4 little-endian bytes.
#[inline]
pub const fn encode_u32(value: u32) -> [u8; 4] {
    [
        (value & 0xFF) as u8,
        ((value >> 8) & 0xFF) as u8,
        ((value >> 16) & 0xFF) as u8,
        ((value >> 24) & 0xFF) as u8,
    ]
}

/// Decode 4 little-endian bytes: `b0 | b1<<8 | b2<<16 | b3<<24`.
#[inline]
pub const fn decode_u32(bytes: &[u8; 4]) -> u32 {
    (bytes[0] as u32)
        | ((bytes[1] as u32) << 8)
        | ((bytes[2] as u32) << 16)
        | ((bytes[3] as u32) << 24)
}
