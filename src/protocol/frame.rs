//! Frame construction, encoding and bounded reading.

use std::io::{self, Read, Write};

use super::{Command, HEADER_LEN, ProtocolError, decode_u32, encode_u32, latin1};

/// One complete protocol unit: command code plus payload bytes.
///
/// The code is kept raw so that replies carrying an unknown command can
/// still be read off the socket (and then ignored) without desyncing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub code: u32,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(command: Command, payload: Vec<u8>) -> Self {
        Self {
            code: command.code(),
            payload,
        }
    }

    /// `RUN_SCRIPT` frame carrying Latin-1 encoded Lua source.
    pub fn run_script(source: &str) -> Self {
        Self::new(Command::RunScript, latin1::encode(source))
    }

    /// `RESET` frame, always zero-length.
    pub fn reset() -> Self {
        Self::new(Command::Reset, Vec::new())
    }

    /// `REPLY` frame carrying Latin-1 encoded result text.
    pub fn reply(text: &str) -> Self {
        Self::new(Command::Reply, latin1::encode(text))
    }

    /// Known command for this frame, `None` for unrecognized codes.
    pub fn command(&self) -> Option<Command> {
        Command::from_code(self.code)
    }

    /// Payload decoded as Latin-1 text.
    pub fn text(&self) -> String {
        latin1::decode(&self.payload)
    }

    /// Serialize header and payload into a single buffer.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let len = u32::try_from(self.payload.len()).map_err(|_| ProtocolError::PayloadTooLarge {
            declared: self.payload.len() as u64,
            max: u64::from(u32::MAX),
        })?;

        let mut buf = Vec::with_capacity(HEADER_LEN + self.payload.len());
        buf.extend_from_slice(&encode_u32(self.code));
        buf.extend_from_slice(&encode_u32(len));
        buf.extend_from_slice(&self.payload);
        Ok(buf)
    }
}

/// Write one frame and flush.
pub fn write_frame<W: Write>(writer: &mut W, frame: &Frame) -> Result<(), ProtocolError> {
    let buf = frame.encode()?;
    writer.write_all(&buf)?;
    writer.flush()?;
    Ok(())
}

/// Read exactly one frame.
///
/// Short reads are reassembled; a zero-length read before the frame is
/// complete is reported as [`ProtocolError::Closed`]. The declared length is
/// checked against `max_payload` before any payload byte is consumed.
pub fn read_frame<R: Read>(reader: &mut R, max_payload: u32) -> Result<Frame, ProtocolError> {
    let mut header = [0u8; HEADER_LEN];
    read_full(reader, &mut header)?;

    let code = decode_u32(&[header[0], header[1], header[2], header[3]]);
    let len = decode_u32(&[header[4], header[5], header[6], header[7]]);

    if len > max_payload {
        return Err(ProtocolError::PayloadTooLarge {
            declared: u64::from(len),
            max: u64::from(max_payload),
        });
    }

    let mut payload = vec![0u8; len as usize];
    read_full(reader, &mut payload)?;

    Ok(Frame { code, payload })
}

fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), ProtocolError> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => ProtocolError::Closed,
        _ => ProtocolError::Io(e),
    })
}
