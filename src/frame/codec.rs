//! Frame codec over blocking IO.
//!
//! [`read_frame`] consumes exactly one client frame from the IO source,
//! unmasks it and hands back its payload; [`write_frame`] emits one
//! unmasked, final server frame.

use std::io::{ErrorKind, Read, Write};

use super::mask::apply_mask;
use super::{Fin, FrameHead, Mask, OpCode, PayloadLen};
use crate::error::{Error, FrameError};

/// Largest inbound payload accepted, in bytes.
pub const MAX_PAYLOAD: usize = 65536;

/// Largest frame head: 2 flag bytes + 8 length bytes + 4 key bytes.
pub const MAX_HEAD_LEN: usize = 14;

/// One complete frame received from a peer.
#[derive(Debug, PartialEq, Eq)]
pub enum Incoming {
    /// Data frame with a valid utf-8 payload.
    Text(String),
    /// Close frame; payload is mirrored back to the peer.
    Close(Vec<u8>),
    /// Ping frame; payload goes back inside a pong.
    Ping(Vec<u8>),
    /// Pong frame, discarded.
    Pong,
    /// The peer shut the socket down without a close frame.
    Eof,
}

/// Read one frame from the IO source.
///
/// Blocks until the whole frame has arrived. Frames longer than
/// `max_payload` are rejected with [`FrameError::PayloadTooLarge`];
/// unmasked, fragmented, binary and unknown frames are rejected as
/// protocol errors.
pub fn read_frame<IO: Read>(io: &mut IO, max_payload: usize) -> Result<Incoming, Error> {
    let mut head = [0_u8; MAX_HEAD_LEN];

    // a clean EOF may only appear before the first byte of a frame
    let n = loop {
        match io.read(&mut head[..1]) {
            Ok(n) => break n,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    };
    if n == 0 {
        return Ok(Incoming::Eof);
    }
    io.read_exact(&mut head[1..2])?;

    // the two flag bytes tell how long the head really is
    let head_len = 2
        + PayloadLen::from_flag(head[1]).extra_len()
        + if Mask::is_set(head[1]) { 4 } else { 0 };
    io.read_exact(&mut head[2..head_len])?;

    let (
        FrameHead {
            fin,
            opcode,
            mask,
            length,
        },
        _,
    ) = FrameHead::decode(&head[..head_len])?;

    // client frames must be masked
    let key = match mask {
        Mask::Key(key) => key,
        Mask::None => return Err(FrameError::UnmaskedFrame.into()),
    };

    let length = length.to_num();
    if length > max_payload as u64 {
        return Err(FrameError::PayloadTooLarge(length).into());
    }
    let length = length as usize;

    // control frames must be final and short
    if opcode.is_control() {
        if matches!(fin, Fin::N) {
            return Err(FrameError::Fragmented.into());
        }
        if length > 125 {
            return Err(FrameError::IllegalData.into());
        }
    }

    let mut payload = vec![0_u8; length];
    io.read_exact(&mut payload)?;
    apply_mask(key, &mut payload);

    match opcode {
        OpCode::Text => {
            if matches!(fin, Fin::N) {
                return Err(FrameError::Fragmented.into());
            }
            match String::from_utf8(payload) {
                Ok(text) => Ok(Incoming::Text(text)),
                Err(_) => Err(FrameError::BadUtf8.into()),
            }
        }
        OpCode::Close => Ok(Incoming::Close(payload)),
        OpCode::Ping => Ok(Incoming::Ping(payload)),
        OpCode::Pong => Ok(Incoming::Pong),
        OpCode::Binary => Err(FrameError::UnsupportedOpcode.into()),
        OpCode::Continue => Err(FrameError::Fragmented.into()),
    }
}

/// Write one final, unmasked frame to the IO source.
///
/// Head and payload are written with a blocking write-all loop, so
/// partial writes for one peer never interleave.
pub fn write_frame<IO: Write>(io: &mut IO, opcode: OpCode, payload: &[u8]) -> Result<(), Error> {
    let head = FrameHead::new(
        Fin::Y,
        opcode,
        Mask::None,
        PayloadLen::from_num(payload.len() as u64),
    );

    let mut buf = [0_u8; MAX_HEAD_LEN];
    let n = head.encode(&mut buf)?;

    io.write_all(&buf[..n])?;
    io.write_all(payload)?;

    Ok(())
}
