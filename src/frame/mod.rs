//! Websocket data frame.
//!
//! [RFC-6455 Section5](https://datatracker.ietf.org/doc/html/rfc6455#section-5)
//!
//! ```text
//! 0                   1                   2                   3
//! 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-------+-+-------------+-------------------------------+
//! |F|R|R|R| opcode|M| Payload len |    Extended payload length    |
//! |I|S|S|S|  (4)  |A|     (7)     |             (16/64)           |
//! |N|V|V|V|       |S|             |   (if payload len==126/127)   |
//! | |1|2|3|       |K|             |                               |
//! +-+-+-+-+-------+-+-------------+ - - - - - - - - - - - - - - - +
//! |     Extended payload length continued, if payload len == 127  |
//! + - - - - - - - - - - - - - - - +-------------------------------+
//! | Masking-key, if MASK set to 1 |          Payload Data         |
//! +-------------------------------- - - - - - - - - - - - - - - - +
//! :                     Payload Data continued ...                :
//! + - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - +
//! ```
//!

pub mod codec;
pub mod flag;
pub mod length;
pub mod mask;

pub use codec::{read_frame, write_frame, Incoming, MAX_HEAD_LEN, MAX_PAYLOAD};
pub use flag::{Fin, OpCode};
pub use length::PayloadLen;
pub use mask::Mask;

use crate::error::FrameError;

/// Websocket frame head.
#[allow(clippy::len_without_is_empty)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHead {
    pub fin: Fin,
    pub opcode: OpCode,
    pub mask: Mask,
    pub length: PayloadLen,
}

impl FrameHead {
    /// Constructor.
    #[inline]
    pub const fn new(fin: Fin, opcode: OpCode, mask: Mask, length: PayloadLen) -> Self {
        Self {
            fin,
            opcode,
            mask,
            length,
        }
    }

    /// Encoded size of this head.
    #[inline]
    pub const fn len(&self) -> usize {
        let key_len = match self.mask {
            Mask::Key(_) => 4,
            Mask::None => 0,
        };
        2 + self.length.extra_len() + key_len
    }

    /// Encode to provided buffer, returns the count of written bytes.
    /// The caller should ensure the buffer is large enough,
    /// otherwise a [`FrameError::NotEnoughCapacity`] error will be returned.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, FrameError> {
        if buf.len() < self.len() {
            return Err(FrameError::NotEnoughCapacity);
        }

        // fin, opcode
        buf[0] = self.fin as u8 | self.opcode as u8;

        // mask, payload length
        buf[1] = self.mask.to_flag() | self.length.to_flag();

        let mut n: usize = 2;

        // extended payload length
        match &self.length {
            PayloadLen::Standard(_) => {}
            PayloadLen::Extended1(v) => {
                buf[2..4].copy_from_slice(&v.to_be_bytes());
                n += 2;
            }
            PayloadLen::Extended2(v) => {
                buf[2..10].copy_from_slice(&v.to_be_bytes());
                n += 8;
            }
        };

        // mask key
        if let Mask::Key(key) = &self.mask {
            buf[n..n + 4].copy_from_slice(key);
            n += 4;
        }

        Ok(n)
    }

    /// Parse from provided buffer, returns [`FrameHead`] and the count of read bytes
    /// if the parse succeeds.
    /// If there is not enough data to parse, a [`FrameError::NotEnoughData`] error
    /// will be returned.
    pub fn decode(buf: &[u8]) -> Result<(Self, usize), FrameError> {
        if buf.len() < 2 {
            return Err(FrameError::NotEnoughData);
        }

        // fin, opcode
        let b1 = buf[0];

        // mask, payload length
        let b2 = buf[1];

        let fin = Fin::from_flag(b1)?;
        let opcode = OpCode::from_flag(b1)?;

        let mut n: usize = 2;
        let mut length = PayloadLen::from_flag(b2);

        match length {
            PayloadLen::Standard(_) => {}
            PayloadLen::Extended1(_) => {
                if buf.len() < 4 {
                    return Err(FrameError::NotEnoughData);
                }
                length = PayloadLen::from_byte2([buf[2], buf[3]]);
                n += 2;
            }
            PayloadLen::Extended2(_) => {
                if buf.len() < 10 {
                    return Err(FrameError::NotEnoughData);
                }
                let mut bytes = [0_u8; 8];
                bytes.copy_from_slice(&buf[2..10]);
                length = PayloadLen::from_byte8(bytes);
                n += 8;
            }
        };

        let mask = if Mask::is_set(b2) {
            if buf.len() < n + 4 {
                return Err(FrameError::NotEnoughData);
            }
            let mut key = [0_u8; 4];
            key.copy_from_slice(&buf[n..n + 4]);
            n += 4;
            Mask::Key(key)
        } else {
            Mask::None
        };

        Ok((
            FrameHead {
                fin,
                opcode,
                mask,
                length,
            },
            n,
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn frame_head() {
        let head = FrameHead {
            fin: Fin::Y,
            opcode: OpCode::Text,
            mask: Mask::Key(rand::random()),
            length: PayloadLen::from_num(4096),
        };

        let head2 = FrameHead {
            fin: Fin::N,
            opcode: OpCode::Binary,
            mask: Mask::Key(rand::random()),
            length: PayloadLen::from_num(64),
        };

        let head3 = FrameHead {
            fin: Fin::Y,
            opcode: OpCode::Text,
            mask: Mask::None,
            length: PayloadLen::from_num(100000),
        };

        for head in [head, head2, head3] {
            let mut buf = vec![0; 1024];

            let encode_n = head.encode(&mut buf).unwrap();
            assert_eq!(encode_n, head.len());

            let (head2, decode_n) = FrameHead::decode(&buf[..encode_n + 128]).unwrap();

            assert_eq!(encode_n, decode_n);
            assert_eq!(head, head2);
        }
    }

    #[test]
    fn frame_head_boundary() {
        // 125 fits the flag byte, 126..=65535 take 2 extra bytes,
        // 65536 takes 8.
        for (len, extra) in [(125, 0), (126, 2), (65535, 2), (65536, 8)] {
            let head = FrameHead::new(
                Fin::Y,
                OpCode::Text,
                Mask::None,
                PayloadLen::from_num(len),
            );

            let mut buf = [0_u8; MAX_HEAD_LEN];
            let n = head.encode(&mut buf).unwrap();
            assert_eq!(n, 2 + extra);

            let (head2, decode_n) = FrameHead::decode(&buf[..n]).unwrap();
            assert_eq!(n, decode_n);
            assert_eq!(head2.length.to_num(), len);
        }
    }

    #[test]
    fn frame_head_partial() {
        let head = FrameHead::new(
            Fin::Y,
            OpCode::Text,
            Mask::Key(rand::random()),
            PayloadLen::from_num(4096),
        );

        let mut buf = vec![0; 32];
        let n = head.encode(&mut buf).unwrap();

        for cut in 0..n {
            assert_eq!(
                FrameHead::decode(&buf[..cut]),
                Err(FrameError::NotEnoughData)
            );
        }
    }

    #[test]
    fn frame_head_no_capacity() {
        let head = FrameHead::new(
            Fin::Y,
            OpCode::Text,
            Mask::None,
            PayloadLen::from_num(65536),
        );

        let mut buf = vec![0; head.len() - 1];
        assert_eq!(head.encode(&mut buf), Err(FrameError::NotEnoughCapacity));
    }
}
