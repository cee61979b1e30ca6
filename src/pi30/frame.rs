//! PI30 wire framing.
//!
//! A frame is `<payload><crc hi><crc lo><CR>`. The CRC is CRC-16/XMODEM over
//! the payload, except that a CRC byte which would collide with one of the
//! protocol's reserved bytes is bumped by one.

use crate::prelude::*;

pub const TERMINATOR: u8 = b'\r';

/// Responses carry this in front of their fields; it is covered by the CRC.
pub const START_MARKER: u8 = b'(';

const RESERVED: [u8; 3] = [b'(', b'\r', b'\n'];

pub fn checksum(data: &[u8]) -> [u8; 2] {
    let crc = crc16::State::<crc16::XMODEM>::calculate(data);

    crc.to_be_bytes().map(|b| if RESERVED.contains(&b) { b + 1 } else { b })
}

pub fn encode(command: &str) -> Vec<u8> {
    let mut frame = Vec::with_capacity(command.len() + 3);
    frame.extend_from_slice(command.as_bytes());
    frame.extend_from_slice(&checksum(command.as_bytes()));
    frame.push(TERMINATOR);
    frame
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub payload: Vec<u8>,
    pub valid: bool,
}

impl Decoded {
    fn invalid(payload: &[u8]) -> Self {
        Self {
            payload: payload.to_vec(),
            valid: false,
        }
    }
}

/// Validate and strip the trailer from a received frame.
///
/// Never fails outright; a missing terminator, a frame too short to hold a
/// checksum or a checksum mismatch all come back with `valid == false` and
/// whatever bytes preceded the trailer as payload.
pub fn decode(raw: &[u8]) -> Decoded {
    let Some(end) = raw.iter().position(|&b| b == TERMINATOR) else {
        debug!("frame has no terminator: {:?}", raw);
        return Decoded::invalid(raw);
    };

    let frame = &raw[..end];
    if frame.len() < 2 {
        debug!("frame too short for checksum: {:?}", raw);
        return Decoded::invalid(frame);
    }

    let (payload, crc) = frame.split_at(frame.len() - 2);
    let expected = checksum(payload);
    if crc != expected {
        debug!(
            "checksum mismatch - got {:02x?}, expected {:02x?}",
            crc, expected
        );
        return Decoded::invalid(payload);
    }

    Decoded {
        payload: payload.to_vec(),
        valid: true,
    }
}
