//! Wire format for servo commands.
//!
//! A frame is `[id, opcode, payload.., checksum]`. The checksum is the sum of
//! every preceding byte, id and opcode included, truncated to 8 bits.

mod ack;
mod frame;

pub use ack::{Ack, Response};
pub use frame::Frame;

/// Opcodes with a defined wire layout.
pub mod opcode {
    /// Encoder calibration, payload `[0x00]`.
    pub const CALIBRATE: u8 = 0x80;
}

/// Longest payload: opcode, payload and checksum must fit an 8-byte CAN data field.
pub const MAX_PAYLOAD: usize = 6;

/// Capacity of a frame: id byte plus a full CAN data field.
pub const FRAME_CAPACITY: usize = MAX_PAYLOAD + 3;

/// Sum of `bytes`, masked to 8 bits.
#[inline]
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}
