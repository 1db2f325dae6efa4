//! Acknowledgement frames sent back by the servo.

use crate::config::CanId;
use crate::error::ProtocolError;

use super::Frame;

/// Status carried by an acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Response {
    /// Command execution failed.
    Failure = 0x00,
    /// Command execution succeeded.
    Success = 0x01,
}

impl TryFrom<u8> for Response {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::Failure),
            0x01 => Ok(Self::Success),
            other => Err(ProtocolError::InvalidStatus(other)),
        }
    }
}

impl Response {
    /// Whether the command succeeded.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Decoded `[id, opcode, status, checksum]` reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ack {
    /// Opcode of the command being acknowledged.
    pub opcode: u8,
    /// Outcome reported by the servo.
    pub response: Response,
}

impl Ack {
    /// Decode a reply from the node `expected`.
    ///
    /// # Errors
    ///
    /// Returns a `ProtocolError` if the frame is short, corrupt, comes from
    /// another node, or carries an unknown status.
    pub fn decode(frame: &Frame, expected: CanId) -> Result<Self, ProtocolError> {
        frame.verify()?;

        // Ids sharing a low byte are told apart by the arbitration id.
        if frame.target() != expected {
            return Err(ProtocolError::AddressMismatch {
                expected: expected.raw(),
                found: frame.target().raw(),
            });
        }
        let bytes = frame.as_bytes();
        if bytes[0] != expected.low_byte() {
            return Err(ProtocolError::AddressMismatch {
                expected: u16::from(expected.low_byte()),
                found: u16::from(bytes[0]),
            });
        }
        if bytes.len() < 4 {
            return Err(ProtocolError::TooShort(bytes.len()));
        }

        Ok(Self {
            opcode: bytes[1],
            response: Response::try_from(bytes[2])?,
        })
    }

    /// Whether the command succeeded.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.response.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: i32) -> CanId {
        CanId::new(raw).unwrap()
    }

    #[test]
    fn test_decode_success() {
        let frame = Frame::encode(id(0x01), 0x80, &[0x01]).unwrap();
        let ack = Ack::decode(&frame, id(0x01)).unwrap();
        assert_eq!(ack.opcode, 0x80);
        assert!(ack.is_success());
    }

    #[test]
    fn test_decode_failure_status() {
        let frame = Frame::encode(id(0x01), 0x80, &[0x00]).unwrap();
        let ack = Ack::decode(&frame, id(0x01)).unwrap();
        assert_eq!(ack.response, Response::Failure);
    }

    #[test]
    fn test_decode_rejects_other_node() {
        let frame = Frame::encode(id(0x02), 0x80, &[0x01]).unwrap();
        assert_eq!(
            Ack::decode(&frame, id(0x01)),
            Err(ProtocolError::AddressMismatch { expected: 0x01, found: 0x02 })
        );
    }

    #[test]
    fn test_decode_rejects_node_sharing_low_byte() {
        let frame = Frame::encode(id(0x101), 0x80, &[0x01]).unwrap();
        assert_eq!(frame.as_bytes()[0], 0x01);
        assert_eq!(
            Ack::decode(&frame, id(0x001)),
            Err(ProtocolError::AddressMismatch { expected: 0x001, found: 0x101 })
        );
    }

    #[test]
    fn test_decode_rejects_id_byte_mismatch() {
        // Right arbitration id, wrong id byte.
        let frame = Frame::from_bytes(id(0x01), &[0x02, 0x80, 0x01, 0x83]).unwrap();
        assert_eq!(
            Ack::decode(&frame, id(0x01)),
            Err(ProtocolError::AddressMismatch { expected: 0x01, found: 0x02 })
        );
    }

    #[test]
    fn test_decode_rejects_unknown_status() {
        let frame = Frame::encode(id(0x01), 0x80, &[0x07]).unwrap();
        assert_eq!(Ack::decode(&frame, id(0x01)), Err(ProtocolError::InvalidStatus(0x07)));
    }

    #[test]
    fn test_decode_rejects_missing_status() {
        let frame = Frame::encode(id(0x01), 0x80, &[]).unwrap();
        assert_eq!(Ack::decode(&frame, id(0x01)), Err(ProtocolError::TooShort(3)));
    }
}
