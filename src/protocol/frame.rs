//! Command and response frames.

use heapless::Vec;

use crate::config::CanId;
use crate::error::ProtocolError;

use super::{checksum, FRAME_CAPACITY, MAX_PAYLOAD};

/// One frame on the bus, addressed to a single node.
///
/// `target` is the full 11-bit id used for arbitration; the first byte of
/// the frame repeats its low byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    target: CanId,
    bytes: Vec<u8, FRAME_CAPACITY>,
}

impl Frame {
    /// Build `[id, opcode, payload.., checksum]`.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::PayloadTooLong` if `payload` exceeds [`MAX_PAYLOAD`].
    pub fn encode(target: CanId, opcode: u8, payload: &[u8]) -> Result<Self, ProtocolError> {
        if payload.len() > MAX_PAYLOAD {
            return Err(ProtocolError::PayloadTooLong {
                len: payload.len(),
                max: MAX_PAYLOAD,
            });
        }

        let mut bytes: Vec<u8, FRAME_CAPACITY> = Vec::new();
        // Capacity is checked above; these cannot fail.
        let _ = bytes.push(target.low_byte());
        let _ = bytes.push(opcode);
        let _ = bytes.extend_from_slice(payload);
        let crc = checksum(&bytes);
        let _ = bytes.push(crc);

        Ok(Self { target, bytes })
    }

    /// Wrap raw bytes received from `target` without checking their contents.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::TooLong` if `bytes` exceeds the frame capacity.
    pub fn from_bytes(target: CanId, bytes: &[u8]) -> Result<Self, ProtocolError> {
        let bytes = Vec::from_slice(bytes).map_err(|_| ProtocolError::TooLong(bytes.len()))?;
        Ok(Self { target, bytes })
    }

    /// Arbitration id of the node this frame belongs to.
    #[inline]
    pub fn target(&self) -> CanId {
        self.target
    }

    /// Every byte of the frame, checksum included.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Bytes after the id byte, i.e. the CAN data field.
    #[inline]
    pub fn data(&self) -> &[u8] {
        self.bytes.get(1..).unwrap_or(&[])
    }

    /// Opcode byte, if present.
    #[inline]
    pub fn opcode(&self) -> Option<u8> {
        self.bytes.get(1).copied()
    }

    /// Bytes between the opcode and the checksum.
    pub fn payload(&self) -> &[u8] {
        let len = self.bytes.len();
        if len < 3 {
            return &[];
        }
        &self.bytes[2..len - 1]
    }

    /// Check the minimum length and the trailing checksum.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::TooShort` or `ProtocolError::Checksum`.
    pub fn verify(&self) -> Result<(), ProtocolError> {
        let len = self.bytes.len();
        if len < 3 {
            return Err(ProtocolError::TooShort(len));
        }
        let expected = checksum(&self.bytes[..len - 1]);
        let found = self.bytes[len - 1];
        if expected != found {
            return Err(ProtocolError::Checksum { expected, found });
        }
        Ok(())
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: i32) -> CanId {
        CanId::new(raw).unwrap()
    }

    #[test]
    fn test_encode_calibrate() {
        let frame = Frame::encode(id(0x01), 0x80, &[0x00]).unwrap();
        assert_eq!(frame.as_bytes(), &[0x01, 0x80, 0x00, 0x81]);
        assert_eq!(frame.data(), &[0x80, 0x00, 0x81]);
        assert_eq!(frame.opcode(), Some(0x80));
        assert_eq!(frame.payload(), &[0x00]);
        assert!(frame.verify().is_ok());
    }

    #[test]
    fn test_encode_uses_low_id_byte() {
        let frame = Frame::encode(id(0x1F0), 0x80, &[0x00]).unwrap();
        assert_eq!(frame.as_bytes()[0], 0xF0);
        // 0xF0 + 0x80 = 0x170, masked
        assert_eq!(frame.as_bytes()[3], 0x70);
        assert_eq!(frame.target().raw(), 0x1F0);
    }

    #[test]
    fn test_encode_empty_and_full_payload() {
        let frame = Frame::encode(id(0x02), 0x30, &[]).unwrap();
        assert_eq!(frame.as_bytes(), &[0x02, 0x30, 0x32]);

        let frame = Frame::encode(id(0x02), 0x30, &[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(frame.as_bytes().len(), FRAME_CAPACITY);
        assert_eq!(frame.data().len(), 8);
    }

    #[test]
    fn test_encode_rejects_long_payload() {
        let result = Frame::encode(id(0x02), 0x30, &[0; 7]);
        assert_eq!(result, Err(ProtocolError::PayloadTooLong { len: 7, max: MAX_PAYLOAD }));
    }

    #[test]
    fn test_verify_detects_corruption() {
        let frame = Frame::from_bytes(id(0x01), &[0x01, 0x80, 0x01, 0x81]).unwrap();
        assert_eq!(
            frame.verify(),
            Err(ProtocolError::Checksum { expected: 0x82, found: 0x81 })
        );

        let frame = Frame::from_bytes(id(0x01), &[0x01, 0x80]).unwrap();
        assert_eq!(frame.verify(), Err(ProtocolError::TooShort(2)));
    }

    #[test]
    fn test_from_bytes_rejects_oversize() {
        assert_eq!(
            Frame::from_bytes(id(0x01), &[0; 10]),
            Err(ProtocolError::TooLong(10))
        );
    }
}
