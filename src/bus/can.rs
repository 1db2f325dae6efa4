//! Adapter from `embedded-can` blocking drivers to [`Bus`].

use core::time::Duration;

use embedded_can::{blocking::Can, Frame as _, Id, StandardId};
use heapless::Vec;

use crate::config::CanId;
use crate::error::ProtocolError;
use crate::protocol::{Frame, FRAME_CAPACITY};

use super::{Bus, BusError, BusErrorKind};

/// Errors from [`CanBus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanBusError<E> {
    /// Driver error, unmodified.
    Transport(E),
    /// Received frame used an extended or out-of-range id.
    UnexpectedId,
    /// Received data does not form a servo frame.
    Protocol(ProtocolError),
    /// Driver refused to build a frame from the data.
    Encoding,
}

impl<E: embedded_can::Error> BusError for CanBusError<E> {
    fn kind(&self) -> BusErrorKind {
        match self {
            CanBusError::Transport(_) | CanBusError::Encoding => BusErrorKind::Transport,
            CanBusError::UnexpectedId | CanBusError::Protocol(_) => BusErrorKind::Malformed,
        }
    }
}

/// Runs servo frames over any `embedded_can::blocking::Can` driver.
///
/// The frame's target becomes the standard identifier and everything after
/// the id byte becomes the data field. `blocking::Can` has no timeout, so
/// `receive` relies on the driver's own configuration for that.
#[derive(Debug)]
pub struct CanBus<C> {
    can: C,
}

impl<C: Can> CanBus<C> {
    /// Wrap a driver.
    pub fn new(can: C) -> Self {
        Self { can }
    }

    /// Borrow the driver.
    pub fn inner(&mut self) -> &mut C {
        &mut self.can
    }

    /// Release the driver.
    pub fn into_inner(self) -> C {
        self.can
    }
}

impl<C: Can> Bus for CanBus<C> {
    type Error = CanBusError<C::Error>;

    fn send(&mut self, frame: &Frame) -> Result<(), Self::Error> {
        let id = StandardId::new(frame.target().raw()).ok_or(CanBusError::UnexpectedId)?;
        let raw = C::Frame::new(id, frame.data()).ok_or(CanBusError::Encoding)?;
        self.can.transmit(&raw).map_err(CanBusError::Transport)
    }

    fn receive(&mut self, _timeout: Duration) -> Result<Frame, Self::Error> {
        let raw = self.can.receive().map_err(CanBusError::Transport)?;
        let target = match raw.id() {
            Id::Standard(id) => CanId::new(i32::from(id.as_raw()))
                .map_err(|_| CanBusError::UnexpectedId)?,
            Id::Extended(_) => return Err(CanBusError::UnexpectedId),
        };

        let mut bytes: Vec<u8, FRAME_CAPACITY> = Vec::new();
        let _ = bytes.push(target.low_byte());
        bytes
            .extend_from_slice(raw.data())
            .map_err(|_| CanBusError::Protocol(ProtocolError::TooLong(raw.data().len() + 1)))?;

        Frame::from_bytes(target, &bytes).map_err(CanBusError::Protocol)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec as StdVec;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct TestFrame {
        id: Id,
        data: StdVec<u8>,
    }

    impl embedded_can::Frame for TestFrame {
        fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
            if data.len() > 8 {
                return None;
            }
            Some(Self { id: id.into(), data: data.to_vec() })
        }

        fn new_remote(_id: impl Into<Id>, _dlc: usize) -> Option<Self> {
            None
        }

        fn is_extended(&self) -> bool {
            matches!(self.id, Id::Extended(_))
        }

        fn is_remote_frame(&self) -> bool {
            false
        }

        fn id(&self) -> Id {
            self.id
        }

        fn dlc(&self) -> usize {
            self.data.len()
        }

        fn data(&self) -> &[u8] {
            &self.data
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct TestError;

    impl embedded_can::Error for TestError {
        fn kind(&self) -> embedded_can::ErrorKind {
            embedded_can::ErrorKind::Other
        }
    }

    #[derive(Default)]
    struct Loopback {
        sent: StdVec<TestFrame>,
        inbox: StdVec<TestFrame>,
    }

    impl Can for Loopback {
        type Frame = TestFrame;
        type Error = TestError;

        fn transmit(&mut self, frame: &Self::Frame) -> Result<(), Self::Error> {
            self.sent.push(frame.clone());
            Ok(())
        }

        fn receive(&mut self) -> Result<Self::Frame, Self::Error> {
            self.inbox.pop().ok_or(TestError)
        }
    }

    fn id(raw: i32) -> CanId {
        CanId::new(raw).unwrap()
    }

    #[test]
    fn test_send_splits_id_and_data() {
        let mut bus = CanBus::new(Loopback::default());
        let frame = Frame::encode(id(0x123), 0x80, &[0x00]).unwrap();
        bus.send(&frame).unwrap();

        let sent = &bus.inner().sent[0];
        assert_eq!(sent.id, Id::Standard(StandardId::new(0x123).unwrap()));
        assert_eq!(sent.data, [0x80, 0x00, 0xA3]);
    }

    #[test]
    fn test_receive_rebuilds_frame() {
        let mut driver = Loopback::default();
        driver.inbox.push(TestFrame {
            id: Id::Standard(StandardId::new(0x01).unwrap()),
            data: [0x80, 0x01, 0x82].to_vec(),
        });
        let mut bus = CanBus::new(driver);

        let frame = bus.receive(Duration::from_millis(10)).unwrap();
        assert_eq!(frame.as_bytes(), &[0x01, 0x80, 0x01, 0x82]);
        assert!(frame.verify().is_ok());
    }

    #[test]
    fn test_receive_rejects_extended_id() {
        let mut driver = Loopback::default();
        driver.inbox.push(TestFrame {
            id: Id::Extended(embedded_can::ExtendedId::new(0x1000).unwrap()),
            data: [0x00].to_vec(),
        });
        let mut bus = CanBus::new(driver);

        let err = bus.receive(Duration::from_millis(10)).unwrap_err();
        assert_eq!(err, CanBusError::UnexpectedId);
        assert_eq!(err.kind(), BusErrorKind::Malformed);
    }

    #[test]
    fn test_transport_error_passes_through() {
        let mut bus = CanBus::new(Loopback::default());
        let err = bus.receive(Duration::from_millis(10)).unwrap_err();
        assert_eq!(err, CanBusError::Transport(TestError));
        assert_eq!(err.kind(), BusErrorKind::Transport);
    }
}
