//! Bus collaborator.
//!
//! The controller only needs to hand a frame to a transport and, optionally,
//! read one back. Several controllers can share one transport through
//! `&mut B` or `&RefCell<B>`.

mod can;

use core::cell::RefCell;
use core::time::Duration;

use crate::protocol::Frame;

pub use can::{CanBus, CanBusError};

/// Coarse classification of transport errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusErrorKind {
    /// No frame arrived before the timeout.
    Timeout,
    /// Transport-level failure (bus off, arbitration, driver error).
    Transport,
    /// A frame arrived that cannot be represented as a servo frame.
    Malformed,
}

/// Error reported by a [`Bus`].
pub trait BusError: core::fmt::Debug {
    /// Classify the error.
    fn kind(&self) -> BusErrorKind;
}

impl BusError for BusErrorKind {
    fn kind(&self) -> BusErrorKind {
        *self
    }
}

/// Blocking frame transport.
pub trait Bus {
    /// Transport error type.
    type Error: BusError;

    /// Send one frame.
    fn send(&mut self, frame: &Frame) -> Result<(), Self::Error>;

    /// Wait up to `timeout` for one frame.
    fn receive(&mut self, timeout: Duration) -> Result<Frame, Self::Error>;
}

impl<B: Bus + ?Sized> Bus for &mut B {
    type Error = B::Error;

    fn send(&mut self, frame: &Frame) -> Result<(), Self::Error> {
        (**self).send(frame)
    }

    fn receive(&mut self, timeout: Duration) -> Result<Frame, Self::Error> {
        (**self).receive(timeout)
    }
}

/// Shares one transport between controllers on a single thread.
impl<B: Bus> Bus for &RefCell<B> {
    type Error = B::Error;

    fn send(&mut self, frame: &Frame) -> Result<(), Self::Error> {
        self.borrow_mut().send(frame)
    }

    fn receive(&mut self, timeout: Duration) -> Result<Frame, Self::Error> {
        self.borrow_mut().receive(timeout)
    }
}
