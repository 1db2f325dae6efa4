//! # mks-servo-can
//!
//! Configuration and command framing for MKS SERVO42D/57D/28D/35D closed-loop
//! stepper servos on a CAN bus.
//!
//! ## Features
//!
//! - **Validated state**: every setter checks ranges and cross-field rules
//!   against the hardware version and work mode
//! - **Checksummed frames**: `[id, opcode, payload.., checksum]` encoding and
//!   acknowledgement decoding
//! - **Pluggable transport**: any [`Bus`], with an adapter for
//!   `embedded-can` blocking drivers
//! - **no_std compatible**: core library works without standard library
//! - **Configuration files**: describe a whole bus segment in TOML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mks_servo_can::{Mode, ServoController, Version};
//!
//! let mut servo = ServoController::builder()
//!     .name("x-axis")
//!     .version("42D".parse::<Version>()?)
//!     .can_id(0x01)
//!     .mode(Mode::SERIAL_VFOC)
//!     .bus(bus)
//!     .build()?;
//!
//! servo.set_working_current(2000)?;
//! servo.calibrate()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Must come first so the logging macros are visible to every module.
mod fmt;

pub mod bus;
pub mod config;
pub mod error;
pub mod protocol;
pub mod servo;

// Re-exports for ergonomic API
pub use bus::{Bus, BusError, BusErrorKind, CanBus, CanBusError};
pub use config::{
    validate_config, BusConfig, CanBaudRate, ControlLoop, CurrentLimits, Direction, EnLevel,
    Interface, Mode, ServoConfig, Version, ZeroMode,
};
pub use error::{ConfigError, Error, ProtocolError, Result};
pub use protocol::{checksum, Ack, Frame, Response};
pub use servo::{MoveKind, ParamSnapshot, ParamValue, ReadKind, ServoBuilder, ServoController};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{CanId, HoldingCurrent, Microsteps, ZeroSpeed};
