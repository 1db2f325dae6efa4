//! Configuration module for mks-servo-can.
//!
//! Typed servo parameters, range-checked value types, and loading of
//! multi-servo configurations from TOML files (with `std` feature).

#[cfg(feature = "std")]
mod loader;
mod params;
mod servo;
mod system;
pub mod units;
mod validation;

pub use params::{
    CanBaudRate, ControlLoop, CurrentLimits, Direction, EnLevel, Interface, Mode, Version,
    ZeroMode,
};
pub use servo::ServoConfig;
pub use system::BusConfig;
pub use units::{CanId, HoldingCurrent, Microsteps, ZeroSpeed};
pub use validation::{validate_config, validate_servo};

pub(crate) use validation::check_current;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};
