//! Servo controller, its builder and capability views.

mod builder;
mod controller;
mod snapshot;
mod views;

pub use builder::ServoBuilder;
pub use controller::{MoveKind, ReadKind, ServoController};
pub use snapshot::{ParamSnapshot, ParamValue, SNAPSHOT_CAPACITY};
pub use views::{CurrentHold, LimitSwitchHoming, PulseInterface, ZeroReturn};
