//! Enumerated servo parameters.
//!
//! String forms match the names used in configuration files and diagnostics.

use core::fmt;
use core::str::FromStr;

use serde::Deserialize;

use super::units::{de_error, truncate};
use crate::error::ConfigError;

/// Current limits fixed by the hardware version, in mA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CurrentLimits {
    /// Rated working current.
    pub rated_ma: u16,
    /// Maximum working current.
    pub max_ma: u16,
    /// Default homing current.
    pub home_ma: u16,
}

/// Hardware version of the servo board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Version {
    /// SERVO42D
    V42D,
    /// SERVO57D
    V57D,
    /// SERVO28D
    V28D,
    /// SERVO35D
    V35D,
}

impl Version {
    /// All supported versions.
    pub const ALL: [Version; 4] = [Version::V42D, Version::V57D, Version::V28D, Version::V35D];

    /// Current limits for this version.
    pub const fn currents(self) -> CurrentLimits {
        let (rated_ma, max_ma, home_ma) = match self {
            Version::V42D => (1600, 3000, 800),
            Version::V57D => (3200, 5200, 400),
            Version::V28D => (600, 3000, 200),
            Version::V35D => (800, 3000, 200),
        };
        CurrentLimits { rated_ma, max_ma, home_ma }
    }

    /// Canonical name, e.g. `"42D"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Version::V42D => "42D",
            Version::V57D => "57D",
            Version::V28D => "28D",
            Version::V35D => "35D",
        }
    }
}

impl FromStr for Version {
    type Err = ConfigError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::ALL
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::InvalidVersion(truncate(s)))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the servo receives motion commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Interface {
    /// STEP/DIR pulse input.
    Pulse,
    /// Bus commands (CAN/UART).
    Serial,
}

/// Control loop running on the servo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlLoop {
    /// Open loop stepping.
    Open,
    /// Closed loop with encoder feedback.
    Closed,
    /// Closed loop field-oriented control.
    Vfoc,
}

impl ControlLoop {
    /// Highest speed the loop supports, in RPM.
    pub const fn max_rpm(self) -> u16 {
        match self {
            ControlLoop::Open => 400,
            ControlLoop::Closed => 1500,
            ControlLoop::Vfoc => 3000,
        }
    }

    /// Whether a holding current may be configured.
    ///
    /// vfoc regulates current itself, so it rejects one.
    pub const fn allows_holding_current(self) -> bool {
        !matches!(self, ControlLoop::Vfoc)
    }
}

/// Work mode: interface plus control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mode {
    /// Command interface.
    pub interface: Interface,
    /// Control loop.
    pub control: ControlLoop,
}

impl Mode {
    /// `pulse-open`
    pub const PULSE_OPEN: Mode = Mode::new(Interface::Pulse, ControlLoop::Open);
    /// `pulse-close`
    pub const PULSE_CLOSE: Mode = Mode::new(Interface::Pulse, ControlLoop::Closed);
    /// `pulse-vfoc`
    pub const PULSE_VFOC: Mode = Mode::new(Interface::Pulse, ControlLoop::Vfoc);
    /// `serial-open`
    pub const SERIAL_OPEN: Mode = Mode::new(Interface::Serial, ControlLoop::Open);
    /// `serial-close`
    pub const SERIAL_CLOSE: Mode = Mode::new(Interface::Serial, ControlLoop::Closed);
    /// `serial-vfoc`
    pub const SERIAL_VFOC: Mode = Mode::new(Interface::Serial, ControlLoop::Vfoc);

    /// All six modes.
    pub const ALL: [Mode; 6] = [
        Mode::PULSE_OPEN,
        Mode::PULSE_CLOSE,
        Mode::PULSE_VFOC,
        Mode::SERIAL_OPEN,
        Mode::SERIAL_CLOSE,
        Mode::SERIAL_VFOC,
    ];

    /// Create a mode from its two axes.
    pub const fn new(interface: Interface, control: ControlLoop) -> Self {
        Self { interface, control }
    }

    /// Highest speed in this mode, in RPM.
    pub const fn max_rpm(self) -> u16 {
        self.control.max_rpm()
    }

    /// Whether the STEP/DIR interface is active.
    pub const fn is_pulse(self) -> bool {
        matches!(self.interface, Interface::Pulse)
    }

    /// Canonical name, e.g. `"serial-vfoc"`.
    pub const fn as_str(self) -> &'static str {
        match (self.interface, self.control) {
            (Interface::Pulse, ControlLoop::Open) => "pulse-open",
            (Interface::Pulse, ControlLoop::Closed) => "pulse-close",
            (Interface::Pulse, ControlLoop::Vfoc) => "pulse-vfoc",
            (Interface::Serial, ControlLoop::Open) => "serial-open",
            (Interface::Serial, ControlLoop::Closed) => "serial-close",
            (Interface::Serial, ControlLoop::Vfoc) => "serial-vfoc",
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::SERIAL_VFOC
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidMode(truncate(s)))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Level of the EN pin that enables the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EnLevel {
    /// Enabled while EN is high.
    High,
    /// Enabled while EN is low.
    Low,
    /// Always enabled, EN ignored.
    Hold,
}

impl EnLevel {
    const NAMES: &'static [&'static str] = &["high", "low", "hold"];

    /// Canonical name.
    pub const fn as_str(self) -> &'static str {
        match self {
            EnLevel::High => "high",
            EnLevel::Low => "low",
            EnLevel::Hold => "hold",
        }
    }
}

impl FromStr for EnLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(EnLevel::High),
            "low" => Ok(EnLevel::Low),
            "hold" => Ok(EnLevel::Hold),
            _ => Err(ConfigError::InvalidEnum { param: "en_level", allowed: Self::NAMES }),
        }
    }
}

/// Return-to-zero behaviour at power-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ZeroMode {
    /// No return to zero.
    Disable,
    /// Return in the configured zero direction.
    Direction,
    /// Return by the nearest path.
    Near,
}

impl ZeroMode {
    const NAMES: &'static [&'static str] = &["disable", "direction", "near"];

    /// Canonical name.
    pub const fn as_str(self) -> &'static str {
        match self {
            ZeroMode::Disable => "disable",
            ZeroMode::Direction => "direction",
            ZeroMode::Near => "near",
        }
    }

    /// Whether any return-to-zero is configured.
    pub const fn is_enabled(self) -> bool {
        !matches!(self, ZeroMode::Disable)
    }
}

impl FromStr for ZeroMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disable" => Ok(ZeroMode::Disable),
            "direction" => Ok(ZeroMode::Direction),
            "near" => Ok(ZeroMode::Near),
            _ => Err(ConfigError::InvalidEnum { param: "zero_mode", allowed: Self::NAMES }),
        }
    }
}

/// CAN bit rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CanBaudRate {
    /// 125 kbit/s
    Baud125k,
    /// 250 kbit/s
    Baud250k,
    /// 500 kbit/s
    Baud500k,
    /// 1 Mbit/s
    Baud1M,
}

impl CanBaudRate {
    const NAMES: &'static [&'static str] = &["125000", "250000", "500000", "1000000"];

    /// Bit rate in bit/s.
    pub const fn bits_per_sec(self) -> u32 {
        match self {
            CanBaudRate::Baud125k => 125_000,
            CanBaudRate::Baud250k => 250_000,
            CanBaudRate::Baud500k => 500_000,
            CanBaudRate::Baud1M => 1_000_000,
        }
    }
}

impl TryFrom<u32> for CanBaudRate {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            125_000 => Ok(CanBaudRate::Baud125k),
            250_000 => Ok(CanBaudRate::Baud250k),
            500_000 => Ok(CanBaudRate::Baud500k),
            1_000_000 => Ok(CanBaudRate::Baud1M),
            _ => Err(ConfigError::InvalidEnum { param: "can_baud_rate", allowed: Self::NAMES }),
        }
    }
}

/// Rotation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Clockwise, the factory default.
    #[default]
    Forward,
    /// Counter-clockwise.
    Reverse,
}

impl Direction {
    /// Canonical name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        }
    }
}

macro_rules! deserialize_from_str {
    ($ty:ty) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let value = heapless::String::<16>::deserialize(deserializer)?;
                value.parse::<$ty>().map_err(de_error)
            }
        }
    };
}

deserialize_from_str!(Version);
deserialize_from_str!(Mode);
deserialize_from_str!(EnLevel);
deserialize_from_str!(ZeroMode);

impl<'de> Deserialize<'de> for CanBaudRate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u32::deserialize(deserializer)?;
        CanBaudRate::try_from(value).map_err(de_error)
    }
}
