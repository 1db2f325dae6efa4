//! Range-checked value types.
//!
//! Each type validates at construction so a held value is always in range.
//! Invalid input never reaches controller state.

use core::fmt;

use serde::Deserialize;

use crate::error::ConfigError;

/// Convert a validation error into a serde error with the same message.
pub(crate) fn de_error<E: serde::de::Error>(e: ConfigError) -> E {
    use core::fmt::Write;
    let mut buf = heapless::String::<128>::new();
    let _ = write!(buf, "{}", e);
    E::custom(buf.as_str())
}

/// Copy `s` into a fixed-capacity string, dropping whatever does not fit.
pub(crate) fn truncate<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Standard 11-bit CAN node id, 0x001..=0x7FF.
///
/// 0 is the broadcast address and is never a valid node id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanId(u16);

impl CanId {
    /// Smallest node id.
    pub const MIN: u16 = 0x001;
    /// Largest standard (11-bit) id.
    pub const MAX: u16 = 0x7FF;

    /// Create a new CanId with validation.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidCanId` unless `0 < raw < 0x800`.
    pub fn new(raw: i32) -> Result<Self, ConfigError> {
        if raw >= i32::from(Self::MIN) && raw <= i32::from(Self::MAX) {
            Ok(Self(raw as u16))
        } else {
            Err(ConfigError::InvalidCanId(raw))
        }
    }

    /// Get the raw 11-bit id.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Low byte of the id, the first byte of every frame.
    #[inline]
    pub const fn low_byte(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

impl TryFrom<i32> for CanId {
    type Error = ConfigError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for CanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:03X}", self.0)
    }
}

impl<'de> Deserialize<'de> for CanId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = i32::deserialize(deserializer)?;
        CanId::new(value).map_err(de_error)
    }
}

/// Microstep subdivision, 1..=256.
///
/// Unlike plain STEP/DIR drivers the servo accepts any subdivision in range,
/// not only powers of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Microsteps(u16);

impl Microsteps {
    /// Full step.
    pub const FULL: Self = Self(1);
    /// Sixteenth step, the factory setting.
    pub const SIXTEENTH: Self = Self(16);
    /// 256th step (maximum resolution).
    pub const TWO_FIFTY_SIXTH: Self = Self(256);

    const MIN: u16 = 1;
    const MAX: u16 = 256;

    /// Create a new Microsteps value with validation.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::OutOfRange` outside 1..=256.
    pub fn new(value: u16) -> Result<Self, ConfigError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ConfigError::OutOfRange {
                param: "microstepping",
                value: i64::from(value),
                min: i64::from(Self::MIN),
                max: i64::from(Self::MAX),
            })
        }
    }

    /// Get the raw divisor value.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl Default for Microsteps {
    fn default() -> Self {
        Self::SIXTEENTH
    }
}

impl TryFrom<u16> for Microsteps {
    type Error = ConfigError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Microsteps {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u16::deserialize(deserializer)?;
        Microsteps::new(value).map_err(de_error)
    }
}

/// Return-to-zero speed gear, 0 (slowest) ..= 4 (fastest).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroSpeed(u8);

impl ZeroSpeed {
    /// Highest speed gear.
    pub const MAX: u8 = 4;

    /// Create a new ZeroSpeed with validation.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::OutOfRange` above 4.
    pub fn new(value: u8) -> Result<Self, ConfigError> {
        if value <= Self::MAX {
            Ok(Self(value))
        } else {
            Err(ConfigError::OutOfRange {
                param: "zero_speed",
                value: i64::from(value),
                min: 0,
                max: i64::from(Self::MAX),
            })
        }
    }

    /// Get the raw gear.
    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl<'de> Deserialize<'de> for ZeroSpeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        ZeroSpeed::new(value).map_err(de_error)
    }
}

/// Holding current as a percentage of the working current, 10..=90.
///
/// Only meaningful in open and closed loop modes; vfoc regulates current itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldingCurrent(u8);

impl HoldingCurrent {
    /// Half the working current, the factory setting.
    pub const HALF: Self = Self(50);

    const MIN: u8 = 10;
    const MAX: u8 = 90;

    /// Create a holding current from a percentage.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::OutOfRange` outside 10..=90.
    pub fn percent(value: u8) -> Result<Self, ConfigError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ConfigError::OutOfRange {
                param: "holding_current",
                value: i64::from(value),
                min: i64::from(Self::MIN),
                max: i64::from(Self::MAX),
            })
        }
    }

    /// Percentage of working current.
    #[inline]
    pub const fn as_percent(self) -> u8 {
        self.0
    }

    /// Holding current in mA for a given working current.
    #[inline]
    pub fn of(self, working_ma: u16) -> u16 {
        (u32::from(working_ma) * u32::from(self.0) / 100) as u16
    }
}

impl<'de> Deserialize<'de> for HoldingCurrent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        HoldingCurrent::percent(value).map_err(de_error)
    }
}
