//! Error types for mks-servo-can.
//!
//! Configuration errors come from setters and constructors, protocol errors
//! from frame encoding and acknowledgement decoding, and bus errors are carried
//! through untouched from the transport.

use core::fmt;

/// Result type alias; defaults to [`ConfigError`], the error every setter returns.
pub type Result<T, E = ConfigError> = core::result::Result<T, E>;

/// Unified error type for command methods that touch the bus.
///
/// `E` is the transport's own error type, propagated unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error<E> {
    /// Configuration or validation error
    Config(ConfigError),
    /// Frame encoding or acknowledgement decoding error
    Protocol(ProtocolError),
    /// Transport error reported by the bus collaborator
    Bus(E),
}

/// Configuration and validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Unknown hardware version (supported: 42D, 57D, 28D, 35D)
    InvalidVersion(heapless::String<16>),
    /// CAN id outside 0x001..=0x7FF
    InvalidCanId(i32),
    /// Unknown work mode
    InvalidMode(heapless::String<16>),
    /// Numeric value outside its allowed range
    OutOfRange {
        /// Parameter name
        param: &'static str,
        /// Rejected value
        value: i64,
        /// Smallest accepted value
        min: i64,
        /// Largest accepted value
        max: i64,
    },
    /// Value not a member of the parameter's enumeration
    InvalidEnum {
        /// Parameter name
        param: &'static str,
        /// Accepted values
        allowed: &'static [&'static str],
    },
    /// A setter was called before the setting it depends on allowed it
    PreconditionNotMet {
        /// Parameter that was being set
        param: &'static str,
        /// Condition that must hold first
        requires: &'static str,
    },
    /// Command has no defined wire behaviour yet
    Unsupported(&'static str),
    /// A required construction parameter was not supplied
    MissingField(&'static str),
    /// Failed to parse a configuration file
    ParseError(heapless::String<128>),
    /// Servo name not found in configuration
    ServoNotFound(heapless::String<32>),
    /// Two servos in one configuration share a name
    DuplicateServoName(heapless::String<32>),
    /// Two servos on one bus segment share a CAN id
    DuplicateCanId(u16),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Frame encoding and decoding errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Payload does not fit a single CAN data field
    PayloadTooLong {
        /// Requested payload length
        len: usize,
        /// Maximum payload length
        max: usize,
    },
    /// Frame shorter than id + opcode + checksum
    TooShort(usize),
    /// Frame longer than a CAN data field plus the id byte
    TooLong(usize),
    /// Trailing checksum does not match the frame contents
    Checksum {
        /// Checksum computed over the frame
        expected: u8,
        /// Checksum carried by the frame
        found: u8,
    },
    /// Frame is addressed to a different node
    AddressMismatch {
        /// CAN id of the controller
        expected: u16,
        /// CAN id, or id byte, carried by the frame
        found: u16,
    },
    /// Status byte is not a known acknowledgement value
    InvalidStatus(u8),
}

impl<E> Error<E> {
    /// The configuration error, if this is one.
    pub fn as_config(&self) -> Option<&ConfigError> {
        match self {
            Error::Config(e) => Some(e),
            _ => None,
        }
    }

    /// The transport error, if this is one.
    pub fn as_bus(&self) -> Option<&E> {
        match self {
            Error::Bus(e) => Some(e),
            _ => None,
        }
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Protocol(e) => write!(f, "Protocol error: {}", e),
            Error::Bus(e) => write!(f, "Bus error: {:?}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidVersion(v) => {
                write!(f, "Invalid version '{}'. Supported: 42D, 57D, 28D, 35D", v)
            }
            ConfigError::InvalidCanId(id) => {
                write!(f, "Invalid CAN id {}. Must be 0x001-0x7FF", id)
            }
            ConfigError::InvalidMode(m) => write!(
                f,
                "Invalid mode '{}'. Supported: pulse-open, pulse-close, pulse-vfoc, serial-open, serial-close, serial-vfoc",
                m
            ),
            ConfigError::OutOfRange { param, value, min, max } => {
                write!(f, "{} = {} out of range [{}, {}]", param, value, min, max)
            }
            ConfigError::InvalidEnum { param, allowed } => {
                write!(f, "Invalid {}. Allowed: ", param)?;
                for (i, a) in allowed.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", a)?;
                }
                Ok(())
            }
            ConfigError::PreconditionNotMet { param, requires } => {
                write!(f, "Cannot set {}: requires {}", param, requires)
            }
            ConfigError::Unsupported(cmd) => write!(f, "Command '{}' is not implemented", cmd),
            ConfigError::MissingField(name) => write!(f, "{} is required", name),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::ServoNotFound(name) => write!(f, "Servo '{}' not found", name),
            ConfigError::DuplicateServoName(name) => write!(f, "Duplicate servo name: '{}'", name),
            ConfigError::DuplicateCanId(id) => write!(f, "Duplicate CAN id: 0x{:03X}", id),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::PayloadTooLong { len, max } => {
                write!(f, "Payload of {} bytes exceeds maximum {}", len, max)
            }
            ProtocolError::TooShort(len) => write!(f, "Frame of {} bytes is too short", len),
            ProtocolError::TooLong(len) => write!(f, "Frame of {} bytes is too long", len),
            ProtocolError::Checksum { expected, found } => {
                write!(f, "Checksum mismatch: expected 0x{:02X}, found 0x{:02X}", expected, found)
            }
            ProtocolError::AddressMismatch { expected, found } => {
                write!(f, "Frame for node 0x{:03X}, expected 0x{:03X}", found, expected)
            }
            ProtocolError::InvalidStatus(s) => write!(f, "Unknown status byte 0x{:02X}", s),
        }
    }
}

// Conversion impls
impl<E> From<ConfigError> for Error<E> {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl<E> From<ProtocolError> for Error<E> {
    fn from(e: ProtocolError) -> Self {
        Error::Protocol(e)
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for ProtocolError {}
