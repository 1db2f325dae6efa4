//! Per-servo configuration from TOML.

use heapless::String;
use serde::Deserialize;

use super::params::{CanBaudRate, Direction, EnLevel, Mode, Version, ZeroMode};
use super::units::{truncate, CanId, HoldingCurrent, Microsteps, ZeroSpeed};

/// Complete servo configuration from TOML.
///
/// Identity fields are required. Every setting is optional and, when
/// present, overrides the factory default applied at construction.
#[derive(Debug, Clone, Deserialize)]
pub struct ServoConfig {
    /// Human-readable name (max 32 chars).
    pub name: String<32>,

    /// Hardware version, case-insensitive (`"42D"`, `"57d"`, ...).
    pub version: Version,

    /// Node id on the bus.
    pub can_id: CanId,

    /// Work mode.
    #[serde(default)]
    pub mode: Mode,

    /// Apply factory defaults before the overrides below.
    #[serde(default = "default_apply_defaults")]
    pub apply_defaults: bool,

    /// Working current in mA.
    pub working_current_ma: Option<u16>,

    /// Holding current as a percentage of working current.
    #[serde(rename = "holding_current_percent")]
    pub holding_current: Option<HoldingCurrent>,

    /// Microstep subdivision.
    pub microstepping: Option<Microsteps>,

    /// EN pin level.
    pub en_level: Option<EnLevel>,

    /// Motor direction (pulse interface only).
    pub motor_direction: Option<Direction>,

    /// Turn the screen off automatically.
    pub screen_auto_turnoff: Option<bool>,

    /// Locked-rotor protection.
    pub locked_rotor_protection: Option<bool>,

    /// Subdivision interpolation ("mplyer").
    pub mplyer: Option<bool>,

    /// CAN bit rate.
    pub can_baud_rate: Option<CanBaudRate>,

    /// Reply to every command.
    pub can_response: Option<bool>,

    /// Return-to-zero mode.
    pub zero_mode: Option<ZeroMode>,

    /// Return to zero at power-up.
    pub zero_at_boot: Option<bool>,

    /// Return-to-zero speed gear.
    pub zero_speed: Option<ZeroSpeed>,

    /// Return-to-zero direction.
    pub zero_direction: Option<Direction>,

    /// Home switch triggers on a high level.
    pub home_trigger_high: Option<bool>,

    /// Homing direction.
    pub home_direction: Option<Direction>,

    /// Use the home limit switch.
    pub home_limit_switch: Option<bool>,

    /// Homing current in mA.
    pub home_current_ma: Option<u16>,

    /// End-stop limit; enabling it homes the axis first.
    pub end_limit: Option<bool>,
}

fn default_apply_defaults() -> bool {
    true
}

impl ServoConfig {
    /// Minimal configuration: identity only, factory defaults on.
    pub fn new(name: &str, version: Version, can_id: CanId) -> Self {
        Self {
            name: truncate(name),
            version,
            can_id,
            mode: Mode::default(),
            apply_defaults: true,
            working_current_ma: None,
            holding_current: None,
            microstepping: None,
            en_level: None,
            motor_direction: None,
            screen_auto_turnoff: None,
            locked_rotor_protection: None,
            mplyer: None,
            can_baud_rate: None,
            can_response: None,
            zero_mode: None,
            zero_at_boot: None,
            zero_speed: None,
            zero_direction: None,
            home_trigger_high: None,
            home_direction: None,
            home_limit_switch: None,
            home_current_ma: None,
            end_limit: None,
        }
    }
}
