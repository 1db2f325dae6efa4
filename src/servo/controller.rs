//! Servo controller.
//!
//! Holds the configured state of one servo node, validates every change
//! against the hardware version and work mode, and builds command frames.

use core::time::Duration;

use heapless::String;

use crate::bus::Bus;
use crate::config::units::truncate;
use crate::config::{
    check_current, CanBaudRate, CanId, CurrentLimits, Direction, EnLevel, HoldingCurrent,
    Microsteps, Mode, ServoConfig, Version, ZeroMode, ZeroSpeed,
};
use crate::error::{ConfigError, Error, ProtocolError, Result};
use crate::protocol::{opcode, Ack, Frame};

use super::builder::ServoBuilder;
use super::snapshot::{ParamSnapshot, ParamValue};

/// Reference frame of a `turn` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveKind {
    /// Target is an absolute axis position.
    #[default]
    Absolute,
    /// Target is relative to the current position.
    Relative,
}

/// Which parameter block `read_params` requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadKind {
    /// Accumulated encoder value.
    #[default]
    Addition,
    /// Encoder value split into carry and remainder.
    Carry,
}

/// Controller for one MKS servo on a CAN bus.
///
/// Generic over the bus collaborator `B`. Settings are held locally; only
/// command methods touch the bus.
pub struct ServoController<B>
where
    B: Bus,
{
    pub(super) name: String<32>,
    pub(super) bus: B,
    pub(super) version: Version,
    pub(super) can_id: CanId,
    pub(super) mode: Mode,
    pub(super) working_current_ma: u16,
    pub(super) holding_current: Option<HoldingCurrent>,
    pub(super) microstepping: Option<Microsteps>,
    pub(super) en_level: Option<EnLevel>,
    pub(super) motor_direction: Option<Direction>,
    pub(super) screen_auto_turnoff: bool,
    pub(super) locked_rotor_protection: bool,
    pub(super) mplyer: bool,
    pub(super) can_baud_rate: Option<CanBaudRate>,
    pub(super) can_response: bool,
    pub(super) zero_mode: Option<ZeroMode>,
    pub(super) zero_at_boot: bool,
    pub(super) zero_speed: Option<ZeroSpeed>,
    pub(super) zero_direction: Option<Direction>,
    pub(super) home_trigger_high: bool,
    pub(super) home_direction: Option<Direction>,
    pub(super) home_limit_switch: bool,
    pub(super) home_current_ma: u16,
    pub(super) end_limit: bool,
}

impl<B> ServoController<B>
where
    B: Bus,
{
    /// Create a controller.
    ///
    /// With `apply_defaults` the factory settings are applied through the
    /// validating setters. Construction is atomic: the first failing setter
    /// aborts it and its error is returned.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidCanId` for an id outside 0x001..=0x7FF.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use mks_servo_can::{Mode, ServoController, Version};
    ///
    /// let servo = ServoController::new("x-axis", bus, Version::V42D, 0x01, Mode::SERIAL_VFOC, true)?;
    /// ```
    pub fn new(
        name: &str,
        bus: B,
        version: Version,
        can_id: i32,
        mode: Mode,
        apply_defaults: bool,
    ) -> Result<Self> {
        let can_id = CanId::new(can_id)?;
        let currents = version.currents();

        let mut servo = Self {
            name: truncate(name),
            bus,
            version,
            can_id,
            mode,
            working_current_ma: currents.rated_ma,
            holding_current: None,
            microstepping: None,
            en_level: None,
            motor_direction: None,
            screen_auto_turnoff: false,
            locked_rotor_protection: false,
            mplyer: false,
            can_baud_rate: None,
            can_response: false,
            zero_mode: None,
            zero_at_boot: false,
            zero_speed: None,
            zero_direction: None,
            home_trigger_high: false,
            home_direction: None,
            home_limit_switch: false,
            home_current_ma: currents.home_ma,
            end_limit: false,
        };

        if apply_defaults {
            servo.apply_defaults()?;
        }

        info!(
            "servo {=str} at {} ({=str}, {=str})",
            servo.name.as_str(),
            servo.can_id.raw(),
            servo.version.as_str(),
            servo.mode.as_str()
        );

        Ok(servo)
    }

    /// Start building a controller.
    pub fn builder() -> ServoBuilder<B> {
        ServoBuilder::new()
    }

    /// Create a controller from a configuration entry.
    ///
    /// Overrides are applied after the factory defaults, each gate before
    /// the settings it unlocks. Enabling the end limit runs last since it
    /// homes the axis.
    ///
    /// # Errors
    ///
    /// Returns the first failing setter's error.
    pub fn from_config(config: &ServoConfig, bus: B) -> Result<Self, Error<B::Error>> {
        let mut servo = Self::new(
            config.name.as_str(),
            bus,
            config.version,
            i32::from(config.can_id.raw()),
            config.mode,
            config.apply_defaults,
        )?;
        servo.apply_overrides(config)?;
        Ok(servo)
    }

    fn apply_defaults(&mut self) -> Result<()> {
        if self.mode.control.allows_holding_current() {
            self.set_holding_current(HoldingCurrent::HALF.as_percent())?;
        }
        if self.mode.is_pulse() {
            self.set_motor_direction(Direction::Forward)?;
        }

        self.set_microstepping(Microsteps::SIXTEENTH.value())?;
        self.set_en_level(EnLevel::Low);
        self.set_screen_auto_turnoff(false);
        self.set_locked_rotor_protection(false);
        self.set_mplyer(true);
        self.set_can_baud_rate(CanBaudRate::Baud500k);
        self.set_can_response(true);
        self.set_zero_mode(ZeroMode::Disable);
        self.set_zero_speed(2)?;
        self.set_zero_direction(Direction::Forward);
        self.set_home_trigger_high(false);
        self.set_home_direction(Direction::Forward);
        self.set_home_limit_switch_enabled(true);
        self.disable_end_limit();

        Ok(())
    }

    pub(super) fn apply_overrides(
        &mut self,
        config: &ServoConfig,
    ) -> Result<(), Error<B::Error>> {
        if let Some(ma) = config.working_current_ma {
            self.set_working_current(ma)?;
        }
        if let Some(hold) = config.holding_current {
            self.set_holding_current(hold.as_percent())?;
        }
        if let Some(microsteps) = config.microstepping {
            self.set_microstepping(microsteps.value())?;
        }
        if let Some(level) = config.en_level {
            self.set_en_level(level);
        }
        if let Some(direction) = config.motor_direction {
            self.set_motor_direction(direction)?;
        }
        if let Some(on) = config.screen_auto_turnoff {
            self.set_screen_auto_turnoff(on);
        }
        if let Some(on) = config.locked_rotor_protection {
            self.set_locked_rotor_protection(on);
        }
        if let Some(on) = config.mplyer {
            self.set_mplyer(on);
        }
        if let Some(rate) = config.can_baud_rate {
            self.set_can_baud_rate(rate);
        }
        if let Some(on) = config.can_response {
            self.set_can_response(on);
        }
        if let Some(mode) = config.zero_mode {
            self.set_zero_mode(mode);
        }
        if let Some(on) = config.zero_at_boot {
            self.set_zero_at_boot(on)?;
        }
        if let Some(speed) = config.zero_speed {
            self.set_zero_speed(speed.value())?;
        }
        if let Some(direction) = config.zero_direction {
            self.set_zero_direction(direction);
        }
        if let Some(on) = config.home_trigger_high {
            self.set_home_trigger_high(on);
        }
        if let Some(direction) = config.home_direction {
            self.set_home_direction(direction);
        }
        if let Some(on) = config.home_limit_switch {
            self.set_home_limit_switch_enabled(on);
        }
        if let Some(ma) = config.home_current_ma {
            self.set_home_current(ma)?;
        }
        if let Some(on) = config.end_limit {
            self.set_end_limit_enabled(on)?;
        }
        Ok(())
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Servo name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Hardware version.
    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Current limits of the hardware version.
    #[inline]
    pub fn current_limits(&self) -> CurrentLimits {
        self.version.currents()
    }

    /// Change the hardware version.
    ///
    /// Resets the working current to the version's rated current and the
    /// homing current to its default.
    pub fn set_version(&mut self, version: Version) {
        let currents = version.currents();
        self.version = version;
        self.working_current_ma = currents.rated_ma;
        self.home_current_ma = currents.home_ma;
    }

    /// Node id on the bus.
    #[inline]
    pub fn can_id(&self) -> CanId {
        self.can_id
    }

    /// Change the node id. Local only; nothing is sent.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidCanId` unless `0 < can_id < 0x800`.
    pub fn set_can_id(&mut self, can_id: i32) -> Result<()> {
        let can_id = CanId::new(can_id)?;
        debug!("servo {=str}: can id {} -> {}", self.name.as_str(), self.can_id.raw(), can_id.raw());
        self.can_id = can_id;
        Ok(())
    }

    /// Work mode.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Change the work mode.
    ///
    /// Settings already gated on the previous mode are kept as they are.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Highest speed in the current mode, in RPM.
    #[inline]
    pub fn max_rpm(&self) -> u16 {
        self.mode.max_rpm()
    }

    // =========================================================================
    // Drive settings
    // =========================================================================

    /// Working current in mA.
    #[inline]
    pub fn working_current_ma(&self) -> u16 {
        self.working_current_ma
    }

    /// Set the working current in mA.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::OutOfRange` above the version's maximum.
    pub fn set_working_current(&mut self, ma: u16) -> Result<()> {
        check_current("working_current_ma", ma, self.version.currents().max_ma)?;
        self.working_current_ma = ma;
        Ok(())
    }

    /// Holding current, if set.
    #[inline]
    pub fn holding_current(&self) -> Option<HoldingCurrent> {
        self.holding_current
    }

    /// Set the holding current as a percentage of the working current.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::PreconditionNotMet` in vfoc mode, otherwise
    /// `ConfigError::OutOfRange` outside 10..=90.
    pub fn set_holding_current(&mut self, percent: u8) -> Result<()> {
        if !self.mode.control.allows_holding_current() {
            return Err(ConfigError::PreconditionNotMet {
                param: "holding_current",
                requires: "open or closed loop mode",
            });
        }
        self.holding_current = Some(HoldingCurrent::percent(percent)?);
        Ok(())
    }

    /// Microstep subdivision, if set.
    #[inline]
    pub fn microstepping(&self) -> Option<Microsteps> {
        self.microstepping
    }

    /// Set the microstep subdivision.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::OutOfRange` outside 1..=256.
    pub fn set_microstepping(&mut self, microsteps: u16) -> Result<()> {
        self.microstepping = Some(Microsteps::new(microsteps)?);
        Ok(())
    }

    /// EN pin level, if set.
    #[inline]
    pub fn en_level(&self) -> Option<EnLevel> {
        self.en_level
    }

    /// Set the EN pin level.
    pub fn set_en_level(&mut self, level: EnLevel) {
        self.en_level = Some(level);
    }

    /// Motor direction, if set.
    #[inline]
    pub fn motor_direction(&self) -> Option<Direction> {
        self.motor_direction
    }

    /// Set the motor direction of the pulse interface.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::PreconditionNotMet` unless the mode uses the
    /// pulse interface.
    pub fn set_motor_direction(&mut self, direction: Direction) -> Result<()> {
        if !self.mode.is_pulse() {
            return Err(ConfigError::PreconditionNotMet {
                param: "motor_direction",
                requires: "pulse interface",
            });
        }
        self.motor_direction = Some(direction);
        Ok(())
    }

    /// Turn the screen off automatically.
    pub fn set_screen_auto_turnoff(&mut self, on: bool) {
        self.screen_auto_turnoff = on;
    }

    /// Whether the screen turns off automatically.
    #[inline]
    pub fn is_oled_auto_turnoff(&self) -> bool {
        self.screen_auto_turnoff
    }

    /// Enable locked-rotor protection.
    pub fn set_locked_rotor_protection(&mut self, on: bool) {
        self.locked_rotor_protection = on;
    }

    /// Whether locked-rotor protection is enabled.
    #[inline]
    pub fn is_locked_rotor_protection(&self) -> bool {
        self.locked_rotor_protection
    }

    /// Enable subdivision interpolation.
    pub fn set_mplyer(&mut self, on: bool) {
        self.mplyer = on;
    }

    /// Whether subdivision interpolation is enabled.
    #[inline]
    pub fn is_mplyer_enabled(&self) -> bool {
        self.mplyer
    }

    // =========================================================================
    // CAN settings
    // =========================================================================

    /// CAN bit rate, if set.
    #[inline]
    pub fn can_baud_rate(&self) -> Option<CanBaudRate> {
        self.can_baud_rate
    }

    /// Set the CAN bit rate.
    pub fn set_can_baud_rate(&mut self, rate: CanBaudRate) {
        self.can_baud_rate = Some(rate);
    }

    /// Set whether the servo replies to every command.
    pub fn set_can_response(&mut self, on: bool) {
        self.can_response = on;
    }

    /// Whether the servo replies to every command.
    #[inline]
    pub fn is_can_rsp_enabled(&self) -> bool {
        self.can_response
    }

    // =========================================================================
    // Return to zero
    // =========================================================================

    /// Return-to-zero mode, if set.
    #[inline]
    pub fn zero_mode(&self) -> Option<ZeroMode> {
        self.zero_mode
    }

    /// Set the return-to-zero mode.
    pub fn set_zero_mode(&mut self, mode: ZeroMode) {
        self.zero_mode = Some(mode);
    }

    pub(super) fn zero_return_enabled(&self) -> bool {
        self.zero_mode.map_or(false, ZeroMode::is_enabled)
    }

    /// Whether the servo returns to zero at power-up.
    #[inline]
    pub fn is_zero_at_boot(&self) -> bool {
        self.zero_at_boot
    }

    /// Set whether the servo returns to zero at power-up.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::PreconditionNotMet` unless a zero mode other
    /// than `Disable` is set.
    pub fn set_zero_at_boot(&mut self, on: bool) -> Result<()> {
        if !self.zero_return_enabled() {
            return Err(ConfigError::PreconditionNotMet {
                param: "zero_at_boot",
                requires: "zero mode enabled",
            });
        }
        self.zero_at_boot = on;
        Ok(())
    }

    /// Return-to-zero speed gear, if set.
    #[inline]
    pub fn zero_speed(&self) -> Option<ZeroSpeed> {
        self.zero_speed
    }

    /// Set the return-to-zero speed gear.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::OutOfRange` above 4.
    pub fn set_zero_speed(&mut self, speed: u8) -> Result<()> {
        self.zero_speed = Some(ZeroSpeed::new(speed)?);
        Ok(())
    }

    /// Return-to-zero direction, if set.
    #[inline]
    pub fn zero_direction(&self) -> Option<Direction> {
        self.zero_direction
    }

    /// Set the return-to-zero direction.
    pub fn set_zero_direction(&mut self, direction: Direction) {
        self.zero_direction = Some(direction);
    }

    // =========================================================================
    // Homing
    // =========================================================================

    /// Set whether the home switch triggers on a high level.
    pub fn set_home_trigger_high(&mut self, high: bool) {
        self.home_trigger_high = high;
    }

    /// Whether the home switch triggers on a high level.
    #[inline]
    pub fn is_home_trigger_high(&self) -> bool {
        self.home_trigger_high
    }

    /// Homing direction, if set.
    #[inline]
    pub fn home_direction(&self) -> Option<Direction> {
        self.home_direction
    }

    /// Set the homing direction.
    pub fn set_home_direction(&mut self, direction: Direction) {
        self.home_direction = Some(direction);
    }

    /// Use the home limit switch.
    pub fn set_home_limit_switch_enabled(&mut self, on: bool) {
        self.home_limit_switch = on;
    }

    /// Whether the home limit switch is used.
    #[inline]
    pub fn is_home_limit_switch_enabled(&self) -> bool {
        self.home_limit_switch
    }

    /// Homing current in mA.
    #[inline]
    pub fn home_current_ma(&self) -> u16 {
        self.home_current_ma
    }

    /// Set the homing current in mA.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::PreconditionNotMet` without the home limit
    /// switch, otherwise `ConfigError::OutOfRange` above the version's maximum.
    pub fn set_home_current(&mut self, ma: u16) -> Result<()> {
        if !self.home_limit_switch {
            return Err(ConfigError::PreconditionNotMet {
                param: "home_current_ma",
                requires: "home limit switch",
            });
        }
        check_current("home_current_ma", ma, self.version.currents().max_ma)?;
        self.home_current_ma = ma;
        Ok(())
    }

    /// Whether the end-stop limit is enabled.
    #[inline]
    pub fn is_end_limit_enabled(&self) -> bool {
        self.end_limit
    }

    /// Enable or disable the end-stop limit.
    ///
    /// Enabling it from disabled homes the axis first. If homing fails the
    /// flag is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns the homing error.
    pub fn set_end_limit_enabled(&mut self, on: bool) -> Result<(), Error<B::Error>> {
        if !on {
            self.disable_end_limit();
            return Ok(());
        }
        if !self.end_limit {
            self.go_home()?;
        }
        self.end_limit = true;
        Ok(())
    }

    // Disabling never homes, so it cannot fail.
    fn disable_end_limit(&mut self) {
        self.end_limit = false;
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Build a frame addressed to this servo.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::PayloadTooLong` for more than six payload bytes.
    pub fn build_frame(&self, opcode: u8, payload: &[u8]) -> Result<Frame, ProtocolError> {
        Frame::encode(self.can_id, opcode, payload)
    }

    fn send(&mut self, frame: &Frame) -> Result<(), Error<B::Error>> {
        trace!("servo {=str} send {=[u8]}", self.name.as_str(), frame.as_bytes());
        self.bus.send(frame).map_err(Error::Bus)
    }

    fn unsupported<T>(&self, command: &'static str) -> Result<T, Error<B::Error>> {
        warn!("servo {=str}: {=str} is not implemented", self.name.as_str(), command);
        Err(ConfigError::Unsupported(command).into())
    }

    /// Calibrate the encoder.
    ///
    /// Sends `[id, 0x80, 0x00, checksum]`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Bus` if the transport rejects the frame.
    pub fn calibrate(&mut self) -> Result<(), Error<B::Error>> {
        let frame = self.build_frame(opcode::CALIBRATE, &[0x00])?;
        self.send(&frame)
    }

    /// Restore the servo. Currently a calibration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Bus` if the transport rejects the frame.
    pub fn restore(&mut self) -> Result<(), Error<B::Error>> {
        self.calibrate()
    }

    /// Home the axis.
    ///
    /// # Errors
    ///
    /// Always `ConfigError::Unsupported`; no wire format is defined yet.
    pub fn go_home(&mut self) -> Result<(), Error<B::Error>> {
        self.unsupported("go_home")
    }

    /// Move the axis.
    ///
    /// # Errors
    ///
    /// Always `ConfigError::Unsupported`; no wire format is defined yet.
    pub fn turn(
        &mut self,
        _amount: i32,
        _direction: Direction,
        _velocity_rpm: u16,
        _acceleration: u8,
        _kind: MoveKind,
    ) -> Result<(), Error<B::Error>> {
        self.unsupported("turn")
    }

    /// Read encoder parameters.
    ///
    /// # Errors
    ///
    /// Always `ConfigError::Unsupported`; no wire format is defined yet.
    pub fn read_params(&mut self, _kind: ReadKind) -> Result<(), Error<B::Error>> {
        self.unsupported("read_params")
    }

    /// Wait for one acknowledgement from this servo.
    ///
    /// # Errors
    ///
    /// Returns `Error::Bus` on transport failure or timeout and
    /// `Error::Protocol` if the reply is corrupt or from another node.
    pub fn receive_ack(&mut self, timeout: Duration) -> Result<Ack, Error<B::Error>> {
        let frame = self.bus.receive(timeout).map_err(Error::Bus)?;
        let ack = Ack::decode(&frame, self.can_id)?;
        debug!("servo {=str} ack {=u8} ok={=bool}", self.name.as_str(), ack.opcode, ack.is_success());
        Ok(ack)
    }

    // =========================================================================
    // Bus access
    // =========================================================================

    /// Borrow the bus.
    #[inline]
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutably borrow the bus.
    #[inline]
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Release the bus.
    pub fn into_bus(self) -> B {
        self.bus
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Every parameter as ordered name/value pairs.
    pub fn dump_state(&self) -> ParamSnapshot {
        let currents = self.version.currents();
        ParamSnapshot::new()
            .with("name", ParamValue::Name(self.name.clone()))
            .with("version", ParamValue::Text(self.version.as_str()))
            .with("can_id", ParamValue::Int(i64::from(self.can_id.raw())))
            .with("mode", ParamValue::Text(self.mode.as_str()))
            .with("max_rpm", ParamValue::Int(i64::from(self.max_rpm())))
            .with("working_current_ma", ParamValue::Int(i64::from(self.working_current_ma)))
            .with("max_current_ma", ParamValue::Int(i64::from(currents.max_ma)))
            .with(
                "holding_current_percent",
                ParamValue::int_or_unset(self.holding_current.map(HoldingCurrent::as_percent)),
            )
            .with(
                "microstepping",
                ParamValue::int_or_unset(self.microstepping.map(Microsteps::value)),
            )
            .with("en_level", ParamValue::text_or_unset(self.en_level.map(EnLevel::as_str)))
            .with(
                "motor_direction",
                ParamValue::text_or_unset(self.motor_direction.map(Direction::as_str)),
            )
            .with("screen_auto_turnoff", ParamValue::Bool(self.screen_auto_turnoff))
            .with("locked_rotor_protection", ParamValue::Bool(self.locked_rotor_protection))
            .with("mplyer", ParamValue::Bool(self.mplyer))
            .with(
                "can_baud_rate",
                ParamValue::int_or_unset(self.can_baud_rate.map(CanBaudRate::bits_per_sec)),
            )
            .with("can_response", ParamValue::Bool(self.can_response))
            .with("zero_mode", ParamValue::text_or_unset(self.zero_mode.map(ZeroMode::as_str)))
            .with("zero_at_boot", ParamValue::Bool(self.zero_at_boot))
            .with("zero_speed", ParamValue::int_or_unset(self.zero_speed.map(ZeroSpeed::value)))
            .with(
                "zero_direction",
                ParamValue::text_or_unset(self.zero_direction.map(Direction::as_str)),
            )
            .with("home_trigger_high", ParamValue::Bool(self.home_trigger_high))
            .with(
                "home_direction",
                ParamValue::text_or_unset(self.home_direction.map(Direction::as_str)),
            )
            .with("home_limit_switch", ParamValue::Bool(self.home_limit_switch))
            .with("home_current_ma", ParamValue::Int(i64::from(self.home_current_ma)))
            .with("end_limit", ParamValue::Bool(self.end_limit))
    }

    /// Alias of [`dump_state`](Self::dump_state).
    #[inline]
    pub fn show_params(&self) -> ParamSnapshot {
        self.dump_state()
    }
}

impl<B> core::fmt::Debug for ServoController<B>
where
    B: Bus,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ServoController")
            .field("name", &self.name.as_str())
            .field("version", &self.version)
            .field("can_id", &self.can_id)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use super::*;
    use crate::bus::BusErrorKind;

    #[derive(Default)]
    struct Recorder {
        sent: Vec<Frame>,
    }

    impl Bus for Recorder {
        type Error = BusErrorKind;

        fn send(&mut self, frame: &Frame) -> Result<(), Self::Error> {
            self.sent.push(frame.clone());
            Ok(())
        }

        fn receive(&mut self, _timeout: Duration) -> Result<Frame, Self::Error> {
            Err(BusErrorKind::Timeout)
        }
    }

    fn servo(mode: Mode) -> ServoController<Recorder> {
        ServoController::new("test", Recorder::default(), Version::V42D, 0x01, mode, true).unwrap()
    }

    #[test]
    fn test_new_without_defaults_leaves_options_unset() {
        let servo = ServoController::new(
            "bare",
            Recorder::default(),
            Version::V57D,
            0x10,
            Mode::PULSE_OPEN,
            false,
        )
        .unwrap();

        assert_eq!(servo.working_current_ma(), 3200);
        assert_eq!(servo.home_current_ma(), 400);
        assert!(servo.holding_current().is_none());
        assert!(servo.microstepping().is_none());
        assert!(servo.motor_direction().is_none());
        assert!(!servo.is_mplyer_enabled());
    }

    #[test]
    fn test_defaults_per_mode() {
        let open = servo(Mode::PULSE_OPEN);
        assert_eq!(open.holding_current(), Some(HoldingCurrent::HALF));
        assert_eq!(open.motor_direction(), Some(Direction::Forward));

        let vfoc = servo(Mode::SERIAL_VFOC);
        assert!(vfoc.holding_current().is_none());
        assert!(vfoc.motor_direction().is_none());
        assert_eq!(vfoc.zero_speed().map(ZeroSpeed::value), Some(2));
        assert!(vfoc.is_home_limit_switch_enabled());
        assert!(!vfoc.is_end_limit_enabled());
    }

    #[test]
    fn test_set_version_resets_currents() {
        let mut servo = servo(Mode::SERIAL_CLOSE);
        servo.set_working_current(500).unwrap();
        servo.set_home_current(300).unwrap();

        servo.set_version(Version::V28D);
        assert_eq!(servo.working_current_ma(), 600);
        assert_eq!(servo.home_current_ma(), 200);
    }

    #[test]
    fn test_restore_sends_calibration() {
        let mut servo = servo(Mode::SERIAL_VFOC);
        servo.restore().unwrap();
        assert_eq!(servo.bus().sent.len(), 1);
        assert_eq!(servo.bus().sent[0].as_bytes(), &[0x01, 0x80, 0x00, 0x81]);
    }

    #[test]
    fn test_turn_is_unsupported_at_any_velocity() {
        let mut servo = servo(Mode::SERIAL_OPEN);
        for rpm in [400, 401, u16::MAX] {
            let err = servo
                .turn(100, Direction::Forward, rpm, 10, MoveKind::Absolute)
                .unwrap_err();
            assert_eq!(err.as_config(), Some(&ConfigError::Unsupported("turn")));
        }
        assert!(servo.bus().sent.is_empty());
    }

    #[test]
    fn test_defaults_leave_end_limit_off_without_homing() {
        let mut servo = servo(Mode::SERIAL_VFOC);
        assert!(!servo.is_end_limit_enabled());
        assert!(servo.bus().sent.is_empty());

        servo.set_end_limit_enabled(false).unwrap();
        assert!(!servo.is_end_limit_enabled());
        assert!(servo.bus().sent.is_empty());
    }

    #[test]
    fn test_receive_ack_passes_timeout_through() {
        let mut servo = servo(Mode::SERIAL_VFOC);
        let err = servo.receive_ack(Duration::from_millis(5)).unwrap_err();
        assert_eq!(err.as_bus(), Some(&BusErrorKind::Timeout));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let servo = servo(Mode::SERIAL_VFOC);
        let snapshot = servo.dump_state();

        assert_eq!(snapshot.get("version"), Some(&ParamValue::Text("42D")));
        assert_eq!(snapshot.get("max_rpm"), Some(&ParamValue::Int(3000)));
        assert_eq!(snapshot.get("holding_current_percent"), Some(&ParamValue::Unset));
        assert_eq!(snapshot.get("can_baud_rate"), Some(&ParamValue::Int(500_000)));
        assert_eq!(snapshot, servo.show_params());
    }
}
