//! Capability views.
//!
//! Each view is handed out only while the setting that gates it holds, so
//! its setters cannot fail on that precondition.

use crate::bus::Bus;
use crate::config::{check_current, Direction, HoldingCurrent, ZeroMode};
use crate::error::Result;

use super::controller::ServoController;

/// Holding current, available outside vfoc mode.
pub struct CurrentHold<'a, B: Bus> {
    servo: &'a mut ServoController<B>,
}

impl<B: Bus> CurrentHold<'_, B> {
    /// Holding current, if set.
    pub fn get(&self) -> Option<HoldingCurrent> {
        self.servo.holding_current
    }

    /// Set the holding current.
    pub fn set(&mut self, hold: HoldingCurrent) {
        self.servo.holding_current = Some(hold);
    }

    /// Holding current in mA at the present working current.
    pub fn milliamps(&self) -> Option<u16> {
        self.servo
            .holding_current
            .map(|hold| hold.of(self.servo.working_current_ma))
    }
}

/// STEP/DIR interface settings, available in pulse modes.
pub struct PulseInterface<'a, B: Bus> {
    servo: &'a mut ServoController<B>,
}

impl<B: Bus> PulseInterface<'_, B> {
    /// Motor direction, if set.
    pub fn motor_direction(&self) -> Option<Direction> {
        self.servo.motor_direction
    }

    /// Set the motor direction.
    pub fn set_motor_direction(&mut self, direction: Direction) {
        self.servo.motor_direction = Some(direction);
    }
}

/// Return-to-zero settings, available once a zero mode other than
/// `Disable` is set.
pub struct ZeroReturn<'a, B: Bus> {
    servo: &'a mut ServoController<B>,
}

impl<B: Bus> ZeroReturn<'_, B> {
    /// Active zero mode.
    pub fn mode(&self) -> Option<ZeroMode> {
        self.servo.zero_mode
    }

    /// Set whether the servo returns to zero at power-up.
    pub fn set_zero_at_boot(&mut self, on: bool) {
        self.servo.zero_at_boot = on;
    }
}

/// Limit-switch homing settings, available while the home switch is used.
pub struct LimitSwitchHoming<'a, B: Bus> {
    servo: &'a mut ServoController<B>,
}

impl<B: Bus> LimitSwitchHoming<'_, B> {
    /// Homing current in mA.
    pub fn home_current_ma(&self) -> u16 {
        self.servo.home_current_ma
    }

    /// Set the homing current in mA.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::OutOfRange` above the version's maximum.
    pub fn set_home_current(&mut self, ma: u16) -> Result<()> {
        check_current("home_current_ma", ma, self.servo.version.currents().max_ma)?;
        self.servo.home_current_ma = ma;
        Ok(())
    }
}

impl<B: Bus> ServoController<B> {
    /// Holding current view, `None` in vfoc mode.
    pub fn current_hold(&mut self) -> Option<CurrentHold<'_, B>> {
        self.mode
            .control
            .allows_holding_current()
            .then(|| CurrentHold { servo: self })
    }

    /// Pulse interface view, `None` in serial modes.
    pub fn pulse_interface(&mut self) -> Option<PulseInterface<'_, B>> {
        self.mode.is_pulse().then(|| PulseInterface { servo: self })
    }

    /// Return-to-zero view, `None` while zero mode is unset or disabled.
    pub fn zero_return(&mut self) -> Option<ZeroReturn<'_, B>> {
        self.zero_return_enabled().then(|| ZeroReturn { servo: self })
    }

    /// Limit-switch homing view, `None` while the home switch is unused.
    pub fn limit_switch_homing(&mut self) -> Option<LimitSwitchHoming<'_, B>> {
        self.home_limit_switch
            .then(|| LimitSwitchHoming { servo: self })
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use core::time::Duration;

    use super::*;
    use crate::bus::BusErrorKind;
    use crate::config::{Mode, Version};
    use crate::protocol::Frame;

    struct NullBus;

    impl Bus for NullBus {
        type Error = BusErrorKind;

        fn send(&mut self, _frame: &Frame) -> Result<(), Self::Error> {
            Ok(())
        }

        fn receive(&mut self, _timeout: Duration) -> Result<Frame, Self::Error> {
            Err(BusErrorKind::Timeout)
        }
    }

    fn servo(mode: Mode) -> ServoController<NullBus> {
        ServoController::new("view", NullBus, Version::V42D, 0x01, mode, true).unwrap()
    }

    #[test]
    fn test_current_hold_gated_on_control_loop() {
        assert!(servo(Mode::SERIAL_VFOC).current_hold().is_none());

        let mut servo = servo(Mode::SERIAL_CLOSE);
        let mut hold = servo.current_hold().unwrap();
        assert_eq!(hold.milliamps(), Some(800));
        hold.set(HoldingCurrent::percent(20).unwrap());
        assert_eq!(servo.holding_current().map(HoldingCurrent::as_percent), Some(20));
    }

    #[test]
    fn test_pulse_interface_gated_on_interface() {
        assert!(servo(Mode::SERIAL_OPEN).pulse_interface().is_none());

        let mut servo = servo(Mode::PULSE_OPEN);
        servo
            .pulse_interface()
            .unwrap()
            .set_motor_direction(Direction::Reverse);
        assert_eq!(servo.motor_direction(), Some(Direction::Reverse));
    }

    #[test]
    fn test_zero_return_gated_on_zero_mode() {
        let mut servo = servo(Mode::SERIAL_VFOC);
        assert!(servo.zero_return().is_none());

        servo.set_zero_mode(ZeroMode::Near);
        servo.zero_return().unwrap().set_zero_at_boot(true);
        assert!(servo.is_zero_at_boot());
    }

    #[test]
    fn test_limit_switch_homing_gated_on_switch() {
        let mut servo = servo(Mode::SERIAL_VFOC);
        assert!(servo.limit_switch_homing().unwrap().set_home_current(3001).is_err());
        servo.limit_switch_homing().unwrap().set_home_current(600).unwrap();
        assert_eq!(servo.home_current_ma(), 600);

        servo.set_home_limit_switch_enabled(false);
        assert!(servo.limit_switch_homing().is_none());
    }
}
