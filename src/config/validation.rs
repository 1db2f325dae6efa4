//! Configuration validation.

use heapless::FnvIndexSet;

use crate::error::{ConfigError, Result};

use super::{BusConfig, ServoConfig};

/// Validate a bus configuration.
///
/// Checks:
/// - Servo names and CAN ids are unique on the segment
/// - Working and homing currents fit the hardware version
///
/// Cross-field preconditions (vfoc vs holding current and the like) are
/// checked when the controller is built, since they depend on factory defaults.
pub fn validate_config(config: &BusConfig) -> Result<()> {
    let mut ids: FnvIndexSet<u16, 16> = FnvIndexSet::new();
    let mut names: FnvIndexSet<&str, 16> = FnvIndexSet::new();

    for (_, servo) in config.servos.iter() {
        validate_servo(servo)?;

        if ids.contains(&servo.can_id.raw()) {
            return Err(ConfigError::DuplicateCanId(servo.can_id.raw()));
        }
        // The map holds at most 16 entries, so the sets cannot overflow.
        let _ = ids.insert(servo.can_id.raw());

        if names.contains(servo.name.as_str()) {
            return Err(ConfigError::DuplicateServoName(servo.name.clone()));
        }
        let _ = names.insert(servo.name.as_str());
    }

    Ok(())
}

/// Validate the settings of one servo that need no controller state.
pub fn validate_servo(config: &ServoConfig) -> Result<()> {
    let max_ma = config.version.currents().max_ma;

    if let Some(ma) = config.working_current_ma {
        check_current("working_current_ma", ma, max_ma)?;
    }

    if let Some(ma) = config.home_current_ma {
        check_current("home_current_ma", ma, max_ma)?;
    }

    Ok(())
}

pub(crate) fn check_current(param: &'static str, ma: u16, max_ma: u16) -> Result<()> {
    if ma > max_ma {
        return Err(ConfigError::OutOfRange {
            param,
            value: i64::from(ma),
            min: 0,
            max: i64::from(max_ma),
        });
    }
    Ok(())
}
