//! Builder pattern for ServoController.

use heapless::String;

use crate::bus::Bus;
use crate::config::{BusConfig, Mode, ServoConfig, Version};
use crate::config::units::truncate;
use crate::error::{ConfigError, Error};

use super::controller::ServoController;

/// Builder for creating ServoController instances.
pub struct ServoBuilder<B>
where
    B: Bus,
{
    bus: Option<B>,
    name: Option<String<32>>,
    version: Option<Version>,
    can_id: Option<i32>,
    mode: Mode,
    apply_defaults: bool,
    overrides: Option<ServoConfig>,
}

impl<B> Default for ServoBuilder<B>
where
    B: Bus,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<B> ServoBuilder<B>
where
    B: Bus,
{
    /// Create a new builder: serial-vfoc, factory defaults on.
    pub fn new() -> Self {
        Self {
            bus: None,
            name: None,
            version: None,
            can_id: None,
            mode: Mode::SERIAL_VFOC,
            apply_defaults: true,
            overrides: None,
        }
    }

    /// Set the bus.
    pub fn bus(mut self, bus: B) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Set the servo name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(truncate(name));
        self
    }

    /// Set the hardware version.
    pub fn version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Set the node id. Checked by [`build`](Self::build).
    pub fn can_id(mut self, can_id: i32) -> Self {
        self.can_id = Some(can_id);
        self
    }

    /// Set the work mode.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Apply factory defaults at construction.
    pub fn apply_defaults(mut self, apply: bool) -> Self {
        self.apply_defaults = apply;
        self
    }

    /// Configure from a ServoConfig; its overrides are applied by `build`.
    pub fn from_servo_config(mut self, config: &ServoConfig) -> Self {
        self.name = Some(config.name.clone());
        self.version = Some(config.version);
        self.can_id = Some(i32::from(config.can_id.raw()));
        self.mode = config.mode;
        self.apply_defaults = config.apply_defaults;
        self.overrides = Some(config.clone());
        self
    }

    /// Configure from a BusConfig by table key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ServoNotFound` if no servo has that key.
    pub fn from_config(self, config: &BusConfig, key: &str) -> Result<Self, ConfigError> {
        let servo = config
            .servo(key)
            .ok_or_else(|| ConfigError::ServoNotFound(truncate(key)))?;

        Ok(self.from_servo_config(servo))
    }

    /// Build the ServoController.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if the bus, version or CAN id was
    /// not supplied, or the first error raised while applying settings.
    pub fn build(self) -> Result<ServoController<B>, Error<B::Error>> {
        let bus = self.bus.ok_or(ConfigError::MissingField("bus"))?;
        let version = self.version.ok_or(ConfigError::MissingField("version"))?;
        let can_id = self.can_id.ok_or(ConfigError::MissingField("can_id"))?;
        let name = self.name.as_deref().unwrap_or("servo");

        let mut servo = ServoController::new(
            name,
            bus,
            version,
            can_id,
            self.mode,
            self.apply_defaults,
        )?;

        if let Some(config) = &self.overrides {
            servo.apply_overrides(config)?;
        }

        Ok(servo)
    }
}
