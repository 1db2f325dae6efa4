//! Bus configuration - root configuration structure.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use super::servo::ServoConfig;

/// Root configuration structure from TOML: every servo on one bus segment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BusConfig {
    /// Named servo configurations.
    pub servos: FnvIndexMap<String<32>, ServoConfig, 16>,
}

impl BusConfig {
    /// Get a servo configuration by key.
    pub fn servo(&self, key: &str) -> Option<&ServoConfig> {
        self.servos
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }

    /// List all servo keys.
    pub fn servo_keys(&self) -> impl Iterator<Item = &str> {
        self.servos.keys().map(|s| s.as_str())
    }
}
