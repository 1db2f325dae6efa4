//! Unit tests for configuration validation.

use mks_servo_can::config::{validate_config, validate_servo, BusConfig, CanId, ServoConfig, Version};
use mks_servo_can::error::ConfigError;

fn servo(name: &str, version: Version, id: i32) -> ServoConfig {
    ServoConfig::new(name, version, CanId::new(id).unwrap())
}

fn bus(servos: &[(&str, ServoConfig)]) -> BusConfig {
    let mut config = BusConfig::default();
    for (key, servo) in servos {
        config
            .servos
            .insert((*key).try_into().unwrap(), servo.clone())
            .unwrap();
    }
    config
}

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let toml_str = r#"
[servos.x]
name = "x-axis"
version = "42D"
can_id = 1
working_current_ma = 3000

[servos.y]
name = "y-axis"
version = "57D"
can_id = 2
working_current_ma = 5200
home_current_ma = 400
"#;

    let config: BusConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert!(validate_config(&config).is_ok());
}

/// Test that current limits follow the version.
#[test]
fn test_current_limit_depends_on_version() {
    let mut small = servo("x", Version::V28D, 1);
    small.working_current_ma = Some(3000);
    assert!(validate_servo(&small).is_ok());

    let mut big = servo("y", Version::V57D, 2);
    big.working_current_ma = Some(5201);
    assert!(matches!(
        validate_servo(&big),
        Err(ConfigError::OutOfRange { max: 5200, .. })
    ));
}

/// Test validation fails for a homing current above the maximum.
#[test]
fn test_home_current_over_max() {
    let mut config = servo("x", Version::V35D, 1);
    config.home_current_ma = Some(3500);

    assert!(matches!(
        validate_servo(&config),
        Err(ConfigError::OutOfRange { param: "home_current_ma", .. })
    ));
}

/// Test that two servos may not share an id.
#[test]
fn test_duplicate_can_id_rejected() {
    let config = bus(&[
        ("x", servo("x-axis", Version::V42D, 0x10)),
        ("y", servo("y-axis", Version::V42D, 0x10)),
    ]);

    assert_eq!(validate_config(&config), Err(ConfigError::DuplicateCanId(0x10)));
}

/// Test that two servos may not share a name.
#[test]
fn test_duplicate_name_rejected() {
    let config = bus(&[
        ("x", servo("axis", Version::V42D, 0x10)),
        ("y", servo("axis", Version::V42D, 0x11)),
    ]);

    assert!(matches!(
        validate_config(&config),
        Err(ConfigError::DuplicateServoName(_))
    ));
}

/// Test that an empty bus is valid.
#[test]
fn test_empty_config_is_valid() {
    assert!(validate_config(&BusConfig::default()).is_ok());
}
