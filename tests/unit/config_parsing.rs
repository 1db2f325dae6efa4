//! Unit tests for configuration parsing.

use mks_servo_can::config::{
    CanBaudRate, Direction, EnLevel, HoldingCurrent, Microsteps, Mode, Version, ZeroMode,
};
use mks_servo_can::{parse_config, BusConfig, ConfigError};

/// Every optional setting, spelled the way files spell it.
const FULL_CONFIG: &str = r#"
[servos.pan]
name = "Pan Axis"
version = "57D"
can_id = 0x120
mode = "pulse-open"
apply_defaults = false
working_current_ma = 4000
holding_current_percent = 30
microstepping = 64
en_level = "hold"
motor_direction = "reverse"
screen_auto_turnoff = true
locked_rotor_protection = true
mplyer = false
can_baud_rate = 1000000
can_response = false
zero_mode = "direction"
zero_at_boot = true
zero_speed = 4
zero_direction = "reverse"
home_trigger_high = true
home_direction = "reverse"
home_limit_switch = true
home_current_ma = 1000
end_limit = false
"#;

/// Test that a config holding every setting parses.
#[test]
fn test_parse_full_servo_config() {
    let config = parse_config(FULL_CONFIG).expect("Should parse full config");
    let servo = config.servo("pan").expect("Pan servo should exist");

    assert_eq!(servo.name.as_str(), "Pan Axis");
    assert_eq!(servo.version, Version::V57D);
    assert_eq!(servo.can_id.raw(), 0x120);
    assert_eq!(servo.mode, Mode::PULSE_OPEN);
    assert!(!servo.apply_defaults);
    assert_eq!(servo.working_current_ma, Some(4000));
    assert_eq!(servo.holding_current, Some(HoldingCurrent::percent(30).unwrap()));
    assert_eq!(servo.microstepping, Some(Microsteps::new(64).unwrap()));
    assert_eq!(servo.en_level, Some(EnLevel::Hold));
    assert_eq!(servo.motor_direction, Some(Direction::Reverse));
    assert_eq!(servo.screen_auto_turnoff, Some(true));
    assert_eq!(servo.mplyer, Some(false));
    assert_eq!(servo.can_baud_rate, Some(CanBaudRate::Baud1M));
    assert_eq!(servo.zero_mode, Some(ZeroMode::Direction));
    assert_eq!(servo.zero_speed.map(|s| s.value()), Some(4));
    assert_eq!(servo.home_current_ma, Some(1000));
    assert_eq!(servo.end_limit, Some(false));
}

/// Test that keys come back in file order.
#[test]
fn test_servo_keys_keep_order() {
    let toml_str = r#"
[servos.z]
name = "z"
version = "28D"
can_id = 3

[servos.a]
name = "a"
version = "35d"
can_id = 4
"#;

    let config: BusConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let keys: Vec<&str> = config.servo_keys().collect();
    assert_eq!(keys, ["z", "a"]);
    assert_eq!(config.servo("a").unwrap().version, Version::V35D);
}

/// Test that the mode string is matched exactly.
#[test]
fn test_parse_rejects_mode_case() {
    let toml_str = r#"
[servos.x]
name = "x"
version = "42D"
can_id = 1
mode = "Serial-Vfoc"
"#;

    assert!(matches!(parse_config(toml_str), Err(ConfigError::ParseError(_))));
}

/// Test that unsupported bit rates are rejected.
#[test]
fn test_parse_rejects_baud_rate() {
    let toml_str = r#"
[servos.x]
name = "x"
version = "42D"
can_id = 1
can_baud_rate = 115200
"#;

    let err = parse_config(toml_str).unwrap_err();
    match err {
        ConfigError::ParseError(msg) => assert!(msg.contains("can_baud_rate")),
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Test that range-checked fields fail at parse time.
#[test]
fn test_parse_rejects_out_of_range_values() {
    for (can_id, extra) in [
        ("0", ""),
        ("2048", ""),
        ("1", "microstepping = 0"),
        ("1", "microstepping = 300"),
        ("1", "zero_speed = 5"),
        ("1", "holding_current_percent = 95"),
    ] {
        let toml_str = format!(
            "[servos.x]\nname = \"x\"\nversion = \"42D\"\ncan_id = {can_id}\n{extra}\n"
        );

        assert!(
            matches!(parse_config(&toml_str), Err(ConfigError::ParseError(_))),
            "can_id = {can_id}, {extra} should be rejected"
        );
    }
}

/// Test that identity fields are required.
#[test]
fn test_parse_requires_version() {
    let toml_str = r#"
[servos.x]
name = "x"
can_id = 1
"#;

    assert!(parse_config(toml_str).is_err());
}
