//! Show the parameters of one servo.
//!
//! Builds a SERVO42D controller at id 0x01 in serial-vfoc mode with factory
//! defaults, prints its parameter snapshot and sends one calibration frame.
//!
//! Run with: `cargo run --example show_params`

use std::time::Duration;

use mks_servo_can::{Bus, BusErrorKind, Frame, Mode, ServoController, Version};

/// Bus that prints every frame instead of transmitting it.
struct PrintBus;

impl Bus for PrintBus {
    type Error = BusErrorKind;

    fn send(&mut self, frame: &Frame) -> Result<(), Self::Error> {
        println!("-> id 0x{:03X} data {:02X?}", frame.target().raw(), frame.data());
        Ok(())
    }

    fn receive(&mut self, _timeout: Duration) -> Result<Frame, Self::Error> {
        Err(BusErrorKind::Timeout)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== MKS Servo Parameters ===\n");

    let version: Version = "42D".parse()?;
    let mut servo = ServoController::new("x-axis", PrintBus, version, 0x01, Mode::SERIAL_VFOC, true)?;

    print!("{}", servo.show_params());

    println!("\nCalibrating:");
    servo.calibrate()?;

    Ok(())
}
