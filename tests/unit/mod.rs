//! Unit test harness for mks-servo-can.
//!
//! Configuration file parsing and validation, exercised through the public API.

mod config_parsing;
mod config_validation;
