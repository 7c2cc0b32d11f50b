//! # crashwatch-cli
//!
//! Operator tooling for crashwatch devices.
//!
//! ## Features
//!
//! - **Bundle management**: write a template, show it with secrets masked
//! - **Validation**: check every value before flashing a device
//! - **Firmware export**: render the `secrets.h` header the ESP32 build uses
//! - **Telemetry replay**: run recorded readings through the crash detector

pub mod cli;
pub mod config;
pub mod output;

pub use cli::run;
