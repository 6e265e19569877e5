//! airmouse - a BLE HID air mouse for the nRF52840.
//!
//! The pure logic (HID reports, advertising payloads, the mouse handle and
//! the control loop) builds and tests on the host:
//!
//! Usage: `cargo test --lib` / `cargo test`
//!
//! The SoftDevice-backed pieces (`ble::server`, `ble::link`,
//! `ble::bonding`) are only compiled with the `embedded` feature, which the
//! firmware binary in main.rs requires.

#![cfg_attr(not(test), no_std)]

pub mod ble;
pub mod config;
pub mod console;
pub mod control;
pub mod error;
pub mod hid;
pub mod mouse;

pub use control::{Airmouse, Step};
pub use error::{Error, Result};
pub use mouse::{BleMouse, DeviceIdentity, MouseLink};
