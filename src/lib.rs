//! Library root for the biped firmware.
//!
//! Everything from the leg solver down to the servo compare values, plus the
//! command dispatcher, is hardware independent and builds on the host for tests.
//! The ESP32 wiring ([`hw`]) and the Embassy tasks ([`tasks`]) need the `esp32`
//! feature.
#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod kinematics;
pub mod robot;
pub mod transport;

#[cfg(feature = "esp32")]
pub mod hw;
#[cfg(feature = "esp32")]
pub mod tasks;
