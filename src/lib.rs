#![cfg_attr(not(feature = "std"), no_std)]
#![allow(unexpected_cfgs)]

//! Timer, channel and fade service management for the ESP32 LED Control
//! (LEDC) peripheral.
//!
//! See [`ledc::LedControl`] for the entry point.

pub mod errors;
pub mod gpio;
pub mod ledc;
pub mod mutex;
pub mod prelude;
pub mod units;

pub use errors::{EspError, Error};
