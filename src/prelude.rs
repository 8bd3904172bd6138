//! The prelude.
//!
//! This can be imported as use `esp_idf_ledcontrol::prelude::*`.

pub use crate::gpio::{OutputPin as _, Pin as _};
pub use crate::ledc::LedcAdapter as _;
pub use crate::units::*;

pub use embedded_hal::pwm::SetDutyCycle as _;
