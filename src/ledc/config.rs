//! Types for configuring the LED Control peripheral

use crate::units::*;

/// Width of the duty range of a LEDC timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Resolution {
    Bits1,
    Bits2,
    Bits3,
    Bits4,
    Bits5,
    Bits6,
    Bits7,
    Bits8,
    Bits9,
    #[default]
    Bits10,
    Bits11,
    Bits12,
    Bits13,
    Bits14,
    Bits15,
    Bits16,
    Bits17,
    Bits18,
    Bits19,
    Bits20,
}

impl Resolution {
    pub const fn bits(&self) -> u32 {
        match self {
            Resolution::Bits1 => 1,
            Resolution::Bits2 => 2,
            Resolution::Bits3 => 3,
            Resolution::Bits4 => 4,
            Resolution::Bits5 => 5,
            Resolution::Bits6 => 6,
            Resolution::Bits7 => 7,
            Resolution::Bits8 => 8,
            Resolution::Bits9 => 9,
            Resolution::Bits10 => 10,
            Resolution::Bits11 => 11,
            Resolution::Bits12 => 12,
            Resolution::Bits13 => 13,
            Resolution::Bits14 => 14,
            Resolution::Bits15 => 15,
            Resolution::Bits16 => 16,
            Resolution::Bits17 => 17,
            Resolution::Bits18 => 18,
            Resolution::Bits19 => 19,
            Resolution::Bits20 => 20,
        }
    }

    /// Full-on duty. Valid duties are `0..=max_duty()`.
    pub const fn max_duty(&self) -> u32 {
        1 << self.bits()
    }
}

/// LEDC speed group a timer and its channels live in
///
/// Only the original ESP32 has a high speed group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SpeedMode {
    #[default]
    HighSpeed,
    LowSpeed,
}

/// Configuration of the single timer owned by a
/// [`LedControl`](super::LedControl)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerConfig {
    pub frequency: Hertz,
    pub resolution: Resolution,
    pub speed_mode: SpeedMode,
}

impl TimerConfig {
    pub fn new(frequency: impl Into<Hertz>) -> Self {
        Self {
            frequency: frequency.into(),
            resolution: Resolution::default(),
            speed_mode: SpeedMode::default(),
        }
    }

    #[must_use]
    pub fn frequency(mut self, f: impl Into<Hertz>) -> Self {
        self.frequency = f.into();
        self
    }

    #[must_use]
    pub fn resolution(mut self, r: Resolution) -> Self {
        self.resolution = r;
        self
    }

    #[must_use]
    pub fn speed_mode(mut self, mode: SpeedMode) -> Self {
        self.speed_mode = mode;
        self
    }
}
