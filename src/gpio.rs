//! GPIO pins usable as LEDC outputs

use crate::errors::Error;

/// Output-capable GPIOs of the ESP32. GPIO20, GPIO24 and GPIO28..=31 do not
/// exist and GPIO34..=39 are input-only.
const OUTPUT_PIN_MASK: u64 = 0x0000_0003_0EEF_FFFF;

/// A trait implemented by every pin instance
pub trait Pin {
    fn pin(&self) -> i32;
}

/// A marker trait designating a pin which is capable of
/// operating as an output pin
pub trait OutputPin: Pin {}

impl<P: Pin + ?Sized> Pin for &P {
    fn pin(&self) -> i32 {
        (**self).pin()
    }
}

impl<P: OutputPin + ?Sized> OutputPin for &P {}

/// Returns `true` if `pin` names a GPIO that can drive a PWM signal.
pub const fn is_output_capable(pin: i32) -> bool {
    pin >= 0 && pin < 64 && (OUTPUT_PIN_MASK & (1 << pin)) != 0
}

/// Generic Gpio output pin, resolved from a raw GPIO number
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnyOutputPin {
    pin: i32,
}

impl AnyOutputPin {
    pub fn new(pin: i32) -> Result<Self, Error> {
        if is_output_capable(pin) {
            Ok(Self { pin })
        } else {
            Err(Error::InvalidPin(pin))
        }
    }
}

impl TryFrom<i32> for AnyOutputPin {
    type Error = Error;

    fn try_from(pin: i32) -> Result<Self, Self::Error> {
        Self::new(pin)
    }
}

impl Pin for AnyOutputPin {
    fn pin(&self) -> i32 {
        self.pin
    }
}

impl OutputPin for AnyOutputPin {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_output_pins() {
        for pin in [0, 2, 5, 19, 21, 23, 25, 27, 32, 33] {
            assert_eq!(AnyOutputPin::new(pin).map(|p| p.pin()), Ok(pin));
        }
    }

    #[test]
    fn rejects_missing_and_input_only_pins() {
        for pin in [-1, 20, 24, 28, 31, 34, 39, 40, 64, i32::MAX] {
            assert_eq!(AnyOutputPin::try_from(pin), Err(Error::InvalidPin(pin)));
        }
    }

    #[test]
    fn references_are_pins() {
        let pin = AnyOutputPin::new(5).unwrap();
        let by_ref = &pin;
        assert_eq!(by_ref.pin(), 5);
    }
}
