//! Units of measurement for PWM frequencies and fade durations.
//!
//! # Usage
//!
//! ```
//! use esp_idf_ledcontrol::units::*;
//!
//! let frequency: Hertz = 5.kHz().into();
//! assert_eq!(frequency, 5_000.Hz());
//!
//! let fade: MilliSeconds = 2.s().into();
//! assert_eq!(fade, 2_000.ms());
//! ```

use core::fmt;

pub type ValueType = u32;

/// defines and implements extension traits for quantities with units
macro_rules! define {
    ($primitive:ident, $trait:ident, $( ($quantity: ident, $unit: ident, $print_unit: literal), )+) => {
        $(
            #[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Default)]
            pub struct $quantity(pub $primitive);
        )*

        pub trait $trait {
            $(
                #[allow(non_snake_case)]
                fn $unit(self) -> $quantity;
            )*
        }

        impl $trait for $primitive {
            $(
                fn $unit(self) -> $quantity {
                    $quantity(self)
                }
            )*
        }

        $(
            impl From<$quantity> for $primitive {
                fn from(x: $quantity) -> Self {
                    x.0
                }
            }

            impl From<$primitive> for $quantity {
                fn from(x: $primitive) -> $quantity {
                    $quantity(x)
                }
            }

            impl fmt::Debug for $quantity {
                fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    write!(f, "{}{}", self.0, $print_unit)
                }
            }

            impl fmt::Display for $quantity {
                fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    write!(f, "{}{}", self.0, $print_unit)
                }
            }
        )*
    };
}

/// defines From trait for pair or quantities with scaling, saturating at
/// `ValueType::MAX`
macro_rules! convert {
    ($( ($from: ty, $into: ty, $factor: expr) ),+) => {
        $(
        impl From<$from> for $into {
            fn from(x: $from) -> Self {
                Self(x.0.saturating_mul($factor))
            }
        }
        )*
    };
}

#[rustfmt::skip::macros(define)]
define!(
    ValueType,
    FromValueType,
    (Hertz,        Hz,  "Hz"  ),
    (KiloHertz,    kHz, "kHz" ),
    (MegaHertz,    MHz, "MHz" ),
    (MilliSeconds, ms,  "ms"  ),
    (Seconds,      s,   "s"   ),
);

#[rustfmt::skip::macros(convert)]
convert!(
    (KiloHertz, Hertz,        1_000    ),
    (MegaHertz, Hertz,        1_000_000),
    (MegaHertz, KiloHertz,    1_000    ),
    (Seconds,   MilliSeconds, 1_000    )
);

impl From<MilliSeconds> for core::time::Duration {
    fn from(x: MilliSeconds) -> Self {
        core::time::Duration::from_millis(x.0 as u64)
    }
}
