//! Error types
//!
//! [`EspError`] carries the raw code reported by the vendor driver, while
//! [`Error`] is what every fallible operation of this crate returns.

use core::fmt;
use core::num::NonZeroI32;

#[allow(non_camel_case_types)]
pub type esp_err_t = i32;

pub const ESP_OK: esp_err_t = 0;
pub const ESP_FAIL: esp_err_t = -1;
pub const ESP_ERR_NO_MEM: esp_err_t = 0x101;
pub const ESP_ERR_INVALID_ARG: esp_err_t = 0x102;
pub const ESP_ERR_INVALID_STATE: esp_err_t = 0x103;
pub const ESP_ERR_INVALID_SIZE: esp_err_t = 0x104;
pub const ESP_ERR_NOT_FOUND: esp_err_t = 0x105;
pub const ESP_ERR_NOT_SUPPORTED: esp_err_t = 0x106;
pub const ESP_ERR_TIMEOUT: esp_err_t = 0x107;
pub const ESP_ERR_INVALID_RESPONSE: esp_err_t = 0x108;
pub const ESP_ERR_INVALID_CRC: esp_err_t = 0x109;
pub const ESP_ERR_INVALID_VERSION: esp_err_t = 0x10A;
pub const ESP_ERR_INVALID_MAC: esp_err_t = 0x10B;

/// Coarse classification of a driver error code
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EspErrorKind {
    /// Generic failure
    Fail,
    /// Out of memory
    NoMem,
    /// Invalid argument
    InvalidArg,
    /// Invalid state
    InvalidState,
    /// Invalid size
    InvalidSize,
    /// Requested resource not found
    NotFound,
    /// Operation or feature not supported
    NotSupported,
    /// Operation timed out
    Timeout,
    /// Received response was invalid
    InvalidResponse,
    /// CRC or checksum was invalid
    InvalidCrc,
    /// Version was invalid
    InvalidVersion,
    /// MAC address was invalid
    InvalidMac,
    Other,
}

/// A non-zero error code returned by the vendor driver
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct EspError(NonZeroI32);

impl EspError {
    /// Returns `None` for `ESP_OK`.
    pub const fn from(code: esp_err_t) -> Option<Self> {
        match NonZeroI32::new(code) {
            Some(code) => Some(Self(code)),
            None => None,
        }
    }

    /// An error for a known, non-zero code. `ESP_OK` fails to compile.
    pub const fn from_infallible<const E: esp_err_t>() -> Self {
        struct Code<const E: esp_err_t>;

        impl<const E: esp_err_t> Code<E> {
            const NON_ZERO: NonZeroI32 = match NonZeroI32::new(E) {
                Some(code) => code,
                None => panic!("ESP_OK is not an error"),
            };
        }

        Self(Code::<E>::NON_ZERO)
    }

    /// Turns a driver return code into a `Result`.
    pub fn convert(code: esp_err_t) -> Result<(), Self> {
        match Self::from(code) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub const fn code(&self) -> esp_err_t {
        self.0.get()
    }

    pub const fn kind(&self) -> EspErrorKind {
        match self.0.get() {
            ESP_FAIL => EspErrorKind::Fail,
            ESP_ERR_NO_MEM => EspErrorKind::NoMem,
            ESP_ERR_INVALID_ARG => EspErrorKind::InvalidArg,
            ESP_ERR_INVALID_STATE => EspErrorKind::InvalidState,
            ESP_ERR_INVALID_SIZE => EspErrorKind::InvalidSize,
            ESP_ERR_NOT_FOUND => EspErrorKind::NotFound,
            ESP_ERR_NOT_SUPPORTED => EspErrorKind::NotSupported,
            ESP_ERR_TIMEOUT => EspErrorKind::Timeout,
            ESP_ERR_INVALID_RESPONSE => EspErrorKind::InvalidResponse,
            ESP_ERR_INVALID_CRC => EspErrorKind::InvalidCrc,
            ESP_ERR_INVALID_VERSION => EspErrorKind::InvalidVersion,
            ESP_ERR_INVALID_MAC => EspErrorKind::InvalidMac,
            _ => EspErrorKind::Other,
        }
    }

    /// Symbolic name of the code, e.g. `ESP_ERR_INVALID_ARG`
    #[cfg(target_os = "espidf")]
    pub fn name(&self) -> &'static str {
        // SAFETY: esp_err_to_name always returns a pointer to a static,
        // NUL-terminated string.
        let name = unsafe { core::ffi::CStr::from_ptr(esp_idf_sys::esp_err_to_name(self.code())) };

        name.to_str().unwrap_or("UNKNOWN ERROR")
    }

    /// Symbolic name of the code, e.g. `ESP_ERR_INVALID_ARG`
    #[cfg(not(target_os = "espidf"))]
    pub fn name(&self) -> &'static str {
        match self.kind() {
            EspErrorKind::Fail => "ESP_FAIL",
            EspErrorKind::NoMem => "ESP_ERR_NO_MEM",
            EspErrorKind::InvalidArg => "ESP_ERR_INVALID_ARG",
            EspErrorKind::InvalidState => "ESP_ERR_INVALID_STATE",
            EspErrorKind::InvalidSize => "ESP_ERR_INVALID_SIZE",
            EspErrorKind::NotFound => "ESP_ERR_NOT_FOUND",
            EspErrorKind::NotSupported => "ESP_ERR_NOT_SUPPORTED",
            EspErrorKind::Timeout => "ESP_ERR_TIMEOUT",
            EspErrorKind::InvalidResponse => "ESP_ERR_INVALID_RESPONSE",
            EspErrorKind::InvalidCrc => "ESP_ERR_INVALID_CRC",
            EspErrorKind::InvalidVersion => "ESP_ERR_INVALID_VERSION",
            EspErrorKind::InvalidMac => "ESP_ERR_INVALID_MAC",
            EspErrorKind::Other => "UNKNOWN ERROR",
        }
    }
}

impl fmt::Debug for EspError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (error code {})", self.name(), self.code())
    }
}

impl fmt::Display for EspError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EspError {}

#[cfg(target_os = "espidf")]
impl From<esp_idf_sys::EspError> for EspError {
    fn from(err: esp_idf_sys::EspError) -> Self {
        match NonZeroI32::new(err.code()) {
            Some(code) => Self(code),
            None => Self::from_infallible::<ESP_FAIL>(),
        }
    }
}

#[cfg(target_os = "espidf")]
impl From<EspError> for esp_idf_sys::EspError {
    fn from(err: EspError) -> Self {
        esp_idf_sys::EspError::from_non_zero(err.0)
    }
}

/// Converts a driver return code into `Result<(), EspError>`, propagating
/// the error with `?` where used as `esp!(...)?`.
#[macro_export]
macro_rules! esp {
    ($err:expr) => {{
        $crate::errors::EspError::convert($err as $crate::errors::esp_err_t)
    }};
}

/// Errors reported by the LED Control peripheral
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// The driver rejected timer or channel setup
    Config(EspError),
    /// Channel index outside of the supported range
    InvalidChannel(u32),
    /// Duty or fade requested on a channel that was never configured
    UnconfiguredChannel(u32),
    /// GPIO cannot be used as a PWM output
    InvalidPin(i32),
    /// Duty value above the timer's full scale
    DutyOutOfRange { duty: u32, max: u32 },
    /// A hardware call failed after validation passed
    Driver(EspError),
}

impl Error {
    /// The driver's error, if the failure came from the driver
    pub fn esp_error(&self) -> Option<EspError> {
        match self {
            Self::Config(err) | Self::Driver(err) => Some(*err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "LEDC configuration failed: {}", err.name()),
            Self::InvalidChannel(channel) => write!(f, "invalid LEDC channel {}", channel),
            Self::UnconfiguredChannel(channel) => {
                write!(f, "LEDC channel {} is not configured", channel)
            }
            Self::InvalidPin(pin) => write!(f, "GPIO {} is not a valid output pin", pin),
            Self::DutyOutOfRange { duty, max } => {
                write!(f, "duty {} exceeds the maximum of {}", duty, max)
            }
            Self::Driver(err) => write!(f, "LEDC driver error: {}", err.name()),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) | Self::Driver(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(target_os = "espidf")]
impl From<esp_idf_sys::EspError> for Error {
    fn from(err: esp_idf_sys::EspError) -> Self {
        Self::Driver(err.into())
    }
}

impl embedded_hal::pwm::Error for Error {
    fn kind(&self) -> embedded_hal::pwm::ErrorKind {
        embedded_hal::pwm::ErrorKind::Other
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
