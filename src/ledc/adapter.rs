//! The seam between [`LedControl`](super::LedControl) and the vendor LEDC
//! driver.
//!
//! Every call maps to one ESP-IDF `ledc_*` function. [`EspLedc`] forwards to
//! the real driver; anything else implementing [`LedcAdapter`] (a recording
//! double in tests, for instance) can stand in for it.

use crate::errors::EspError;
use crate::units::{Hertz, MilliSeconds};

use super::config::{Resolution, SpeedMode};

#[cfg(target_os = "espidf")]
pub use esp::EspLedc;

/// Peripheral driver calls needed to run timers, channels and fades
pub trait LedcAdapter {
    /// Programs `timer` with the given frequency and duty resolution.
    fn configure_timer(
        &self,
        mode: SpeedMode,
        timer: u32,
        frequency: Hertz,
        resolution: Resolution,
    ) -> Result<(), EspError>;

    /// Binds `channel` to `pin` and `timer` with an initial duty.
    /// Channel interrupts stay disabled and the phase offset is zero.
    fn configure_channel(
        &self,
        mode: SpeedMode,
        channel: u32,
        pin: i32,
        timer: u32,
        duty: u32,
    ) -> Result<(), EspError>;

    /// Stages a new duty. Takes effect after [`update_duty`](Self::update_duty).
    fn set_duty(&self, mode: SpeedMode, channel: u32, duty: u32) -> Result<(), EspError>;

    /// Commits the staged duty.
    fn update_duty(&self, mode: SpeedMode, channel: u32) -> Result<(), EspError>;

    /// Programs a linear fade from the current duty to `duty`.
    fn set_fade_with_time(
        &self,
        mode: SpeedMode,
        channel: u32,
        duty: u32,
        time: MilliSeconds,
    ) -> Result<(), EspError>;

    /// Starts the programmed fade and returns without waiting for it.
    fn fade_start(&self, mode: SpeedMode, channel: u32) -> Result<(), EspError>;

    fn install_fade_service(&self) -> Result<(), EspError>;

    fn uninstall_fade_service(&self);
}

impl<A> LedcAdapter for &A
where
    A: LedcAdapter + ?Sized,
{
    fn configure_timer(
        &self,
        mode: SpeedMode,
        timer: u32,
        frequency: Hertz,
        resolution: Resolution,
    ) -> Result<(), EspError> {
        (**self).configure_timer(mode, timer, frequency, resolution)
    }

    fn configure_channel(
        &self,
        mode: SpeedMode,
        channel: u32,
        pin: i32,
        timer: u32,
        duty: u32,
    ) -> Result<(), EspError> {
        (**self).configure_channel(mode, channel, pin, timer, duty)
    }

    fn set_duty(&self, mode: SpeedMode, channel: u32, duty: u32) -> Result<(), EspError> {
        (**self).set_duty(mode, channel, duty)
    }

    fn update_duty(&self, mode: SpeedMode, channel: u32) -> Result<(), EspError> {
        (**self).update_duty(mode, channel)
    }

    fn set_fade_with_time(
        &self,
        mode: SpeedMode,
        channel: u32,
        duty: u32,
        time: MilliSeconds,
    ) -> Result<(), EspError> {
        (**self).set_fade_with_time(mode, channel, duty, time)
    }

    fn fade_start(&self, mode: SpeedMode, channel: u32) -> Result<(), EspError> {
        (**self).fade_start(mode, channel)
    }

    fn install_fade_service(&self) -> Result<(), EspError> {
        (**self).install_fade_service()
    }

    fn uninstall_fade_service(&self) {
        (**self).uninstall_fade_service()
    }
}

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_sys::*;

    use super::{EspError, Hertz, LedcAdapter, MilliSeconds, Resolution, SpeedMode};
    use crate::errors::{ESP_ERR_INVALID_ARG, ESP_ERR_NOT_SUPPORTED};
    use crate::esp;

    /// [`LedcAdapter`] backed by the ESP-IDF LEDC driver
    #[derive(Clone, Copy, Debug, Default)]
    pub struct EspLedc;

    fn speed_mode(mode: SpeedMode) -> Result<ledc_mode_t, EspError> {
        match mode {
            #[cfg(esp32)]
            SpeedMode::HighSpeed => Ok(ledc_mode_t_LEDC_HIGH_SPEED_MODE),
            #[cfg(not(esp32))]
            SpeedMode::HighSpeed => Err(EspError::from_infallible::<ESP_ERR_NOT_SUPPORTED>()),
            SpeedMode::LowSpeed => Ok(ledc_mode_t_LEDC_LOW_SPEED_MODE),
        }
    }

    impl LedcAdapter for EspLedc {
        fn configure_timer(
            &self,
            mode: SpeedMode,
            timer: u32,
            frequency: Hertz,
            resolution: Resolution,
        ) -> Result<(), EspError> {
            // A zeroed clk_cfg selects LEDC_AUTO_CLK.
            let timer_config = ledc_timer_config_t {
                speed_mode: speed_mode(mode)?,
                timer_num: timer as _,
                duty_resolution: resolution.bits() as _,
                freq_hz: frequency.into(),
                ..Default::default()
            };

            esp!(unsafe { ledc_timer_config(&timer_config) })
        }

        fn configure_channel(
            &self,
            mode: SpeedMode,
            channel: u32,
            pin: i32,
            timer: u32,
            duty: u32,
        ) -> Result<(), EspError> {
            let channel_config = ledc_channel_config_t {
                speed_mode: speed_mode(mode)?,
                channel: channel as _,
                timer_sel: timer as _,
                intr_type: ledc_intr_type_t_LEDC_INTR_DISABLE,
                gpio_num: pin,
                duty,
                hpoint: 0,
                ..Default::default()
            };

            esp!(unsafe { ledc_channel_config(&channel_config) })
        }

        fn set_duty(&self, mode: SpeedMode, channel: u32, duty: u32) -> Result<(), EspError> {
            esp!(unsafe { ledc_set_duty(speed_mode(mode)?, channel as _, duty) })
        }

        fn update_duty(&self, mode: SpeedMode, channel: u32) -> Result<(), EspError> {
            esp!(unsafe { ledc_update_duty(speed_mode(mode)?, channel as _) })
        }

        fn set_fade_with_time(
            &self,
            mode: SpeedMode,
            channel: u32,
            duty: u32,
            time: MilliSeconds,
        ) -> Result<(), EspError> {
            let time_ms = i32::try_from(time.0)
                .map_err(|_| EspError::from_infallible::<ESP_ERR_INVALID_ARG>())?;

            esp!(unsafe { ledc_set_fade_with_time(speed_mode(mode)?, channel as _, duty, time_ms) })
        }

        fn fade_start(&self, mode: SpeedMode, channel: u32) -> Result<(), EspError> {
            esp!(unsafe {
                ledc_fade_start(
                    speed_mode(mode)?,
                    channel as _,
                    ledc_fade_mode_t_LEDC_FADE_NO_WAIT,
                )
            })
        }

        fn install_fade_service(&self) -> Result<(), EspError> {
            esp!(unsafe { ledc_fade_func_install(0) })
        }

        fn uninstall_fade_service(&self) {
            unsafe { ledc_fade_func_uninstall() };
        }
    }
}
