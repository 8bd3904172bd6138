//! LED Control peripheral (which also creates PWM signals for other purposes)
//!
//! Interface to the [LED Control (LEDC)
//! peripheral](https://docs.espressif.com/projects/esp-idf/en/latest/esp32/api-reference/peripherals/ledc.html)
//!
//! A [`LedControl`] owns one hardware timer and up to [`CHANNEL_COUNT`]
//! output channels driven by it. Duty changes are either applied immediately
//! or handed to the hardware fade engine, which runs on its own once started.
//! The fade engine's interrupt service is shared by all controllers and
//! reference counted through [`FadeService`].
//!
//! # Examples
//!
//! Fade GPIO 5 up over one second on a 5 kHz, 10-bit timer
//! ```ignore
//! use esp_idf_ledcontrol::gpio::AnyOutputPin;
//! use esp_idf_ledcontrol::ledc::{config::TimerConfig, EspLedc, LedControl};
//! use esp_idf_ledcontrol::prelude::*;
//!
//! let mut ledc = LedControl::new(EspLedc, 0, &TimerConfig::new(5.kHz()))?;
//! ledc.configure_channel(0, AnyOutputPin::new(5)?)?;
//! ledc.set_duty(0, 512)?;
//! ledc.fade(0, ledc.max_duty(), 1000.ms())?;
//! ```

use log::{debug, trace};

use crate::errors::{Error, Result};
use crate::gpio::OutputPin;
use crate::units::{Hertz, MilliSeconds};

pub use adapter::LedcAdapter;
#[cfg(target_os = "espidf")]
pub use adapter::EspLedc;
pub use config::{Resolution, SpeedMode, TimerConfig};
pub use fade::{FadeService, FADE_SERVICE};

pub mod adapter;
pub mod config;
pub mod fade;

#[cfg(test)]
pub(crate) mod mock;

type Duty = u32;

/// Number of output channels in one speed group
pub const CHANNEL_COUNT: usize = 8;

/// What was last successfully written to a configured channel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelState {
    pub pin: i32,
    pub duty: Duty,
}

/// One LEDC timer plus the channels driven by it
pub struct LedControl<'s, A: LedcAdapter> {
    adapter: A,
    fade_service: &'s FadeService,
    timer: u32,
    config: TimerConfig,
    channels: [Option<ChannelState>; CHANNEL_COUNT],
    active: bool,
}

impl<A: LedcAdapter> LedControl<'static, A> {
    /// Configures `timer` and registers with the process-wide
    /// [`FADE_SERVICE`].
    pub fn new(adapter: A, timer: u32, config: &TimerConfig) -> Result<Self> {
        Self::with_fade_service(adapter, &FADE_SERVICE, timer, config)
    }
}

impl<'s, A: LedcAdapter> LedControl<'s, A> {
    /// Configures `timer` and registers with `fade_service`.
    ///
    /// Nothing is registered if the driver rejects the timer, and the
    /// controller is not created if the fade service cannot be installed.
    pub fn with_fade_service(
        adapter: A,
        fade_service: &'s FadeService,
        timer: u32,
        config: &TimerConfig,
    ) -> Result<Self> {
        adapter
            .configure_timer(config.speed_mode, timer, config.frequency, config.resolution)
            .map_err(Error::Config)?;

        fade_service.acquire(&adapter).map_err(Error::Config)?;

        debug!(
            "LEDC timer {} configured: {}, {} bits, {:?}",
            timer,
            config.frequency,
            config.resolution.bits(),
            config.speed_mode
        );

        Ok(Self {
            adapter,
            fade_service,
            timer,
            config: *config,
            channels: [None; CHANNEL_COUNT],
            active: true,
        })
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn frequency(&self) -> Hertz {
        self.config.frequency
    }

    pub fn resolution(&self) -> Resolution {
        self.config.resolution
    }

    pub fn speed_mode(&self) -> SpeedMode {
        self.config.speed_mode
    }

    /// Full-on duty of this controller's timer
    pub fn max_duty(&self) -> Duty {
        self.config.resolution.max_duty()
    }

    /// `false` once [`deinit`](Self::deinit) has run
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Binds `channel` to `pin` with a duty of zero.
    pub fn configure_channel<P: OutputPin>(&mut self, channel: u32, pin: P) -> Result<()> {
        self.configure_channel_with_duty(channel, pin, 0)
    }

    /// Binds `channel` to `pin` and this controller's timer, starting at
    /// `duty`. Reconfiguring an already configured channel is allowed.
    pub fn configure_channel_with_duty<P: OutputPin>(
        &mut self,
        channel: u32,
        pin: P,
        duty: Duty,
    ) -> Result<()> {
        let index = Self::index(channel)?;
        self.check_duty(duty)?;

        let pin = pin.pin();

        self.adapter
            .configure_channel(self.config.speed_mode, channel, pin, self.timer, duty)
            .map_err(Error::Config)?;

        self.channels[index] = Some(ChannelState { pin, duty });

        debug!(
            "LEDC channel {} on GPIO{} bound to timer {}, duty {}",
            channel, pin, self.timer, duty
        );

        Ok(())
    }

    /// Sets the duty of `channel` and applies it right away.
    ///
    /// If the driver accepts the new duty but fails to apply it, the error
    /// is returned and the recorded duty keeps its old value.
    pub fn set_duty(&mut self, channel: u32, duty: Duty) -> Result<()> {
        let index = self.configured(channel)?;
        self.check_duty(duty)?;

        let mode = self.config.speed_mode;

        self.adapter
            .set_duty(mode, channel, duty)
            .map_err(Error::Driver)?;
        self.adapter
            .update_duty(mode, channel)
            .map_err(Error::Driver)?;

        self.record_duty(index, duty);

        trace!("LEDC channel {} duty set to {}", channel, duty);

        Ok(())
    }

    /// Starts a hardware fade of `channel` from its current duty to `duty`
    /// over `time` and returns without waiting for it.
    ///
    /// The recorded duty becomes the target immediately. Starting another
    /// fade or setting the duty supersedes a running fade.
    pub fn fade(&mut self, channel: u32, duty: Duty, time: impl Into<MilliSeconds>) -> Result<()> {
        let index = self.configured(channel)?;
        self.check_duty(duty)?;

        let mode = self.config.speed_mode;
        let time = time.into();

        self.adapter
            .set_fade_with_time(mode, channel, duty, time)
            .map_err(Error::Driver)?;
        self.adapter
            .fade_start(mode, channel)
            .map_err(Error::Driver)?;

        self.record_duty(index, duty);

        trace!("LEDC channel {} fading to {} over {}", channel, duty, time);

        Ok(())
    }

    /// Recorded state of `channel`, `None` if it was never configured
    pub fn channel_state(&self, channel: u32) -> Result<Option<ChannelState>> {
        Ok(self.channels[Self::index(channel)?])
    }

    pub fn is_configured(&self, channel: u32) -> Result<bool> {
        Ok(self.channel_state(channel)?.is_some())
    }

    /// Last duty written to `channel`. For a fade this is its target.
    pub fn duty(&self, channel: u32) -> Result<Option<Duty>> {
        Ok(self.channel_state(channel)?.map(|state| state.duty))
    }

    pub fn pin(&self, channel: u32) -> Result<Option<i32>> {
        Ok(self.channel_state(channel)?.map(|state| state.pin))
    }

    /// Borrows a configured channel as a standalone PWM output.
    pub fn channel(&mut self, channel: u32) -> Result<LedcChannel<'_, 's, A>> {
        let index = self.configured(channel)?;

        Ok(LedcChannel {
            control: self,
            channel,
            index,
        })
    }

    /// Unregisters from the fade service, uninstalling it if this was the
    /// last live controller. Channel state is left alone.
    ///
    /// Running this more than once, or dropping the controller afterwards,
    /// has no further effect.
    pub fn deinit(&mut self) {
        if !self.active {
            trace!("LEDC timer {} already released", self.timer);
            return;
        }

        self.active = false;
        self.fade_service.release(&self.adapter);

        debug!("LEDC timer {} released", self.timer);
    }

    fn index(channel: u32) -> Result<usize> {
        let index = channel as usize;

        if index < CHANNEL_COUNT {
            Ok(index)
        } else {
            Err(Error::InvalidChannel(channel))
        }
    }

    fn configured(&self, channel: u32) -> Result<usize> {
        let index = Self::index(channel)?;

        if self.channels[index].is_some() {
            Ok(index)
        } else {
            Err(Error::UnconfiguredChannel(channel))
        }
    }

    fn check_duty(&self, duty: Duty) -> Result<()> {
        let max = self.max_duty();

        if duty > max {
            Err(Error::DutyOutOfRange { duty, max })
        } else {
            Ok(())
        }
    }

    fn record_duty(&mut self, index: usize, duty: Duty) {
        if let Some(state) = self.channels[index].as_mut() {
            state.duty = duty;
        }
    }
}

impl<'s, A: LedcAdapter> Drop for LedControl<'s, A> {
    fn drop(&mut self) {
        self.deinit();
    }
}

/// A configured channel of a [`LedControl`]
pub struct LedcChannel<'c, 's, A: LedcAdapter> {
    control: &'c mut LedControl<'s, A>,
    channel: u32,
    index: usize,
}

impl<'c, 's, A: LedcAdapter> LedcChannel<'c, 's, A> {
    pub fn channel(&self) -> u32 {
        self.channel
    }

    pub fn pin(&self) -> i32 {
        self.state().pin
    }

    pub fn duty(&self) -> Duty {
        self.state().duty
    }

    pub fn max_duty(&self) -> Duty {
        self.control.max_duty()
    }

    pub fn set_duty(&mut self, duty: Duty) -> Result<()> {
        self.control.set_duty(self.channel, duty)
    }

    pub fn fade(&mut self, duty: Duty, time: impl Into<MilliSeconds>) -> Result<()> {
        self.control.fade(self.channel, duty, time)
    }

    fn state(&self) -> ChannelState {
        // A handle is only handed out for configured channels, and channels
        // never go back to unconfigured.
        self.control.channels[self.index].unwrap_or(ChannelState { pin: -1, duty: 0 })
    }
}

impl<'c, 's, A: LedcAdapter> embedded_hal::pwm::ErrorType for LedcChannel<'c, 's, A> {
    type Error = Error;
}

impl<'c, 's, A: LedcAdapter> embedded_hal::pwm::SetDutyCycle for LedcChannel<'c, 's, A> {
    fn max_duty_cycle(&self) -> u16 {
        self.max_duty().min(u16::MAX as u32) as u16
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        let max = self.max_duty();

        // Resolutions above 16 bits get the u16 range stretched over the
        // full duty range.
        let duty = if max > u16::MAX as u32 {
            (duty as u64 * max as u64 / u16::MAX as u64) as u32
        } else {
            duty as u32
        };

        self.set_duty(duty)
    }
}
