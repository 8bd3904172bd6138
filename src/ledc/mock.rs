//! Recording LEDC driver doubles for host-side tests

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::vec::Vec;

use crate::errors::{esp_err_t, EspError};
use crate::units::{Hertz, MilliSeconds};

use super::adapter::LedcAdapter;
use super::config::{Resolution, SpeedMode};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    ConfigureTimer {
        mode: SpeedMode,
        timer: u32,
        frequency: Hertz,
        resolution: Resolution,
    },
    ConfigureChannel {
        mode: SpeedMode,
        channel: u32,
        pin: i32,
        timer: u32,
        duty: u32,
    },
    SetDuty {
        mode: SpeedMode,
        channel: u32,
        duty: u32,
    },
    UpdateDuty {
        mode: SpeedMode,
        channel: u32,
    },
    SetFadeWithTime {
        mode: SpeedMode,
        channel: u32,
        duty: u32,
        time: MilliSeconds,
    },
    FadeStart {
        mode: SpeedMode,
        channel: u32,
    },
    InstallFadeService,
    UninstallFadeService,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    ConfigureTimer,
    ConfigureChannel,
    SetDuty,
    UpdateDuty,
    SetFadeWithTime,
    FadeStart,
    InstallFadeService,
}

/// Single-threaded driver double recording every call
#[derive(Default)]
pub struct MockLedc {
    calls: RefCell<Vec<Call>>,
    failures: RefCell<Vec<(Op, esp_err_t)>>,
}

impl MockLedc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following call of `op` fail with `code`.
    pub fn fail(&self, op: Op, code: esp_err_t) {
        self.failures.borrow_mut().push((op, code));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls.borrow().iter().filter(|c| **c == call).count()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, op: Op, call: Call) -> Result<(), EspError> {
        self.calls.borrow_mut().push(call);

        let failure = self
            .failures
            .borrow()
            .iter()
            .find(|(failing, _)| *failing == op)
            .map(|(_, code)| *code);

        match failure {
            Some(code) => EspError::convert(code),
            None => Ok(()),
        }
    }
}

impl LedcAdapter for MockLedc {
    fn configure_timer(
        &self,
        mode: SpeedMode,
        timer: u32,
        frequency: Hertz,
        resolution: Resolution,
    ) -> Result<(), EspError> {
        self.record(
            Op::ConfigureTimer,
            Call::ConfigureTimer {
                mode,
                timer,
                frequency,
                resolution,
            },
        )
    }

    fn configure_channel(
        &self,
        mode: SpeedMode,
        channel: u32,
        pin: i32,
        timer: u32,
        duty: u32,
    ) -> Result<(), EspError> {
        self.record(
            Op::ConfigureChannel,
            Call::ConfigureChannel {
                mode,
                channel,
                pin,
                timer,
                duty,
            },
        )
    }

    fn set_duty(&self, mode: SpeedMode, channel: u32, duty: u32) -> Result<(), EspError> {
        self.record(Op::SetDuty, Call::SetDuty { mode, channel, duty })
    }

    fn update_duty(&self, mode: SpeedMode, channel: u32) -> Result<(), EspError> {
        self.record(Op::UpdateDuty, Call::UpdateDuty { mode, channel })
    }

    fn set_fade_with_time(
        &self,
        mode: SpeedMode,
        channel: u32,
        duty: u32,
        time: MilliSeconds,
    ) -> Result<(), EspError> {
        self.record(
            Op::SetFadeWithTime,
            Call::SetFadeWithTime {
                mode,
                channel,
                duty,
                time,
            },
        )
    }

    fn fade_start(&self, mode: SpeedMode, channel: u32) -> Result<(), EspError> {
        self.record(Op::FadeStart, Call::FadeStart { mode, channel })
    }

    fn install_fade_service(&self) -> Result<(), EspError> {
        self.record(Op::InstallFadeService, Call::InstallFadeService)
    }

    fn uninstall_fade_service(&self) {
        self.calls.borrow_mut().push(Call::UninstallFadeService);
    }
}

/// Thread-safe double tracking only fade service transitions
#[derive(Default)]
pub struct SyncMockLedc {
    installed: AtomicBool,
    installs: AtomicUsize,
    uninstalls: AtomicUsize,
}

impl SyncMockLedc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn installs(&self) -> usize {
        self.installs.load(Ordering::SeqCst)
    }

    pub fn uninstalls(&self) -> usize {
        self.uninstalls.load(Ordering::SeqCst)
    }
}

impl LedcAdapter for SyncMockLedc {
    fn configure_timer(&self, _: SpeedMode, _: u32, _: Hertz, _: Resolution) -> Result<(), EspError> {
        Ok(())
    }

    fn configure_channel(&self, _: SpeedMode, _: u32, _: i32, _: u32, _: u32) -> Result<(), EspError> {
        Ok(())
    }

    fn set_duty(&self, _: SpeedMode, _: u32, _: u32) -> Result<(), EspError> {
        Ok(())
    }

    fn update_duty(&self, _: SpeedMode, _: u32) -> Result<(), EspError> {
        Ok(())
    }

    fn set_fade_with_time(&self, _: SpeedMode, _: u32, _: u32, _: MilliSeconds) -> Result<(), EspError> {
        Ok(())
    }

    fn fade_start(&self, _: SpeedMode, _: u32) -> Result<(), EspError> {
        Ok(())
    }

    fn install_fade_service(&self) -> Result<(), EspError> {
        assert!(
            !self.installed.swap(true, Ordering::SeqCst),
            "fade service installed twice"
        );
        self.installs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn uninstall_fade_service(&self) {
        assert!(
            self.installed.swap(false, Ordering::SeqCst),
            "fade service uninstalled while not installed"
        );
        self.uninstalls.fetch_add(1, Ordering::SeqCst);
    }
}
