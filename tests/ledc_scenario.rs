use std::cell::RefCell;

use esp_idf_ledcontrol::errors::{EspError, ESP_ERR_INVALID_ARG};
use esp_idf_ledcontrol::gpio::AnyOutputPin;
use esp_idf_ledcontrol::ledc::{
    FadeService, LedControl, LedcAdapter, Resolution, SpeedMode, TimerConfig,
};
use esp_idf_ledcontrol::prelude::*;
use esp_idf_ledcontrol::Error;

/// Records driver calls by name and rejects timers above 40 kHz at 10 bits.
#[derive(Default)]
struct RecordingLedc {
    log: RefCell<Vec<String>>,
}

impl RecordingLedc {
    fn count(&self, name: &str) -> usize {
        self.log.borrow().iter().filter(|entry| entry.as_str() == name).count()
    }

    fn push(&self, entry: String) {
        self.log.borrow_mut().push(entry);
    }
}

impl LedcAdapter for RecordingLedc {
    fn configure_timer(
        &self,
        _mode: SpeedMode,
        timer: u32,
        frequency: Hertz,
        resolution: Resolution,
    ) -> Result<(), EspError> {
        self.push(format!("timer {} {}", timer, frequency));

        if frequency.0 > 40_000 && resolution.bits() >= 10 {
            EspError::convert(ESP_ERR_INVALID_ARG)
        } else {
            Ok(())
        }
    }

    fn configure_channel(
        &self,
        _mode: SpeedMode,
        channel: u32,
        pin: i32,
        _timer: u32,
        duty: u32,
    ) -> Result<(), EspError> {
        self.push(format!("channel {} gpio{} {}", channel, pin, duty));
        Ok(())
    }

    fn set_duty(&self, _mode: SpeedMode, channel: u32, duty: u32) -> Result<(), EspError> {
        self.push(format!("set {} {}", channel, duty));
        Ok(())
    }

    fn update_duty(&self, _mode: SpeedMode, channel: u32) -> Result<(), EspError> {
        self.push(format!("update {}", channel));
        Ok(())
    }

    fn set_fade_with_time(
        &self,
        _mode: SpeedMode,
        channel: u32,
        duty: u32,
        time: MilliSeconds,
    ) -> Result<(), EspError> {
        self.push(format!("fade {} {} {}", channel, duty, time));
        Ok(())
    }

    fn fade_start(&self, _mode: SpeedMode, channel: u32) -> Result<(), EspError> {
        self.push(format!("start {}", channel));
        Ok(())
    }

    fn install_fade_service(&self) -> Result<(), EspError> {
        self.push("install".into());
        Ok(())
    }

    fn uninstall_fade_service(&self) {
        self.push("uninstall".into());
    }
}

#[test]
fn five_khz_ten_bit_walkthrough() -> anyhow::Result<()> {
    let ledc = RecordingLedc::default();
    let service = FadeService::new();

    let mut first = LedControl::with_fade_service(
        &ledc,
        &service,
        0,
        &TimerConfig::new(5_000.Hz()).resolution(Resolution::Bits10),
    )?;

    first.configure_channel(0, AnyOutputPin::new(5)?)?;

    first.set_duty(0, 512)?;
    assert_eq!(first.duty(0)?, Some(512));

    assert_eq!(first.set_duty(8, 100), Err(Error::InvalidChannel(8)));

    first.fade(0, 1023, 1000.ms())?;
    assert_eq!(first.duty(0)?, Some(1023));

    let mut second = LedControl::with_fade_service(&ledc, &service, 1, &TimerConfig::new(1.kHz()))?;
    assert_eq!(ledc.count("install"), 1);
    assert_eq!(service.users(), 2);

    first.deinit();
    assert_eq!(ledc.count("uninstall"), 0);

    second.deinit();
    assert_eq!(ledc.count("uninstall"), 1);

    drop(first);
    drop(second);
    assert_eq!(ledc.count("install"), 1);
    assert_eq!(ledc.count("uninstall"), 1);

    assert_eq!(
        *ledc.log.borrow(),
        [
            "timer 0 5000Hz",
            "install",
            "channel 0 gpio5 0",
            "set 0 512",
            "update 0",
            "fade 0 1023 1000ms",
            "start 0",
            "timer 1 1000Hz",
            "uninstall",
        ]
    );

    Ok(())
}

#[test]
fn any_teardown_order_installs_and_uninstalls_once() {
    for order in [[0, 1, 2, 3], [3, 2, 1, 0], [2, 0, 3, 1]] {
        let ledc = RecordingLedc::default();
        let service = FadeService::new();

        let mut controls: Vec<Option<_>> = (0..4)
            .map(|timer| {
                LedControl::with_fade_service(&ledc, &service, timer, &TimerConfig::new(5.kHz()))
                    .ok()
            })
            .collect();
        assert_eq!(ledc.count("install"), 1);

        for (released, index) in order.into_iter().enumerate() {
            assert_eq!(ledc.count("uninstall"), 0, "released {} so far", released);
            controls[index] = None;
        }

        assert_eq!(ledc.count("install"), 1);
        assert_eq!(ledc.count("uninstall"), 1);
        assert_eq!(service.users(), 0);
    }
}

#[test]
fn rejected_timer_leaves_service_untouched() {
    let ledc = RecordingLedc::default();
    let service = FadeService::new();

    let result = LedControl::with_fade_service(&ledc, &service, 0, &TimerConfig::new(80.kHz()));

    match result {
        Err(Error::Config(err)) => assert_eq!(err.name(), "ESP_ERR_INVALID_ARG"),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("timer should have been rejected"),
    }
    assert_eq!(service.users(), 0);
    assert_eq!(ledc.count("install"), 0);
}

#[test]
fn unresolvable_pins_surface_as_pin_errors() {
    assert_eq!(AnyOutputPin::new(34), Err(Error::InvalidPin(34)));
}
