// VibraWatch — Buzzer Driver
//
// Piezo buzzer on an LEDC PWM channel. The channel's timer is configured
// for the fixed alarm pitch at startup; beeping is just duty on, wait,
// duty off.

use std::thread;
use std::time::Duration;

use esp_idf_hal::ledc::LedcDriver;

use crate::config::TONE_DURATION_MS;

pub struct Buzzer<'d> {
    pwm: LedcDriver<'d>,
}

impl<'d> Buzzer<'d> {
    pub fn new(pwm: LedcDriver<'d>) -> Self {
        Self { pwm }
    }

    /// One alarm tone at the timer's pitch (blocks the calling thread for
    /// the full duration).
    pub fn beep(&mut self) {
        let duty = self.pwm.get_max_duty() / 2;
        let _ = self.pwm.set_duty(duty);
        thread::sleep(Duration::from_millis(TONE_DURATION_MS));
        let _ = self.pwm.set_duty(0);
    }
}
