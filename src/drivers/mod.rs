// VibraWatch — Hardware Drivers

pub mod buzzer;
pub mod imu;
pub mod leds;

use crate::traits::{Annunciator, Lamp};

use self::buzzer::Buzzer;
use self::leds::StatusLeds;

/// The operator-facing panel: status LEDs plus buzzer, presented to the
/// core as one annunciator.
pub struct AlertPanel<'d> {
    leds: StatusLeds<'d>,
    buzzer: Buzzer<'d>,
}

impl<'d> AlertPanel<'d> {
    pub fn new(leds: StatusLeds<'d>, buzzer: Buzzer<'d>) -> Self {
        Self { leds, buzzer }
    }
}

impl Annunciator for AlertPanel<'_> {
    fn set_lamp(&mut self, lamp: Lamp) {
        self.leds.set(lamp);
    }

    fn sound_alarm(&mut self) {
        self.buzzer.beep();
    }
}
