// VibraWatch — Status LED Driver
//
// Three discrete LEDs acting as one tri-state lamp: exactly one lit at any
// moment, so the machine state reads unambiguously from across the floor.

use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};

use crate::traits::Lamp;

pub struct StatusLeds<'d> {
    green: PinDriver<'d, AnyOutputPin, Output>,
    yellow: PinDriver<'d, AnyOutputPin, Output>,
    red: PinDriver<'d, AnyOutputPin, Output>,
}

impl<'d> StatusLeds<'d> {
    pub fn new(
        green: PinDriver<'d, AnyOutputPin, Output>,
        yellow: PinDriver<'d, AnyOutputPin, Output>,
        red: PinDriver<'d, AnyOutputPin, Output>,
    ) -> Self {
        Self { green, yellow, red }
    }

    pub fn set(&mut self, lamp: Lamp) {
        let _ = self.green.set_low();
        let _ = self.yellow.set_low();
        let _ = self.red.set_low();
        let _ = match lamp {
            Lamp::Green => self.green.set_high(),
            Lamp::Yellow => self.yellow.set_high(),
            Lamp::Red => self.red.set_high(),
        };
    }
}
