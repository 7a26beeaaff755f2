// VibraWatch — Alert State Machine
//
// Folds inference verdicts into the three-level alert shown on the lamp,
// and fires the buzzer on Critical. The connection cues share the same
// lamp, so they live here too; cues recolour the lamp but never change the
// recorded alert level.

use crate::config::WARN_RATIO;
use crate::traits::{Annunciator, Lamp};
use crate::types::Verdict;

/// Machine condition as decided from the latest verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Normal,
    Warning,
    Critical,
}

impl AlertLevel {
    /// Classify one verdict. The anomaly flag wins outright; otherwise the
    /// severity ratio decides, with the boundary value itself still Normal.
    pub fn from_verdict(verdict: &Verdict) -> Self {
        if verdict.is_anomaly {
            AlertLevel::Critical
        } else if verdict.ratio() > WARN_RATIO {
            AlertLevel::Warning
        } else {
            AlertLevel::Normal
        }
    }

    pub fn lamp(self) -> Lamp {
        match self {
            AlertLevel::Normal => Lamp::Green,
            AlertLevel::Warning => Lamp::Yellow,
            AlertLevel::Critical => Lamp::Red,
        }
    }
}

pub struct AlertMachine<A> {
    outputs: A,
    level: Option<AlertLevel>,
}

impl<A: Annunciator> AlertMachine<A> {
    pub fn new(outputs: A) -> Self {
        Self {
            outputs,
            level: None,
        }
    }

    /// Level decided by the last applied verdict; `None` until the first
    /// verdict arrives.
    pub fn level(&self) -> Option<AlertLevel> {
        self.level
    }

    /// Apply one verdict: recolour the lamp, beep on Critical, remember the
    /// level. Each Critical verdict re-fires the tone; the machine keeps no
    /// cooldown state across verdicts.
    pub fn apply(&mut self, verdict: &Verdict) -> AlertLevel {
        let level = AlertLevel::from_verdict(verdict);
        self.outputs.set_lamp(level.lamp());
        if level == AlertLevel::Critical {
            self.outputs.sound_alarm();
        }
        if self.level != Some(level) {
            log::info!("alert level -> {level:?} (ratio {:.3})", verdict.ratio());
        }
        self.level = Some(level);
        level
    }

    // Connection cues from the session manager. They borrow the lamp but
    // leave `level` alone, so an offline spell doesn't erase the last
    // verdict.

    pub fn show_connecting(&mut self) {
        self.outputs.set_lamp(Lamp::Yellow);
    }

    pub fn show_online(&mut self) {
        self.outputs.set_lamp(Lamp::Green);
    }

    pub fn show_offline(&mut self) {
        self.outputs.set_lamp(Lamp::Red);
    }
}


#[cfg(test)]
mod level_props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn flagged_verdicts_are_always_critical(
            distance in -1e6f32..1e6,
            threshold in -1e6f32..1e6,
        ) {
            let v = Verdict { is_anomaly: true, distance, threshold };
            prop_assert_eq!(AlertLevel::from_verdict(&v), AlertLevel::Critical);
        }

        #[test]
        fn unflagged_verdicts_are_never_critical(
            distance in -1e6f32..1e6,
            threshold in -1e6f32..1e6,
        ) {
            let v = Verdict { is_anomaly: false, distance, threshold };
            prop_assert_ne!(AlertLevel::from_verdict(&v), AlertLevel::Critical);
        }
    }
}
