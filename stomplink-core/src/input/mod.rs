//! Physical input debouncing
//!
//! Raw samples go in once per loop iteration, [`IntentEvent`]s come out.
//! Each event is produced once and consumed once; nothing is queued for
//! replay.

pub mod button;
pub mod encoder;
pub mod intent;
pub mod touch;

use heapless::Vec;

pub use button::ButtonDebouncer;
pub use encoder::{StepCounter, TickAccumulator};
pub use intent::{IntentEvent, TouchTarget};
pub use touch::{map_rotated, HitRegion, TouchInput, MAX_HIT_REGIONS};

use crate::config::InputConfig;
use crate::time::Millis;

/// Maximum events one poll can produce (one per input kind)
pub const MAX_EVENTS_PER_POLL: usize = 3;

/// Every input source of a control node, debounced together
#[derive(Debug, Clone)]
pub struct InputDebouncer {
    steps: StepCounter,
    button: ButtonDebouncer,
    touch: TouchInput,
}

impl InputDebouncer {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            steps: StepCounter::new(config.ticks_per_step),
            button: ButtonDebouncer::new(config.debounce_ms),
            touch: TouchInput::new(config.touch_spacing_ms),
        }
    }

    /// Register a touch hit region
    ///
    /// Returns `false` if the region table is full.
    pub fn add_region(&mut self, region: HitRegion) -> bool {
        self.touch.add_region(region)
    }

    /// Debounce one round of samples
    ///
    /// - `raw_ticks`: encoder ticks taken from the accumulator since last poll
    /// - `pressed`: footswitch level, `true` while held
    /// - `touch`: screen coordinate while touched
    pub fn poll(
        &mut self,
        raw_ticks: i32,
        pressed: bool,
        touch: Option<(u16, u16)>,
        now: Millis,
    ) -> Vec<IntentEvent, MAX_EVENTS_PER_POLL> {
        let mut events = Vec::new();

        let steps = self.steps.consume(raw_ticks);
        if steps != 0 {
            let _ = events.push(IntentEvent::StepBy(steps));
        }
        if self.button.update(pressed, now) {
            let _ = events.push(IntentEvent::Activate);
        }
        if let Some(event) = self.touch.sample(touch, now) {
            let _ = events.push(event);
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_collects_all_sources() {
        let mut inputs = InputDebouncer::new(&InputConfig::default());
        inputs.add_region(HitRegion::new(0, 0, 100, 100, TouchTarget::ToggleReverb));

        let events = inputs.poll(4, true, Some((10, 10)), 1000);
        assert_eq!(
            events.as_slice(),
            &[
                IntentEvent::StepBy(2),
                IntentEvent::Activate,
                IntentEvent::TapAt {
                    x: 10,
                    y: 10,
                    target: TouchTarget::ToggleReverb
                },
            ]
        );

        // Nothing new while everything is held
        assert!(inputs.poll(0, true, Some((10, 10)), 1016).is_empty());
    }
}
