//! Footswitch debouncing
//!
//! A press is accepted on the released → pressed edge, and only if more
//! than the debounce window has passed since the last accepted press.
//! Rejected edges are dropped, not deferred.

use crate::time::{elapsed, Millis};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonDebouncer {
    window_ms: u32,
    was_pressed: bool,
    last_accepted: Option<Millis>,
}

impl ButtonDebouncer {
    pub const fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            was_pressed: false,
            last_accepted: None,
        }
    }

    /// Feed the current level, returns `true` on an accepted press
    pub fn update(&mut self, pressed: bool, now: Millis) -> bool {
        let edge = pressed && !self.was_pressed;
        self.was_pressed = pressed;

        if !edge {
            return false;
        }

        let settled = self
            .last_accepted
            .map_or(true, |last| elapsed(now, last) > self.window_ms);
        if settled {
            self.last_accepted = Some(now);
        }
        settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_press() {
        let mut button = ButtonDebouncer::new(200);
        assert!(!button.update(false, 0));
        assert!(button.update(true, 10));
        // Holding does not repeat
        assert!(!button.update(true, 500));
        assert!(!button.update(false, 600));
    }

    #[test]
    fn test_bounce_inside_window_is_dropped() {
        let mut button = ButtonDebouncer::new(200);
        assert!(button.update(true, 1000));
        assert!(!button.update(false, 1005));
        assert!(!button.update(true, 1010));
        assert!(!button.update(false, 1100));
        assert!(!button.update(true, 1200));
        assert!(!button.update(false, 1201));
        assert!(button.update(true, 1201));
    }

    #[test]
    fn test_window_is_exclusive() {
        let mut button = ButtonDebouncer::new(200);
        assert!(button.update(true, 0));
        button.update(false, 100);
        // Exactly 200 ms is still inside
        assert!(!button.update(true, 200));
    }
}
