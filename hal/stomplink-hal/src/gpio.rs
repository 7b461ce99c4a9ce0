//! GPIO pin abstractions
//!
//! Only inputs are needed by the link core: footswitches and encoder
//! phases are read, never driven.

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Adapter for switches wired to ground with a pull-up
///
/// `is_high()` on the adapter reports "pressed", so debouncers can treat
/// every switch as active-high regardless of wiring.
pub struct ActiveLow<P>(pub P);

impl<P: InputPin> ActiveLow<P> {
    /// Check if the switch is pressed (pin pulled low)
    pub fn is_pressed(&self) -> bool {
        self.0.is_low()
    }
}

impl<P: InputPin> InputPin for ActiveLow<P> {
    fn is_high(&self) -> bool {
        self.0.is_low()
    }
}

impl InputPin for bool {
    fn is_high(&self) -> bool {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_low_inverts() {
        let released = ActiveLow(true);
        let pressed = ActiveLow(false);

        assert!(!released.is_pressed());
        assert!(pressed.is_pressed());
        assert!(pressed.is_high());
        assert!(released.is_low());
    }
}
