//! Audio signal chain accessor
//!
//! The audio node never touches samples itself. It commands the chain and
//! reads back what it needs to report.

use stomplink_protocol::{DebugFields, Effect};

/// Peak amplitudes since the last read, full scale = 1.0
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Peaks {
    pub input: f32,
    pub output: f32,
}

pub trait AudioEngine {
    /// Set the output level, 0-100
    fn set_level(&mut self, level: u8);

    /// Switch an effect in or out of the chain
    fn set_effect(&mut self, effect: Effect, enabled: bool);

    /// Select the dry channel, 0-2
    fn set_channel(&mut self, channel: u8);

    /// Take the peaks seen since the previous call
    fn take_peaks(&mut self) -> Peaks;

    /// Fill `fields` with current internal values (gains, delay time, ...)
    fn debug_fields(&mut self, fields: &mut DebugFields);
}
