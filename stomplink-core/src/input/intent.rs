//! Debounced operator intent

/// What a touch hit region does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchTarget {
    ToggleDelay,
    ToggleReverb,
    /// Advance the dry channel 0 → 1 → 2 → 0
    CycleChannel,
}

/// A debounced input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntentEvent {
    /// Encoder moved by this many detents (negative = counter-clockwise)
    StepBy(i32),
    /// Footswitch pressed
    Activate,
    /// Touch landed in a hit region
    TapAt { x: u16, y: u16, target: TouchTarget },
}
