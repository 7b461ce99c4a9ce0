//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use stomplink_protocol::LEVEL_MAX;

/// Link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// Link is considered lost after this long without a valid line
    pub timeout_ms: u32,
    /// Level changes are batched for this long before one is sent
    pub level_coalesce_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 1000,
            level_coalesce_ms: 40,
        }
    }
}

/// Physical input settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InputConfig {
    /// Minimum time between accepted footswitch presses
    pub debounce_ms: u32,
    /// Raw encoder ticks per logical step (detent)
    pub ticks_per_step: u8,
    /// Minimum time between touch events
    pub touch_spacing_ms: u32,
    /// Level used before anything is known
    pub default_level: u8,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 200,
            ticks_per_step: 2,
            touch_spacing_ms: 250,
            default_level: 50,
        }
    }
}

/// Display settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Minimum time between redraw passes
    pub redraw_interval_ms: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            redraw_interval_ms: 50,
        }
    }
}

/// Audio-node reporting periods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TelemetryConfig {
    /// `MTR` period
    pub meter_period_ms: u32,
    /// `DBG` period
    pub debug_period_ms: u32,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            meter_period_ms: 50,
            debug_period_ms: 200,
        }
    }
}

/// Complete node configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeConfig {
    pub link: LinkConfig,
    pub input: InputConfig,
    pub display: DisplayConfig,
    pub telemetry: TelemetryConfig,
}

impl NodeConfig {
    /// Check value ranges that the parser cannot express
    pub fn is_valid(&self) -> bool {
        self.link.timeout_ms > 0
            && self.input.ticks_per_step > 0
            && self.input.default_level <= LEVEL_MAX
            && self.display.redraw_interval_ms > 0
            && self.telemetry.meter_period_ms > 0
            && self.telemetry.debug_period_ms > 0
    }
}
