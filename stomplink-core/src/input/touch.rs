//! Touch sampling and hit testing
//!
//! Touch is polled. A tap fires when a new contact starts inside a
//! registered region and the minimum spacing since the previous tap has
//! passed. Holding a finger down never repeats.

use heapless::Vec;

use super::intent::{IntentEvent, TouchTarget};
use crate::time::{elapsed, Millis};

/// Maximum number of registered hit regions
pub const MAX_HIT_REGIONS: usize = 8;

/// Landscape screen width in pixels
pub const SCREEN_WIDTH: u16 = 480;

/// Landscape screen height in pixels
pub const SCREEN_HEIGHT: u16 = 320;

/// Map a raw portrait panel coordinate to the landscape screen
///
/// The panel is mounted rotated a quarter turn: screen x follows raw y,
/// screen y runs against raw x. Results are clamped to the screen.
pub fn map_rotated(raw_x: u16, raw_y: u16) -> (u16, u16) {
    let x = raw_y.min(SCREEN_WIDTH - 1);
    let y = (i32::from(SCREEN_HEIGHT) - i32::from(raw_x)).clamp(0, i32::from(SCREEN_HEIGHT) - 1);
    (x, y as u16)
}

/// Rectangular touch target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HitRegion {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub target: TouchTarget,
}

impl HitRegion {
    pub const fn new(x: u16, y: u16, width: u16, height: u16, target: TouchTarget) -> Self {
        Self {
            x,
            y,
            width,
            height,
            target,
        }
    }

    /// Check if a point lies inside (right and bottom edges exclusive)
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && y >= self.y && x - self.x < self.width && y - self.y < self.height
    }
}

#[derive(Debug, Clone)]
pub struct TouchInput {
    regions: Vec<HitRegion, MAX_HIT_REGIONS>,
    spacing_ms: u32,
    touching: bool,
    last_event: Option<Millis>,
}

impl TouchInput {
    pub const fn new(spacing_ms: u32) -> Self {
        Self {
            regions: Vec::new(),
            spacing_ms,
            touching: false,
            last_event: None,
        }
    }

    /// Register a region; earlier regions win where they overlap
    pub fn add_region(&mut self, region: HitRegion) -> bool {
        self.regions.push(region).is_ok()
    }

    /// Feed one poll result, `None` meaning no contact
    pub fn sample(&mut self, point: Option<(u16, u16)>, now: Millis) -> Option<IntentEvent> {
        let was_touching = self.touching;
        self.touching = point.is_some();

        let (x, y) = point?;
        if was_touching {
            return None;
        }
        if let Some(last) = self.last_event {
            if elapsed(now, last) < self.spacing_ms {
                return None;
            }
        }

        let region = self.regions.iter().find(|r| r.contains(x, y))?;
        self.last_event = Some(now);
        Some(IntentEvent::TapAt {
            x,
            y,
            target: region.target,
        })
    }
}
