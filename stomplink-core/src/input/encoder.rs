//! Rotary encoder tick counting
//!
//! The A-channel edge interrupt calls [`TickAccumulator::record`]; the
//! main loop periodically takes the total with [`TickAccumulator::take`]
//! and feeds it through a [`StepCounter`] to get whole detents.
//!
//! ```text
//!   A edge ──► record(a, b) ──► ticks += ±1        (ISR, only writer)
//!   loop   ──► take()       ──► swap(0)            (critical section)
//!          ──► StepCounter  ──► ticks / per_step   (residual kept)
//! ```

use portable_atomic::{AtomicI32, Ordering};

/// Interrupt-fed signed tick counter
///
/// One writer (the encoder ISR) and one reader that clears on read.
#[derive(Debug, Default)]
pub struct TickAccumulator {
    ticks: AtomicI32,
}

impl TickAccumulator {
    pub const fn new() -> Self {
        Self {
            ticks: AtomicI32::new(0),
        }
    }

    /// Record one A-channel edge
    ///
    /// A and B equal after the edge means clockwise.
    pub fn record(&self, a_high: bool, b_high: bool) {
        let delta = if a_high == b_high { 1 } else { -1 };
        self.add(delta);
    }

    /// Add raw ticks
    pub fn add(&self, delta: i32) {
        self.ticks.fetch_add(delta, Ordering::Relaxed);
    }

    /// Read and clear the accumulated ticks
    pub fn take(&self) -> i32 {
        critical_section::with(|_| self.ticks.swap(0, Ordering::AcqRel))
    }
}

/// Converts raw ticks into detent steps, carrying the remainder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepCounter {
    ticks_per_step: i32,
    residual: i32,
}

impl StepCounter {
    /// `ticks_per_step` of zero is treated as one
    pub fn new(ticks_per_step: u8) -> Self {
        Self {
            ticks_per_step: i32::from(ticks_per_step.max(1)),
            residual: 0,
        }
    }

    /// Add raw ticks and return the whole steps they complete
    pub fn consume(&mut self, raw_ticks: i32) -> i32 {
        let total = self.residual.saturating_add(raw_ticks);
        let steps = total / self.ticks_per_step;
        self.residual = total % self.ticks_per_step;
        steps
    }

    /// Ticks waiting to complete a step
    pub fn residual(&self) -> i32 {
        self.residual
    }
}
