//! Millisecond timestamps
//!
//! Timestamps are free-running `u32` milliseconds. All comparisons use
//! wrapping subtraction, so the counter may roll over (~49.7 days).

/// Milliseconds since an arbitrary epoch
pub type Millis = u32;

/// Milliseconds from `since` to `now`
#[inline]
pub fn elapsed(now: Millis, since: Millis) -> u32 {
    now.wrapping_sub(since)
}

/// Fixed-period cadence check
///
/// The first call to [`Interval::due`] always fires. After that it fires
/// once `period` has passed since the last firing. Missed periods are not
/// made up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Interval {
    period: u32,
    last: Option<Millis>,
}

impl Interval {
    pub const fn new(period: u32) -> Self {
        Self { period, last: None }
    }

    /// Check whether the period has elapsed, and restart it if so
    pub fn due(&mut self, now: Millis) -> bool {
        match self.last {
            Some(last) if elapsed(now, last) < self.period => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Make the next `due` call fire regardless of time
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn period(&self) -> u32 {
        self.period
    }
}
