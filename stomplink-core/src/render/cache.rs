//! Shadow copy of what is on screen

use stomplink_protocol::DebugFields;

/// Last drawn value of one region
///
/// `Never` differs from every value, including unknown (`Shown(None)`),
/// so the first pass always paints.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cached<T> {
    #[default]
    Never,
    Shown(T),
}

impl<T: PartialEq> Cached<T> {
    /// Check if `live` differs from what was drawn
    pub fn is_stale(&self, live: &T) -> bool {
        match self {
            Cached::Never => true,
            Cached::Shown(shown) => shown != live,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderCache {
    pub level: Cached<Option<u8>>,
    pub delay: Cached<Option<bool>>,
    pub reverb: Cached<Option<bool>>,
    pub channel: Cached<Option<u8>>,
    pub meter_in: Cached<Option<u8>>,
    pub meter_out: Cached<Option<u8>>,
    pub link: Cached<bool>,
    pub debug: Cached<DebugFields>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything so the next pass repaints all regions
    pub fn invalidate(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_differs_from_unknown() {
        let cached: Cached<Option<u8>> = Cached::Never;
        assert!(cached.is_stale(&None));
        assert!(!Cached::Shown(None::<u8>).is_stale(&None));
        assert!(Cached::Shown(Some(3u8)).is_stale(&Some(4)));
    }
}
