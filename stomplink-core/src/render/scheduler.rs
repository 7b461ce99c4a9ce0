//! Redraw cadence and dirty tracking

use stomplink_protocol::DebugFields;

use super::cache::{Cached, RenderCache};
use crate::fmt::{trace, warn};
use crate::state::DeviceState;
use crate::time::{Interval, Millis};
use crate::traits::{Content, Panel, Region};

/// Repaints changed regions at most once per interval
#[derive(Debug, Clone)]
pub struct RedrawScheduler {
    cadence: Interval,
    link_timeout_ms: u32,
    cache: RenderCache,
}

impl RedrawScheduler {
    pub fn new(interval_ms: u32, link_timeout_ms: u32) -> Self {
        Self {
            cadence: Interval::new(interval_ms),
            link_timeout_ms,
            cache: RenderCache::new(),
        }
    }

    /// Force every region to repaint on the next pass
    ///
    /// Use after the panel itself was cleared or reset.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
        self.cadence.reset();
    }

    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    /// Run one redraw pass if the interval has elapsed
    ///
    /// Returns the number of regions repainted. A region whose draw call
    /// fails keeps its stale cache entry and is retried next pass.
    pub fn tick<P: Panel>(&mut self, now: Millis, state: &DeviceState, panel: &mut P) -> usize {
        if !self.cadence.due(now) {
            return 0;
        }

        let link = state.link_healthy(now, self.link_timeout_ms);
        let cache = &mut self.cache;
        let mut drawn = 0;

        drawn += refresh(panel, Region::Level, &mut cache.level, state.display_level(), number);
        drawn += refresh(panel, Region::Delay, &mut cache.delay, state.delay_enabled, toggle);
        drawn += refresh(panel, Region::Reverb, &mut cache.reverb, state.reverb_enabled, toggle);
        drawn += refresh(panel, Region::Channel, &mut cache.channel, state.channel, number);
        drawn += refresh(panel, Region::MeterIn, &mut cache.meter_in, state.meter_in, segments);
        drawn += refresh(panel, Region::MeterOut, &mut cache.meter_out, state.meter_out, segments);
        drawn += refresh(panel, Region::Link, &mut cache.link, link, Content::Link);
        drawn += refresh_debug(panel, &mut cache.debug, &state.debug_fields);

        if drawn > 0 {
            trace!("redraw: {} regions", drawn);
        }
        drawn
    }
}

fn number(value: Option<u8>) -> Content<'static> {
    value.map_or(Content::Placeholder, Content::Number)
}

fn toggle(value: Option<bool>) -> Content<'static> {
    value.map_or(Content::Placeholder, Content::Toggle)
}

fn segments(value: Option<u8>) -> Content<'static> {
    value.map_or(Content::Placeholder, Content::Segments)
}

fn refresh<P, T, F>(panel: &mut P, region: Region, slot: &mut Cached<T>, live: T, content: F) -> usize
where
    P: Panel,
    T: PartialEq + Copy,
    F: FnOnce(T) -> Content<'static>,
{
    if !slot.is_stale(&live) {
        return 0;
    }
    match panel.draw(region, content(live)) {
        Ok(()) => {
            *slot = Cached::Shown(live);
            1
        }
        Err(e) => {
            warn!("draw {:?} failed: {:?}", region, e);
            0
        }
    }
}

fn refresh_debug<P: Panel>(panel: &mut P, slot: &mut Cached<DebugFields>, live: &DebugFields) -> usize {
    if !slot.is_stale(live) {
        return 0;
    }
    let content = if live.is_empty() {
        Content::Placeholder
    } else {
        Content::Debug(live)
    };
    match panel.draw(Region::Debug, content) {
        Ok(()) => {
            *slot = Cached::Shown(live.clone());
            1
        }
        Err(e) => {
            warn!("draw {:?} failed: {:?}", Region::Debug, e);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NodeRole;
    use crate::traits::PanelError;
    use stomplink_protocol::Message;
    use std::vec::Vec;

    #[derive(Default)]
    struct RecordingPanel {
        calls: Vec<(Region, Content<'static>)>,
        fail: Option<Region>,
    }

    impl Panel for RecordingPanel {
        fn draw(&mut self, region: Region, content: Content<'_>) -> Result<(), PanelError> {
            if self.fail == Some(region) {
                return Err(PanelError::Bus);
            }
            // Debug tables are borrowed; record them as a placeholder marker
            let content = match content {
                Content::Debug(_) => Content::Segments(u8::MAX),
                Content::Placeholder => Content::Placeholder,
                Content::Number(n) => Content::Number(n),
                Content::Toggle(b) => Content::Toggle(b),
                Content::Segments(s) => Content::Segments(s),
                Content::Link(l) => Content::Link(l),
            };
            self.calls.push((region, content));
            Ok(())
        }
    }

    fn scheduler() -> RedrawScheduler {
        RedrawScheduler::new(50, 1000)
    }

    #[test]
    fn test_first_pass_paints_everything_as_placeholder() {
        let mut redraw = scheduler();
        let mut panel = RecordingPanel::default();
        let state = DeviceState::new(NodeRole::Control);

        assert_eq!(redraw.tick(0, &state, &mut panel), Region::ALL.len());
        assert!(panel
            .calls
            .iter()
            .all(|(r, c)| *c == Content::Placeholder || *r == Region::Link));
        assert!(panel.calls.contains(&(Region::Link, Content::Link(false))));
    }

    #[test]
    fn test_unchanged_state_draws_nothing() {
        let mut redraw = scheduler();
        let mut panel = RecordingPanel::default();
        let state = DeviceState::new(NodeRole::Control);

        redraw.tick(0, &state, &mut panel);
        panel.calls.clear();
        assert_eq!(redraw.tick(50, &state, &mut panel), 0);
        assert_eq!(redraw.tick(100, &state, &mut panel), 0);
        assert!(panel.calls.is_empty());
    }

    #[test]
    fn test_cadence_limits_passes() {
        let mut redraw = scheduler();
        let mut panel = RecordingPanel::default();
        let mut state = DeviceState::new(NodeRole::Control);

        redraw.tick(0, &state, &mut panel);
        state.level = Some(10);
        assert_eq!(redraw.tick(20, &state, &mut panel), 0);
        assert_eq!(redraw.tick(50, &state, &mut panel), 1);
    }

    #[test]
    fn test_only_changed_region_repaints() {
        let mut redraw = scheduler();
        let mut panel = RecordingPanel::default();
        let mut state = DeviceState::new(NodeRole::Control);
        redraw.tick(0, &state, &mut panel);
        panel.calls.clear();

        state.apply(
            &Message::Meter {
                input: Some(8),
                output: Some(3),
            },
            10,
        );
        // Meter values changed and the link came up
        assert_eq!(redraw.tick(50, &state, &mut panel), 3);
        assert!(panel.calls.contains(&(Region::MeterIn, Content::Segments(8))));
        assert!(panel.calls.contains(&(Region::MeterOut, Content::Segments(3))));
        assert!(panel.calls.contains(&(Region::Link, Content::Link(true))));
    }

    #[test]
    fn test_link_loss_redraws_indicator_once() {
        let mut redraw = scheduler();
        let mut panel = RecordingPanel::default();
        let mut state = DeviceState::new(NodeRole::Control);
        state.apply(&Message::Channel(Some(0)), 0);
        redraw.tick(0, &state, &mut panel);
        panel.calls.clear();

        assert_eq!(redraw.tick(1000, &state, &mut panel), 1);
        assert_eq!(panel.calls, [(Region::Link, Content::Link(false))]);
        assert_eq!(redraw.tick(2000, &state, &mut panel), 0);
    }

    #[test]
    fn test_failed_draw_is_retried() {
        let mut redraw = scheduler();
        let mut panel = RecordingPanel {
            fail: Some(Region::Level),
            ..Default::default()
        };
        let state = DeviceState::new(NodeRole::Control);

        assert_eq!(redraw.tick(0, &state, &mut panel), Region::ALL.len() - 1);
        assert_eq!(redraw.cache().level, Cached::Never);

        panel.fail = None;
        panel.calls.clear();
        assert_eq!(redraw.tick(50, &state, &mut panel), 1);
        assert_eq!(panel.calls, [(Region::Level, Content::Placeholder)]);
    }

    #[test]
    fn test_invalidate_repaints_all() {
        let mut redraw = scheduler();
        let mut panel = RecordingPanel::default();
        let state = DeviceState::new(NodeRole::Control);
        redraw.tick(0, &state, &mut panel);

        redraw.invalidate();
        assert_eq!(redraw.tick(1, &state, &mut panel), Region::ALL.len());
    }
}
