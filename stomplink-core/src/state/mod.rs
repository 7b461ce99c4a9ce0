//! Device state model
//!
//! Each node owns one [`DeviceState`]. Fields start unknown (`None`) and
//! are filled either from the wire or by local input, depending on the
//! node's [`NodeRole`]:
//!
//! | Field            | Control node     | Audio node       |
//! |------------------|------------------|------------------|
//! | `level`          | local input      | `VOL`            |
//! | `remote_level`   | `LVL`            | unused           |
//! | `delay/reverb`   | `DLY`/`REV` + tap| `DLY`/`REV` + fs |
//! | `channel`        | `CH` + tap       | `CH`             |
//! | `meter_in/out`   | `MTR`            | local engine     |
//! | `debug_fields`   | `DBG`            | unused           |
//!
//! Effect toggles are the one place both sides write: the local change is
//! applied optimistically and the next report from the peer wins.

use stomplink_protocol::{DebugFields, Effect, Message};

use crate::time::{elapsed, Millis};

/// Which end of the link this node is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NodeRole {
    /// UI node: encoder, footswitch, touch and display
    Control,
    /// Signal-chain node: applies commands, reports telemetry
    Audio,
}

/// Shared state for one node
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceState {
    role: NodeRole,
    /// Output level 0-100
    pub level: Option<u8>,
    /// Last `LVL` readback from the audio node
    pub remote_level: Option<u8>,
    pub delay_enabled: Option<bool>,
    pub reverb_enabled: Option<bool>,
    /// Dry channel 0-2
    pub channel: Option<u8>,
    /// Input meter segments 0-8
    pub meter_in: Option<u8>,
    /// Output meter segments 0-8
    pub meter_out: Option<u8>,
    /// Time of the last line that decoded to a known tag
    pub link_last_seen: Option<Millis>,
    /// Latest telemetry per key
    pub debug_fields: DebugFields,
}

impl DeviceState {
    /// Create a state with every field unknown
    pub const fn new(role: NodeRole) -> Self {
        Self {
            role,
            level: None,
            remote_level: None,
            delay_enabled: None,
            reverb_enabled: None,
            channel: None,
            meter_in: None,
            meter_out: None,
            link_last_seen: None,
            debug_fields: DebugFields::new(),
        }
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    /// Apply a received message
    ///
    /// Only fields the peer owns for this node's role are written; absent
    /// fields keep their previous value. The link timestamp is refreshed
    /// even if nothing else changes. Returns `true` if any field changed.
    pub fn apply(&mut self, message: &Message, now: Millis) -> bool {
        self.link_last_seen = Some(now);

        match (self.role, message) {
            (NodeRole::Control, Message::Level(level)) => update(&mut self.remote_level, *level),
            (NodeRole::Control, Message::Meter { input, output }) => {
                let a = update(&mut self.meter_in, *input);
                let b = update(&mut self.meter_out, *output);
                a || b
            }
            (NodeRole::Control, Message::Debug(fields)) => {
                let before = self.debug_fields.clone();
                self.debug_fields.merge(fields);
                self.debug_fields != before
            }
            (NodeRole::Audio, Message::Volume(level)) => update(&mut self.level, *level),
            (_, Message::Effect { effect, enabled }) => {
                update(self.effect_slot(*effect), *enabled)
            }
            (_, Message::Channel(channel)) => update(&mut self.channel, *channel),
            // Our own kind of traffic echoed back, or not meant for this role
            _ => false,
        }
    }

    /// Copy of the current state for readers
    pub fn snapshot(&self) -> DeviceState {
        self.clone()
    }

    /// Check if a valid line arrived within `timeout_ms` of `now`
    pub fn link_healthy(&self, now: Millis, timeout_ms: u32) -> bool {
        self.link_last_seen
            .is_some_and(|seen| elapsed(now, seen) < timeout_ms)
    }

    /// Level to show the operator: local intent first, then the readback
    pub fn display_level(&self) -> Option<u8> {
        self.level.or(self.remote_level)
    }

    pub fn effect(&self, effect: Effect) -> Option<bool> {
        match effect {
            Effect::Delay => self.delay_enabled,
            Effect::Reverb => self.reverb_enabled,
        }
    }

    /// Set an effect flag from local input
    pub fn set_effect(&mut self, effect: Effect, enabled: bool) {
        *self.effect_slot(effect) = Some(enabled);
    }

    /// Flip an effect flag from local input, unknown counts as off
    ///
    /// Returns the new state.
    pub fn toggle_effect(&mut self, effect: Effect) -> bool {
        let enabled = !self.effect(effect).unwrap_or(false);
        self.set_effect(effect, enabled);
        enabled
    }

    fn effect_slot(&mut self, effect: Effect) -> &mut Option<bool> {
        match effect {
            Effect::Delay => &mut self.delay_enabled,
            Effect::Reverb => &mut self.reverb_enabled,
        }
    }
}

/// Overwrite `slot` if `value` is present, reporting whether it changed
fn update<T: PartialEq + Copy>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(v) if *slot != Some(v) => {
            *slot = Some(v);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stomplink_protocol::DebugValue;

    #[test]
    fn test_new_state_is_unknown() {
        let state = DeviceState::new(NodeRole::Control);
        assert_eq!(state.level, None);
        assert_eq!(state.remote_level, None);
        assert_eq!(state.delay_enabled, None);
        assert_eq!(state.meter_in, None);
        assert!(state.debug_fields.is_empty());
        assert!(!state.link_healthy(0, 1000));
    }

    #[test]
    fn test_control_accepts_audio_reports() {
        let mut state = DeviceState::new(NodeRole::Control);
        assert!(state.apply(&Message::Level(Some(42)), 10));
        assert!(state.apply(
            &Message::Meter {
                input: Some(3),
                output: Some(5)
            },
            20
        ));
        assert!(state.apply(
            &Message::Effect {
                effect: Effect::Reverb,
                enabled: Some(true)
            },
            30
        ));

        assert_eq!(state.remote_level, Some(42));
        assert_eq!(state.level, None);
        assert_eq!(state.meter_in, Some(3));
        assert_eq!(state.meter_out, Some(5));
        assert_eq!(state.reverb_enabled, Some(true));
        assert_eq!(state.link_last_seen, Some(30));
    }

    #[test]
    fn test_control_ignores_volume_echo() {
        let mut state = DeviceState::new(NodeRole::Control);
        state.level = Some(10);
        assert!(!state.apply(&Message::Volume(Some(90)), 5));
        assert_eq!(state.level, Some(10));
        // Still counts as link traffic
        assert_eq!(state.link_last_seen, Some(5));
    }

    #[test]
    fn test_audio_accepts_commands_only() {
        let mut state = DeviceState::new(NodeRole::Audio);
        assert!(state.apply(&Message::Volume(Some(77)), 0));
        assert!(!state.apply(&Message::Level(Some(3)), 0));
        assert!(!state.apply(
            &Message::Meter {
                input: Some(8),
                output: Some(8)
            },
            0
        ));
        assert_eq!(state.level, Some(77));
        assert_eq!(state.remote_level, None);
        assert_eq!(state.meter_in, None);
    }

    #[test]
    fn test_absent_field_keeps_previous_value() {
        let mut state = DeviceState::new(NodeRole::Control);
        state.apply(
            &Message::Meter {
                input: Some(4),
                output: Some(6),
            },
            0,
        );
        state.apply(
            &Message::Meter {
                input: None,
                output: Some(1),
            },
            1,
        );
        assert_eq!(state.meter_in, Some(4));
        assert_eq!(state.meter_out, Some(1));
    }

    #[test]
    fn test_last_level_wins() {
        let mut state = DeviceState::new(NodeRole::Control);
        for (t, n) in [5u8, 99, 0, 63].into_iter().enumerate() {
            state.apply(&Message::Level(Some(n)), t as Millis);
        }
        assert_eq!(state.remote_level, Some(63));
    }

    #[test]
    fn test_debug_fields_merge() {
        let mut state = DeviceState::new(NodeRole::Control);
        let mut first = DebugFields::new();
        first.insert("DRY", DebugValue::Centi(100));
        let mut second = DebugFields::new();
        second.insert("DT", DebugValue::Int(180));

        assert!(state.apply(&Message::Debug(first.clone()), 0));
        assert!(state.apply(&Message::Debug(second), 1));
        assert!(!state.apply(&Message::Debug(first), 2));

        assert_eq!(state.debug_fields.get("DRY"), Some(DebugValue::Centi(100)));
        assert_eq!(state.debug_fields.get("DT"), Some(DebugValue::Int(180)));
    }

    #[test]
    fn test_link_health_window() {
        let mut state = DeviceState::new(NodeRole::Control);
        state.apply(&Message::Channel(Some(1)), 1000);
        assert!(state.link_healthy(1999, 1000));
        assert!(!state.link_healthy(2000, 1000));
    }

    #[test]
    fn test_link_health_across_rollover() {
        let mut state = DeviceState::new(NodeRole::Control);
        state.apply(&Message::Channel(Some(1)), u32::MAX - 100);
        assert!(state.link_healthy(200, 1000));
    }

    #[test]
    fn test_optimistic_toggle_then_report_wins() {
        let mut state = DeviceState::new(NodeRole::Control);
        assert!(state.toggle_effect(Effect::Delay));
        assert_eq!(state.delay_enabled, Some(true));

        state.apply(
            &Message::Effect {
                effect: Effect::Delay,
                enabled: Some(false),
            },
            0,
        );
        assert_eq!(state.delay_enabled, Some(false));
    }

    #[test]
    fn test_display_level_falls_back_to_readback() {
        let mut state = DeviceState::new(NodeRole::Control);
        assert_eq!(state.display_level(), None);
        state.apply(&Message::Level(Some(50)), 0);
        assert_eq!(state.display_level(), Some(50));
        state.level = Some(60);
        assert_eq!(state.display_level(), Some(60));
    }
}
