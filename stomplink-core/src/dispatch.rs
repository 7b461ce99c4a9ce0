//! Intent events to outgoing messages
//!
//! Local state changes immediately. Effect toggles go out at once, one
//! message per activation. Level changes are coalesced: the first unsent
//! change opens a window, and when it closes a single message carries the
//! latest level. Nothing is sent if the level ended where it started.

use stomplink_protocol::{Effect, Message, CHANNEL_MAX, LEVEL_MAX};

use crate::fmt::{debug, trace};
use crate::input::{IntentEvent, TouchTarget};
use crate::state::{DeviceState, NodeRole};
use crate::time::{elapsed, Millis};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct PendingLevel {
    value: u8,
    since: Millis,
}

#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    coalesce_ms: u32,
    default_level: u8,
    pending: Option<PendingLevel>,
    last_sent: Option<u8>,
}

impl CommandDispatcher {
    pub fn new(coalesce_ms: u32, default_level: u8) -> Self {
        Self {
            coalesce_ms,
            default_level: default_level.min(LEVEL_MAX),
            pending: None,
            last_sent: None,
        }
    }

    /// Apply an intent to `state`
    ///
    /// Returns a message to send right away (toggles). Level steps return
    /// `None` and surface later from [`CommandDispatcher::take_due`].
    pub fn handle(
        &mut self,
        event: IntentEvent,
        state: &mut DeviceState,
        now: Millis,
    ) -> Option<Message> {
        match event {
            IntentEvent::StepBy(0) => None,
            IntentEvent::StepBy(steps) => {
                let base = state.display_level().unwrap_or(self.default_level);
                let level = (i32::from(base).saturating_add(steps)).clamp(0, i32::from(LEVEL_MAX)) as u8;
                self.commit_level(level, state, now);
                None
            }
            IntentEvent::Activate => Some(toggle(Effect::Delay, state)),
            IntentEvent::TapAt { target, .. } => Some(match target {
                TouchTarget::ToggleDelay => toggle(Effect::Delay, state),
                TouchTarget::ToggleReverb => toggle(Effect::Reverb, state),
                TouchTarget::CycleChannel => {
                    let next = match state.channel {
                        Some(c) if c < CHANNEL_MAX => c + 1,
                        Some(_) => 0,
                        None => 1,
                    };
                    state.channel = Some(next);
                    debug!("channel -> {}", next);
                    Message::Channel(Some(next))
                }
            }),
        }
    }

    /// Set the level and schedule it for sending
    pub fn commit_level(&mut self, level: u8, state: &mut DeviceState, now: Millis) {
        let level = level.min(LEVEL_MAX);
        state.level = Some(level);
        let since = self.pending.map_or(now, |p| p.since);
        self.pending = Some(PendingLevel { value: level, since });
        trace!("level -> {} (pending)", level);
    }

    /// The coalesced level, once its window has closed
    ///
    /// The control node sends `VOL`, the audio node `LVL`. The level stays
    /// pending until [`CommandDispatcher::mark_sent`] confirms the write, so
    /// a refused write is offered again on the next call.
    pub fn take_due(&mut self, role: NodeRole, now: Millis) -> Option<Message> {
        let pending = self.pending?;
        if elapsed(now, pending.since) < self.coalesce_ms {
            return None;
        }

        if self.last_sent == Some(pending.value) {
            self.pending = None;
            return None;
        }

        Some(match role {
            NodeRole::Control => Message::Volume(Some(pending.value)),
            NodeRole::Audio => Message::Level(Some(pending.value)),
        })
    }

    /// Record that the level from [`CommandDispatcher::take_due`] went out
    pub fn mark_sent(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.last_sent = Some(pending.value);
        }
    }

    /// Adopt a level read back from the audio node
    ///
    /// Ignored while a change is pending. Otherwise a readback that
    /// disagrees with the local level (the audio node restarted, or a command
    /// was lost) replaces it and becomes the base for duplicate suppression.
    pub fn readback(&mut self, level: u8, state: &mut DeviceState) {
        if self.pending.is_some() {
            return;
        }
        let level = level.min(LEVEL_MAX);
        if let Some(local) = state.level.filter(|&local| local != level) {
            debug!("level resync {} -> {}", local, level);
            state.level = Some(level);
        }
        self.last_sent = Some(level);
    }

    /// Check if a level change is waiting for its window to close
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

fn toggle(effect: Effect, state: &mut DeviceState) -> Message {
    let enabled = state.toggle_effect(effect);
    debug!("{:?} -> {}", effect, enabled);
    Message::Effect {
        effect,
        enabled: Some(enabled),
    }
}
