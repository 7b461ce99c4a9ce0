//! Audio node loop
//!
//! Applies commands from the control node to an [`AudioEngine`] and
//! reports back: `LVL` when the level actually changes, the new state for
//! every effect or channel command, `MTR` and `DBG` on their own periods.
//! An optional monitor port gets `MON,BOOT` at start and a copy of every
//! line sent.

use stomplink_hal::{SerialRx, SerialTx};
use stomplink_protocol::{decode, DebugFields, Effect, Message};

use super::{NoMonitor, SerialLink};
use crate::config::NodeConfig;
use crate::dispatch::CommandDispatcher;
use crate::fmt::{debug, info, trace};
use crate::input::{ButtonDebouncer, IntentEvent};
use crate::meter::peak_to_segments;
use crate::state::{DeviceState, NodeRole};
use crate::time::{Interval, Millis};
use crate::traits::AudioEngine;

/// First line on the monitor port after power-on
const MONITOR_BOOT: &[u8] = b"MON,BOOT\n";

pub struct AudioNode<E, Rx, Tx, Mon = NoMonitor> {
    engine: E,
    link: SerialLink<Rx, Tx, Mon>,
    state: DeviceState,
    dispatcher: CommandDispatcher,
    footswitch: ButtonDebouncer,
    meter: Interval,
    telemetry: Interval,
    default_level: u8,
    debug_fields: DebugFields,
}

impl<E: AudioEngine, Rx: SerialRx, Tx: SerialTx> AudioNode<E, Rx, Tx> {
    pub fn new(engine: E, rx: Rx, tx: Tx, config: &NodeConfig) -> Self {
        Self::with_monitor(engine, rx, tx, NoMonitor, config)
    }
}

impl<E: AudioEngine, Rx: SerialRx, Tx: SerialTx, Mon: SerialTx> AudioNode<E, Rx, Tx, Mon> {
    /// Like [`AudioNode::new`], copying outgoing lines to `monitor`
    pub fn with_monitor(engine: E, rx: Rx, tx: Tx, monitor: Mon, config: &NodeConfig) -> Self {
        Self {
            engine,
            link: SerialLink::with_monitor(rx, tx, monitor),
            state: DeviceState::new(NodeRole::Audio),
            // Level readbacks answer a command, they are not batched
            dispatcher: CommandDispatcher::new(0, config.input.default_level),
            footswitch: ButtonDebouncer::new(config.input.debounce_ms),
            meter: Interval::new(config.telemetry.meter_period_ms),
            telemetry: Interval::new(config.telemetry.debug_period_ms),
            default_level: config.input.default_level,
            debug_fields: DebugFields::new(),
        }
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Put the chain in its power-on state and announce it
    pub fn start(&mut self, now: Millis) {
        self.link.mirror(MONITOR_BOOT);
        self.dispatcher
            .commit_level(self.default_level, &mut self.state, now);
        self.engine.set_level(self.default_level);

        for effect in [Effect::Delay, Effect::Reverb] {
            self.state.set_effect(effect, false);
            self.engine.set_effect(effect, false);
        }
        self.state.channel = Some(0);
        self.engine.set_channel(0);

        self.flush_level(now);
        self.report_effect(Effect::Delay);
        self.report_effect(Effect::Reverb);
        self.link.send(&Message::Channel(self.state.channel));
        info!("audio node started, level {}", self.default_level);
    }

    /// Run one loop iteration
    pub fn poll(&mut self, now: Millis, footswitch_pressed: bool) {
        while let Some(line) = self.link.poll_line() {
            match decode(&line) {
                Some(message) => self.handle(&message, now),
                None => debug!("ignored line ({} bytes)", line.len()),
            }
        }
        self.flush_level(now);

        if self.footswitch.update(footswitch_pressed, now) {
            if let Some(message) = self
                .dispatcher
                .handle(IntentEvent::Activate, &mut self.state, now)
            {
                if let Message::Effect {
                    effect,
                    enabled: Some(enabled),
                } = message
                {
                    self.engine.set_effect(effect, enabled);
                }
                self.link.send(&message);
            }
        }

        if self.meter.due(now) {
            let peaks = self.engine.take_peaks();
            self.state.meter_in = Some(peak_to_segments(peaks.input));
            self.state.meter_out = Some(peak_to_segments(peaks.output));
            self.link.send(&Message::Meter {
                input: self.state.meter_in,
                output: self.state.meter_out,
            });
        }

        if self.telemetry.due(now) {
            self.debug_fields.clear();
            self.engine.debug_fields(&mut self.debug_fields);
            if !self.debug_fields.is_empty() {
                self.link.send(&Message::Debug(self.debug_fields.clone()));
            }
        }
    }

    fn handle(&mut self, message: &Message, now: Millis) {
        trace!("rx {:?}", message.tag());
        let changed = self.state.apply(message, now);

        match *message {
            Message::Volume(Some(level)) if changed => {
                self.engine.set_level(level);
                self.dispatcher.commit_level(level, &mut self.state, now);
            }
            Message::Effect { effect, .. } => {
                if let Some(enabled) = self.state.effect(effect) {
                    self.engine.set_effect(effect, enabled);
                }
                self.report_effect(effect);
            }
            Message::Channel(_) => {
                if let Some(channel) = self.state.channel {
                    self.engine.set_channel(channel);
                }
                self.link.send(&Message::Channel(self.state.channel));
            }
            _ => {}
        }
    }

    fn flush_level(&mut self, now: Millis) {
        if let Some(message) = self.dispatcher.take_due(NodeRole::Audio, now) {
            if self.link.send(&message) {
                self.dispatcher.mark_sent();
            }
        }
    }

    fn report_effect(&mut self, effect: Effect) {
        self.link.send(&Message::Effect {
            effect,
            enabled: self.state.effect(effect),
        });
    }
}
