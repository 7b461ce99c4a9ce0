//! Control (UI) node loop

use stomplink_hal::{SerialRx, SerialTx};
use stomplink_protocol::{decode, Message};

use super::SerialLink;
use crate::config::NodeConfig;
use crate::dispatch::CommandDispatcher;
use crate::fmt::{debug, info, trace, warn};
use crate::input::{HitRegion, InputDebouncer};
use crate::render::RedrawScheduler;
use crate::state::{DeviceState, NodeRole};
use crate::time::Millis;
use crate::traits::Panel;

/// Raw input samples for one loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSample {
    /// Encoder ticks taken from the accumulator since the last poll
    pub ticks: i32,
    /// Footswitch held
    pub pressed: bool,
    /// Touch point in screen coordinates, if touched
    pub touch: Option<(u16, u16)>,
}

pub struct ControlNode<Rx, Tx> {
    link: SerialLink<Rx, Tx>,
    state: DeviceState,
    inputs: InputDebouncer,
    dispatcher: CommandDispatcher,
    redraw: RedrawScheduler,
    link_timeout_ms: u32,
    link_up: bool,
}

impl<Rx: SerialRx, Tx: SerialTx> ControlNode<Rx, Tx> {
    pub fn new(rx: Rx, tx: Tx, config: &NodeConfig) -> Self {
        Self {
            link: SerialLink::new(rx, tx),
            state: DeviceState::new(NodeRole::Control),
            inputs: InputDebouncer::new(&config.input),
            dispatcher: CommandDispatcher::new(
                config.link.level_coalesce_ms,
                config.input.default_level,
            ),
            redraw: RedrawScheduler::new(config.display.redraw_interval_ms, config.link.timeout_ms),
            link_timeout_ms: config.link.timeout_ms,
            link_up: false,
        }
    }

    /// Register a touch hit region
    pub fn add_touch_region(&mut self, region: HitRegion) -> bool {
        self.inputs.add_region(region)
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Repaint every region on the next pass
    pub fn invalidate_display(&mut self) {
        self.redraw.invalidate();
    }

    pub fn link(&self) -> &SerialLink<Rx, Tx> {
        &self.link
    }

    /// Run one loop iteration
    ///
    /// Drains the serial port, debounces input, sends due commands and
    /// runs a redraw pass. Returns the number of regions repainted.
    pub fn poll<P: Panel>(&mut self, now: Millis, input: InputSample, panel: &mut P) -> usize {
        while let Some(line) = self.link.poll_line() {
            match decode(&line) {
                Some(message) => {
                    trace!("rx {:?}", message.tag());
                    self.state.apply(&message, now);
                    if let Message::Level(Some(level)) = message {
                        self.dispatcher.readback(level, &mut self.state);
                    }
                }
                None => debug!("ignored line ({} bytes)", line.len()),
            }
        }
        self.track_link(now);

        for event in self.inputs.poll(input.ticks, input.pressed, input.touch, now) {
            trace!("intent {:?}", event);
            if let Some(message) = self.dispatcher.handle(event, &mut self.state, now) {
                self.link.send(&message);
            }
        }
        if let Some(message) = self.dispatcher.take_due(NodeRole::Control, now) {
            if self.link.send(&message) {
                self.dispatcher.mark_sent();
            }
        }

        self.redraw.tick(now, &self.state, panel)
    }

    fn track_link(&mut self, now: Millis) {
        let healthy = self.state.link_healthy(now, self.link_timeout_ms);
        if healthy != self.link_up {
            if healthy {
                info!("link up");
            } else {
                warn!("link lost");
            }
            self.link_up = healthy;
        }
    }
}
