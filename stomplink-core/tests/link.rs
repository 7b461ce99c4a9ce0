//! Control node and audio node talking over in-memory serial pipes

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use stomplink_core::input::{HitRegion, TouchTarget};
use stomplink_core::traits::{AudioEngine, Content, Panel, PanelError, Peaks, Region};
use stomplink_core::{AudioNode, ControlNode, InputSample, NodeConfig};
use stomplink_hal::{SerialError, SerialRx, SerialTx};
use stomplink_protocol::{DebugFields, DebugValue, Effect};

type Pipe = Rc<RefCell<VecDeque<u8>>>;

struct PipeRx(Pipe);

/// Write end of a pipe that can be told to refuse writes
struct PipeTx {
    pipe: Pipe,
    refusals: Rc<Cell<u32>>,
}

impl PipeTx {
    fn new(pipe: Pipe) -> Self {
        Self {
            pipe,
            refusals: Rc::default(),
        }
    }
}

impl SerialRx for PipeRx {
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
        let mut pipe = self.0.borrow_mut();
        let n = buf.len().min(pipe.len());
        for slot in buf.iter_mut().take(n) {
            *slot = pipe.pop_front().unwrap();
        }
        Ok(n)
    }
}

impl SerialTx for PipeTx {
    fn write(&mut self, data: &[u8]) -> Result<(), SerialError> {
        if self.refusals.get() > 0 {
            self.refusals.set(self.refusals.get() - 1);
            return Err(SerialError::WouldBlock);
        }
        self.pipe.borrow_mut().extend(data.iter().copied());
        Ok(())
    }
}

#[derive(Default)]
struct FakeEngine {
    level: Option<u8>,
    delay: bool,
    reverb: bool,
    channel: u8,
    peaks: Peaks,
    level_writes: usize,
}

impl AudioEngine for FakeEngine {
    fn set_level(&mut self, level: u8) {
        self.level = Some(level);
        self.level_writes += 1;
    }

    fn set_effect(&mut self, effect: Effect, enabled: bool) {
        match effect {
            Effect::Delay => self.delay = enabled,
            Effect::Reverb => self.reverb = enabled,
        }
    }

    fn set_channel(&mut self, channel: u8) {
        self.channel = channel;
    }

    fn take_peaks(&mut self) -> Peaks {
        self.peaks
    }

    fn debug_fields(&mut self, fields: &mut DebugFields) {
        fields.insert("DRY", DebugValue::Centi(100));
        fields.insert("WET", DebugValue::from_f32(0.35));
        fields.insert("DT", DebugValue::Int(180));
    }
}

#[derive(Default)]
struct CountingPanel {
    draws: Vec<Region>,
    last_debug: Option<DebugFields>,
}

impl Panel for CountingPanel {
    fn draw(&mut self, region: Region, content: Content<'_>) -> Result<(), PanelError> {
        if let Content::Debug(fields) = content {
            self.last_debug = Some(fields.clone());
        }
        self.draws.push(region);
        Ok(())
    }
}

impl CountingPanel {
    fn count(&self, region: Region) -> usize {
        self.draws.iter().filter(|&&r| r == region).count()
    }
}

struct Rig {
    control: ControlNode<PipeRx, PipeTx>,
    audio: AudioNode<FakeEngine, PipeRx, PipeTx>,
    to_audio: Pipe,
    to_control: Pipe,
    control_refusals: Rc<Cell<u32>>,
    panel: CountingPanel,
}

impl Rig {
    fn new() -> Self {
        let config = NodeConfig::default();
        let to_audio: Pipe = Rc::default();
        let to_control: Pipe = Rc::default();

        let control_tx = PipeTx::new(to_audio.clone());
        let control_refusals = control_tx.refusals.clone();
        let mut control = ControlNode::new(PipeRx(to_control.clone()), control_tx, &config);
        control.add_touch_region(HitRegion::new(0, 0, 240, 160, TouchTarget::ToggleReverb));
        control.add_touch_region(HitRegion::new(240, 0, 240, 160, TouchTarget::CycleChannel));

        let audio = AudioNode::new(
            FakeEngine::default(),
            PipeRx(to_audio.clone()),
            PipeTx::new(to_control.clone()),
            &config,
        );

        Self {
            control,
            audio,
            to_audio,
            to_control,
            control_refusals,
            panel: CountingPanel::default(),
        }
    }

    fn control(&mut self, now: u32, input: InputSample) -> usize {
        self.control.poll(now, input, &mut self.panel)
    }

    fn idle(&mut self, now: u32) -> usize {
        self.control(now, InputSample::default())
    }

    /// Ten encoder steps up, two ticks each, starting at `start`
    fn turn_up(&mut self, start: u32) {
        for t in 0..10 {
            self.control(
                start + t * 2,
                InputSample {
                    ticks: 2,
                    ..Default::default()
                },
            );
        }
    }

    /// Power-cycle the audio node on the same wires
    fn restart_audio(&mut self, now: u32) {
        self.audio = AudioNode::new(
            FakeEngine::default(),
            PipeRx(self.to_audio.clone()),
            PipeTx::new(self.to_control.clone()),
            &NodeConfig::default(),
        );
        self.audio.start(now);
    }

    fn audio_outbox(&self) -> String {
        String::from_utf8(self.to_audio.borrow().iter().copied().collect()).unwrap()
    }

    fn inject_to_control(&self, bytes: &[u8]) {
        self.to_control.borrow_mut().extend(bytes.iter().copied());
    }
}

#[test]
fn test_boot_announcement_reaches_control() {
    let mut rig = Rig::new();
    rig.audio.start(0);
    rig.idle(1);

    let state = rig.control.state();
    assert_eq!(state.remote_level, Some(50));
    assert_eq!(state.delay_enabled, Some(false));
    assert_eq!(state.reverb_enabled, Some(false));
    assert_eq!(state.channel, Some(0));
    assert_eq!(state.level, None);
    assert!(state.link_healthy(1, 1000));
}

#[test]
fn test_ten_steps_send_one_volume() {
    let mut rig = Rig::new();
    rig.audio.start(0);
    rig.idle(1);
    rig.to_audio.borrow_mut().clear();

    for t in 0..10 {
        rig.control(
            10 + t * 2,
            InputSample {
                ticks: 2,
                ..Default::default()
            },
        );
    }
    assert_eq!(rig.audio_outbox(), "");

    rig.idle(60);
    assert_eq!(rig.audio_outbox(), "VOL,60\n");

    rig.audio.poll(61, false);
    assert_eq!(rig.audio.engine().level, Some(60));

    rig.idle(62);
    assert_eq!(rig.control.state().remote_level, Some(60));
}

#[test]
fn test_repeated_volume_is_not_echoed() {
    let mut rig = Rig::new();
    rig.audio.start(0);
    let writes = rig.audio.engine().level_writes;
    rig.to_control.borrow_mut().clear();

    rig.to_audio.borrow_mut().extend(b"VOL,50\n".iter().copied());
    rig.audio.poll(1000, false);
    let out = String::from_utf8(rig.to_control.borrow().iter().copied().collect()).unwrap();
    assert!(!out.contains("LVL"));
    assert_eq!(rig.audio.engine().level_writes, writes);
}

#[test]
fn test_volume_out_of_range_is_clamped() {
    let mut rig = Rig::new();
    rig.audio.start(0);
    rig.to_audio.borrow_mut().extend(b"VOL,250\r\n".iter().copied());
    rig.audio.poll(10, false);
    assert_eq!(rig.audio.engine().level, Some(100));
}

#[test]
fn test_footswitch_on_control_toggles_audio_delay() {
    let mut rig = Rig::new();
    rig.audio.start(0);
    rig.idle(1);

    rig.control(
        300,
        InputSample {
            pressed: true,
            ..Default::default()
        },
    );
    assert_eq!(rig.control.state().delay_enabled, Some(true));

    rig.audio.poll(301, false);
    assert!(rig.audio.engine().delay);

    // Bounce inside the window is ignored
    rig.control(320, InputSample::default());
    rig.control(
        330,
        InputSample {
            pressed: true,
            ..Default::default()
        },
    );
    rig.audio.poll(331, false);
    assert!(rig.audio.engine().delay);
    assert_eq!(rig.control.state().delay_enabled, Some(true));
}

#[test]
fn test_audio_footswitch_reports_delay() {
    let mut rig = Rig::new();
    rig.audio.start(0);
    rig.audio.poll(10, true);
    assert!(rig.audio.engine().delay);

    rig.idle(11);
    assert_eq!(rig.control.state().delay_enabled, Some(true));
}

#[test]
fn test_touch_cycles_channel() {
    let mut rig = Rig::new();
    rig.audio.start(0);
    rig.idle(1);

    rig.control(
        500,
        InputSample {
            touch: Some((300, 50)),
            ..Default::default()
        },
    );
    assert_eq!(rig.control.state().channel, Some(1));
    rig.audio.poll(501, false);
    assert_eq!(rig.audio.engine().channel, 1);
}

#[test]
fn test_debug_line_updates_fields_and_panel_once() {
    let mut rig = Rig::new();
    rig.idle(0);
    rig.panel.draws.clear();

    rig.inject_to_control(b"DBG,DRY=1.00,WET=0.35,DT=180\n");
    rig.idle(100);

    let state = rig.control.state();
    assert_eq!(state.link_last_seen, Some(100));
    assert_eq!(state.debug_fields.get("DRY"), Some(DebugValue::Centi(100)));
    assert_eq!(state.debug_fields.get("WET"), Some(DebugValue::Centi(35)));
    assert_eq!(state.debug_fields.get("DT"), Some(DebugValue::Int(180)));
    assert_eq!(rig.panel.count(Region::Debug), 1);
    assert_eq!(rig.panel.last_debug.as_ref().map(|f| f.len()), Some(3));

    rig.idle(150);
    assert_eq!(rig.panel.count(Region::Debug), 1);
}

#[test]
fn test_meter_is_clamped() {
    let mut rig = Rig::new();
    rig.inject_to_control(b"MTR,9,3\n");
    rig.idle(0);
    assert_eq!(rig.control.state().meter_in, Some(8));
    assert_eq!(rig.control.state().meter_out, Some(3));
}

#[test]
fn test_meters_flow_from_engine() {
    let mut rig = Rig::new();
    rig.audio.engine_mut().peaks = Peaks {
        input: 0.6,
        output: 0.01,
    };
    rig.audio.start(0);
    rig.audio.poll(0, false);
    rig.idle(1);
    assert_eq!(rig.control.state().meter_in, Some(8));
    assert_eq!(rig.control.state().meter_out, Some(1));
    assert_eq!(
        rig.control.state().debug_fields.get("WET"),
        Some(DebugValue::Centi(35))
    );
}

#[test]
fn test_noise_and_unknown_tags_do_not_disturb_state() {
    let mut rig = Rig::new();
    rig.inject_to_control(b"LVL,40\n");
    rig.inject_to_control(&[0xAA; 300]);
    rig.inject_to_control(b"\nMON,BOOT\nLVL,x\nLVL,41\n");
    rig.idle(0);
    assert_eq!(rig.control.state().remote_level, Some(41));
    assert_eq!(rig.control.link().overflow_count(), 1);
}

#[test]
fn test_link_loss_and_recovery() {
    let mut rig = Rig::new();
    rig.audio.start(0);
    rig.idle(0);
    rig.panel.draws.clear();

    rig.idle(2000);
    assert!(!rig.control.state().link_healthy(2000, 1000));
    assert_eq!(rig.panel.count(Region::Link), 1);

    rig.audio.poll(2100, false);
    rig.idle(2100);
    assert!(rig.control.state().link_healthy(2100, 1000));
    assert_eq!(rig.panel.count(Region::Link), 2);
}

#[test]
fn test_idle_ticks_draw_nothing() {
    let mut rig = Rig::new();
    rig.audio.start(0);
    rig.idle(0);
    assert!(rig.idle(50) == 0);
    assert!(rig.idle(100) == 0);
}

#[test]
fn test_refused_volume_is_retried() {
    let mut rig = Rig::new();
    rig.audio.start(0);
    rig.idle(1);
    rig.to_audio.borrow_mut().clear();

    rig.turn_up(10);
    rig.control_refusals.set(1);
    rig.idle(60);
    assert_eq!(rig.audio_outbox(), "");

    rig.idle(65);
    assert_eq!(rig.audio_outbox(), "VOL,60\n");
    rig.audio.poll(66, false);
    assert_eq!(rig.audio.engine().level, Some(60));
}

#[test]
fn test_control_follows_audio_restart() {
    let mut rig = Rig::new();
    rig.audio.start(0);
    rig.idle(1);
    rig.turn_up(10);
    rig.idle(60);
    rig.audio.poll(61, false);
    rig.idle(62);
    assert_eq!(rig.control.state().display_level(), Some(60));

    rig.restart_audio(100);
    rig.idle(101);
    assert_eq!(rig.control.state().level, Some(50));
    assert_eq!(rig.control.state().display_level(), Some(50));
    rig.to_audio.borrow_mut().clear();

    // Back to the level the control node had before the restart
    rig.turn_up(200);
    rig.idle(250);
    assert_eq!(rig.audio_outbox(), "VOL,60\n");
    rig.audio.poll(251, false);
    assert_eq!(rig.audio.engine().level, Some(60));
}

#[test]
fn test_monitor_mirrors_audio_output() {
    let to_control: Pipe = Rc::default();
    let monitor: Pipe = Rc::default();
    let mut audio = AudioNode::with_monitor(
        FakeEngine::default(),
        PipeRx(Rc::default()),
        PipeTx::new(to_control.clone()),
        PipeTx::new(monitor.clone()),
        &NodeConfig::default(),
    );
    audio.start(0);

    let wire: Vec<u8> = to_control.borrow().iter().copied().collect();
    let mirrored: Vec<u8> = monitor.borrow().iter().copied().collect();
    assert!(mirrored.starts_with(b"MON,BOOT\n"));
    assert_eq!(&mirrored[b"MON,BOOT\n".len()..], &wire[..]);
    assert!(wire.starts_with(b"LVL,50\n"));
}
