//! Inter-task communication channels
//!
//! Statics shared between the Embassy tasks and the control loop. The
//! loop only ever touches them through non-blocking calls.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::pipe::Pipe;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicU32, Ordering};

use stomplink_core::input::TickAccumulator;
use stomplink_display::Screen;
use stomplink_hal::SerialError;

/// Pipe capacity in each link direction
const LINK_PIPE_SIZE: usize = 256;

/// Bytes received from the audio node, not yet parsed
pub static RX_PIPE: Pipe<CriticalSectionRawMutex, LINK_PIPE_SIZE> = Pipe::new();

/// Encoded lines waiting for the UART
pub static TX_PIPE: Pipe<CriticalSectionRawMutex, LINK_PIPE_SIZE> = Pipe::new();

/// Last receive error, reported to the loop once
pub static LINK_FAULT: Signal<CriticalSectionRawMutex, SerialError> = Signal::new();

/// Encoder ticks counted by the edge task
pub static ENCODER: TickAccumulator = TickAccumulator::new();

/// Text screen the panel draws into
pub static SCREEN: Mutex<CriticalSectionRawMutex, Screen> = Mutex::new(Screen::new());

/// Signal that screen rows changed and need flushing
pub static DISPLAY_REFRESH: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Latest touch point packed as `x << 16 | y`, `NO_TOUCH` when released
static TOUCH: AtomicU32 = AtomicU32::new(NO_TOUCH);

const NO_TOUCH: u32 = u32::MAX;

/// Publish the current touch point
pub fn set_touch(point: Option<(u16, u16)>) {
    let packed = match point {
        Some((x, y)) => (u32::from(x) << 16) | u32::from(y),
        None => NO_TOUCH,
    };
    TOUCH.store(packed, Ordering::Relaxed);
}

/// Most recent touch point, in screen coordinates
pub fn touch() -> Option<(u16, u16)> {
    match TOUCH.load(Ordering::Relaxed) {
        NO_TOUCH => None,
        packed => Some(((packed >> 16) as u16, packed as u16)),
    }
}
