//! Node main loops
//!
//! Each node runs one cooperative loop. A board calls `poll` every few
//! milliseconds with the current time and its raw input samples; nothing
//! in here blocks or waits.

mod audio;
mod control;

pub use audio::AudioNode;
pub use control::{ControlNode, InputSample};

use stomplink_hal::{SerialError, SerialRx, SerialTx};
use stomplink_protocol::{encode, Line, LineReceiver, Message};

use crate::fmt::{trace, warn};

/// Bytes pulled from the transport per read
const RX_CHUNK: usize = 32;

/// Monitor tap that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMonitor;

impl SerialTx for NoMonitor {
    fn write(&mut self, _data: &[u8]) -> Result<(), SerialError> {
        Ok(())
    }
}

/// Line-level view of one serial port
///
/// Every line that goes out on `tx` is copied to `monitor`, a second
/// transmit-only port for watching the link from a terminal.
pub struct SerialLink<Rx, Tx, Mon = NoMonitor> {
    rx: Rx,
    tx: Tx,
    monitor: Mon,
    receiver: LineReceiver,
    chunk: [u8; RX_CHUNK],
    pos: usize,
    len: usize,
    overflows_seen: u32,
}

impl<Rx: SerialRx, Tx: SerialTx> SerialLink<Rx, Tx> {
    pub fn new(rx: Rx, tx: Tx) -> Self {
        Self::with_monitor(rx, tx, NoMonitor)
    }
}

impl<Rx: SerialRx, Tx: SerialTx, Mon: SerialTx> SerialLink<Rx, Tx, Mon> {
    pub fn with_monitor(rx: Rx, tx: Tx, monitor: Mon) -> Self {
        Self {
            rx,
            tx,
            monitor,
            receiver: LineReceiver::new(),
            chunk: [0; RX_CHUNK],
            pos: 0,
            len: 0,
            overflows_seen: 0,
        }
    }

    /// Next complete line, reading more from the transport as needed
    ///
    /// Returns `None` once the transport has nothing more buffered.
    pub fn poll_line(&mut self) -> Option<Line> {
        loop {
            while self.pos < self.len {
                let byte = self.chunk[self.pos];
                self.pos += 1;
                if let Some(line) = self.receiver.feed(byte) {
                    return Some(line);
                }
            }
            self.note_overflows();

            match self.rx.read_available(&mut self.chunk) {
                Ok(0) | Err(SerialError::WouldBlock) => return None,
                Ok(n) => {
                    self.pos = 0;
                    self.len = n.min(RX_CHUNK);
                }
                Err(e) => {
                    warn!("serial rx error: {:?}", e);
                    self.receiver.resync();
                    return None;
                }
            }
        }
    }

    /// Encode and transmit one message
    ///
    /// Returns `false` if the transport refused it; there is no retry.
    pub fn send(&mut self, message: &Message) -> bool {
        let wire = encode(message).to_wire();
        match self.tx.write(&wire) {
            Ok(()) => {
                trace!("tx {:?}", message.tag());
                self.mirror(&wire);
                true
            }
            Err(e) => {
                warn!("serial tx error: {:?}", e);
                false
            }
        }
    }

    /// Write raw bytes to the monitor port only
    ///
    /// The monitor never holds up the link, so a refused write is dropped.
    pub fn mirror(&mut self, data: &[u8]) {
        if let Err(e) = self.monitor.write(data) {
            trace!("monitor write dropped: {:?}", e);
        }
    }

    /// Lines dropped for exceeding the line buffer
    pub fn overflow_count(&self) -> u32 {
        self.receiver.overflow_count()
    }

    /// Give back the transport halves and the monitor
    pub fn into_parts(self) -> (Rx, Tx, Mon) {
        (self.rx, self.tx, self.monitor)
    }

    fn note_overflows(&mut self) {
        let count = self.receiver.overflow_count();
        if count != self.overflows_seen {
            warn!("dropped {} oversized line(s)", count.wrapping_sub(self.overflows_seen));
            self.overflows_seen = count;
        }
    }
}
