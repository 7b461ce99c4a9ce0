//! Line assembly for the Stomplink protocol.
//!
//! Line format:
//! - Printable ASCII payload, at most `LINE_CAPACITY` bytes
//! - Terminated by `\n`
//! - `\r` anywhere in the stream is ignored, so CRLF senders work unchanged
//!
//! The receiver never reports errors. A line that outgrows the buffer is
//! thrown away up to its terminator and reception resumes with the next one.

use heapless::Vec;

/// Maximum payload bytes in one line (terminator excluded)
pub const LINE_CAPACITY: usize = 96;

/// Maximum bytes on the wire for one line (payload + `\n`)
pub const MAX_WIRE_LEN: usize = LINE_CAPACITY + 1;

/// A complete, non-empty line without its terminator
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Line {
    bytes: Vec<u8, LINE_CAPACITY>,
}

impl Line {
    /// Build a line from raw payload bytes
    ///
    /// Returns `None` if the payload does not fit or contains a terminator.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.iter().any(|&b| b == b'\n' || b == b'\r') {
            return None;
        }
        let mut vec = Vec::new();
        vec.extend_from_slice(bytes).ok()?;
        Some(Self { bytes: vec })
    }

    /// Raw payload bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Payload as text, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.bytes).ok()
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the line has no payload
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Payload followed by `\n`, ready to hand to a transmitter
    pub fn to_wire(&self) -> Vec<u8, MAX_WIRE_LEN> {
        let mut wire = Vec::new();
        // Capacity is payload + 1, neither push can fail
        let _ = wire.extend_from_slice(&self.bytes);
        let _ = wire.push(b'\n');
        wire
    }

    pub(crate) fn from_vec(bytes: Vec<u8, LINE_CAPACITY>) -> Self {
        Self { bytes }
    }
}

/// Byte-at-a-time line assembler
#[derive(Debug, Clone, Default)]
pub struct LineReceiver {
    buffer: Vec<u8, LINE_CAPACITY>,
    /// Set once the buffer overflowed; cleared by the next `\n`
    discarding: bool,
    overflows: u32,
}

impl LineReceiver {
    /// Create a new, empty receiver
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
            overflows: 0,
        }
    }

    /// Drop any partial line and leave the overflow state
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    /// Drop any partial line and skip to the next terminator
    ///
    /// Used after the transport reports lost bytes, so a line with a hole
    /// in it is never emitted.
    pub fn resync(&mut self) {
        self.buffer.clear();
        self.discarding = true;
    }

    /// Feed a single byte
    ///
    /// Returns `Some(line)` when a terminator completes a non-empty line.
    pub fn feed(&mut self, byte: u8) -> Option<Line> {
        match byte {
            b'\r' => None,
            b'\n' => {
                if self.discarding {
                    self.discarding = false;
                    self.buffer.clear();
                    return None;
                }
                if self.buffer.is_empty() {
                    return None;
                }
                Some(Line::from_vec(core::mem::take(&mut self.buffer)))
            }
            _ => {
                if self.discarding {
                    return None;
                }
                if self.buffer.push(byte).is_err() {
                    // No terminator within capacity: this line is lost
                    self.buffer.clear();
                    self.discarding = true;
                    self.overflows = self.overflows.wrapping_add(1);
                }
                None
            }
        }
    }

    /// Feed a chunk of bytes, calling `on_line` for every completed line
    ///
    /// Unlike `feed`, the whole chunk is always consumed.
    pub fn feed_bytes<F: FnMut(Line)>(&mut self, bytes: &[u8], mut on_line: F) {
        for &byte in bytes {
            if let Some(line) = self.feed(byte) {
                on_line(line);
            }
        }
    }

    /// Number of lines dropped because they outgrew the buffer
    pub fn overflow_count(&self) -> u32 {
        self.overflows
    }

    /// Check if the receiver is skipping the tail of an oversized line
    pub fn is_discarding(&self) -> bool {
        self.discarding
    }
}
