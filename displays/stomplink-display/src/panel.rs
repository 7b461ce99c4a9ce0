//! Region layout on a text-mode backend

use core::fmt::{self, Write};

use heapless::String;
use stomplink_core::meter::SEGMENTS;
use stomplink_core::traits::{Content, Panel, PanelError, Region};
use stomplink_protocol::DebugFields;

use crate::backend::{DisplayBackend, DisplayError};
use crate::screen::SCREEN_COLS;

/// Cell position and width of a single-line region
struct Slot {
    row: u8,
    col: u8,
    width: usize,
}

const fn slot(row: u8, col: u8, width: usize) -> Slot {
    Slot { row, col, width }
}

const LEVEL: Slot = slot(0, 0, 11);
const LINK: Slot = slot(0, 16, 5);
const DELAY: Slot = slot(1, 0, 7);
const REVERB: Slot = slot(1, 8, 7);
const CHANNEL: Slot = slot(1, 16, 5);
const METER_IN: Slot = slot(2, 0, 14);
const METER_OUT: Slot = slot(3, 0, 14);

/// Telemetry table: rows 4-7, two pairs per row
const DEBUG_FIRST_ROW: u8 = 4;
const DEBUG_ROWS: u8 = 4;
const DEBUG_CELL: usize = 10;
const DEBUG_COLS: [u8; 2] = [0, 11];

impl From<DisplayError> for PanelError {
    fn from(_: DisplayError) -> Self {
        PanelError::Bus
    }
}

/// Lays out node regions on a [`DisplayBackend`]
pub struct TextPanel<B> {
    backend: B,
}

impl<B: DisplayBackend> TextPanel<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_inner(self) -> B {
        self.backend
    }

    /// Write formatted text into a slot, padded or cut to its width
    fn put(&mut self, slot: &Slot, args: fmt::Arguments<'_>) -> Result<(), PanelError> {
        let mut text: String<SCREEN_COLS> = String::new();
        // Overlong text is cut below anyway
        let _ = text.write_fmt(args);
        text.truncate(slot.width);
        while text.len() < slot.width {
            let _ = text.push(' ');
        }
        self.backend.draw_text(slot.row, slot.col, &text)?;
        Ok(())
    }

    fn draw_meter(&mut self, slot: &Slot, label: &str, content: Content<'_>) -> Result<(), PanelError> {
        let mut bar: String<{ SEGMENTS as usize }> = String::new();
        for i in 0..SEGMENTS {
            let cell = match content {
                Content::Segments(lit) if i < lit => '#',
                Content::Segments(_) => ' ',
                _ => '-',
            };
            let _ = bar.push(cell);
        }
        self.put(slot, format_args!("{:<4}[{}]", label, bar))
    }

    fn draw_debug(&mut self, fields: Option<&DebugFields>) -> Result<(), PanelError> {
        let mut pairs = fields.into_iter().flat_map(|f| f.iter());
        for row in DEBUG_FIRST_ROW..DEBUG_FIRST_ROW + DEBUG_ROWS {
            for col in DEBUG_COLS {
                let cell = slot(row, col, DEBUG_CELL);
                match pairs.next() {
                    Some((key, value)) => {
                        // Pad the rendered value, `DebugValue`'s Display ignores width
                        let mut text: String<16> = String::new();
                        let _ = write!(text, "{}", value);
                        self.put(&cell, format_args!("{:<4}{:>6}", key, text.as_str()))?
                    }
                    None if fields.is_none() && row == DEBUG_FIRST_ROW && col == 0 => {
                        self.put(&cell, format_args!("DBG --"))?
                    }
                    None => self.put(&cell, format_args!(""))?,
                }
            }
        }
        Ok(())
    }
}

fn on_off(content: Content<'_>) -> &'static str {
    match content {
        Content::Toggle(true) => "ON",
        Content::Toggle(false) => "OFF",
        _ => "--",
    }
}

impl<B: DisplayBackend> Panel for TextPanel<B> {
    fn draw(&mut self, region: Region, content: Content<'_>) -> Result<(), PanelError> {
        match region {
            Region::Level => match content {
                Content::Number(n) => self.put(&LEVEL, format_args!("LEVEL {:>3}", n)),
                _ => self.put(&LEVEL, format_args!("LEVEL  --")),
            },
            Region::Delay => self.put(&DELAY, format_args!("DLY {}", on_off(content))),
            Region::Reverb => self.put(&REVERB, format_args!("REV {}", on_off(content))),
            Region::Channel => match content {
                Content::Number(n) => self.put(&CHANNEL, format_args!("CH {}", n)),
                _ => self.put(&CHANNEL, format_args!("CH -")),
            },
            Region::MeterIn => self.draw_meter(&METER_IN, "IN", content),
            Region::MeterOut => self.draw_meter(&METER_OUT, "OUT", content),
            Region::Link => match content {
                Content::Link(true) => self.put(&LINK, format_args!(" LINK")),
                _ => self.put(&LINK, format_args!(" ----")),
            },
            Region::Debug => match content {
                Content::Debug(fields) => self.draw_debug(Some(fields)),
                _ => self.draw_debug(None),
            },
        }
    }
}
