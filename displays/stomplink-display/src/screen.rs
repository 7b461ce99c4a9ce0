//! Screen buffer types
//!
//! A character-cell buffer for text-mode displays. The firmware draws
//! into it from the node loop and a display task copies dirty rows to the
//! hardware.

use crate::backend::{DisplayBackend, DisplayError};

/// Number of character rows
pub const SCREEN_ROWS: usize = 8;

/// Number of character columns
pub const SCREEN_COLS: usize = 21;

/// Screen buffer for text-mode displays
#[derive(Clone, PartialEq, Eq)]
pub struct Screen {
    /// ASCII cells, space when empty
    cells: [[u8; SCREEN_COLS]; SCREEN_ROWS],
    /// Bit `n` set when row `n` changed since the last `take_dirty`
    dirty: u8,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Create a blank screen with every row dirty
    pub const fn new() -> Self {
        Self {
            cells: [[b' '; SCREEN_COLS]; SCREEN_ROWS],
            dirty: 0xFF,
        }
    }

    /// Write `text` starting at (`row`, `col`)
    ///
    /// Non-ASCII characters are shown as `?`. Only rows whose content
    /// actually changes are marked dirty.
    pub fn write(&mut self, row: usize, col: usize, text: &str) {
        let Some(line) = self.cells.get_mut(row) else {
            return;
        };
        let mut changed = false;
        for (cell, ch) in line.iter_mut().skip(col).zip(text.chars()) {
            let byte = if ch.is_ascii() && !ch.is_ascii_control() {
                ch as u8
            } else {
                b'?'
            };
            if *cell != byte {
                *cell = byte;
                changed = true;
            }
        }
        if changed {
            self.dirty |= 1 << row;
        }
    }

    /// Get the content of a specific row
    pub fn line(&self, row: usize) -> Option<&str> {
        self.cells
            .get(row)
            .and_then(|line| core::str::from_utf8(line).ok())
    }

    /// Get all lines as an iterator
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        (0..SCREEN_ROWS).filter_map(|row| self.line(row))
    }

    /// Check if any row needs sending to the hardware
    pub fn is_dirty(&self) -> bool {
        self.dirty != 0
    }

    /// Return and clear the dirty row mask
    pub fn take_dirty(&mut self) -> u8 {
        core::mem::take(&mut self.dirty)
    }

    /// Mark every row dirty (e.g. after the display was re-initialized)
    pub fn mark_dirty(&mut self) {
        self.dirty = 0xFF;
    }
}

impl DisplayBackend for Screen {
    fn clear(&mut self) -> Result<(), DisplayError> {
        for row in 0..SCREEN_ROWS {
            self.write(row, 0, "                     ");
        }
        Ok(())
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        if usize::from(row) >= SCREEN_ROWS || usize::from(col) >= SCREEN_COLS {
            return Err(DisplayError::InvalidCoordinates);
        }
        self.write(usize::from(row), usize::from(col), text);
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (SCREEN_COLS as u8, SCREEN_ROWS as u8)
    }
}

impl core::fmt::Debug for Screen {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.lines()).finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, line) in self.lines().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}", line);
        }
        defmt::write!(f, "]");
    }
}
