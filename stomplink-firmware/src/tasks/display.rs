//! OLED refresh task

use defmt::*;
use heapless::{String, Vec};

use stomplink_display::{SCREEN_COLS, SCREEN_ROWS};

use crate::board::OledI2c;
use crate::channels::{DISPLAY_REFRESH, SCREEN};
use crate::sh1106::Sh1106;

/// Display task - renders dirty screen rows and flushes them to the OLED
#[embassy_executor::task]
pub async fn display_task(mut display: Sh1106<OledI2c>) {
    info!("Display task started");

    loop {
        DISPLAY_REFRESH.wait().await;

        // Copy out under the lock, talk to the bus without it
        let mut rows: Vec<(usize, String<SCREEN_COLS>), SCREEN_ROWS> = Vec::new();
        let dirty = {
            let mut screen = SCREEN.lock().await;
            let dirty = screen.take_dirty();
            for row in (0..SCREEN_ROWS).filter(|row| dirty & (1 << row) != 0) {
                let mut text = String::new();
                let _ = text.push_str(screen.line(row).unwrap_or(""));
                let _ = rows.push((row, text));
            }
            dirty
        };

        for (row, text) in &rows {
            display.draw_row(*row, text);
        }

        if let Err(e) = display.flush_rows(dirty).await {
            warn!("Display flush failed: {:?}", e);
            // Resend everything next time
            SCREEN.lock().await.mark_dirty();
        }
    }
}
