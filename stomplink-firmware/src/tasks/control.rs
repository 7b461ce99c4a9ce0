//! Control node loop task

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};

use stomplink_core::{ControlNode, InputSample, Millis};
use stomplink_display::TextPanel;
use stomplink_hal::ActiveLow;

use crate::board::{BoardInput, LinkRx, LinkTx};
use crate::channels::{touch, DISPLAY_REFRESH, ENCODER, SCREEN};

/// Loop period; well under the level coalesce window
const POLL_PERIOD_MS: u64 = 5;

/// Control task - runs the node loop on a fixed tick
#[embassy_executor::task]
pub async fn control_task(
    mut node: ControlNode<LinkRx, LinkTx>,
    footswitch: ActiveLow<BoardInput>,
) {
    info!("Control task started");

    let mut ticker = Ticker::every(Duration::from_millis(POLL_PERIOD_MS));

    loop {
        // Millisecond clock wraps with the core's u32 arithmetic
        let now = Instant::now().as_millis() as Millis;
        let sample = InputSample {
            ticks: ENCODER.take(),
            pressed: footswitch.is_pressed(),
            touch: touch(),
        };

        let (repainted, dirty) = {
            let mut screen = SCREEN.lock().await;
            let repainted = node.poll(now, sample, &mut TextPanel::new(&mut *screen));
            (repainted, screen.is_dirty())
        };

        if repainted > 0 {
            trace!("{} regions repainted", repainted);
        }
        if dirty {
            DISPLAY_REFRESH.signal(());
        }

        ticker.next().await;
    }
}
