//! Encoder and touch sampling tasks

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Ticker};

use crate::board::TouchI2c;
use crate::channels::{set_touch, ENCODER};
use crate::touch::Ft6336;

/// Touch controller poll period
const TOUCH_POLL_MS: u64 = 10;

/// Encoder task - counts quadrature ticks on every A-channel edge
#[embassy_executor::task]
pub async fn encoder_task(mut a: Input<'static>, b: Input<'static>) {
    info!("Encoder task started");

    loop {
        a.wait_for_any_edge().await;
        ENCODER.record(a.is_high(), b.is_high());
    }
}

/// Touch task - publishes the current touch point for the control loop
#[embassy_executor::task]
pub async fn touch_task(mut touch: Ft6336<TouchI2c>) {
    info!("Touch task started");

    let mut ticker = Ticker::every(Duration::from_millis(TOUCH_POLL_MS));
    let mut faulted = false;

    loop {
        match touch.read_point().await {
            Ok(point) => {
                if faulted {
                    info!("Touch controller recovered");
                    faulted = false;
                }
                set_touch(point);
            }
            Err(e) => {
                if !faulted {
                    warn!("Touch read failed: {:?}", e);
                    faulted = true;
                }
                set_touch(None);
            }
        }
        ticker.next().await;
    }
}
