//! Audio node UART tasks
//!
//! Move bytes between the buffered UART and the link pipes. Line assembly
//! and decoding happen in the node loop, not here.

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};

use crate::board::serial_error;
use crate::channels::{LINK_FAULT, RX_PIPE, TX_PIPE};

/// Buffer size for one UART transfer
const CHUNK_SIZE: usize = 64;

/// Link RX task - copies received bytes into the RX pipe
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);
                // Waits while the loop catches up
                RX_PIPE.write_all(&buf[..n]).await;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
                LINK_FAULT.signal(serial_error(e));
            }
        }
    }
}

/// Link TX task - drains the TX pipe onto the wire
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        let n = TX_PIPE.read(&mut buf).await;
        if let Err(e) = tx.write_all(&buf[..n]).await {
            warn!("UART write error: {:?}", e);
        }
    }
}
