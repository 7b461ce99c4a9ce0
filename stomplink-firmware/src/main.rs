//! Stomplink - Control Node Firmware
//!
//! Firmware for the RP2040 control head of a two-board effect pedal. The
//! head reads an encoder, a footswitch and a touch panel, sends the
//! operator's intent to the audio node over UART0 and shows what the audio
//! node reports on a 128x64 SH1106 OLED.
//!
//! Pin map (Pico):
//! - UART0: GPIO0 TX, GPIO1 RX (audio node link)
//! - I2C0: GPIO4 SDA, GPIO5 SCL (SH1106 OLED)
//! - I2C1: GPIO6 SDA, GPIO7 SCL (FT6336U touch controller)
//! - GPIO10/11: encoder A/B, GPIO12: footswitch to ground

#![no_std]
#![no_main]

#[cfg(not(feature = "defmt"))]
compile_error!("stomplink-firmware logs over defmt-rtt; build with the `defmt` feature");

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, I2C1, UART0};
use embassy_rp::uart::{BufferedInterruptHandler, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use stomplink_core::input::{HitRegion, TouchTarget};
use stomplink_core::ControlNode;
use stomplink_hal::{ActiveLow, UartConfig};

use crate::board::{uart_config, BoardInput, LinkRx, LinkTx};
use crate::sh1106::Sh1106;
use crate::touch::Ft6336;

mod board;
mod channels;
mod config;
mod sh1106;
mod tasks;
mod touch;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
    I2C1_IRQ => i2c::InterruptHandler<I2C1>;
});

/// Embedded node configuration (compiled into firmware)
/// Edit node.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../node.toml");

/// I2C bus speed for both the OLED and the touch controller
const I2C_FREQUENCY_HZ: u32 = 400_000;

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Touch regions, three full-height columns across the landscape panel
const TOUCH_REGIONS: [HitRegion; 3] = [
    HitRegion::new(0, 0, 160, 320, TouchTarget::ToggleDelay),
    HitRegion::new(160, 0, 160, 320, TouchTarget::ToggleReverb),
    HitRegion::new(320, 0, 160, 320, TouchTarget::CycleChannel),
];

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Stomplink control node starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let node_config = config::load(EMBEDDED_CONFIG);

    // Audio node link
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config(&UartConfig::default()));
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for audio node link");

    // OLED on I2C0
    let mut oled_i2c_config = i2c::Config::default();
    oled_i2c_config.frequency = I2C_FREQUENCY_HZ;
    let oled_i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, oled_i2c_config);
    let mut display = Sh1106::new(oled_i2c);
    if let Err(e) = display.init().await {
        error!("Failed to initialize display: {:?}", e);
    } else {
        info!("OLED initialized");
    }

    // Touch controller on I2C1
    let mut touch_i2c_config = i2c::Config::default();
    touch_i2c_config.frequency = I2C_FREQUENCY_HZ;
    let touch_i2c = I2c::new_async(p.I2C1, p.PIN_7, p.PIN_6, Irqs, touch_i2c_config);
    let touch = Ft6336::new(touch_i2c);

    // Encoder and footswitch, all wired to ground with pull-ups
    let enc_a = Input::new(p.PIN_10, Pull::Up);
    let enc_b = Input::new(p.PIN_11, Pull::Up);
    let footswitch = ActiveLow(BoardInput(Input::new(p.PIN_12, Pull::Up)));

    let mut node = ControlNode::new(LinkRx, LinkTx, &node_config);
    for region in TOUCH_REGIONS {
        if !node.add_touch_region(region) {
            warn!("Touch region table full");
        }
    }

    // Spawn tasks
    spawner.spawn(tasks::link_rx_task(rx).unwrap());
    spawner.spawn(tasks::link_tx_task(tx).unwrap());
    spawner.spawn(tasks::encoder_task(enc_a, enc_b).unwrap());
    spawner.spawn(tasks::touch_task(touch).unwrap());
    spawner.spawn(tasks::display_task(display).unwrap());
    spawner.spawn(tasks::control_task(node, footswitch).unwrap());

    info!("All tasks spawned, firmware running");
}
