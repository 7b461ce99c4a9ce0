//! RP2040 glue for the HAL traits
//!
//! The node loop talks to the UART through two byte pipes. The async link
//! tasks move bytes between the pipes and the buffered UART, so the loop
//! never waits on the wire.

use embassy_rp::gpio::Input;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::{I2C0, I2C1};
use embassy_rp::uart::{self, Config as RpUartConfig};

use stomplink_hal::uart::{DataBits, Parity, StopBits};
use stomplink_hal::{InputPin, SerialError, SerialRx, SerialTx, UartConfig};

use crate::channels::{LINK_FAULT, RX_PIPE, TX_PIPE};

/// OLED bus
pub type OledI2c = I2c<'static, I2C0, Async>;

/// Touch controller bus
pub type TouchI2c = I2c<'static, I2C1, Async>;

/// Receive half of the audio node link, fed by `link_rx_task`
pub struct LinkRx;

impl SerialRx for LinkRx {
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
        if let Some(fault) = LINK_FAULT.try_take() {
            return Err(fault);
        }
        // Empty is the only failure
        Ok(RX_PIPE.try_read(buf).unwrap_or(0))
    }
}

/// Transmit half of the audio node link, drained by `link_tx_task`
pub struct LinkTx;

impl SerialTx for LinkTx {
    fn write(&mut self, data: &[u8]) -> Result<(), SerialError> {
        // Whole lines only
        if TX_PIPE.free_capacity() < data.len() {
            return Err(SerialError::WouldBlock);
        }
        match TX_PIPE.try_write(data) {
            Ok(n) if n == data.len() => Ok(()),
            _ => Err(SerialError::WouldBlock),
        }
    }
}

/// GPIO input readable through the HAL trait
pub struct BoardInput(pub Input<'static>);

impl InputPin for BoardInput {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}

/// Translate the link settings into the RP2040 UART configuration
pub fn uart_config(config: &UartConfig) -> RpUartConfig {
    let mut rp = RpUartConfig::default();
    rp.baudrate = config.baudrate;
    rp.data_bits = match config.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    rp.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    rp.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    rp
}

/// Map a UART receive error to the link error it means for the loop
pub fn serial_error(error: uart::Error) -> SerialError {
    match error {
        uart::Error::Overrun => SerialError::Overrun,
        _ => SerialError::Line,
    }
}
