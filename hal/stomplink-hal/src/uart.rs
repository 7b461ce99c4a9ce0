//! UART serial communication abstractions
//!
//! The link core runs in a single cooperative loop, so both directions are
//! non-blocking: a read returns whatever bytes are already buffered, and a
//! write either queues the whole line or reports why it could not.

/// Serial link errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError {
    /// Framing, parity or noise error reported by the peripheral
    Line,
    /// Receive FIFO overrun; bytes were lost before we could read them
    Overrun,
    /// Transmit buffer cannot take the whole write right now
    WouldBlock,
}

/// Serial receiver
pub trait SerialRx {
    /// Read whatever bytes are already available into `buf`
    ///
    /// Must return immediately; `Ok(0)` means nothing is pending.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, SerialError>;
}

/// Serial transmitter
pub trait SerialTx {
    /// Queue `data` for transmission
    ///
    /// Must not block the caller's loop. Implementations that cannot take
    /// the whole slice return [`SerialError::WouldBlock`] without writing
    /// a partial line.
    fn write(&mut self, data: &[u8]) -> Result<(), SerialError>;
}

impl<T: SerialRx + ?Sized> SerialRx for &mut T {
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
        (**self).read_available(buf)
    }
}

impl<T: SerialTx + ?Sized> SerialTx for &mut T {
    fn write(&mut self, data: &[u8]) -> Result<(), SerialError> {
        (**self).write(data)
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy)]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}
