//! FT6336U capacitive touch controller
//!
//! Only the first touch point is read. Coordinates come out in the
//! controller's portrait frame and are rotated into screen space.

use stomplink_core::input::map_rotated;

/// FT6336U I2C address
const FT6336_ADDR: u8 = 0x38;

/// TD_STATUS, followed by P1_XH, P1_XL, P1_YH, P1_YL
const REG_TD_STATUS: u8 = 0x02;

/// The controller tracks at most two points
const MAX_TOUCHES: u8 = 2;

pub struct Ft6336<I2C> {
    i2c: I2C,
}

impl<I2C> Ft6336<I2C>
where
    I2C: embedded_hal_async::i2c::I2c,
{
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Current touch point in screen coordinates, `None` when released
    pub async fn read_point(&mut self) -> Result<Option<(u16, u16)>, I2C::Error> {
        let mut data = [0u8; 5];
        self.i2c
            .write_read(FT6336_ADDR, &[REG_TD_STATUS], &mut data)
            .await?;

        let touches = data[0] & 0x0F;
        // 0x0F after power-up means "no valid data yet"
        if touches == 0 || touches > MAX_TOUCHES {
            return Ok(None);
        }

        let raw_x = (u16::from(data[1] & 0x0F) << 8) | u16::from(data[2]);
        let raw_y = (u16::from(data[3] & 0x0F) << 8) | u16::from(data[4]);
        Ok(Some(map_rotated(raw_x, raw_y)))
    }
}
