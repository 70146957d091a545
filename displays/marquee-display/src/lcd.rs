//! HD44780 character LCD surface
//!
//! Drives an LCD1602/2004-style module through a PCF8574 I2C backpack in
//! 4-bit mode. The expander pins are wired as:
//!
//! | PCF8574 | P0 | P1 | P2 | P3        | P4-P7 |
//! |---------|----|----|----|-----------|-------|
//! | HD44780 | RS | RW | EN | backlight | D4-D7 |

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::backend::{DisplayError, DisplaySurface};
use crate::geometry::{ConfigError, Geometry, Position, ScrollPath};
use crate::metrics::CellStyle;
use crate::screen::{CellBuffer, MAX_CELLS, MAX_COLS, MAX_ROWS};
use crate::transport::{TransportAddress, TransportError};

/// HD44780 instructions
#[allow(dead_code)]
mod cmd {
    pub const CLEAR: u8 = 0x01;
    pub const HOME: u8 = 0x02;
    pub const ENTRY_MODE: u8 = 0x04;
    pub const ENTRY_INCREMENT: u8 = 0x02;
    pub const DISPLAY_CONTROL: u8 = 0x08;
    pub const DISPLAY_ON: u8 = 0x04;
    pub const FUNCTION_SET: u8 = 0x20;
    pub const TWO_LINES: u8 = 0x08;
    pub const SET_DDRAM: u8 = 0x80;
}

/// PCF8574 pin masks
mod pin {
    pub const RS: u8 = 0x01;
    pub const EN: u8 = 0x04;
    pub const BACKLIGHT: u8 = 0x08;
}

/// Bytes on the wire per HD44780 byte (two nibbles, each strobed)
const BYTES_PER_CHAR: usize = 4;

/// HD44780 LCD surface
pub struct LcdSurface<I2C, D> {
    i2c: I2C,
    delay: D,
    address: TransportAddress,
    columns: u8,
    rows: u8,
    style: CellStyle,
    backlight: bool,
    screen: CellBuffer,
}

impl<I2C, D> LcdSurface<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Validate the configuration, run the 4-bit init sequence and blank
    pub async fn open(
        i2c: I2C,
        delay: D,
        geometry: Geometry,
        address: TransportAddress,
        style: CellStyle,
    ) -> Result<Self, DisplayError> {
        let (columns, rows) = Self::validate(geometry)?;

        let mut surface = Self {
            i2c,
            delay,
            address,
            columns,
            rows,
            style,
            backlight: true,
            screen: CellBuffer::new(columns as usize, rows as usize),
        };

        surface.init().await?;
        surface.clear().await?;

        Ok(surface)
    }

    fn validate(geometry: Geometry) -> Result<(u8, u8), ConfigError> {
        match geometry {
            Geometry::Character { columns, rows }
                if columns > 0
                    && columns as usize <= MAX_COLS
                    && rows > 0
                    && rows as usize <= MAX_ROWS
                    && columns as usize * rows as usize <= MAX_CELLS =>
            {
                Ok((columns, rows))
            }
            _ => Err(ConfigError::InvalidGeometry),
        }
    }

    /// Power-up sequence switching the controller into 4-bit mode
    async fn init(&mut self) -> Result<(), TransportError> {
        // Wait for Vcc to settle
        self.delay.delay_ms(50).await;

        // Three 8-bit function sets put the controller in a known state
        for wait_us in [4500, 4500, 150] {
            self.write_nibble(0x03, 0).await?;
            self.delay.delay_us(wait_us).await;
        }
        self.write_nibble(0x02, 0).await?;

        let lines = if self.rows > 1 { cmd::TWO_LINES } else { 0 };
        self.command(cmd::FUNCTION_SET | lines).await?;
        self.command(cmd::DISPLAY_CONTROL | cmd::DISPLAY_ON).await?;
        self.command(cmd::CLEAR).await?;
        self.delay.delay_us(2000).await;
        self.command(cmd::ENTRY_MODE | cmd::ENTRY_INCREMENT).await?;

        Ok(())
    }

    fn backlight_mask(&self) -> u8 {
        if self.backlight {
            pin::BACKLIGHT
        } else {
            0
        }
    }

    /// Expander bytes strobing one byte as two nibbles
    fn encode(&self, byte: u8, mode: u8, out: &mut [u8]) {
        let flags = mode | self.backlight_mask();
        let high = (byte & 0xF0) | flags;
        let low = ((byte << 4) & 0xF0) | flags;
        out[0] = high | pin::EN;
        out[1] = high;
        out[2] = low | pin::EN;
        out[3] = low;
    }

    async fn write_nibble(&mut self, nibble: u8, mode: u8) -> Result<(), TransportError> {
        let bits = (nibble << 4) | mode | self.backlight_mask();
        self.write(&[bits | pin::EN, bits]).await
    }

    async fn command(&mut self, instruction: u8) -> Result<(), TransportError> {
        let mut bytes = [0u8; BYTES_PER_CHAR];
        self.encode(instruction, 0, &mut bytes);
        self.write(&bytes).await
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.i2c
            .write(self.address.device_address, bytes)
            .await
            .map_err(TransportError::from_i2c)
    }

    /// DDRAM address of the first cell on `row`
    fn row_base(&self, row: usize) -> u8 {
        // Rows 2 and 3 continue rows 0 and 1 after the visible columns
        match row {
            0 => 0x00,
            1 => 0x40,
            2 => self.columns,
            _ => 0x40 + self.columns,
        }
    }

    /// Switch the backlight; applied with the next bus write
    pub async fn set_backlight(&mut self, on: bool) -> Result<(), TransportError> {
        self.backlight = on;
        self.write(&[self.backlight_mask()]).await
    }

    /// Current cell contents
    pub fn screen(&self) -> &CellBuffer {
        &self.screen
    }

    /// Give the bus and delay back
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C, D> DisplaySurface for LcdSurface<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Style = CellStyle;

    fn geometry(&self) -> Geometry {
        Geometry::Character {
            columns: self.columns,
            rows: self.rows,
        }
    }

    fn style(&self) -> &CellStyle {
        &self.style
    }

    fn scroll_path(&self, text_width: u32) -> ScrollPath {
        ScrollPath::window(self.columns as i32, text_width, self.style.padding)
    }

    fn clear_buffer(&mut self) {
        self.screen.clear();
    }

    fn draw_text(&mut self, position: Position, text: &str) {
        self.screen.put_str(position.y, position.x, text);
    }

    async fn flush(&mut self) -> Result<(), TransportError> {
        for row in 0..self.screen.rows() {
            self.command(cmd::SET_DDRAM | self.row_base(row)).await?;

            let mut data = [0u8; MAX_COLS * BYTES_PER_CHAR];
            let cells = self.screen.row(row);
            for (i, &code) in cells.iter().enumerate() {
                let at = i * BYTES_PER_CHAR;
                self.encode(code, pin::RS, &mut data[at..at + BYTES_PER_CHAR]);
            }
            let len = cells.len() * BYTES_PER_CHAR;
            self.write(&data[..len]).await?;
        }

        Ok(())
    }
}
