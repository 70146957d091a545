//! SSD1306 / SH1106 OLED surface
//!
//! Driver for monochrome OLED panels up to 128x64 via I2C. Text is drawn
//! with embedded-graphics mono fonts into a page framebuffer that mirrors
//! the controller's display RAM.

use embedded_graphics::prelude::Point;
use embedded_hal_async::i2c::I2c;

use crate::backend::{DisplayError, DisplaySurface};
use crate::framebuffer::{Framebuffer, MAX_HEIGHT, MAX_WIDTH};
use crate::geometry::{ConfigError, Geometry, Position, ScrollPath};
use crate::metrics::FontStyle;
use crate::transport::{TransportAddress, TransportError};

/// Controller commands shared by SSD1306 and SH1106
#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const DISPLAY_RESUME: u8 = 0xA4;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// Control byte prefixing a command
const CONTROL_COMMAND: u8 = 0x00;

/// Control byte prefixing display data
const CONTROL_DATA: u8 = 0x40;

/// OLED controller variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Controller {
    /// SSD1306: RAM columns map 1:1 to the panel
    #[default]
    Ssd1306,
    /// SH1106: 132-column RAM, panel starts at column 2
    Sh1106,
}

impl Controller {
    /// Parse a controller name as used in config files
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "ssd1306" => Ok(Controller::Ssd1306),
            "sh1106" => Ok(Controller::Sh1106),
            _ => Err(ConfigError::UnknownController),
        }
    }

    /// First RAM column shown on the panel
    const fn column_offset(self) -> u8 {
        match self {
            Controller::Ssd1306 => 0,
            Controller::Sh1106 => 2,
        }
    }
}

/// OLED display surface
pub struct OledSurface<I2C> {
    i2c: I2C,
    address: TransportAddress,
    controller: Controller,
    width: u16,
    height: u16,
    style: FontStyle,
    buffer: Framebuffer,
}

impl<I2C> OledSurface<I2C>
where
    I2C: I2c,
{
    /// Validate the configuration, initialize the panel and blank it
    pub async fn open(
        i2c: I2C,
        controller: Controller,
        geometry: Geometry,
        address: TransportAddress,
        style: FontStyle,
    ) -> Result<Self, DisplayError> {
        let (width, height) = Self::validate(geometry)?;

        let mut surface = Self {
            i2c,
            address,
            controller,
            width,
            height,
            style,
            buffer: Framebuffer::new(width as usize, height as usize),
        };

        surface.init().await?;
        surface.clear().await?;

        Ok(surface)
    }

    fn validate(geometry: Geometry) -> Result<(u16, u16), ConfigError> {
        match geometry {
            Geometry::Bitmap { width, height }
                if width > 0
                    && width as usize <= MAX_WIDTH
                    && height > 0
                    && height as usize <= MAX_HEIGHT
                    && height % 8 == 0 =>
            {
                Ok((width, height))
            }
            _ => Err(ConfigError::InvalidGeometry),
        }
    }

    /// Send the power-up sequence
    async fn init(&mut self) -> Result<(), TransportError> {
        let com_pins = if self.height > 32 { 0x12 } else { 0x02 };

        let init_cmds: [u8; 23] = [
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80, // Default clock
            cmd::SET_MUX_RATIO,
            (self.height - 1) as u8,
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
            0x14,                  // Enable charge pump
            cmd::SET_SEG_REMAP,    // Flip horizontally
            cmd::SET_COM_SCAN_DEC, // Flip vertically
            cmd::SET_COM_PINS,
            com_pins,
            cmd::SET_CONTRAST,
            0xFF, // Full contrast
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::DISPLAY_RESUME,
            cmd::SET_NORMAL,
            cmd::DISPLAY_ON,
        ];

        for &c in init_cmds.iter() {
            self.command(c).await?;
        }

        Ok(())
    }

    /// Send a command to the display
    async fn command(&mut self, cmd: u8) -> Result<(), TransportError> {
        self.i2c
            .write(self.address.device_address, &[CONTROL_COMMAND, cmd])
            .await
            .map_err(TransportError::from_i2c)
    }

    /// Set display contrast (0-255)
    pub async fn set_contrast(&mut self, contrast: u8) -> Result<(), TransportError> {
        self.command(cmd::SET_CONTRAST).await?;
        self.command(contrast).await
    }

    /// Turn display on/off
    pub async fn set_display_on(&mut self, on: bool) -> Result<(), TransportError> {
        if on {
            self.command(cmd::DISPLAY_ON).await
        } else {
            self.command(cmd::DISPLAY_OFF).await
        }
    }

    /// Current frame buffer contents
    pub fn buffer(&self) -> &Framebuffer {
        &self.buffer
    }

    /// Controller variant
    pub fn controller(&self) -> Controller {
        self.controller
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> DisplaySurface for OledSurface<I2C>
where
    I2C: I2c,
{
    type Style = FontStyle;

    fn geometry(&self) -> Geometry {
        Geometry::Bitmap {
            width: self.width,
            height: self.height,
        }
    }

    fn style(&self) -> &FontStyle {
        &self.style
    }

    fn scroll_path(&self, text_width: u32) -> ScrollPath {
        ScrollPath::marquee(self.width as i32, text_width)
    }

    fn clear_buffer(&mut self) {
        self.buffer.clear();
    }

    fn draw_text(&mut self, position: Position, text: &str) {
        // Drawing into the framebuffer cannot fail
        self.style
            .draw(text, Point::new(position.x, position.y), &mut self.buffer)
            .ok();
    }

    async fn flush(&mut self) -> Result<(), TransportError> {
        let column = self.controller.column_offset();

        for page in 0..self.buffer.page_count() {
            // Set page address
            self.command(cmd::SET_PAGE_ADDR | (page as u8)).await?;
            // Set column address
            self.command(cmd::SET_LOW_COLUMN | (column & 0x0F)).await?;
            self.command(cmd::SET_HIGH_COLUMN | (column >> 4)).await?;

            // Send page data
            let row = self.buffer.page(page);
            let mut data = [0u8; MAX_WIDTH + 1];
            data[0] = CONTROL_DATA;
            data[1..=row.len()].copy_from_slice(row);
            self.i2c
                .write(self.address.device_address, &data[..=row.len()])
                .await
                .map_err(TransportError::from_i2c)?;
        }

        Ok(())
    }
}
