//! Configuration type definitions
//!
//! These types mirror the sections of `marquee.toml`. Fields left out of
//! the file fall back to the defaults of the chosen display kind.

use core::num::NonZeroU32;
use core::time::Duration;

use heapless::String;
use marquee_display::{
    CellStyle, Charset, ConfigError, Controller, FontStyle, Geometry, TransportAddress,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::scroll::ScrollSettings;

/// Maximum font name length
pub const MAX_FONT_NAME_LEN: usize = 16;

/// Maximum message length in bytes
pub const MAX_MESSAGE_LEN: usize = 256;

/// Which surface the firmware drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DisplayKind {
    /// SSD1306/SH1106 bitmap panel
    #[default]
    Oled,
    /// HD44780 behind a PCF8574 backpack
    Lcd,
}

/// `[display]` section
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    pub kind: DisplayKind,
    /// OLED controller variant
    pub controller: Controller,
    /// OLED width in pixels
    pub width: u16,
    /// OLED height in pixels
    pub height: u16,
    /// LCD columns
    pub columns: u8,
    /// LCD rows
    pub rows: u8,
    pub bus: u8,
    /// 7-bit device address; `None` uses the default for `kind`
    pub address: Option<u8>,
    /// Built-in font name (OLED only)
    pub font: String<MAX_FONT_NAME_LEN>,
    pub charset: Charset,
    /// Blank cells around a scrolling LCD message
    pub padding: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let mut font = String::new();
        // The default name always fits
        let _ = font.push_str(FontStyle::DEFAULT_NAME);

        Self {
            kind: DisplayKind::Oled,
            controller: Controller::Ssd1306,
            width: 128,
            height: 64,
            columns: 16,
            rows: 2,
            bus: 1,
            address: None,
            font,
            charset: Charset::Latin1,
            padding: CellStyle::default().padding,
        }
    }
}

/// `[scroll]` section
///
/// Every field is optional; missing ones take the display kind's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScrollConfig {
    /// Pixels or columns per frame
    pub speed: Option<u32>,
    pub frame_delay_ms: Option<u32>,
    /// `None` scrolls until cancelled
    pub loops: Option<u32>,
    /// Pixel row (OLED) or text row (LCD)
    pub y: Option<i32>,
}

/// Complete firmware configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MarqueeConfig {
    pub display: DisplayConfig,
    pub scroll: ScrollConfig,
    /// Text to scroll
    pub message: String<MAX_MESSAGE_LEN>,
}

impl MarqueeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface geometry for the configured kind
    pub fn geometry(&self) -> Geometry {
        match self.display.kind {
            DisplayKind::Oled => Geometry::Bitmap {
                width: self.display.width,
                height: self.display.height,
            },
            DisplayKind::Lcd => Geometry::Character {
                columns: self.display.columns,
                rows: self.display.rows,
            },
        }
    }

    /// Bus and device address, defaulting per kind
    pub fn transport_address(&self) -> Result<TransportAddress, ConfigError> {
        let default = match self.display.kind {
            DisplayKind::Oled => TransportAddress::OLED_DEFAULT,
            DisplayKind::Lcd => TransportAddress::LCD_DEFAULT,
        };
        let address = self.display.address.unwrap_or(default.device_address);
        TransportAddress::new(self.display.bus, address)
    }

    /// Resolve the configured font
    pub fn font_style(&self) -> Result<FontStyle, ConfigError> {
        FontStyle::from_name(&self.display.font, self.display.charset)
    }

    pub fn cell_style(&self) -> CellStyle {
        CellStyle::new(self.display.padding)
    }

    /// Scroll settings with kind defaults filled in
    pub fn scroll_settings(&self) -> Result<ScrollSettings, ConfigError> {
        let defaults = match self.display.kind {
            DisplayKind::Oled => ScrollSettings::OLED,
            DisplayKind::Lcd => ScrollSettings::LCD,
        };

        let speed = match self.scroll.speed {
            Some(speed) => NonZeroU32::new(speed).ok_or(ConfigError::InvalidSpeed)?,
            None => defaults.speed,
        };
        let frame_delay = self
            .scroll
            .frame_delay_ms
            .map(|ms| Duration::from_millis(u64::from(ms)))
            .unwrap_or(defaults.frame_delay);

        Ok(ScrollSettings {
            speed,
            frame_delay,
            loops: self.scroll.loops,
            vertical_position: self.scroll.y.unwrap_or(defaults.vertical_position),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oled_defaults() {
        let config = MarqueeConfig::new();
        assert_eq!(
            config.geometry(),
            Geometry::Bitmap {
                width: 128,
                height: 64
            }
        );
        assert_eq!(
            config.transport_address().unwrap(),
            TransportAddress::OLED_DEFAULT
        );
        assert_eq!(config.scroll_settings().unwrap(), ScrollSettings::OLED);
        assert_eq!(config.font_style().unwrap().line_height(), 20);
    }

    #[test]
    fn test_lcd_defaults() {
        let mut config = MarqueeConfig::new();
        config.display.kind = DisplayKind::Lcd;

        assert_eq!(
            config.geometry(),
            Geometry::Character {
                columns: 16,
                rows: 2
            }
        );
        assert_eq!(
            config.transport_address().unwrap(),
            TransportAddress::LCD_DEFAULT
        );
        assert_eq!(config.scroll_settings().unwrap(), ScrollSettings::LCD);
        assert_eq!(config.cell_style().padding, 4);
    }

    #[test]
    fn test_scroll_overrides() {
        let mut config = MarqueeConfig::new();
        config.scroll = ScrollConfig {
            speed: Some(3),
            frame_delay_ms: Some(20),
            loops: Some(2),
            y: Some(40),
        };

        let settings = config.scroll_settings().unwrap();
        assert_eq!(settings.speed.get(), 3);
        assert_eq!(settings.frame_delay, Duration::from_millis(20));
        assert_eq!(settings.loops, Some(2));
        assert_eq!(settings.vertical_position, 40);
    }

    #[test]
    fn test_zero_speed_rejected() {
        let mut config = MarqueeConfig::new();
        config.scroll.speed = Some(0);
        assert_eq!(config.scroll_settings(), Err(ConfigError::InvalidSpeed));
    }

    #[test]
    fn test_reserved_address_rejected() {
        let mut config = MarqueeConfig::new();
        config.display.address = Some(0x7C);
        assert_eq!(
            config.transport_address(),
            Err(ConfigError::InvalidAddress)
        );
    }

    #[test]
    fn test_unknown_font_rejected() {
        let mut config = MarqueeConfig::new();
        config.display.font.clear();
        config.display.font.push_str("3x3").unwrap();
        assert!(matches!(config.font_style(), Err(ConfigError::UnknownFont)));
    }
}
