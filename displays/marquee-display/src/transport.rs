//! I2C transport addressing and errors
//!
//! Surfaces talk to their controller through any `embedded_hal_async` I2C
//! implementation. Bus errors are collapsed into `TransportError` so callers
//! never need the HAL's concrete error type.

use embedded_hal::i2c::{Error as _, ErrorKind, NoAcknowledgeSource};

use crate::geometry::ConfigError;

/// Error from a bus write during `flush` or `clear`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Bus error (misplaced start/stop)
    Bus,
    /// Arbitration lost to another master
    ArbitrationLost,
    /// Device did not acknowledge its address
    AddressNack,
    /// Device did not acknowledge a data byte
    DataNack,
    /// Peripheral overrun
    Overrun,
    /// Other error
    Other,
}

impl TransportError {
    /// Map any embedded-hal I2C error
    pub fn from_i2c<E: embedded_hal::i2c::Error>(error: E) -> Self {
        error.kind().into()
    }
}

impl From<ErrorKind> for TransportError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Bus => TransportError::Bus,
            ErrorKind::ArbitrationLoss => TransportError::ArbitrationLost,
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data) => TransportError::DataNack,
            ErrorKind::NoAcknowledge(_) => TransportError::AddressNack,
            ErrorKind::Overrun => TransportError::Overrun,
            _ => TransportError::Other,
        }
    }
}

/// Where a display lives: bus number and 7-bit device address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransportAddress {
    /// Bus identifier (I2C peripheral index)
    pub bus_id: u8,
    /// 7-bit device address
    pub device_address: u8,
}

impl TransportAddress {
    /// SSD1306/SH1106 default address
    pub const OLED_DEFAULT: Self = Self {
        bus_id: 1,
        device_address: 0x3C,
    };

    /// PCF8574 LCD backpack default address
    pub const LCD_DEFAULT: Self = Self {
        bus_id: 1,
        device_address: 0x27,
    };

    /// Create an address, rejecting reserved 7-bit ranges
    pub fn new(bus_id: u8, device_address: u8) -> Result<Self, ConfigError> {
        // 0x00-0x07 and 0x78-0x7F are reserved by the I2C specification
        if !(0x08..=0x77).contains(&device_address) {
            return Err(ConfigError::InvalidAddress);
        }
        Ok(Self {
            bus_id,
            device_address,
        })
    }
}
