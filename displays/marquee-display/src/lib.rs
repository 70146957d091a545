//! Display surfaces for Marquee
//!
//! This crate provides:
//! - `DisplaySurface` trait: buffered clear/draw/flush over an I2C transport
//! - `TextMetrics` trait and the two styles that implement it
//! - `OledSurface`: 1-bit SSD1306/SH1106 OLED with embedded-graphics mono
//!   fonts, or u8g2 Japanese fonts with the `japanese` feature
//! - `LcdSurface`: HD44780 character LCD behind a PCF8574 backpack
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  marquee-core (scroll engine, config)    │
//! └──────────────────────────────────────────┘
//!                      │ DisplaySurface
//!          ┌───────────┴───────────┐
//!          ▼                       ▼
//! ┌─────────────────┐     ┌─────────────────┐
//! │   OledSurface   │     │   LcdSurface    │
//! │  Framebuffer    │     │   CellBuffer    │
//! └─────────────────┘     └─────────────────┘
//!          │                       │
//!          └───── embedded-hal-async I2C ────┘
//! ```
//!
//! Drawing only touches the in-memory buffer. `flush` is the single point
//! where bytes reach the bus.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod backend;
pub mod framebuffer;
pub mod geometry;
pub mod lcd;
pub mod metrics;
pub mod oled;
pub mod screen;
pub mod transport;

// Re-export key types
pub use backend::{clear, DisplayError, DisplaySurface};
pub use geometry::{ConfigError, Geometry, Position, ScrollPath};
pub use lcd::LcdSurface;
pub use metrics::{CellStyle, Charset, FontStyle, TextMetrics};
pub use oled::{Controller, OledSurface};
pub use transport::{TransportAddress, TransportError};
