//! Display surface trait
//!
//! Defines the interface the scroll engine renders through.

use crate::geometry::{ConfigError, Geometry, Position, ScrollPath};
use crate::metrics::TextMetrics;
use crate::transport::TransportError;

/// Errors opening a display surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Invalid geometry, address or style; not retried
    Configuration(ConfigError),
    /// Initialization sequence failed on the bus
    Transport(TransportError),
}

impl From<ConfigError> for DisplayError {
    fn from(e: ConfigError) -> Self {
        DisplayError::Configuration(e)
    }
}

impl From<TransportError> for DisplayError {
    fn from(e: TransportError) -> Self {
        DisplayError::Transport(e)
    }
}

/// Buffered display surface
///
/// `clear_buffer` and `draw_text` only touch memory. `flush` is the single
/// I/O boundary; a flush error is always returned to the caller.
#[allow(async_fn_in_trait)]
pub trait DisplaySurface {
    /// Style used to draw and measure text
    type Style: TextMetrics;

    /// Fixed geometry of the surface
    fn geometry(&self) -> Geometry;

    /// Style chosen when the surface was opened
    fn style(&self) -> &Self::Style;

    /// Path one loop of text `text_width` wide traverses on this surface
    fn scroll_path(&self, text_width: u32) -> ScrollPath;

    /// Blank the in-memory buffer
    fn clear_buffer(&mut self);

    /// Compose `text` into the buffer at `position`, clipping to the geometry
    fn draw_text(&mut self, position: Position, text: &str);

    /// Push the buffer to the display
    async fn flush(&mut self) -> Result<(), TransportError>;

    /// Blank the buffer and push it to the display
    async fn clear(&mut self) -> Result<(), TransportError> {
        self.clear_buffer();
        self.flush().await
    }
}

/// Blank a surface
pub async fn clear<S: DisplaySurface>(surface: &mut S) -> Result<(), TransportError> {
    surface.clear().await
}
