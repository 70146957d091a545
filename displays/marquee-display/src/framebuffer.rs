//! 1-bit page framebuffer
//!
//! Same memory layout as SSD1306/SH1106 display RAM: the screen is split
//! into pages of 8 pixel rows, and each byte holds one column of a page
//! with the least significant bit on top.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};

/// Largest supported panel width in pixels
pub const MAX_WIDTH: usize = 128;

/// Largest supported panel height in pixels
pub const MAX_HEIGHT: usize = 64;

/// Maximum number of 8-pixel pages
pub const MAX_PAGES: usize = MAX_HEIGHT / 8;

/// Frame buffer (1 bit per pixel, organized as pages)
#[derive(Clone)]
pub struct Framebuffer {
    pages: [[u8; MAX_WIDTH]; MAX_PAGES],
    width: usize,
    height: usize,
}

impl Framebuffer {
    /// Create a blank buffer; callers validate the dimensions
    pub(crate) const fn new(width: usize, height: usize) -> Self {
        Self {
            pages: [[0; MAX_WIDTH]; MAX_PAGES],
            width,
            height,
        }
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        for page in self.pages.iter_mut() {
            page.fill(0);
        }
    }

    /// Set a single pixel, ignoring coordinates outside the panel
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }

        let mask = 1u8 << (y % 8);
        let byte = &mut self.pages[y / 8][x];
        if on {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }

    /// Read a single pixel; outside the panel reads as off
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        self.pages[y / 8][x] & (1 << (y % 8)) != 0
    }

    /// Number of pages in use
    pub fn page_count(&self) -> usize {
        self.height / 8
    }

    /// Column bytes of one page, trimmed to the panel width
    pub fn page(&self, page: usize) -> &[u8] {
        &self.pages[page][..self.width]
    }

    /// Whether no pixel is lit
    pub fn is_blank(&self) -> bool {
        self.pages[..self.page_count()]
            .iter()
            .all(|page| page[..self.width].iter().all(|&b| b == 0))
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.is_on());
        }
        Ok(())
    }
}
