//! Display geometry and scroll paths
//!
//! Geometry is fixed when a surface is opened. Offsets along the scroll axis
//! are signed so text may start off-screen on either side.

/// Configuration errors, fatal at open time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Geometry is zero, too large, or the wrong kind for the surface
    InvalidGeometry,
    /// Device address is not a usable 7-bit I2C address
    InvalidAddress,
    /// Font name or charset not available
    UnknownFont,
    /// Display controller not supported
    UnknownController,
    /// Scroll speed must be at least one unit per frame
    InvalidSpeed,
}

/// Surface geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Geometry {
    /// Pixel display, e.g. 128x64 OLED
    Bitmap { width: u16, height: u16 },
    /// Character display, e.g. 16x2 LCD
    Character { columns: u8, rows: u8 },
}

impl Geometry {
    /// Dimension along the scroll axis (pixels or columns)
    pub const fn extent(&self) -> i32 {
        match *self {
            Geometry::Bitmap { width, .. } => width as i32,
            Geometry::Character { columns, .. } => columns as i32,
        }
    }

    /// Dimension across the scroll axis (pixels or rows)
    pub const fn cross_extent(&self) -> i32 {
        match *self {
            Geometry::Bitmap { height, .. } => height as i32,
            Geometry::Character { rows, .. } => rows as i32,
        }
    }
}

/// Position in surface units (pixels for bitmap, cells for character)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position {
    /// Offset along the scroll axis, may be negative
    pub x: i32,
    /// Row (character) or top pixel (bitmap)
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Range of offsets one loop traverses
///
/// Frames are drawn at `start, start - speed, ...` while the offset is at
/// least `last`. The first offset below `last` ends the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScrollPath {
    /// Offset of the first frame
    pub start: i32,
    /// Lowest offset still drawn
    pub last: i32,
}

impl ScrollPath {
    /// Marquee path: enter from the right edge, leave fully past the left edge
    pub fn marquee(extent: i32, text_width: u32) -> Self {
        Self {
            start: extent,
            last: 0i32.saturating_sub(clamp_width(text_width)),
        }
    }

    /// Sliding window over the text with `padding` blank cells on each side
    ///
    /// Text that fits the window is centered and shown for a single frame.
    pub fn window(extent: i32, text_width: u32, padding: u8) -> Self {
        let width = clamp_width(text_width);
        if width <= extent {
            let centered = (extent - width) / 2;
            return Self {
                start: centered,
                last: centered,
            };
        }

        let padding = padding as i32;
        Self {
            start: padding,
            last: extent.saturating_sub(width).saturating_sub(padding),
        }
    }

    /// Whether `offset` has left the path
    pub const fn is_exhausted(&self, offset: i32) -> bool {
        offset < self.last
    }
}

fn clamp_width(width: u32) -> i32 {
    i32::try_from(width).unwrap_or(i32::MAX)
}
