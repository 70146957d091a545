//! Text metrics and styles
//!
//! A style knows how wide a string renders. The scroll engine measures once
//! per session and plans its path from that width.

use embedded_graphics::mono_font::{ascii, iso_8859_1, MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, Drawable, Point};
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::{Baseline, Text};
#[cfg(feature = "japanese")]
use u8g2_fonts::types::{FontColor, VerticalPosition};
#[cfg(feature = "japanese")]
use u8g2_fonts::{fonts, FontRenderer};

use crate::geometry::ConfigError;

/// Measures rendered text width along the scroll axis
pub trait TextMetrics {
    /// Width of `text` in surface units (pixels or cells)
    ///
    /// Must be deterministic; the empty string measures 0.
    fn measure(&self, text: &str) -> u32;
}

/// Glyph coverage of a bitmap font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Charset {
    /// Printable ASCII only
    Ascii,
    /// ISO 8859-1 (covers `°` and accented Latin)
    #[default]
    Latin1,
    /// Kana, common kanji, full-width forms and ASCII
    ///
    /// Only available with the `japanese` feature.
    Japanese,
}

impl Charset {
    /// Parse a charset name as used in config files
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "ascii" => Ok(Charset::Ascii),
            "latin1" | "iso-8859-1" | "iso_8859_1" => Ok(Charset::Latin1),
            "japanese" => Ok(Charset::Japanese),
            _ => Err(ConfigError::UnknownFont),
        }
    }
}

/// Built-in font sizes, named `<width>x<height>`
const ASCII_FONTS: &[(&str, &MonoFont<'static>)] = &[
    ("4x6", &ascii::FONT_4X6),
    ("5x7", &ascii::FONT_5X7),
    ("5x8", &ascii::FONT_5X8),
    ("6x9", &ascii::FONT_6X9),
    ("6x10", &ascii::FONT_6X10),
    ("6x12", &ascii::FONT_6X12),
    ("6x13", &ascii::FONT_6X13),
    ("7x13", &ascii::FONT_7X13),
    ("7x14", &ascii::FONT_7X14),
    ("8x13", &ascii::FONT_8X13),
    ("9x15", &ascii::FONT_9X15),
    ("9x18", &ascii::FONT_9X18),
    ("10x20", &ascii::FONT_10X20),
];

const LATIN1_FONTS: &[(&str, &MonoFont<'static>)] = &[
    ("4x6", &iso_8859_1::FONT_4X6),
    ("5x7", &iso_8859_1::FONT_5X7),
    ("5x8", &iso_8859_1::FONT_5X8),
    ("6x9", &iso_8859_1::FONT_6X9),
    ("6x10", &iso_8859_1::FONT_6X10),
    ("6x12", &iso_8859_1::FONT_6X12),
    ("6x13", &iso_8859_1::FONT_6X13),
    ("7x13", &iso_8859_1::FONT_7X13),
    ("7x14", &iso_8859_1::FONT_7X14),
    ("8x13", &iso_8859_1::FONT_8X13),
    ("9x15", &iso_8859_1::FONT_9X15),
    ("9x18", &iso_8859_1::FONT_9X18),
    ("10x20", &iso_8859_1::FONT_10X20),
];

/// Japanese u8g2 fonts
#[cfg(feature = "japanese")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JapaneseFont {
    /// GNU Unifont: 8 px half-width, 16 px full-width glyphs
    Unifont,
}

#[cfg(feature = "japanese")]
const JAPANESE_FONTS: &[(&str, JapaneseFont)] = &[("unifont", JapaneseFont::Unifont)];

#[cfg(feature = "japanese")]
impl JapaneseFont {
    fn renderer(self) -> FontRenderer {
        let renderer = match self {
            JapaneseFont::Unifont => FontRenderer::new::<fonts::u8g2_font_unifont_t_japanese1>(),
        };
        // Missing glyphs are skipped rather than failing the whole string
        renderer.with_ignore_unknown_chars(true)
    }

    fn line_height(self) -> u32 {
        match self {
            JapaneseFont::Unifont => 16,
        }
    }
}

#[derive(Clone, Copy)]
enum Glyphs {
    Mono(&'static MonoFont<'static>),
    #[cfg(feature = "japanese")]
    Japanese(JapaneseFont),
}

/// Bitmap text style, selected by font name and charset
///
/// Mono fonts render characters outside their charset as the font's
/// replacement glyph, so every `char` occupies one cell of the font's width.
/// Japanese fonts are proportional: half-width characters take one cell,
/// full-width ones two, and characters the font lacks are skipped.
#[derive(Clone, Copy)]
pub struct FontStyle {
    glyphs: Glyphs,
}

impl FontStyle {
    /// Font used when none is configured
    pub const DEFAULT_NAME: &'static str = "10x20";

    /// Wrap a mono font directly
    pub const fn new(font: &'static MonoFont<'static>) -> Self {
        Self {
            glyphs: Glyphs::Mono(font),
        }
    }

    /// Look up a built-in font by name and charset
    pub fn from_name(name: &str, charset: Charset) -> Result<Self, ConfigError> {
        let table = match charset {
            Charset::Ascii => ASCII_FONTS,
            Charset::Latin1 => LATIN1_FONTS,
            Charset::Japanese => return Self::japanese(name),
        };

        table
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, font)| Self::new(font))
            .ok_or(ConfigError::UnknownFont)
    }

    #[cfg(feature = "japanese")]
    fn japanese(name: &str) -> Result<Self, ConfigError> {
        JAPANESE_FONTS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, font)| Self {
                glyphs: Glyphs::Japanese(font),
            })
            .ok_or(ConfigError::UnknownFont)
    }

    #[cfg(not(feature = "japanese"))]
    fn japanese(_name: &str) -> Result<Self, ConfigError> {
        Err(ConfigError::UnknownFont)
    }

    /// Height of one line of text in pixels
    pub fn line_height(&self) -> u32 {
        match self.glyphs {
            Glyphs::Mono(font) => font.character_size.height,
            #[cfg(feature = "japanese")]
            Glyphs::Japanese(font) => font.line_height(),
        }
    }

    /// Draw `text` in lit pixels with its top edge at `position.y`
    ///
    /// Only errors from the target are returned.
    pub fn draw<D>(&self, text: &str, position: Point, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        match self.glyphs {
            Glyphs::Mono(font) => {
                let style = MonoTextStyle::new(font, BinaryColor::On);
                Text::with_baseline(text, position, style, Baseline::Top)
                    .draw(target)
                    .map(|_| ())
            }
            #[cfg(feature = "japanese")]
            Glyphs::Japanese(font) => {
                let drawn = font.renderer().render(
                    text,
                    position,
                    VerticalPosition::Top,
                    FontColor::Transparent(BinaryColor::On),
                    target,
                );
                match drawn {
                    Err(u8g2_fonts::Error::DisplayError(e)) => Err(e),
                    _ => Ok(()),
                }
            }
        }
    }
}

impl core::fmt::Debug for FontStyle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.glyphs {
            Glyphs::Mono(font) => f
                .debug_struct("FontStyle")
                .field("character_size", &font.character_size)
                .finish(),
            #[cfg(feature = "japanese")]
            Glyphs::Japanese(font) => f.debug_struct("FontStyle").field("japanese", &font).finish(),
        }
    }
}

impl TextMetrics for FontStyle {
    fn measure(&self, text: &str) -> u32 {
        if text.is_empty() {
            return 0;
        }
        match self.glyphs {
            Glyphs::Mono(font) => MonoTextStyle::new(font, BinaryColor::On)
                .measure_string(text, Point::zero(), Baseline::Top)
                .bounding_box
                .size
                .width,
            #[cfg(feature = "japanese")]
            Glyphs::Japanese(font) => font
                .renderer()
                .get_rendered_dimensions(text, Point::zero(), VerticalPosition::Top)
                .map(|dims| u32::try_from(dims.advance.x).unwrap_or(0))
                .unwrap_or(0),
        }
    }
}

/// Character-cell style: one cell per `char`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CellStyle {
    /// Blank cells before and after the text in the sliding window
    pub padding: u8,
}

impl CellStyle {
    pub const fn new(padding: u8) -> Self {
        Self { padding }
    }
}

impl Default for CellStyle {
    fn default() -> Self {
        Self { padding: 4 }
    }
}

impl TextMetrics for CellStyle {
    fn measure(&self, text: &str) -> u32 {
        u32::try_from(text.chars().count()).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_lookup() {
        let style = FontStyle::from_name("6x10", Charset::Ascii).unwrap();
        assert_eq!(style.line_height(), 10);

        let style = FontStyle::from_name("10x20", Charset::Latin1).unwrap();
        assert_eq!(style.line_height(), 20);
    }

    #[test]
    fn test_unknown_font_is_config_error() {
        assert_eq!(
            FontStyle::from_name("16pt", Charset::Ascii).unwrap_err(),
            ConfigError::UnknownFont
        );
        assert_eq!(Charset::from_name("utf8"), Err(ConfigError::UnknownFont));
        assert_eq!(Charset::from_name("latin1"), Ok(Charset::Latin1));
        assert_eq!(Charset::from_name("japanese"), Ok(Charset::Japanese));

        // Size names belong to the mono charsets only
        assert_eq!(
            FontStyle::from_name("10x20", Charset::Japanese).unwrap_err(),
            ConfigError::UnknownFont
        );
        assert_eq!(
            FontStyle::from_name("unifont", Charset::Latin1).unwrap_err(),
            ConfigError::UnknownFont
        );
    }

    #[cfg(feature = "japanese")]
    #[test]
    fn test_japanese_font_measures_full_width_glyphs() {
        let style = FontStyle::from_name("unifont", Charset::Japanese).unwrap();
        assert_eq!(style.line_height(), 16);
        assert_eq!(style.measure(""), 0);

        let one = style.measure("こ");
        assert!(one > 0);
        assert_eq!(style.measure("こんにちは"), 5 * one);
        // Half-width Latin is narrower than kana
        assert!(style.measure("P") < one);
        assert!(style.measure("こんにちは Raspberry Pi") > style.measure("こんにちは"));
    }

    #[cfg(feature = "japanese")]
    #[test]
    fn test_japanese_font_draws_into_any_target() {
        let style = FontStyle::from_name("unifont", Charset::Japanese).unwrap();
        let mut buffer = crate::framebuffer::Framebuffer::new(128, 32);
        style.draw("晴れ", Point::new(4, 8), &mut buffer).unwrap();
        assert!(!buffer.is_blank());
        // Nothing left of the start position
        for y in 0..32 {
            for x in 0..4 {
                assert!(!buffer.pixel(x, y));
            }
        }
    }

    #[test]
    fn test_mono_width_scales_with_chars() {
        let style = FontStyle::from_name("6x10", Charset::Ascii).unwrap();
        assert_eq!(style.measure(""), 0);
        assert_eq!(style.measure("A"), 6);
        assert_eq!(style.measure("Hello"), 30);
    }

    #[test]
    fn test_multibyte_chars_measure_one_cell_each() {
        let style = FontStyle::from_name("6x10", Charset::Latin1).unwrap();
        assert_eq!(style.measure("こんにちは"), 30);
        assert_eq!(style.measure("18°C"), 24);
    }

    #[test]
    fn test_cell_width_counts_chars() {
        let style = CellStyle::default();
        assert_eq!(style.padding, 4);
        assert_eq!(style.measure(""), 0);
        assert_eq!(style.measure("Tokyo"), 5);
        assert_eq!(style.measure("ｺﾝﾆﾁﾊ"), 5);
    }
}
