//! Minimal TOML parser for `marquee.toml`
//!
//! Handles only the subset Marquee needs. It does NOT support the full
//! TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer)
//! - Hex integers (`0x3C`) for addresses
//! - `[display]`, `[scroll]` and `[message]` section headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Escape sequences inside strings
//! - Multi-line strings
//! - Arrays and inline tables

use heapless::String;

use marquee_display::{Charset, Controller};

use super::types::{DisplayKind, MarqueeConfig};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// String does not fit its buffer
    TooLong,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Scroll,
    Message,
}

/// Parse TOML text into a `MarqueeConfig`
///
/// Keys that are not recognised are ignored.
pub fn parse_config(input: &str) -> Result<MarqueeConfig, ParseError> {
    let mut config = MarqueeConfig::new();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line)?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    Ok(config)
}

/// Parse a header line like `[display]`, allowing a trailing comment
fn parse_section_header(line: &str) -> Result<Section, ParseError> {
    let end = line.find(']').ok_or(ParseError::InvalidSection)?;
    let rest = line[end + 1..].trim();
    if !rest.is_empty() && !rest.starts_with('#') {
        return Err(ParseError::InvalidSection);
    }

    match line[1..end].trim() {
        "display" => Ok(Section::Display),
        "scroll" => Ok(Section::Scroll),
        "message" => Ok(Section::Message),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Split `key = value`, dropping an inline comment outside quotes
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    let mut in_string = false;
    let mut end = value.len();
    for (i, c) in value.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => {
                end = i;
                break;
            }
            _ => {}
        }
    }
    let value = value[..end].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a quoted string value
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else {
        Err(ParseError::InvalidValue)
    }
}

fn parse_heapless<const N: usize>(value: &str) -> Result<String<N>, ParseError> {
    let value = parse_string(value)?;
    String::try_from(value).map_err(|_| ParseError::TooLong)
}

/// Parse a decimal or `0x` hex integer, with optional `_` separators
fn parse_int<T: TryFrom<i64>>(value: &str) -> Result<T, ParseError> {
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let (radix, digits) = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => (16, hex),
        None => (10, digits),
    };
    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') {
        return Err(ParseError::InvalidValue);
    }

    let mut n: i64 = 0;
    for c in digits.chars().filter(|&c| c != '_') {
        let digit = c.to_digit(radix).ok_or(ParseError::InvalidValue)?;
        n = n
            .checked_mul(i64::from(radix))
            .and_then(|n| n.checked_add(i64::from(digit)))
            .ok_or(ParseError::InvalidValue)?;
    }
    if negative {
        n = -n;
    }

    T::try_from(n).map_err(|_| ParseError::InvalidValue)
}

fn parse_kind(value: &str) -> Result<DisplayKind, ParseError> {
    match parse_string(value)? {
        "oled" => Ok(DisplayKind::Oled),
        "lcd" => Ok(DisplayKind::Lcd),
        _ => Err(ParseError::InvalidValue),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut MarqueeConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Display => {
            let d = &mut config.display;
            match key {
                "kind" => d.kind = parse_kind(value)?,
                "controller" => {
                    d.controller = Controller::from_name(parse_string(value)?)
                        .map_err(|_| ParseError::InvalidValue)?
                }
                "width" => d.width = parse_int(value)?,
                "height" => d.height = parse_int(value)?,
                "columns" | "cols" => d.columns = parse_int(value)?,
                "rows" => d.rows = parse_int(value)?,
                "bus" => d.bus = parse_int(value)?,
                "address" => d.address = Some(parse_int(value)?),
                "font" => d.font = parse_heapless(value)?,
                "charset" => {
                    d.charset = Charset::from_name(parse_string(value)?)
                        .map_err(|_| ParseError::InvalidValue)?
                }
                "padding" => d.padding = parse_int(value)?,
                _ => {} // Ignore unknown keys
            }
        }
        Section::Scroll => {
            let s = &mut config.scroll;
            match key {
                "speed" => s.speed = Some(parse_int(value)?),
                "frame_delay_ms" | "delay_ms" => s.frame_delay_ms = Some(parse_int(value)?),
                "loops" => s.loops = Some(parse_int(value)?),
                "y" => s.y = Some(parse_int(value)?),
                _ => {}
            }
        }
        Section::Message => {
            if key == "text" {
                config.message = parse_heapless(value)?;
            }
        }
        Section::Root => {
            // No root-level keys
        }
    }

    Ok(())
}
