//! Build script for marquee-display-fw
//!
//! - Passes the cortex-m-rt and defmt linker scripts
//! - Validates marquee.toml at compile time

use std::fs;
use std::path::Path;

/// Mono fonts built into the firmware, by size name
const FONTS: &[&str] = &[
    "4x6", "5x7", "5x8", "6x9", "6x10", "6x12", "6x13", "7x13", "7x14", "8x13", "9x15", "9x18",
    "10x20",
];

/// Fonts for `charset = "japanese"` (built with the `japanese` feature)
const JAPANESE_FONTS: &[&str] = &["unifont"];

fn main() {
    setup_linker();
    validate_config();
}

fn setup_linker() {
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate marquee.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=marquee.toml");

    let config_path = Path::new("marquee.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: marquee.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a marquee.toml configuration file.          ║\n\
            ║  Please create one in the marquee-display-fw directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read marquee.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in marquee.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();
    validate_display(&config, &mut errors);
    validate_scroll(&config, &mut errors);
    validate_message(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid marquee.toml                                     ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=marquee.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn int_in_range(table: &toml::Table, key: &str, min: i64, max: i64, errors: &mut Vec<String>) {
    match table.get(key) {
        None => {}
        Some(toml::Value::Integer(n)) if (min..=max).contains(n) => {}
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("'{}' must be {}-{}", key, min, max));
        }
        Some(_) => errors.push(format!("'{}' must be an integer", key)),
    }
}

fn string_one_of(table: &toml::Table, key: &str, allowed: &[&str], errors: &mut Vec<String>) {
    match table.get(key) {
        None => {}
        Some(toml::Value::String(s)) if allowed.contains(&s.as_str()) => {}
        Some(_) => errors.push(format!("'{}' must be one of {}", key, allowed.join(", "))),
    }
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    let display = match config.get("display") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[display] must be a table".to_string());
            return;
        }
        None => return,
    };

    string_one_of(display, "kind", &["oled", "lcd"], errors);
    string_one_of(display, "controller", &["ssd1306", "sh1106"], errors);
    string_one_of(display, "charset", &["ascii", "latin1", "japanese"], errors);
    match display.get("charset") {
        Some(toml::Value::String(c)) if c == "japanese" => {
            if std::env::var_os("CARGO_FEATURE_JAPANESE").is_none() {
                errors.push("charset 'japanese' needs the 'japanese' feature".to_string());
            }
            // No mono default applies; the font must be named
            if display.get("font").is_none() {
                errors.push(format!("'font' must be one of {}", JAPANESE_FONTS.join(", ")));
            }
            string_one_of(display, "font", JAPANESE_FONTS, errors);
        }
        _ => string_one_of(display, "font", FONTS, errors),
    }

    int_in_range(display, "width", 1, 128, errors);
    int_in_range(display, "columns", 1, 40, errors);
    int_in_range(display, "rows", 1, 4, errors);
    int_in_range(display, "bus", 0, 255, errors);
    int_in_range(display, "address", 0x08, 0x77, errors);
    int_in_range(display, "padding", 0, 255, errors);

    match display.get("height") {
        Some(toml::Value::Integer(h)) if !(8..=64).contains(h) || h % 8 != 0 => {
            errors.push("'height' must be a multiple of 8 up to 64".to_string());
        }
        _ => int_in_range(display, "height", 8, 64, errors),
    }

    if let (Some(toml::Value::Integer(c)), Some(toml::Value::Integer(r))) =
        (display.get("columns"), display.get("rows"))
    {
        if c * r > 80 {
            errors.push("'columns' x 'rows' must not exceed 80 cells".to_string());
        }
    }
}

fn validate_scroll(config: &toml::Value, errors: &mut Vec<String>) {
    let scroll = match config.get("scroll") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[scroll] must be a table".to_string());
            return;
        }
        None => return,
    };

    int_in_range(scroll, "speed", 1, i64::from(u32::MAX), errors);
    int_in_range(scroll, "frame_delay_ms", 0, i64::from(u32::MAX), errors);
    int_in_range(scroll, "loops", 0, i64::from(u32::MAX), errors);
    int_in_range(scroll, "y", i64::from(i32::MIN), i64::from(i32::MAX), errors);
}

fn validate_message(config: &toml::Value, errors: &mut Vec<String>) {
    match config.get("message").and_then(|m| m.get("text")) {
        Some(toml::Value::String(text)) if text.len() > 256 => {
            errors.push("[message] text must be at most 256 bytes".to_string());
        }
        Some(toml::Value::String(text)) if text.contains(['\\', '\n']) => {
            errors.push("[message] text must be a single line without escapes".to_string());
        }
        Some(toml::Value::String(_)) => {}
        Some(_) => errors.push("[message] text must be a string".to_string()),
        None => errors.push("Missing [message] text".to_string()),
    }
}
