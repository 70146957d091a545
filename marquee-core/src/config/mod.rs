//! Configuration types and parser
//!
//! The firmware embeds `marquee.toml` and parses it at boot with the
//! subset parser in [`toml`].

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::*;
