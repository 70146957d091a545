//! Board-agnostic scroll logic for Marquee
//!
//! This crate contains everything between "here is a string" and
//! "bytes on the bus" that does not depend on a specific display:
//!
//! - Scroll engine and session state machine
//! - Frame pacing (the only suspension point)
//! - Cancellation tokens
//! - Configuration types and parser
//!
//! Display surfaces live in `marquee-display`; the engine only sees the
//! `DisplaySurface` trait.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod cancel;
pub mod config;
pub mod pacer;
pub mod scroll;

pub use cancel::{CancelToken, NeverCancel};
pub use config::{parse_config, MarqueeConfig, ParseError};
pub use marquee_display::{clear, DisplaySurface, TransportError};
pub use pacer::{DelayPacer, FramePacer};
pub use scroll::{scroll, ScrollEngine, ScrollSession, ScrollSettings, SessionResult, SessionState};
