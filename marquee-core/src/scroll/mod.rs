//! Scrolling text sessions
//!
//! A session goes through these phases:
//! 1. Measure the text once and plan its path on the surface
//! 2. Per tick: check cancel, draw at the current offset, flush, advance
//! 3. Wait on the pacer between ticks
//! 4. Clear the surface when the session ends, however it ends

pub mod engine;
pub mod session;
pub mod state;

pub use engine::{scroll, ScrollEngine, SessionResult};
pub use session::{RenderableText, ScrollSession, ScrollSettings, Tick};
pub use state::{SessionEvent, SessionState};
