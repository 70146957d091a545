//! Scroll session state
//!
//! One session scrolls one string across one surface. The text is measured
//! once when the session starts; every tick after that is integer
//! arithmetic on the offset.

use core::num::NonZeroU32;
use core::time::Duration;

use marquee_display::{DisplaySurface, Position, ScrollPath, TextMetrics};

use super::state::{SessionEvent, SessionState};

const fn non_zero(n: u32) -> NonZeroU32 {
    match NonZeroU32::new(n) {
        Some(n) => n,
        None => panic!("speed must be non-zero"),
    }
}

/// Caller-chosen scroll parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollSettings {
    /// Pixels (bitmap) or columns (character) per frame
    pub speed: NonZeroU32,
    /// Pause after each frame
    pub frame_delay: Duration,
    /// Number of loops to run; `None` runs until cancelled
    pub loops: Option<u32>,
    /// Fixed position across the scroll axis (pixel row or text row)
    pub vertical_position: i32,
}

impl ScrollSettings {
    /// OLED defaults: 2px per 50ms frame, text top at y=24
    pub const OLED: Self = Self {
        speed: non_zero(2),
        frame_delay: Duration::from_millis(50),
        loops: None,
        vertical_position: 24,
    };

    /// LCD defaults: one column per 300ms frame on the first row
    pub const LCD: Self = Self {
        speed: non_zero(1),
        frame_delay: Duration::from_millis(300),
        loops: None,
        vertical_position: 0,
    };

    pub const fn new(speed: NonZeroU32, frame_delay: Duration) -> Self {
        Self {
            speed,
            frame_delay,
            loops: None,
            vertical_position: 0,
        }
    }

    /// Stop after `loops` full traversals
    pub const fn with_loops(mut self, loops: u32) -> Self {
        self.loops = Some(loops);
        self
    }

    /// Run until cancelled
    pub const fn forever(mut self) -> Self {
        self.loops = None;
        self
    }

    pub const fn at(mut self, vertical_position: i32) -> Self {
        self.vertical_position = vertical_position;
        self
    }
}

/// Text with its width measured for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderableText<'a> {
    text: &'a str,
    width: u32,
}

impl<'a> RenderableText<'a> {
    /// Measure `text` with `metrics`
    pub fn measure<M: TextMetrics + ?Sized>(text: &'a str, metrics: &M) -> Self {
        Self {
            text,
            width: metrics.measure(text),
        }
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }

    pub fn width(&self) -> u32 {
        self.width
    }
}

/// Result of advancing one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tick {
    /// Offset moved, text still on its path
    Moved,
    /// Text left the path; offset reset and a loop counted
    LoopCompleted,
    /// Loop counted and the target is reached
    Finished,
}

/// State of one scroll
#[derive(Debug, Clone)]
pub struct ScrollSession<'a> {
    text: RenderableText<'a>,
    path: ScrollPath,
    offset: i32,
    loops_completed: u32,
    loops_target: Option<u32>,
    speed: i32,
    frame_delay: Duration,
    vertical_position: i32,
    state: SessionState,
}

impl<'a> ScrollSession<'a> {
    /// Measure the text and plan the path on `surface`
    pub fn start<S: DisplaySurface + ?Sized>(
        surface: &S,
        text: &'a str,
        settings: &ScrollSettings,
    ) -> Self {
        let text = RenderableText::measure(text, surface.style());
        let path = surface.scroll_path(text.width());

        Self {
            text,
            path,
            offset: path.start,
            loops_completed: 0,
            loops_target: settings.loops,
            speed: i32::try_from(settings.speed.get()).unwrap_or(i32::MAX),
            frame_delay: settings.frame_delay,
            vertical_position: settings.vertical_position,
            state: SessionState::Starting,
        }
    }

    /// Whether the loop target is already met
    pub fn target_reached(&self) -> bool {
        self.loops_target
            .is_some_and(|target| self.loops_completed >= target)
    }

    /// Where the next frame draws the text
    pub fn position(&self) -> Position {
        Position::new(self.offset, self.vertical_position)
    }

    /// Move one step along the path
    ///
    /// Called after the frame at the current offset has been flushed, so
    /// the frame that completes a loop is always shown.
    pub fn advance(&mut self) -> Tick {
        self.offset = self.offset.saturating_sub(self.speed);
        if !self.path.is_exhausted(self.offset) {
            return Tick::Moved;
        }

        self.offset = self.path.start;
        self.loops_completed = self.loops_completed.saturating_add(1);

        if self.target_reached() {
            Tick::Finished
        } else {
            Tick::LoopCompleted
        }
    }

    /// Feed a lifecycle event to the state machine
    pub fn handle(&mut self, event: SessionEvent) -> SessionState {
        self.state = self.state.transition(event);
        self.state
    }

    pub fn text(&self) -> &RenderableText<'a> {
        &self.text
    }

    pub fn path(&self) -> ScrollPath {
        self.path
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn loops_completed(&self) -> u32 {
        self.loops_completed
    }

    pub fn loops_target(&self) -> Option<u32> {
        self.loops_target
    }

    pub fn frame_delay(&self) -> Duration {
        self.frame_delay
    }

    pub fn state(&self) -> SessionState {
        self.state
    }
}
