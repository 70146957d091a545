//! Scroll engine
//!
//! Runs one session to its end on a borrowed surface. Each tick clears the
//! buffer, draws, flushes, advances, and then waits on the pacer. The
//! surface is cleared on every exit path.

use marquee_display::{DisplaySurface, TransportError};

use super::session::{ScrollSession, ScrollSettings, Tick};
use super::state::SessionEvent;
use crate::cancel::CancelToken;
use crate::pacer::FramePacer;

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionResult {
    /// Loop target reached and the surface was cleared
    Completed { loops_run: u32 },
    /// Stopped by the cancel token; `clear_error` is set if the cleanup
    /// clear failed
    Cancelled { clear_error: Option<TransportError> },
    /// A flush failed; `clear_error` is set if the cleanup clear failed too
    Failed {
        reason: TransportError,
        clear_error: Option<TransportError>,
    },
}

impl SessionResult {
    pub fn is_completed(&self) -> bool {
        matches!(self, SessionResult::Completed { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SessionResult::Cancelled { .. })
    }

    /// The transport error that ended the session, if any
    pub fn failure(&self) -> Option<TransportError> {
        match self {
            SessionResult::Failed { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

/// Scroll engine
///
/// Owns the pacer and the cancel token; borrows a surface per session.
pub struct ScrollEngine<P, C> {
    pacer: P,
    cancel: C,
}

impl<P: FramePacer, C: CancelToken> ScrollEngine<P, C> {
    pub fn new(pacer: P, cancel: C) -> Self {
        Self { pacer, cancel }
    }

    /// Scroll `text` across `surface` until the loop target, a cancel, or a
    /// transport error
    pub async fn scroll<S: DisplaySurface>(
        &mut self,
        surface: &mut S,
        text: &str,
        settings: &ScrollSettings,
    ) -> SessionResult {
        let mut session = ScrollSession::start(&*surface, text, settings);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "scroll: width={} path={}..{} loops={}",
            session.text().width(),
            session.path().start,
            session.path().last,
            session.loops_target()
        );

        if session.target_reached() {
            session.handle(SessionEvent::TargetReached);
            return Self::release(surface, &mut session).await;
        }
        session.handle(SessionEvent::Begin);

        loop {
            if self.cancel.is_cancelled() {
                session.handle(SessionEvent::CancelRequested);
                let clear_error = surface.clear().await.err();

                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "scroll: cancelled after {} loops",
                    session.loops_completed()
                );

                return SessionResult::Cancelled { clear_error };
            }

            surface.clear_buffer();
            surface.draw_text(session.position(), text);

            if let Err(reason) = surface.flush().await {
                session.handle(SessionEvent::TransportFailed);
                let clear_error = surface.clear().await.err();

                #[cfg(feature = "defmt")]
                defmt::warn!("scroll: flush failed: {}", reason);

                return SessionResult::Failed {
                    reason,
                    clear_error,
                };
            }

            if session.advance() == Tick::Finished {
                session.handle(SessionEvent::TargetReached);
                return Self::release(surface, &mut session).await;
            }

            self.pacer.wait(session.frame_delay()).await;
        }
    }

    /// Clear the surface after the loop target was reached
    async fn release<S: DisplaySurface>(
        surface: &mut S,
        session: &mut ScrollSession<'_>,
    ) -> SessionResult {
        match surface.clear().await {
            Ok(()) => SessionResult::Completed {
                loops_run: session.loops_completed(),
            },
            Err(reason) => {
                session.handle(SessionEvent::TransportFailed);
                SessionResult::Failed {
                    reason,
                    clear_error: None,
                }
            }
        }
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    pub fn cancel_token(&self) -> &C {
        &self.cancel
    }

    pub fn into_parts(self) -> (P, C) {
        (self.pacer, self.cancel)
    }
}

/// Run one session with a borrowed pacer and cancel token
pub async fn scroll<S, P, C>(
    surface: &mut S,
    text: &str,
    settings: &ScrollSettings,
    pacer: &mut P,
    cancel: &C,
) -> SessionResult
where
    S: DisplaySurface,
    P: FramePacer,
    C: CancelToken,
{
    ScrollEngine::new(pacer, cancel)
        .scroll(surface, text, settings)
        .await
}
