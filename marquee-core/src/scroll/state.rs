//! Session state machine
//!
//! A scroll session's lifecycle is explicit, finite, and deterministic.
//! The engine feeds events in; the state decides what they mean.

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// Text measured, path planned, nothing drawn yet
    Starting,
    /// Producing one frame per tick
    Running,
    /// Loop target reached
    Completed,
    /// Stopped by an external interrupt
    Cancelled,
    /// Aborted by a transport error
    Failed,
}

/// Events driving the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionEvent {
    /// First tick is about to run
    Begin,
    /// Loop target reached after the triggering frame was shown
    TargetReached,
    /// Cancel token raised
    CancelRequested,
    /// Flush or final clear failed
    TransportFailed,
}

impl SessionState {
    /// Check if the session has ended
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::Cancelled | SessionState::Failed
        )
    }

    /// Process an event and return the next state
    pub fn transition(self, event: SessionEvent) -> Self {
        use SessionEvent::*;
        use SessionState::*;

        match (self, event) {
            // A zero loop target completes without drawing
            (Starting, Begin) => Running,
            (Starting, TargetReached) => Completed,
            (Starting, CancelRequested) => Cancelled,
            (Starting, TransportFailed) => Failed,

            (Running, TargetReached) => Completed,
            (Running, CancelRequested) => Cancelled,
            (Running, TransportFailed) => Failed,

            // The clear that releases a completed session can still fail
            (Completed, TransportFailed) => Failed,

            // Default: stay in current state
            _ => self,
        }
    }
}
