//! Cancellation tokens
//!
//! The engine polls its token at the top of every tick. Raising the token
//! is the cooperative equivalent of a user abort.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

/// Source of an external interrupt request
pub trait CancelToken {
    /// Whether the running session should stop
    fn is_cancelled(&self) -> bool;
}

impl CancelToken for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

/// A signalled `Signal` cancels; the value stays until someone takes it
impl<M: RawMutex> CancelToken for Signal<M, ()> {
    fn is_cancelled(&self) -> bool {
        self.signaled()
    }
}

impl<T: CancelToken + ?Sized> CancelToken for &T {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Token that never cancels
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelToken for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}
