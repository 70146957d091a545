//! Frame pacer that wakes early on a button press

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};

use marquee_core::FramePacer;

/// Sleeps between frames, cut short when `cancel` is raised
///
/// Waiting on the signal consumes it, so it is raised again before
/// returning: the engine's next cancel check must still see it.
pub struct SignalPacer<'a, M: RawMutex> {
    cancel: &'a Signal<M, ()>,
}

impl<'a, M: RawMutex> SignalPacer<'a, M> {
    pub fn new(cancel: &'a Signal<M, ()>) -> Self {
        Self { cancel }
    }
}

impl<M: RawMutex> FramePacer for SignalPacer<'_, M> {
    async fn wait(&mut self, delay: core::time::Duration) {
        let us = u64::try_from(delay.as_micros()).unwrap_or(u64::MAX);

        match select(Timer::after(Duration::from_micros(us)), self.cancel.wait()).await {
            Either::First(()) => {}
            Either::Second(()) => self.cancel.signal(()),
        }
    }
}
