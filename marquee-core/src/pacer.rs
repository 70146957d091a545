//! Frame pacing
//!
//! The pacer holds the engine for a fixed interval after every tick. It is
//! the only place a scroll session suspends; there is no drift compensation,
//! so render time adds to the interval.

use core::time::Duration;

use embedded_hal_async::delay::DelayNs;

/// Inter-frame delay
#[allow(async_fn_in_trait)]
pub trait FramePacer {
    /// Suspend for `delay` before the next tick
    async fn wait(&mut self, delay: Duration);
}

impl<P: FramePacer> FramePacer for &mut P {
    async fn wait(&mut self, delay: Duration) {
        (**self).wait(delay).await
    }
}

/// Pacer over any async delay provider
pub struct DelayPacer<D> {
    delay: D,
}

impl<D: DelayNs> DelayPacer<D> {
    pub fn new(delay: D) -> Self {
        Self { delay }
    }

    /// Give the delay provider back
    pub fn into_inner(self) -> D {
        self.delay
    }
}

impl<D: DelayNs> FramePacer for DelayPacer<D> {
    async fn wait(&mut self, delay: Duration) {
        // Whole milliseconds first, in chunks the delay API can take
        let mut ms = delay.as_millis();
        while ms > 0 {
            let chunk = u32::try_from(ms).unwrap_or(u32::MAX);
            self.delay.delay_ms(chunk).await;
            ms -= u128::from(chunk);
        }

        let rest_ns = delay.subsec_nanos() % 1_000_000;
        if rest_ns > 0 {
            self.delay.delay_ns(rest_ns).await;
        }
    }
}
