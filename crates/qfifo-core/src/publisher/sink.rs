//! Sink seam: the function that receives published elements.

use std::time::Duration;

/// Which part of the worker's life a delivery comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublishPhase {
    /// Regular poll of the queue.
    Polling,
    /// Final drain after `close()` was requested.
    ShutdownDrain,
}

/// Publisher-side information handed to the sink with every element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishContext {
    pub(crate) sleep_interval: Duration,
    pub(crate) sequence: u64,
    pub(crate) phase: PublishPhase,
}

impl PublishContext {
    pub fn sleep_interval(&self) -> Duration {
        self.sleep_interval
    }

    /// 1-based count of deliveries made by this publisher, this one included.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn phase(&self) -> PublishPhase {
        self.phase
    }
}

/// Receives elements popped by the publisher, one at a time.
///
/// `publish` runs while the queue lock is held. It must not call back into
/// the same queue (directly or through the publisher) or it deadlocks, and it
/// should return quickly since producers wait on that lock.
pub trait PublishFn<T>: Send + Sync + 'static {
    fn publish(&self, ctx: PublishContext, value: T);
}

impl<T, F> PublishFn<T> for F
where
    F: Fn(PublishContext, T) + Send + Sync + 'static,
{
    fn publish(&self, ctx: PublishContext, value: T) {
        self(ctx, value)
    }
}
