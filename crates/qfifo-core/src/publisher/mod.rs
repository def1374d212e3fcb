//! Publisher: a queue that drains itself into a sink on a background task.
//!
//! # Lifecycle
//! 1. `Publisher::builder()...build().await` spawns one worker task and
//!    returns only after the worker has completed its first iteration.
//! 2. The worker pops at most one element per poll interval and delivers it
//!    to the sink while holding the queue lock.
//! 3. `close().await` requests a stop, waits for the worker to drain every
//!    remaining element, and returns a `ShutdownReport`.
//!
//! A publisher is never restarted. `close` takes `self`, so it runs at most
//! once per publisher.

mod builder;
mod options;
mod sink;
mod state;
mod worker;

pub use builder::PublisherBuilder;
pub use options::{DEFAULT_SLEEP_INTERVAL, PublisherOptions};
pub use sink::{PublishContext, PublishFn, PublishPhase};
pub use state::PublisherState;

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::observability::ShutdownReport;
use crate::queue::Queue;
use worker::DeliveryCounts;

/// A `Queue` with a self-publishing worker.
///
/// Dropping a publisher without calling `close` stops the worker at its next
/// iteration, but nothing waits for the final drain.
pub struct Publisher<T> {
    queue: Arc<Queue<T>>,
    sleep_interval: Duration,
    stop_tx: watch::Sender<bool>,
    counts: Arc<DeliveryCounts>,
    state_rx: watch::Receiver<PublisherState>,
    worker: JoinHandle<()>,
}

impl<T: Send + 'static> Publisher<T> {
    pub fn builder() -> PublisherBuilder<T> {
        PublisherBuilder::new()
    }

    /// Add `value` to the end of the queue.
    pub fn push(&self, value: T) {
        self.queue.push(value);
    }

    /// Remove the oldest element ahead of the worker, or `None` when empty.
    pub fn pop(&self) -> Option<T> {
        self.queue.pop()
    }

    pub fn clear(&self) {
        self.queue.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// The queue being drained (injected or created by the builder).
    pub fn queue(&self) -> &Arc<Queue<T>> {
        &self.queue
    }

    pub fn sleep_interval(&self) -> Duration {
        self.sleep_interval
    }

    pub fn state(&self) -> PublisherState {
        *self.state_rx.borrow()
    }

    /// Watch lifecycle transitions. The receiver outlives the publisher and
    /// ends on `Stopped`, or on `Failed` if the sink panicked.
    pub fn subscribe_state(&self) -> watch::Receiver<PublisherState> {
        self.state_rx.clone()
    }

    /// Stop publishing and wait until every remaining element was delivered.
    ///
    /// Never fails. If the sink panicked, the worker is gone; that is logged
    /// and reported as `clean: false`, with the undelivered elements counted
    /// in `remaining`. Deliveries made before the panic are still counted.
    pub async fn close(self) -> ShutdownReport {
        let started = Instant::now();
        self.stop_tx.send_replace(true);

        let clean = match self.worker.await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(error = %err, "publisher worker did not exit cleanly");
                false
            }
        };

        let report = ShutdownReport {
            polled: self.counts.polled(),
            drained: self.counts.drained(),
            clean,
            remaining: self.queue.len() as u64,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        if report.remaining > 0 {
            tracing::warn!(remaining = report.remaining, "elements left undelivered");
        }
        tracing::info!(
            polled = report.polled,
            drained = report.drained,
            clean = report.clean,
            remaining = report.remaining,
            elapsed_ms = report.elapsed_ms,
            "publisher closed"
        );
        report
    }
}
