//! Worker loop: polls the queue and hands each element to the sink.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{oneshot, watch};

use super::sink::{PublishContext, PublishFn, PublishPhase};
use super::state::PublisherState;
use crate::queue::Queue;

/// Delivery counts shared between the worker and its publisher.
///
/// Lives outside the task so the counts survive a panicking sink.
#[derive(Debug, Default)]
pub(crate) struct DeliveryCounts {
    polled: AtomicU64,
    drained: AtomicU64,
}

impl DeliveryCounts {
    pub(crate) fn polled(&self) -> u64 {
        self.polled.load(Ordering::Acquire)
    }

    pub(crate) fn drained(&self) -> u64 {
        self.drained.load(Ordering::Acquire)
    }

    fn record(&self, phase: PublishPhase) {
        let counter = match phase {
            PublishPhase::Polling => &self.polled,
            PublishPhase::ShutdownDrain => &self.drained,
        };
        counter.fetch_add(1, Ordering::AcqRel);
    }
}

/// Publishes `Failed` when dropped before `finish`.
///
/// A panicking sink aborts the task mid-poll; tokio then drops the future,
/// which drops this guard.
struct StateGuard<'a> {
    state_tx: &'a watch::Sender<PublisherState>,
    finished: bool,
}

impl StateGuard<'_> {
    fn finish(mut self) {
        self.finished = true;
        self.state_tx.send_replace(PublisherState::Stopped);
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.state_tx.send_replace(PublisherState::Failed);
        }
    }
}

/// Everything the background task owns.
pub(crate) struct Worker<T> {
    pub queue: Arc<Queue<T>>,
    pub publish_fn: Arc<dyn PublishFn<T>>,
    pub sleep_interval: Duration,
    pub counts: Arc<DeliveryCounts>,
    pub stop_rx: watch::Receiver<bool>,
    pub state_tx: watch::Sender<PublisherState>,
    pub started_tx: oneshot::Sender<()>,
}

impl<T: Send + 'static> Worker<T> {
    /// Run until a stop is requested, then drain what is left.
    ///
    /// Each iteration:
    /// 1. lock the queue, pop one element and deliver it under the lock
    /// 2. release the lock and check for a stop request
    /// 3. on the first iteration only, signal readiness
    /// 4. sleep for the poll interval
    ///
    /// The stop request is only observed between iterations, so `close()` can
    /// wait up to one interval plus the running delivery.
    pub(crate) async fn run(self) {
        let Worker {
            queue,
            publish_fn,
            sleep_interval,
            counts,
            stop_rx,
            state_tx,
            started_tx,
        } = self;

        let guard = StateGuard {
            state_tx: &state_tx,
            finished: false,
        };
        let mut started_tx = Some(started_tx);
        let mut sequence = 0u64;
        let mut deliver = |phase: PublishPhase, value: T| {
            sequence += 1;
            tracing::trace!(sequence, ?phase, "delivering element");
            publish_fn.publish(
                PublishContext {
                    sleep_interval,
                    sequence,
                    phase,
                },
                value,
            );
            counts.record(phase);
        };

        tracing::debug!(
            sleep_interval_ms = sleep_interval.as_millis() as u64,
            "publisher worker started"
        );

        loop {
            {
                let mut elements = queue.lock();
                if let Some(value) = elements.pop_front() {
                    deliver(PublishPhase::Polling, value);
                }
            }

            if stop_requested(&stop_rx) {
                break;
            }

            if let Some(tx) = started_tx.take() {
                state_tx.send_replace(PublisherState::Running);
                // the builder may have given up waiting; nothing to do then
                let _ = tx.send(());
            }

            tokio::time::sleep(sleep_interval).await;
        }

        state_tx.send_replace(PublisherState::Stopping);

        // Held for the whole pass: producers racing with close() either land
        // before the drain and get delivered, or after it and stay queued.
        {
            let mut elements = queue.lock();
            while let Some(value) = elements.pop_front() {
                deliver(PublishPhase::ShutdownDrain, value);
            }
        }

        guard.finish();
        tracing::debug!(
            polled = counts.polled(),
            drained = counts.drained(),
            "publisher worker stopped"
        );
    }
}

/// A dropped sender counts as a stop request, so a publisher that is dropped
/// without `close()` does not leave its worker polling forever.
fn stop_requested(stop_rx: &watch::Receiver<bool>) -> bool {
    *stop_rx.borrow() || stop_rx.has_changed().is_err()
}
