//! PublisherBuilder: validates settings and starts the worker.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};

use super::options::{DEFAULT_SLEEP_INTERVAL, PublisherOptions};
use super::sink::{PublishContext, PublishFn};
use super::state::PublisherState;
use super::worker::{DeliveryCounts, Worker};
use super::Publisher;
use crate::error::PublisherError;
use crate::queue::{Queue, QueueOptions};

/// Collects publisher settings.
///
/// # Example
/// ```ignore
/// let publisher = Publisher::builder()
///     .sleep_interval(Duration::from_millis(20))
///     .publish_fn(|_ctx, v: u32| println!("got {v}"))
///     .build()
///     .await?;
/// ```
///
/// `build()` fails fast with `PublishFunctionUnset` when no sink was set.
pub struct PublisherBuilder<T> {
    queue: Option<Arc<Queue<T>>>,
    queue_options: QueueOptions,
    sleep_interval: Duration,
    publish_fn: Option<Arc<dyn PublishFn<T>>>,
}

impl<T: Send + 'static> PublisherBuilder<T> {
    pub fn new() -> Self {
        Self {
            queue: None,
            queue_options: QueueOptions::default(),
            sleep_interval: Duration::ZERO,
            publish_fn: None,
        }
    }

    /// Apply loaded options. An explicit `queue()` still wins over
    /// `options.initial_size`.
    pub fn options(mut self, options: PublisherOptions) -> Self {
        self.sleep_interval = options.sleep_interval();
        self.queue_options = options.queue_options();
        self
    }

    /// Use an existing queue instead of creating one.
    pub fn queue(mut self, queue: Arc<Queue<T>>) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Delay between polls. Zero means "unset" and falls back to 100 ms.
    pub fn sleep_interval(mut self, interval: Duration) -> Self {
        self.sleep_interval = interval;
        self
    }

    /// Set the sink from a closure.
    pub fn publish_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(PublishContext, T) + Send + Sync + 'static,
    {
        self.publish_fn = Some(Arc::new(f));
        self
    }

    /// Set the sink from any `PublishFn` implementation.
    pub fn sink<S: PublishFn<T>>(mut self, sink: S) -> Self {
        self.publish_fn = Some(Arc::new(sink));
        self
    }

    /// Start the worker and wait until it has completed one full iteration.
    ///
    /// When this returns `Ok`, the publisher is already polling.
    pub async fn build(self) -> Result<Publisher<T>, PublisherError> {
        let publish_fn = self
            .publish_fn
            .ok_or(PublisherError::PublishFunctionUnset)?;

        let queue = self
            .queue
            .unwrap_or_else(|| Arc::new(Queue::with_options(self.queue_options)));

        let sleep_interval = if self.sleep_interval.is_zero() {
            DEFAULT_SLEEP_INTERVAL
        } else {
            self.sleep_interval
        };

        let (stop_tx, stop_rx) = watch::channel(false);
        let (state_tx, state_rx) = watch::channel(PublisherState::Constructing);
        let (started_tx, started_rx) = oneshot::channel();
        let counts = Arc::new(DeliveryCounts::default());

        let worker = Worker {
            queue: Arc::clone(&queue),
            publish_fn,
            sleep_interval,
            counts: Arc::clone(&counts),
            stop_rx,
            state_tx,
            started_tx,
        };
        let join = tokio::spawn(worker.run());

        if started_rx.await.is_err() {
            // The sender only drops unsignalled if the first delivery panicked.
            tracing::error!("publisher worker exited before its first iteration completed");
            return Err(PublisherError::WorkerExited);
        }

        Ok(Publisher {
            queue,
            sleep_interval,
            counts,
            stop_tx,
            state_rx,
            worker: join,
        })
    }
}

impl<T: Send + 'static> Default for PublisherBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
