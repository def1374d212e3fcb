//! Loadable publisher settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::queue::{DEFAULT_INITIAL_SIZE, QueueOptions};

/// Poll period used when none (or zero) is configured.
pub const DEFAULT_SLEEP_INTERVAL: Duration = Duration::from_millis(100);

/// Publisher settings in a form that can be read from JSON.
///
/// ```json
/// { "sleep_interval_ms": 50, "initial_size": 64 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherOptions {
    /// Poll period in milliseconds. `0` falls back to 100.
    pub sleep_interval_ms: u64,

    /// Initial capacity of the queue the publisher creates. Ignored when a
    /// queue is injected.
    pub initial_size: usize,
}

impl PublisherOptions {
    pub fn sleep_interval(&self) -> Duration {
        Duration::from_millis(self.sleep_interval_ms)
    }

    pub fn queue_options(&self) -> QueueOptions {
        QueueOptions {
            initial_size: self.initial_size,
        }
    }
}

impl Default for PublisherOptions {
    fn default() -> Self {
        Self {
            sleep_interval_ms: DEFAULT_SLEEP_INTERVAL.as_millis() as u64,
            initial_size: DEFAULT_INITIAL_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_publisher_defaults() {
        let opts = PublisherOptions::default();
        assert_eq!(opts.sleep_interval(), Duration::from_millis(100));
        assert_eq!(opts.queue_options(), QueueOptions::default());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let opts: PublisherOptions = serde_json::from_str(r#"{"sleep_interval_ms": 5}"#).unwrap();
        assert_eq!(opts.sleep_interval(), Duration::from_millis(5));
        assert_eq!(opts.initial_size, DEFAULT_INITIAL_SIZE);
    }
}
