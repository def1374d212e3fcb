//! Shutdown reporting.

use serde::{Deserialize, Serialize};

/// Summary returned by `Publisher::close`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShutdownReport {
    /// Deliveries made by the polling loop.
    pub polled: u64,
    /// Deliveries made by the final drain after the stop request.
    pub drained: u64,
    /// False when the worker panicked instead of returning.
    pub clean: bool,
    /// Elements still queued when `close` returned. Non-zero after a sink
    /// panic, or when producers pushed after the final drain.
    pub remaining: u64,
    pub elapsed_ms: u64,
}

impl ShutdownReport {
    pub fn delivered(&self) -> u64 {
        self.polled + self.drained
    }
}
