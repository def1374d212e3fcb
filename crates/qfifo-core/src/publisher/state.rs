//! Publisher lifecycle.

use serde::{Deserialize, Serialize};

/// Publisher lifecycle state.
///
/// Transitions only move forward:
/// - Constructing -> Running (worker finished its first iteration)
/// - Running -> Stopping (stop requested by `close()` or by dropping the publisher)
/// - Stopping -> Stopped (final drain done, worker about to exit)
/// - any -> Failed (the sink panicked and the worker is gone; nothing left in
///   the queue is delivered)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublisherState {
    Constructing,
    Running,
    Stopping,
    Stopped,
    Failed,
}

impl PublisherState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PublisherState::Stopped | PublisherState::Failed)
    }

    /// Is the worker still polling the queue?
    pub fn is_running(self) -> bool {
        matches!(self, PublisherState::Running)
    }
}
