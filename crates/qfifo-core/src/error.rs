//! Errors raised while building a publisher.

use thiserror::Error;

/// Errors returned by `PublisherBuilder::build`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublisherError {
    /// No sink callback was supplied.
    #[error("publish function is mandatory")]
    PublishFunctionUnset,
    /// The worker ended before signalling readiness.
    #[error("publisher worker exited before signalling readiness")]
    WorkerExited,
}
