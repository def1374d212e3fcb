//! qfifo-core
//!
//! A thread-safe FIFO queue and a background publisher that drains it into a
//! caller-supplied sink.
//!
//! # Modules
//! - **queue**: mutex-guarded `Queue<T>` with amortized growth
//! - **publisher**: `Publisher<T>`, its builder, the sink seam and the worker loop
//! - **error**: construction errors
//! - **observability**: the shutdown report

pub mod error;
pub mod observability;
pub mod publisher;
pub mod queue;

pub use error::PublisherError;
pub use observability::ShutdownReport;
pub use publisher::{
    PublishContext, PublishFn, PublishPhase, Publisher, PublisherBuilder, PublisherOptions,
    PublisherState,
};
pub use queue::{Queue, QueueOptions};
