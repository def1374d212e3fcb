//! Queue construction options.

use serde::{Deserialize, Serialize};

/// Capacity preallocated when no options are given.
pub const DEFAULT_INITIAL_SIZE: usize = 10;

/// Optional settings used when creating a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueOptions {
    /// Preallocated capacity of the backing storage.
    pub initial_size: usize,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            initial_size: DEFAULT_INITIAL_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_initial_size_is_ten() {
        assert_eq!(QueueOptions::default().initial_size, 10);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let opts: QueueOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, QueueOptions::default());

        let opts: QueueOptions = serde_json::from_str(r#"{"initial_size": 32}"#).unwrap();
        assert_eq!(opts.initial_size, 32);
    }
}
