//! Queue module: mutex-guarded FIFO storage and its options.

mod options;

pub use options::{DEFAULT_INITIAL_SIZE, QueueOptions};

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A thread-safe FIFO queue.
///
/// Every read and write of the backing storage happens under one mutex.
/// `push` never blocks on size and `pop` never waits for an element: an empty
/// queue yields `None`.
///
/// Storage grows by amortized doubling; `QueueOptions::initial_size`
/// preallocates capacity. There is no upper bound.
#[derive(Debug)]
pub struct Queue<T> {
    elements: Mutex<VecDeque<T>>,
}

impl<T> Queue<T> {
    /// Create a queue with default options (capacity 10).
    pub fn new() -> Self {
        Self::with_options(QueueOptions::default())
    }

    pub fn with_options(options: QueueOptions) -> Self {
        Self {
            elements: Mutex::new(VecDeque::with_capacity(options.initial_size)),
        }
    }

    /// Append `value` to the tail.
    pub fn push(&self, value: T) {
        self.lock().push_back(value);
    }

    /// Remove and return the head, or `None` when empty.
    pub fn pop(&self) -> Option<T> {
        self.lock().pop_front()
    }

    /// Drop every stored element. Capacity is kept.
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Current capacity of the backing storage.
    ///
    /// Equals `initial_size` until the first growth. Zero-sized `T` never
    /// allocates, so for those the capacity is `usize::MAX` regardless of
    /// options.
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// Acquire the queue lock.
    ///
    /// The returned guard is the locked view used by the publisher to pop and
    /// deliver atomically with respect to other callers. A poisoned lock is
    /// recovered: the deque is never left half-mutated by the operations above.
    pub(crate) fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.elements.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Is the lock currently held (by any thread, the caller's included)?
    #[cfg(test)]
    pub(crate) fn is_locked(&self) -> bool {
        self.elements.try_lock().is_err()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use rstest::rstest;

    use super::*;

    #[test]
    fn new_queue_uses_default_capacity() {
        let q: Queue<i32> = Queue::new();
        assert_eq!(q.len(), 0);
        assert_eq!(q.capacity(), DEFAULT_INITIAL_SIZE);
        assert!(q.is_empty());
    }

    #[rstest]
    #[case::small(1)]
    #[case::default_size(10)]
    #[case::larger(20)]
    fn with_options_preallocates(#[case] initial_size: usize) {
        let q: Queue<i32> = Queue::with_options(QueueOptions { initial_size });
        assert_eq!(q.len(), 0);
        assert_eq!(q.capacity(), initial_size);
    }

    #[test]
    fn zero_sized_elements_have_unbounded_capacity() {
        let q: Queue<()> = Queue::with_options(QueueOptions { initial_size: 10 });
        assert_eq!(q.capacity(), usize::MAX);
        q.push(());
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop(), Some(()));
    }

    #[test]
    fn push_and_pop_is_fifo() {
        let q = Queue::new();
        for i in 1..=5 {
            q.push(i);
        }
        assert_eq!(q.len(), 5);
        assert_eq!(q.capacity(), DEFAULT_INITIAL_SIZE);

        let mut popped = Vec::new();
        while let Some(v) = q.pop() {
            popped.push(v);
        }
        assert_eq!(popped, vec![1, 2, 3, 4, 5]);
        assert!(q.is_empty());
    }

    #[test]
    fn pop_on_empty_returns_none() {
        let q: Queue<String> = Queue::new();
        assert_eq!(q.pop(), None);
        assert!(q.is_empty());
    }

    #[test]
    fn grows_past_initial_size() {
        let q = Queue::with_options(QueueOptions { initial_size: 2 });
        for i in 0..100 {
            q.push(i);
        }
        assert_eq!(q.len(), 100);
        assert!(q.capacity() >= 100);
        assert_eq!(q.pop(), Some(0));
    }

    #[test]
    fn clear_empties_and_keeps_capacity() {
        let q = Queue::new();
        for i in 1..=5 {
            q.push(i);
        }

        q.clear();
        assert_eq!(q.len(), 0);
        assert_eq!(q.capacity(), DEFAULT_INITIAL_SIZE);
        assert!(q.is_empty());

        // already empty
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.capacity(), DEFAULT_INITIAL_SIZE);
    }

    #[test]
    fn clear_drops_held_values() {
        let shared = Arc::new(());
        let q = Queue::new();
        q.push(Arc::clone(&shared));
        q.push(Arc::clone(&shared));
        assert_eq!(Arc::strong_count(&shared), 3);

        q.clear();
        assert_eq!(Arc::strong_count(&shared), 1);
    }

    #[test]
    fn concurrent_producers_keep_per_producer_order() {
        let q = Arc::new(Queue::new());
        let producers: Vec<_> = (0..4)
            .map(|p| {
                let q = Arc::clone(&q);
                thread::spawn(move || {
                    for i in 0..250 {
                        q.push((p, i));
                    }
                })
            })
            .collect();
        for h in producers {
            h.join().unwrap();
        }

        assert_eq!(q.len(), 1000);
        let mut last = [None::<i32>; 4];
        while let Some((p, i)) = q.pop() {
            if let Some(prev) = last[p] {
                assert!(i > prev, "producer {p} out of order: {prev} then {i}");
            }
            last[p] = Some(i);
        }
        assert!(last.iter().all(|l| *l == Some(249)));
    }

    #[test]
    fn locked_view_pops_under_held_lock() {
        let q = Queue::new();
        q.push("a");
        q.push("b");
        {
            let mut guard = q.lock();
            assert_eq!(guard.pop_front(), Some("a"));
        }
        assert_eq!(q.pop(), Some("b"));
    }
}
