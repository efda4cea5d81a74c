use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// core FIFO structure: handles only enqueue/dequeue logic
#[derive(Debug)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Queue<T> {
    /// Create a new, empty queue
    pub(crate) fn new() -> Self {
        Self { items: VecDeque::new() }
    }

    /// Append an item at the tail
    pub(crate) fn enqueue(&mut self, item: T) {
        let len_before = self.items.len();
        self.items.push_back(item);
        // -- post op assertion: exactly one item was added
        assert_eq!(self.items.len(), len_before + 1, "Queue length should grow by 1");
    }

    /// Remove the head item, if any
    pub(crate) fn dequeue(&mut self) -> Option<T> {
        let len_before = self.items.len();
        let result = self.items.pop_front();
        // -- post op assertion: queue size decreases if dequeue succeeded
        match result {
            Some(_) => assert_eq!(self.items.len(), len_before - 1, "Queue length should decrease by 1"),
            None => assert_eq!(len_before, 0, "Dequeue may only come back empty on an empty queue"),
        }
        result
    }

    /// Get the current queue length
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe wrapper around the queue.
///
/// Every operation takes the lock for its own duration only, so an emptiness
/// check followed by a `get` is two separate critical sections. With a single
/// consumer that is fine: nobody else can take the item in between.
#[derive(Debug, Default)]
pub struct SafeQueue<T> {
    inner: Mutex<Queue<T>>,
}

impl<T> SafeQueue<T> {
    pub fn new() -> Self {
        Self { inner: Mutex::new(Queue::new()) }
    }

    // `push_back`/`pop_front` never leave the deque half-updated, so a
    // panic on another thread does not invalidate what is behind the lock.
    fn lock(&self) -> MutexGuard<'_, Queue<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert at the tail
    pub fn put(&self, item: T) {
        self.lock().enqueue(item);
    }

    /// Remove from the head, `None` when empty
    pub fn get(&self) -> Option<T> {
        self.lock().dequeue()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }
}
