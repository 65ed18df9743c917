use std::collections::VecDeque;

/// A payload together with its priority (weight)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueEntry<T> {
    pub item: T,
    pub priority: u64,
}

/// Ascending-priority queue backed by a sorted deque.
///
/// Insertion is O(n), extraction of the lowest priority is O(1). Ties are
/// broken asymmetrically: an entry whose priority is <= the current front
/// goes in front of it (last in, first out), while anywhere else it goes
/// after every entry of equal priority (first in, first out). Tree shape
/// and therefore the container bytes depend on this order.
#[derive(Clone, Debug)]
pub struct PriorityQueue<T> {
    entries: VecDeque<QueueEntry<T>>,
}

impl<T> PriorityQueue<T> {
    pub fn new() -> Self {
        Self { entries: VecDeque::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity) }
    }

    /// Insert `item` with the given priority
    pub fn enqueue(&mut self, item: T, priority: u64) {
        let entry = QueueEntry { item, priority };

        match self.entries.front() {
            None => self.entries.push_back(entry),
            Some(front) if priority <= front.priority => self.entries.push_front(entry),
            Some(_) => {
                // Front is strictly lower, so the split point is past index 0
                let at = self.entries.partition_point(|e| e.priority <= priority);
                self.entries.insert(at, entry);
            }
        }
    }

    /// Remove and return the lowest-priority entry
    pub fn dequeue(&mut self) -> Option<QueueEntry<T>> {
        self.entries.pop_front()
    }

    /// Priority of the entry `dequeue` would return next
    pub fn peek_priority(&self) -> Option<u64> {
        self.entries.front().map(|e| e.priority)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in dequeue order without consuming them
    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry<T>> {
        self.entries.iter()
    }
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
