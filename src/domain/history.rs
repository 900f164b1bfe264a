//! Fixed-capacity histories kept for display.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// A value paired with the time it was recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamped<T> {
    pub at: DateTime<Utc>,
    pub value: T,
}

/// Ordered sequence that evicts its oldest entry once full.
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest one if at capacity.
    pub fn push(&mut self, entry: T) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.entries.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_first() {
        let mut history = BoundedHistory::new(3);
        for i in 1..=5 {
            history.push(i);
        }

        let kept: Vec<_> = history.iter().copied().collect();
        assert_eq!(kept, vec![3, 4, 5]);
        assert_eq!(history.latest(), Some(&5));
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut history = BoundedHistory::new(0);
        history.push("event");

        assert!(history.is_empty());
        assert_eq!(history.latest(), None);
    }

    #[test]
    fn len_tracks_entries_below_capacity() {
        let mut history = BoundedHistory::new(10);
        history.push('a');
        history.push('b');

        assert_eq!(history.len(), 2);
        assert_eq!(history.capacity(), 10);
    }

    #[test]
    fn huge_capacity_allocates_on_demand() {
        let mut history = BoundedHistory::new(usize::MAX);
        history.push(1u8);

        assert_eq!(history.len(), 1);
        assert_eq!(history.capacity(), usize::MAX);
    }
}
