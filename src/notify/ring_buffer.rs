//! Bounded history for the dashboard notification feed.
//!
//! Holds at most `capacity` entries, oldest first. Pushing into a full buffer
//! evicts the oldest entry and hands it back to the caller.

use std::collections::VecDeque;

/// Fixed-capacity FIFO window over the most recent entries.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Creates a buffer holding up to `capacity` entries. A zero capacity is
    /// raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { entries: VecDeque::with_capacity(capacity), capacity }
    }

    /// Appends `entry` and returns the evicted oldest entry, if the buffer was full.
    pub fn push(&mut self, entry: T) -> Option<T> {
        let evicted =
            if self.entries.len() == self.capacity { self.entries.pop_front() } else { None };
        self.entries.push_back(entry);
        evicted
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Copies of the newest `n` entries, oldest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<T> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }

    /// Copies of every entry, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// The buffer holds exactly the newest `capacity` pushes.
        #[test]
        fn prop_keeps_newest_window(
            capacity in 1usize..64,
            values in prop::collection::vec(any::<u32>(), 0..300),
        ) {
            let mut history = RingBuffer::new(capacity);
            let mut evicted = 0;
            for &v in &values {
                if history.push(v).is_some() {
                    evicted += 1;
                }
            }

            let start = values.len().saturating_sub(capacity);
            prop_assert_eq!(history.snapshot(), values[start..].to_vec());
            prop_assert_eq!(evicted, start);
        }
    }
}
