//! Fixed-capacity, oldest-evicting buffer.

use std::collections::VecDeque;

use serde::{Serialize, Serializer};

/// Append-only ring holding at most `capacity` items.
///
/// Pushing onto a full buffer evicts the oldest item. Iteration is oldest
/// first.
#[derive(Debug, Clone)]
pub struct BoundedBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Build from stored items, keeping only the newest `capacity`.
    pub fn from_vec(mut items: Vec<T>, capacity: usize) -> Self {
        if items.len() > capacity {
            items.drain(..items.len() - capacity);
        }
        Self {
            items: items.into(),
            capacity,
        }
    }

    /// Append an item, returning the evicted one if the buffer was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(item);
        }
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Serialize> Serialize for BoundedBuffer<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.iter())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The buffer always equals the last `capacity` pushes.
        #[test]
        fn matches_tail_of_pushes(items in prop::collection::vec(any::<u16>(), 0..200), capacity in 1usize..50) {
            let mut buffer = BoundedBuffer::new(capacity);
            for item in &items {
                buffer.push(*item);
            }
            prop_assert!(buffer.len() <= capacity);

            let start = items.len().saturating_sub(capacity);
            let held: Vec<u16> = buffer.iter().copied().collect();
            prop_assert_eq!(held, items[start..].to_vec());
        }
    }
}
