use std::cmp::Ordering;

use super::AsyncArray;

/// ### -> `Indexer<T> Trait`
///
/// The explicit integer-key surface of a collection handle. Any handle
/// (a full array, a chunk, an alias) resolves positional reads and writes
/// through the same pair of methods against its backing store, so integer
/// indexing behaves identically regardless of which view produced the
/// handle.
///
/// - `get(index)` returns a clone of the element, or `None` for a hole or
///   an out-of-bounds position.
/// - `set(index, value)` writes in place; a position past the end grows
///   the store, filling the gap with holes.
///
/// Neither is an error path: out-of-range access is defined behavior.
///
/// ### -> `Usage`
///
/// ```
/// use cadence::array::prelude::*;
///
/// let array = AsyncArray::from(vec![1, 2, 3]);
/// assert_eq!(array.get(1), Some(2));
/// assert_eq!(array.get(9), None);
///
/// array.set(5, 42);
/// assert_eq!(array.len(), 6);
/// assert_eq!(array.get(4), None); // hole filled in by the growth
/// assert_eq!(array.get(5), Some(42));
/// ```
pub trait Indexer<T> {
    #[must_use = "Fetched elements must have a purpose!"]
    fn get(&self, index: usize) -> Option<T>;

    fn set(&self, index: usize, value: T);
}

impl<T: Clone> Indexer<T> for AsyncArray<T> {
    fn get(&self, index: usize) -> Option<T> {
        self.store.slot(index)
    }

    fn set(&self, index: usize, value: T) {
        self.store.put(index, value)
    }
}

/// Length observations and comparisons over the live backing store.
pub trait Length {
    fn length(&self) -> usize;

    fn length_eq(&self, other: &Self) -> bool {
        self.length() == other.length()
    }

    fn length_cmp(&self, other: &Self) -> Option<Ordering> {
        self.length().partial_cmp(&other.length())
    }
}

impl<T> Length for AsyncArray<T> {
    fn length(&self) -> usize {
        self.len()
    }
}
