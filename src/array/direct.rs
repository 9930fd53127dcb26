use super::AsyncArray;

/// Normalizes a possibly-negative index against a length: negative values
/// offset from the end and clamp to 0, positive values cap at the length.
pub(crate) fn normalize(index: isize, length: usize) -> usize {
    if index < 0 {
        (index + length as isize).max(0) as usize
    } else {
        (index as usize).min(length)
    }
}

/// ### -> `Direct<'_, T>` - the non-yielding view.
///
/// Every operation executes synchronously and immediately against the live
/// backing store, with no scheduling involved. This is the escape hatch
/// for callers that want conventional sequence behavior, and the substrate
/// the chunking traversal slices through.
///
/// ### -> `Usage`
///
/// ```
/// use cadence::array::prelude::*;
///
/// let array = AsyncArray::from(vec![1, 2, 3]);
/// array.direct().push(4);
/// array.direct().unshift(0);
/// assert_eq!(array.direct().snapshot(), vec![Some(0), Some(1), Some(2), Some(3), Some(4)]);
///
/// let middle = array.direct().slice(1, Some(-1));
/// assert_eq!(middle.direct().snapshot(), vec![Some(1), Some(2), Some(3)]);
/// ```
pub struct Direct<'a, T> {
    array: &'a AsyncArray<T>,
}

impl<'a, T> Direct<'a, T> {
    pub(crate) fn over(array: &'a AsyncArray<T>) -> Self {
        Self { array }
    }

    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// A clone of the element, or `None` for a hole or out-of-bounds
    /// position.
    pub fn get(&self, index: usize) -> Option<T>
    where
        T: Clone,
    {
        self.array.store.slot(index)
    }

    /// Writes in place; past the end, the store grows and the gap is
    /// filled with holes.
    pub fn set(&self, index: usize, value: T) {
        self.array.store.put(index, value)
    }

    /// Vacates one slot, returning whatever occupied it. The length is
    /// unchanged; the position becomes a hole.
    pub fn take(&self, index: usize) -> Option<T> {
        self.array
            .store
            .slots
            .write()
            .get_mut(index)
            .and_then(|slot| slot.take())
    }

    /// Truncates (discarding trailing slots) or extends (appending holes).
    pub fn set_len(&self, length: usize) {
        self.array.store.slots.write().resize_with(length, || None)
    }

    pub fn push(&self, value: T) {
        self.array.store.append_slot(Some(value))
    }

    /// Removes and returns the last slot. `None` for an empty array and
    /// for a trailing hole alike.
    pub fn pop(&self) -> Option<T> {
        self.array.store.slots.write().pop().flatten()
    }

    /// Removes and returns the first slot, shifting the rest left.
    pub fn shift(&self) -> Option<T> {
        let mut slots = self.array.store.slots.write();
        if slots.is_empty() { None } else { slots.remove(0) }
    }

    /// Prepends one element, shifting the rest right.
    pub fn unshift(&self, value: T) {
        self.array.store.slots.write().insert(0, Some(value))
    }

    pub fn extend<I: IntoIterator<Item = T>>(&self, values: I) {
        self.array
            .store
            .slots
            .write()
            .extend(values.into_iter().map(Some))
    }

    pub fn clear(&self) {
        self.array.store.slots.write().clear()
    }

    pub fn reverse(&self) {
        self.array.store.slots.write().reverse()
    }

    /// Overwrites every slot, holes included, immediately.
    pub fn fill(&self, value: T)
    where
        T: Clone,
    {
        for slot in self.array.store.slots.write().iter_mut() {
            *slot = Some(value.clone());
        }
    }

    /// An owned copy of the current slots.
    #[must_use = "Snapshot output must serve a purpose!"]
    pub fn snapshot(&self) -> Vec<Option<T>>
    where
        T: Clone,
    {
        self.array.store.slots.read().clone()
    }

    /// Copies `start..end` into a new array. Negative bounds offset from
    /// the end and clamp; `end` defaults to the length; an inverted range
    /// yields an empty array.
    #[must_use = "Slicing is not 0 cost and must serve a purpose!"]
    pub fn slice(&self, start: isize, end: Option<isize>) -> AsyncArray<T>
    where
        T: Clone,
    {
        let slots = self.array.store.slots.read();
        let length = slots.len();
        let start = normalize(start, length);
        let end = end.map_or(length, |end| normalize(end, length));
        if start >= end {
            AsyncArray::new()
        } else {
            AsyncArray::from_slots(slots[start..end].to_vec())
        }
    }

    /// Removes `delete_count` slots at the normalized `start`, inserts the
    /// replacement elements there, and returns the removed slots as a new
    /// array.
    pub fn splice(&self, start: isize, delete_count: usize, replacement: Vec<T>) -> AsyncArray<T> {
        let mut slots = self.array.store.slots.write();
        let length = slots.len();
        let start = normalize(start, length);
        let end = start.saturating_add(delete_count).min(length);
        let removed: Vec<Option<T>> = slots
            .splice(start..end, replacement.into_iter().map(Some))
            .collect();
        AsyncArray::from_slots(removed)
    }

    /// A new array holding this array's slots followed by `other`'s.
    /// Neither source is touched; concatenating an array with itself is
    /// fine.
    #[must_use = "Concatenation allocates and must serve a purpose!"]
    pub fn concat(&self, other: &AsyncArray<T>) -> AsyncArray<T>
    where
        T: Clone,
    {
        let mut joined = self.array.store.slots.read().clone();
        joined.extend(other.store.slots.read().iter().cloned());
        AsyncArray::from_slots(joined)
    }
}
