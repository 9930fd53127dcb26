use std::sync::Arc;

use parking_lot::RwLock;

mod direct;
mod traits;
mod walk;
mod yielding;

pub use direct::Direct;
pub use traits::{Indexer, Length};
pub use yielding::Yielding;

/// The backing store: one ordered, mutable, index-addressable run of slots.
///
/// A slot is `Option<T>`; `None` is the absent sentinel, produced by
/// writing past the end (the gap is filled with holes) or by extending the
/// length. The lock is only ever held within a single operation step and
/// never across an await point, which is why a synchronous lock suffices.
pub(crate) struct Store<T> {
    pub(crate) slots: RwLock<Vec<Option<T>>>,
}

impl<T> Store<T> {
    pub(crate) fn with_slots(slots: Vec<Option<T>>) -> Self {
        Self {
            slots: RwLock::new(slots),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Live read of one slot. `None` for a hole or an out-of-bounds
    /// position alike.
    pub(crate) fn slot(&self, index: usize) -> Option<T>
    where
        T: Clone,
    {
        self.slots.read().get(index).cloned().flatten()
    }

    /// Writes one slot, growing the store (hole-filled) when the position
    /// lies past the end.
    pub(crate) fn put(&self, index: usize, value: T) {
        let mut slots = self.slots.write();
        if index >= slots.len() {
            slots.resize_with(index + 1, || None);
        }
        slots[index] = Some(value);
    }

    pub(crate) fn append_slot(&self, slot: Option<T>) {
        self.slots.write().push(slot);
    }

    /// Strict-equality probe without cloning the element. Holes never
    /// match.
    pub(crate) fn matches(&self, index: usize, element: &T) -> bool
    where
        T: PartialEq,
    {
        self.slots
            .read()
            .get(index)
            .is_some_and(|slot| slot.as_ref() == Some(element))
    }
}

/// ### -> `AsyncArray<T>` - an ordered collection with a direct and a yielding face.
///
/// `AsyncArray<T>` wraps exactly one backing store and exposes it through
/// two views:
///
/// - [`direct()`](AsyncArray::direct): synchronous, immediate operations
///   with conventional sequence semantics (push, pop, slice, splice,
///   concat, ...). The non-yielding escape hatch.
/// - [`yielding()`](AsyncArray::yielding): the same traversals (map,
///   filter, reduce, search, fill, chunk) performed one element per step,
///   with a full round-trip through the scheduler between steps. A long
///   traversal therefore interleaves with every other task queued on the
///   run loop instead of monopolizing it, trading per-element latency for
///   host responsiveness.
///
/// ### -> `Sharing and ownership`
///
/// Cloning an `AsyncArray<T>` is a shallow alias: both handles address the
/// same mutable store and mutations through either are visible to both.
/// This is the explicit "wrap by shared reference" choice; the explicit
/// copy is [`detach`](AsyncArray::detach). Constructing from a `Vec<T>`
/// moves the elements in without copying. Adopting a handle that is
/// already an `AsyncArray` is just `clone()`, so it can never double-wrap.
///
/// ### -> `Holes`
///
/// Slots hold `Option<T>`. Reading past the end, or reading a position
/// that was skipped over by a grow-on-write, yields `None` rather than an
/// error; writing past the end grows the store. Traversal callbacks
/// receive the live slot as `Option<T>` for the same reason: a position
/// truncated away mid-traversal reads as absent.
///
/// ### -> `Concurrency model`
///
/// Scheduling is cooperative and task-granular. Within one traversal,
/// steps run strictly in scan order and callbacks never overlap; across
/// independently started traversals no relative order is guaranteed; they
/// interleave at task-queue granularity. The store is the only shared
/// mutable resource and it is not locked across steps: mutating it while a
/// traversal is in flight is legal, visible to later steps, and does not
/// change how many steps run (the loop bound is captured once at the
/// start).
///
/// ### -> `Usage`
///
/// ```
/// use cadence::array::prelude::*;
///
/// async fn example() -> anyhow::Result<()> {
///     let array = AsyncArray::from(vec![10, 20, 30, 40, 50]);
///
///     // Direct view: immediate, synchronous.
///     array.direct().push(60);
///     assert_eq!(array.len(), 6);
///     assert_eq!(array.direct().pop(), Some(60));
///
///     // Yielding view: one element per scheduler round-trip.
///     let scaled = array
///         .yielding()
///         .map(|item, _| async move { Ok(item.unwrap_or_default() * 100) })
///         .await?;
///
///     assert_eq!(
///         scaled.direct().snapshot(),
///         vec![Some(1000), Some(2000), Some(3000), Some(4000), Some(5000)],
///     );
///
///     Ok(())
/// }
///
/// // to run asynchronous code blockingly in doctest (as doctest does not support async natively)
/// cadence::future!(example()).unwrap();
/// ```
pub struct AsyncArray<T> {
    pub(crate) store: Arc<Store<T>>,
}

impl<T> Clone for AsyncArray<T> {
    /// Shallow: the clone aliases the same backing store.
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<T> AsyncArray<T> {
    /// An empty array with a fresh store.
    pub fn new() -> Self {
        Self::from_slots(Vec::new())
    }

    /// Builds an array from raw slots, holes included.
    pub fn from_slots(slots: Vec<Option<T>>) -> Self {
        Self {
            store: Arc::new(Store::with_slots(slots)),
        }
    }

    /// Live length of the backing store, never a captured value.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The synchronous, immediate view.
    pub fn direct(&self) -> Direct<'_, T> {
        Direct::over(self)
    }

    /// The cooperatively-scheduled view.
    pub fn yielding(&self) -> Yielding<'_, T> {
        Yielding::over(self)
    }

    /// Deep copy into an independent store: the explicit alternative to
    /// the aliasing `clone()`.
    pub fn detach(&self) -> Self
    where
        T: Clone,
    {
        Self::from_slots(self.store.slots.read().clone())
    }
}

impl<T> Default for AsyncArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for AsyncArray<T> {
    /// Adoption by move: the elements are taken over, not copied.
    fn from(elements: Vec<T>) -> Self {
        Self::from_slots(elements.into_iter().map(Some).collect())
    }
}

impl<T> FromIterator<T> for AsyncArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_slots(iter.into_iter().map(Some).collect())
    }
}

/// Renders current contents through the store read path; never mutates.
/// Holes print as `_`.
impl<T: std::fmt::Debug> std::fmt::Debug for AsyncArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        struct Absent;
        impl std::fmt::Debug for Absent {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("_")
            }
        }

        let slots = self.store.slots.read();
        let mut list = f.debug_list();
        for slot in slots.iter() {
            match slot {
                Some(value) => list.entry(value),
                None => list.entry(&Absent),
            };
        }
        list.finish()
    }
}

pub mod prelude;

#[cfg(test)]
mod tests;
