use std::future::Future;

use log::{debug, trace};
use tokio::task::JoinHandle;

use super::AsyncArray;
use super::direct::normalize;
use super::walk::{Walk, pause};
use crate::Error;

/// Wraps one step's callback outcome, pinning a failure to the position
/// that produced it.
async fn run_step<R>(
    step: impl Future<Output = anyhow::Result<R>>,
    position: usize,
) -> Result<R, Error> {
    step.await
        .map_err(|cause| Error::Callback { position, cause })
}

/// ### -> `Yielding<'_, T>` - the cooperatively-scheduled view.
///
/// Every traversal here follows one shape: capture the length once as the
/// loop bound, then process positions in the stated scan order. Each step
/// reads the slot live from the backing store, runs the callback, and hands
/// control back to the scheduler before advancing. A step is a discrete,
/// boundedly-sized unit of execution, so a long traversal interleaves with
/// whatever else is queued on the run loop instead of starving it.
///
/// Consequences of that shape, all deliberate:
///
/// - Mutating the store during a traversal changes what later steps
///   observe but never how many steps run.
/// - A position truncated away mid-traversal reads as the absent sentinel,
///   which is why callbacks receive `Option<T>`.
/// - Within one traversal, callbacks never overlap: step N+1 begins only
///   after step N's callback was invoked (and, outside the detached
///   variants, awaited). Across independently started traversals no
///   relative order is guaranteed.
/// - A short-circuit (match found, predicate failed) settles the traversal
///   immediately, without visiting the remaining positions.
/// - A callback failure settles the traversal as
///   [`Error::Callback`](crate::Error::Callback); side effects committed by
///   earlier steps remain in place.
///
/// Once started, a traversal runs to its bound, a short-circuit, or a
/// failure; there is no cancellation and no automatic retry.
pub struct Yielding<'a, T> {
    array: &'a AsyncArray<T>,
}

impl<'a, T> Yielding<'a, T> {
    pub(crate) fn over(array: &'a AsyncArray<T>) -> Self {
        Self { array }
    }
}

impl<'a, T> Yielding<'a, T>
where
    T: PartialEq,
{
    /// Linear strict-equality scan from the normalized `from` (negative
    /// values offset from the end and clamp to 0; `from` past the end
    /// resolves `false` without scanning). Holes never match.
    pub async fn includes(&self, element: &T, from: isize) -> bool {
        let length = self.array.len();
        let mut walk = Walk::ascending_from(normalize(from, length), length);
        while let Some(position) = walk.advance() {
            if self.array.store.matches(position, element) {
                return true;
            }
            pause().await;
        }
        false
    }

    /// Like [`includes`](Yielding::includes), but resolves the matching
    /// position.
    pub async fn index_of(&self, element: &T, from: isize) -> Option<usize> {
        let length = self.array.len();
        let mut walk = Walk::ascending_from(normalize(from, length), length);
        while let Some(position) = walk.advance() {
            if self.array.store.matches(position, element) {
                return Some(position);
            }
            pause().await;
        }
        None
    }

    /// Descending strict-equality scan. `from` defaults to the last
    /// position; a value past the end is capped there; a negative value
    /// offsets from the end, and one below `-length` resolves `None`
    /// without scanning.
    pub async fn last_index_of(&self, element: &T, from: Option<isize>) -> Option<usize> {
        let length = self.array.len();
        if length == 0 {
            return None;
        }
        let start = match from {
            None => length - 1,
            Some(index) if index >= 0 => (index as usize).min(length - 1),
            Some(index) => {
                let adjusted = index + length as isize;
                if adjusted < 0 {
                    return None;
                }
                adjusted as usize
            }
        };
        let mut walk = Walk::descending_from(start, length);
        while let Some(position) = walk.advance() {
            if self.array.store.matches(position, element) {
                return Some(position);
            }
            pause().await;
        }
        None
    }
}

impl<'a, T> Yielding<'a, T>
where
    T: Clone,
{
    /// Resolves `true` iff the predicate holds at every position;
    /// short-circuits `false` on the first miss.
    ///
    /// An empty array resolves `true`.
    pub async fn every<F, Fut>(&self, mut predicate: F) -> Result<bool, Error>
    where
        F: FnMut(Option<T>, usize) -> Fut,
        Fut: Future<Output = anyhow::Result<bool>>,
    {
        let mut walk = Walk::ascending(self.array.len());
        while let Some(position) = walk.advance() {
            let slot = self.array.store.slot(position);
            if !run_step(predicate(slot, position), position).await? {
                debug!("every: short-circuit at position {position}");
                return Ok(false);
            }
            pause().await;
        }
        Ok(true)
    }

    /// Resolves `false` unless the predicate holds somewhere;
    /// short-circuits `true` on the first hit.
    ///
    /// An empty array resolves `false`.
    pub async fn some<F, Fut>(&self, mut predicate: F) -> Result<bool, Error>
    where
        F: FnMut(Option<T>, usize) -> Fut,
        Fut: Future<Output = anyhow::Result<bool>>,
    {
        let mut walk = Walk::ascending(self.array.len());
        while let Some(position) = walk.advance() {
            let slot = self.array.store.slot(position);
            if run_step(predicate(slot, position), position).await? {
                debug!("some: short-circuit at position {position}");
                return Ok(true);
            }
            pause().await;
        }
        Ok(false)
    }

    /// Builds a new array holding, in original order, every slot the
    /// predicate accepted. Accepted holes are kept as holes. Resolves an
    /// empty array when nothing matches.
    ///
    /// ### -> `Usage`
    ///
    /// ```
    /// use cadence::array::prelude::*;
    ///
    /// async fn example() -> anyhow::Result<()> {
    ///     let array = AsyncArray::from(vec![1, 2, 3, 4, 5, 6]);
    ///     let even = array
    ///         .yielding()
    ///         .filter(|item, _| async move { Ok(item.unwrap_or(1) % 2 == 0) })
    ///         .await?;
    ///     assert_eq!(even.direct().snapshot(), vec![Some(2), Some(4), Some(6)]);
    ///     Ok(())
    /// }
    ///
    /// // to run asynchronous code blockingly in doctest (as doctest does not support async natively)
    /// cadence::future!(example()).unwrap();
    /// ```
    pub async fn filter<F, Fut>(&self, mut predicate: F) -> Result<AsyncArray<T>, Error>
    where
        F: FnMut(Option<T>, usize) -> Fut,
        Fut: Future<Output = anyhow::Result<bool>>,
    {
        let filtered = AsyncArray::new();
        let mut walk = Walk::ascending(self.array.len());
        while let Some(position) = walk.advance() {
            let slot = self.array.store.slot(position);
            if run_step(predicate(slot.clone(), position), position).await? {
                filtered.store.append_slot(slot);
            }
            pause().await;
        }
        Ok(filtered)
    }

    /// Ascending scan; resolves the first slot the predicate accepts, or
    /// `None` when nothing matches. A matching hole also resolves `None`;
    /// use [`find_index`](Yielding::find_index) to tell the two apart.
    pub async fn find<F, Fut>(&self, mut predicate: F) -> Result<Option<T>, Error>
    where
        F: FnMut(Option<T>, usize) -> Fut,
        Fut: Future<Output = anyhow::Result<bool>>,
    {
        let mut walk = Walk::ascending(self.array.len());
        while let Some(position) = walk.advance() {
            let slot = self.array.store.slot(position);
            if run_step(predicate(slot.clone(), position), position).await? {
                return Ok(slot);
            }
            pause().await;
        }
        Ok(None)
    }

    /// Ascending scan; resolves the first matching position.
    pub async fn find_index<F, Fut>(&self, mut predicate: F) -> Result<Option<usize>, Error>
    where
        F: FnMut(Option<T>, usize) -> Fut,
        Fut: Future<Output = anyhow::Result<bool>>,
    {
        let mut walk = Walk::ascending(self.array.len());
        while let Some(position) = walk.advance() {
            let slot = self.array.store.slot(position);
            if run_step(predicate(slot, position), position).await? {
                return Ok(Some(position));
            }
            pause().await;
        }
        Ok(None)
    }

    /// Descending scan from the last position; resolves the first match
    /// encountered in that order.
    pub async fn find_last<F, Fut>(&self, mut predicate: F) -> Result<Option<T>, Error>
    where
        F: FnMut(Option<T>, usize) -> Fut,
        Fut: Future<Output = anyhow::Result<bool>>,
    {
        let mut walk = Walk::descending(self.array.len());
        while let Some(position) = walk.advance() {
            let slot = self.array.store.slot(position);
            if run_step(predicate(slot.clone(), position), position).await? {
                return Ok(slot);
            }
            pause().await;
        }
        Ok(None)
    }

    /// Descending scan from the last position; resolves the first matching
    /// position encountered in that order.
    pub async fn find_last_index<F, Fut>(&self, mut predicate: F) -> Result<Option<usize>, Error>
    where
        F: FnMut(Option<T>, usize) -> Fut,
        Fut: Future<Output = anyhow::Result<bool>>,
    {
        let mut walk = Walk::descending(self.array.len());
        while let Some(position) = walk.advance() {
            let slot = self.array.store.slot(position);
            if run_step(predicate(slot, position), position).await? {
                return Ok(Some(position));
            }
            pause().await;
        }
        Ok(None)
    }

    /// Invokes the callback at every position for its side effects,
    /// awaiting each callback before advancing.
    pub async fn for_each<F, Fut>(&self, mut callback: F) -> Result<(), Error>
    where
        F: FnMut(Option<T>, usize) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        let bound = self.array.len();
        trace!("for_each: stepping over {bound} positions");
        let mut walk = Walk::ascending(bound);
        while let Some(position) = walk.advance() {
            let slot = self.array.store.slot(position);
            run_step(callback(slot, position), position).await?;
            pause().await;
        }
        Ok(())
    }

    /// Fire-and-forget variant of [`for_each`](Yielding::for_each): each
    /// callback future is spawned on the runtime and not awaited before
    /// advancing. Only the per-step scheduling wait is honored, so the
    /// callbacks of different steps may overlap, and their failures are
    /// lost with their tasks.
    pub async fn for_each_detached<F, Fut>(&self, mut callback: F)
    where
        F: FnMut(Option<T>, usize) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut walk = Walk::ascending(self.array.len());
        while let Some(position) = walk.advance() {
            let slot = self.array.store.slot(position);
            tokio::spawn(callback(slot, position));
            pause().await;
        }
    }

    /// Builds a new array of transformed values (same length, original
    /// order), awaiting each callback before advancing.
    ///
    /// ### -> `Usage`
    ///
    /// ```
    /// use cadence::array::prelude::*;
    ///
    /// async fn example() -> anyhow::Result<()> {
    ///     let array = AsyncArray::from(vec![10, 20, 30, 40, 50]);
    ///     let scaled = array
    ///         .yielding()
    ///         .map(|item, _| async move { Ok(item.unwrap_or_default() * 100) })
    ///         .await?;
    ///     assert_eq!(
    ///         scaled.direct().snapshot(),
    ///         vec![Some(1000), Some(2000), Some(3000), Some(4000), Some(5000)],
    ///     );
    ///     Ok(())
    /// }
    ///
    /// // to run asynchronous code blockingly in doctest (as doctest does not support async natively)
    /// cadence::future!(example()).unwrap();
    /// ```
    pub async fn map<U, F, Fut>(&self, mut callback: F) -> Result<AsyncArray<U>, Error>
    where
        F: FnMut(Option<T>, usize) -> Fut,
        Fut: Future<Output = anyhow::Result<U>>,
    {
        let bound = self.array.len();
        trace!("map: stepping over {bound} positions");
        let mapped = AsyncArray::new();
        let mut walk = Walk::ascending(bound);
        while let Some(position) = walk.advance() {
            let slot = self.array.store.slot(position);
            let value = run_step(callback(slot, position), position).await?;
            mapped.store.append_slot(Some(value));
            pause().await;
        }
        Ok(mapped)
    }

    /// Detached variant of [`map`](Yielding::map): each callback future is
    /// spawned without being awaited, and the resulting array's elements
    /// are the pending join handles, in original order. The caller decides
    /// when (or whether) to await them.
    pub async fn map_detached<U, F, Fut>(&self, mut callback: F) -> AsyncArray<JoinHandle<U>>
    where
        F: FnMut(Option<T>, usize) -> Fut,
        Fut: Future<Output = U> + Send + 'static,
        U: Send + 'static,
    {
        let handles = AsyncArray::new();
        let mut walk = Walk::ascending(self.array.len());
        while let Some(position) = walk.advance() {
            let slot = self.array.store.slot(position);
            handles
                .store
                .append_slot(Some(tokio::spawn(callback(slot, position))));
            pause().await;
        }
        handles
    }

    /// Left-to-right accumulation from an explicit initial value. An empty
    /// array resolves the initial value without invoking the callback.
    pub async fn fold<U, F, Fut>(&self, initial: U, mut callback: F) -> Result<U, Error>
    where
        F: FnMut(U, Option<T>, usize) -> Fut,
        Fut: Future<Output = anyhow::Result<U>>,
    {
        let mut accumulator = initial;
        let mut walk = Walk::ascending(self.array.len());
        while let Some(position) = walk.advance() {
            let slot = self.array.store.slot(position);
            accumulator = run_step(callback(accumulator, slot, position), position).await?;
            pause().await;
        }
        Ok(accumulator)
    }

    /// Right-to-left counterpart of [`fold`](Yielding::fold).
    pub async fn fold_right<U, F, Fut>(&self, initial: U, mut callback: F) -> Result<U, Error>
    where
        F: FnMut(U, Option<T>, usize) -> Fut,
        Fut: Future<Output = anyhow::Result<U>>,
    {
        let mut accumulator = initial;
        let mut walk = Walk::descending(self.array.len());
        while let Some(position) = walk.advance() {
            let slot = self.array.store.slot(position);
            accumulator = run_step(callback(accumulator, slot, position), position).await?;
            pause().await;
        }
        Ok(accumulator)
    }

    /// Left-to-right accumulation seeded from the first slot, starting at
    /// the second position. The accumulator is the slot type, since the
    /// seed position may be a hole. An empty array fails with
    /// [`Error::EmptyReduce`](crate::Error::EmptyReduce); a single-element
    /// array resolves its seed without invoking the callback.
    ///
    /// ### -> `Usage`
    ///
    /// ```
    /// use cadence::array::prelude::*;
    ///
    /// async fn example() -> anyhow::Result<()> {
    ///     let array = AsyncArray::from(vec![1, 2, 3, 4]);
    ///     let sum = array
    ///         .yielding()
    ///         .reduce(|acc, item, _| async move {
    ///             Ok(Some(acc.unwrap_or(0) + item.unwrap_or(0)))
    ///         })
    ///         .await?;
    ///     assert_eq!(sum, Some(10));
    ///     Ok(())
    /// }
    ///
    /// // to run asynchronous code blockingly in doctest (as doctest does not support async natively)
    /// cadence::future!(example()).unwrap();
    /// ```
    pub async fn reduce<F, Fut>(&self, mut callback: F) -> Result<Option<T>, Error>
    where
        F: FnMut(Option<T>, Option<T>, usize) -> Fut,
        Fut: Future<Output = anyhow::Result<Option<T>>>,
    {
        let length = self.array.len();
        if length == 0 {
            debug!("reduce: empty array without an initial value");
            return Err(Error::EmptyReduce);
        }
        let mut accumulator = self.array.store.slot(0);
        let mut walk = Walk::ascending_from(1, length);
        while let Some(position) = walk.advance() {
            let slot = self.array.store.slot(position);
            accumulator = run_step(callback(accumulator, slot, position), position).await?;
            pause().await;
        }
        Ok(accumulator)
    }

    /// Right-to-left counterpart of [`reduce`](Yielding::reduce): seeds
    /// from the last slot and starts one position in from the end.
    pub async fn reduce_right<F, Fut>(&self, mut callback: F) -> Result<Option<T>, Error>
    where
        F: FnMut(Option<T>, Option<T>, usize) -> Fut,
        Fut: Future<Output = anyhow::Result<Option<T>>>,
    {
        let length = self.array.len();
        if length == 0 {
            debug!("reduce_right: empty array without an initial value");
            return Err(Error::EmptyReduce);
        }
        let mut accumulator = self.array.store.slot(length - 1);
        let mut walk = Walk::descending(length - 1);
        while let Some(position) = walk.advance() {
            let slot = self.array.store.slot(position);
            accumulator = run_step(callback(accumulator, slot, position), position).await?;
            pause().await;
        }
        Ok(accumulator)
    }

    /// Overwrites every position with `element`, one slot per step,
    /// mutating the backing store in place with no copy. Resolves an alias
    /// of the mutated array.
    pub async fn fill(&self, element: T) -> AsyncArray<T> {
        let mut walk = Walk::ascending(self.array.len());
        while let Some(position) = walk.advance() {
            self.array.store.put(position, element.clone());
            pause().await;
        }
        self.array.clone()
    }

    /// Splits into copied chunks of at most `max_length` elements,
    /// yielding between chunks. Concatenating the chunks in order
    /// reproduces the source; only the last chunk may be shorter; a source
    /// no longer than `max_length` produces exactly one chunk.
    ///
    /// ### -> `Usage`
    ///
    /// ```
    /// use cadence::array::prelude::*;
    ///
    /// async fn example() -> anyhow::Result<()> {
    ///     let array = AsyncArray::from(vec![1, 2, 3, 4, 5]);
    ///     let chunks = array.yielding().split_to_chunks(2).await?;
    ///     assert_eq!(chunks.len(), 3);
    ///     assert_eq!(chunks.get(0).unwrap().direct().snapshot(), vec![Some(1), Some(2)]);
    ///     assert_eq!(chunks.get(1).unwrap().direct().snapshot(), vec![Some(3), Some(4)]);
    ///     assert_eq!(chunks.get(2).unwrap().direct().snapshot(), vec![Some(5)]);
    ///     Ok(())
    /// }
    ///
    /// // to run asynchronous code blockingly in doctest (as doctest does not support async natively)
    /// cadence::future!(example()).unwrap();
    /// ```
    pub async fn split_to_chunks(
        &self,
        max_length: usize,
    ) -> Result<AsyncArray<AsyncArray<T>>, Error> {
        if max_length == 0 {
            return Err(Error::ZeroChunkLength);
        }
        let length = self.array.len();
        trace!("split_to_chunks: {length} positions into chunks of {max_length}");
        let chunks = AsyncArray::new();
        let mut start = 0;
        loop {
            let chunk = self
                .array
                .direct()
                .slice(start as isize, Some((start + max_length) as isize));
            chunks.direct().push(chunk);
            start += max_length;
            if start >= length {
                break;
            }
            pause().await;
        }
        Ok(chunks)
    }
}
