//! `cadence` provides [`array::AsyncArray`], an ordered collection with two
//! faces over one shared backing store: a direct view that behaves like a
//! conventional sequence, and a yielding view that performs the same
//! traversals one element at a time, handing control back to the scheduler
//! between every step so long transformations cannot starve a
//! single-threaded run loop.

/// Runs asynchronous code blockingly. Mainly used in doctests, as doctests
/// do not support async natively.
#[macro_export]
macro_rules! future {
    ($coroutine: expr) => {
        futures::executor::block_on($coroutine)
    };
}

/// ### -> `Error`
///
/// The failure taxonomy shared by every yielding traversal.
///
/// A traversal resolves or fails exactly once; failure is terminal within
/// that call and is never retried internally. Side effects committed by
/// steps that ran before the failing one stay committed: neither the
/// source array nor any partially-built result is rolled back.
///
/// Out-of-range access is deliberately absent here: reading past the end of
/// an array yields the absent sentinel (`None`) and writing past the end
/// grows the array. Both are defined behavior, not errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A user-supplied predicate, transform, or accumulator failed during a
    /// step. `position` names the step that failed.
    #[error("callback failed at position {position}: {cause}")]
    Callback {
        /// The position whose callback failed.
        position: usize,
        /// The callback's own error, carried opaquely.
        cause: anyhow::Error,
    },

    /// `reduce`/`reduce_right` over an empty array with no initial
    /// accumulator. There is nothing to seed from, so this is surfaced
    /// explicitly instead of producing a garbage result.
    #[error("cannot reduce an empty array without an initial value")]
    EmptyReduce,

    /// `split_to_chunks` with a maximum chunk length of zero.
    #[error("chunk length must be at least 1")]
    ZeroChunkLength,
}

pub mod array;
