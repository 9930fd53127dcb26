//! The stepping discipline shared by every yielding traversal: a cursor
//! that carries the captured bound and the next position between steps,
//! and the trampoline that hands control back to the scheduler.

/// One full round-trip through the host scheduler. The current call stack
/// unwinds and the continuation re-enters the task queue behind whatever
/// is already waiting, so other pending work runs between steps.
pub(crate) async fn pause() {
    tokio::task::yield_now().await
}

enum Heading {
    Ascending,
    Descending,
}

/// State-carrying cursor for one traversal.
///
/// The bound is captured once at construction; mutating the store during
/// the traversal never changes how many positions are visited. A
/// cancellation point, if one is ever added, belongs in [`advance`],
/// settling the traversal without invoking further callbacks.
///
/// [`advance`]: Walk::advance
pub(crate) struct Walk {
    next: Option<usize>,
    bound: usize,
    heading: Heading,
}

impl Walk {
    /// Positions `0..bound`, in order.
    pub(crate) fn ascending(bound: usize) -> Self {
        Self::ascending_from(0, bound)
    }

    /// Positions `start..bound`, in order. Empty when `start >= bound`.
    pub(crate) fn ascending_from(start: usize, bound: usize) -> Self {
        Walk {
            next: (start < bound).then_some(start),
            bound,
            heading: Heading::Ascending,
        }
    }

    /// Positions `length-1..=0`, descending. Empty when `length == 0`.
    pub(crate) fn descending(length: usize) -> Self {
        Walk {
            next: length.checked_sub(1),
            bound: 0,
            heading: Heading::Descending,
        }
    }

    /// Positions `start..=0`, descending, with `start` capped at
    /// `length-1`. Empty when `length == 0`.
    pub(crate) fn descending_from(start: usize, length: usize) -> Self {
        Walk {
            next: length.checked_sub(1).map(|last| start.min(last)),
            bound: 0,
            heading: Heading::Descending,
        }
    }

    /// The position for the next step, or `None` once the captured bound
    /// is exhausted.
    pub(crate) fn advance(&mut self) -> Option<usize> {
        let current = self.next?;
        self.next = match self.heading {
            Heading::Ascending => {
                let following = current + 1;
                (following < self.bound).then_some(following)
            }
            Heading::Descending => current.checked_sub(1),
        };
        Some(current)
    }
}
