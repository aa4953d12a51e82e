//! The bi-partite circular buffer.
//!
//! A `BipBuffer` hands out contiguous write windows (`reserve`) and contiguous
//! read windows (`read`) over a fixed run of slots, without ever copying data
//! across the wrap point. It does so by tracking up to two committed regions:
//!
//! ```text
//!  0                                                       capacity
//!  ┌──────────────┬─────────────┬──────────────────────┬───────────┐
//!  │  region B    │   free      │      region A        │   free    │
//!  └──────────────┴─────────────┴──────────────────────┴───────────┘
//!  headB      tailB         headA                  tailA
//! ```
//!
//! - **Region A** is what readers see. `read` always returns exactly A.
//! - **Region B** only exists after a writer wrapped to offset 0 while A still
//!   held unread data. It becomes A once A is fully decommitted (rotation).
//!
//! # Single producer, single consumer
//! There is no internal synchronization. Sharing a buffer across threads
//! requires an external lock around every call.

use crate::error::BipError;
use crate::region::{Region, Reservation, free_span};
use crate::storage::{SlotStorage, heap_slots};
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, trace};

/// Snapshot of the buffer's cursors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cursors {
    /// Readable region.
    pub a: Region,
    /// Wrapped region at the front, empty unless a writer wrapped.
    pub b: Region,
    pub reservation: Option<Reservation>,
}

/// Fixed-capacity bi-partite circular buffer over slots of `T`.
///
/// # Type Parameters
/// - `T`: Element type. Never inspected by the buffer.
/// - `S`: Slot storage, `Box<[T]>` unless supplied via `with_storage`.
pub struct BipBuffer<T, S = Box<[T]>> {
    storage: S,
    /// Fixed at construction; never re-read from `storage`.
    capacity: usize,
    a: Region,
    b: Region,
    /// At most one outstanding write window.
    reservation: Option<Reservation>,
    _pd: PhantomData<T>,
}

impl<T: Default> BipBuffer<T> {
    /// Allocates a heap-backed buffer of `capacity` default-valued slots.
    ///
    /// # Errors
    /// Returns `BipError::Alloc` if the slots cannot be allocated.
    ///
    /// # Example
    /// ```
    /// use bip_buffer::BipBuffer;
    /// let buf = BipBuffer::<u8>::new(1024).unwrap();
    /// assert_eq!(buf.len(), 1024);
    /// assert!(buf.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Result<Self, BipError> {
        Ok(Self::with_storage(heap_slots(capacity)?))
    }
}

impl<T, S: SlotStorage<T>> BipBuffer<T, S> {
    /// Wraps caller-supplied storage. The capacity is the storage length at
    /// this moment; existing slot contents are left as they are.
    pub fn with_storage(storage: S) -> Self {
        let capacity = storage.slots().len();
        Self {
            storage,
            capacity,
            a: Region::EMPTY,
            b: Region::EMPTY,
            reservation: None,
            _pd: PhantomData,
        }
    }

    /// Gives the storage back, discarding all cursors.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Reserves a contiguous write window of up to `len` slots.
    ///
    /// The window is truncated to the largest contiguous free span, so callers
    /// must check the returned length. Reserving again before `commit` replaces
    /// the pending window. Contents of the window are whatever the slots held
    /// before.
    ///
    /// # Errors
    /// `BipError::NoSpace` when the free span is exactly zero. Any pending
    /// reservation is dropped in that case too.
    pub fn reserve(&mut self, len: usize) -> Result<&mut [T], BipError> {
        let span = free_span(self.a, self.b, self.capacity);
        if span.is_empty() {
            self.reservation = None;
            debug!(capacity = self.capacity, requested = len, "bip buffer full");
            return Err(BipError::NoSpace);
        }

        if self.b.is_empty() && span.start != self.a.tail {
            trace!(free = span.len(), head_a = self.a.head, "reserve wrapped to front");
        }

        let window = span.truncate(len);
        self.reservation = Some(window);
        Ok(&mut self.storage.slots_mut()[window.range()])
    }

    /// Publishes the first `len` slots of the pending window.
    ///
    /// `len` is clamped to the window size. `commit(0)`, or a commit with no
    /// pending window, just discards the reservation.
    pub fn commit(&mut self, len: usize) {
        let Some(window) = self.reservation.take() else {
            return;
        };
        let committed = window.truncate(len);
        if committed.is_empty() {
            return;
        }

        if self.a.is_empty() && self.b.is_empty() {
            self.a = Region {
                head: committed.start,
                tail: committed.end,
            };
        } else if committed.start == self.a.tail {
            self.a.tail = committed.end;
        } else {
            // Wrapped window. A fresh B is anchored where the window starts
            // rather than trusting whatever head B was left at.
            if self.b.is_empty() {
                self.b = Region {
                    head: committed.start,
                    tail: committed.start,
                };
            }
            self.b.tail = committed.end;
        }

        self.debug_check();
    }

    /// Returns region A, or `None` when it holds nothing.
    ///
    /// Data in region B is not visible until A has been fully decommitted.
    #[inline]
    pub fn read(&self) -> Option<&[T]> {
        if self.a.is_empty() {
            return None;
        }
        Some(&self.storage.slots()[self.a.range()])
    }

    /// Mutable variant of [`BipBuffer::read`].
    #[inline]
    pub fn read_mut(&mut self) -> Option<&mut [T]> {
        if self.a.is_empty() {
            return None;
        }
        Some(&mut self.storage.slots_mut()[self.a.range()])
    }

    /// Releases `len` slots from the front of region A.
    ///
    /// Releasing all of A (or more) rotates region B into A's place.
    pub fn decommit(&mut self, len: usize) {
        if len >= self.a.len() {
            if !self.b.is_empty() {
                trace!(b_len = self.b.len(), "rotating region B into A");
            }
            self.a = self.b;
            self.b = Region::EMPTY;
        } else {
            self.a.head += len;
        }

        self.debug_check();
    }

    /// Size of the pending reservation, 0 if none.
    #[inline]
    pub fn reserved_len(&self) -> usize {
        self.reservation.map_or(0, |r| r.len())
    }

    /// Total committed slots across both regions.
    #[inline]
    pub fn committed_len(&self) -> usize {
        self.a.len() + self.b.len()
    }

    /// True when nothing is committed and nothing is reserved.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.committed_len() == 0 && self.reserved_len() == 0
    }

    /// True when the next `reserve` would fail with `NoSpace`.
    #[inline]
    pub fn is_full(&self) -> bool {
        free_span(self.a, self.b, self.capacity).is_empty()
    }

    /// Number of slots in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.capacity
    }

    /// Same as [`BipBuffer::len`].
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Resets every cursor. Slot contents are left untouched.
    pub fn clear(&mut self) {
        self.a = Region::EMPTY;
        self.b = Region::EMPTY;
        self.reservation = None;
    }

    /// Copies out regions A and B and the pending window, if any.
    pub fn cursors(&self) -> Cursors {
        Cursors {
            a: self.a,
            b: self.b,
            reservation: self.reservation,
        }
    }

    #[inline(always)]
    fn debug_check(&self) {
        debug_assert!(self.a.head <= self.a.tail && self.a.tail <= self.capacity);
        debug_assert!(self.b.head <= self.b.tail && self.b.tail <= self.capacity);
        debug_assert!(self.b.is_empty() || (!self.a.is_empty() && self.b.tail <= self.a.head));
    }
}

impl<T, S: SlotStorage<T> + Default> BipBuffer<T, S> {
    /// Clears the buffer and releases its storage. Afterwards `len()` is 0 and
    /// every `reserve` fails with `NoSpace`.
    pub fn free(&mut self) {
        self.clear();
        self.storage = S::default();
        self.capacity = 0;
    }
}

impl<T: Copy, S: SlotStorage<T>> BipBuffer<T, S> {
    /// Copies as much of `src` as fits in one contiguous window and commits it.
    ///
    /// Returns the number of elements written, which may be less than
    /// `src.len()`. An empty `src` writes nothing and never fails.
    ///
    /// # Errors
    /// `BipError::NoSpace` when the buffer is full.
    pub fn write_from(&mut self, src: &[T]) -> Result<usize, BipError> {
        if src.is_empty() {
            return Ok(0);
        }
        let window = self.reserve(src.len())?;
        let n = window.len();
        window.copy_from_slice(&src[..n]);
        self.commit(n);
        Ok(n)
    }

    /// Copies up to `dst.len()` elements out of region A and decommits them.
    ///
    /// Returns 0 when the buffer has nothing readable.
    pub fn read_into(&mut self, dst: &mut [T]) -> usize {
        let Some(block) = self.read() else {
            return 0;
        };
        let n = block.len().min(dst.len());
        dst[..n].copy_from_slice(&block[..n]);
        self.decommit(n);
        n
    }
}

impl<T, S> fmt::Debug for BipBuffer<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BipBuffer")
            .field("capacity", &self.capacity)
            .field("a", &self.a)
            .field("b", &self.b)
            .field("reservation", &self.reservation)
            .finish()
    }
}
