//! Cursor pairs and free-space arithmetic for the two-region layout.
//!
//! This module holds the pure index math behind the buffer:
//! - `Region`: a committed half-open span `[head, tail)`
//! - `Reservation`: the pending write window `[start, end)`
//! - `free_span`: where the next reservation may go, and how large it may be
//!
//! Nothing here touches storage, so every rule is testable in isolation.

use std::ops::Range;

/// A committed, half-open span of slots: `[head, tail)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Region {
    /// First readable slot.
    pub head: usize,
    /// One past the last readable slot.
    pub tail: usize,
}

impl Region {
    /// The empty region anchored at offset 0.
    pub const EMPTY: Region = Region { head: 0, tail: 0 };

    /// Number of committed slots.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.tail - self.head
    }

    /// True when the region holds no slots.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.tail == self.head
    }

    /// Slot indices covered, for slicing storage.
    #[inline(always)]
    pub fn range(&self) -> Range<usize> {
        self.head..self.tail
    }
}

/// The pending write window handed out by `reserve`: `[start, end)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Reservation {
    /// First slot of the window.
    pub start: usize,
    /// One past the last slot of the window.
    pub end: usize,
}

impl Reservation {
    /// Number of slots in the window.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for a zero-length window.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Slot indices covered by the window.
    #[inline(always)]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Shrinks the window to at most `len` slots, keeping its start.
    #[inline(always)]
    pub fn truncate(self, len: usize) -> Self {
        Self {
            start: self.start,
            end: self.start + len.min(self.len()),
        }
    }
}

/// Computes the largest contiguous free span for the next reservation.
///
/// # Rules
///
/// 1. **B active**: the only legal span is `[b.tail, a.head)`. A third region
///    cannot be represented, so the writer must fill the gap in front of A.
/// 2. **B empty**: prefer the space after A. If `capacity - a.tail >= a.head`
///    the span is `[a.tail, capacity)`; otherwise the writer wraps and the span
///    is `[0, a.head)`, which starts (or extends) region B on commit.
///
/// # Examples
///
/// With `capacity = 8`:
/// ```text
/// A = [2, 5), B = []      → after A: 3 slots, before A: 2 → [5, 8)
/// A = [5, 7), B = []      → after A: 1 slot,  before A: 5 → [0, 5)
/// A = [5, 8), B = [0, 2)  → B active                      → [2, 5)
/// A = [0, 8), B = []      → full                          → [8, 8)
/// ```
///
/// A zero-length result means the buffer is genuinely full.
#[inline(always)]
pub fn free_span(a: Region, b: Region, capacity: usize) -> Reservation {
    if !b.is_empty() {
        return Reservation {
            start: b.tail,
            end: a.head,
        };
    }

    let after_a = capacity - a.tail;
    if after_a >= a.head {
        Reservation {
            start: a.tail,
            end: capacity,
        }
    } else {
        Reservation {
            start: 0,
            end: a.head,
        }
    }
}
