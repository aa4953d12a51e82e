//! Backing storage for the buffer's slots.
//!
//! The buffer never grows or reallocates; it only needs a fixed-length,
//! contiguous run of `T` it can borrow. Heap storage is the default, and
//! other crates can plug in their own (for example a memory-mapped file).

use crate::error::BipError;

/// Fixed-length contiguous slots backing a `BipBuffer`.
///
/// Implementations must return slices of the same length for the whole
/// lifetime of the value; the buffer captures that length once as its
/// capacity.
pub trait SlotStorage<T> {
    fn slots(&self) -> &[T];
    fn slots_mut(&mut self) -> &mut [T];
}

impl<T> SlotStorage<T> for Box<[T]> {
    #[inline(always)]
    fn slots(&self) -> &[T] {
        self
    }

    #[inline(always)]
    fn slots_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T> SlotStorage<T> for Vec<T> {
    #[inline(always)]
    fn slots(&self) -> &[T] {
        self
    }

    #[inline(always)]
    fn slots_mut(&mut self) -> &mut [T] {
        self
    }
}

/// Allocates `capacity` default-valued slots on the heap.
///
/// # Errors
/// Returns `BipError::Alloc` if the allocator cannot satisfy the request.
pub fn heap_slots<T: Default>(capacity: usize) -> Result<Box<[T]>, BipError> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|source| BipError::Alloc { capacity, source })?;
    slots.resize_with(capacity, T::default);
    Ok(slots.into_boxed_slice())
}
