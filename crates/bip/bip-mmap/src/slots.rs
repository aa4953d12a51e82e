use crate::MmapFileMut;
use bip_buffer::SlotStorage;
use std::io;
use std::marker::PhantomData;
use std::mem::{align_of, size_of};
use std::path::Path;
use tracing::debug;

/// Element types that may live in a mapped file.
///
/// # Safety
/// Every bit pattern, including all zeroes, must be a valid value of the
/// type, and the type must contain no pointers or padding.
pub unsafe trait Pod: Copy + 'static {}

macro_rules! impl_pod {
    ($($t:ty),*) => { $(unsafe impl Pod for $t {})* };
}

impl_pod!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

unsafe impl<T: Pod, const N: usize> Pod for [T; N] {}

/// Fixed-length slots of `T` backed by a memory-mapped file.
///
/// # Memory Layout
/// ```text
/// ┌──────────┬──────────┬─────┬────────────────────┐
/// │ slot[0]  │ slot[1]  │ ... │ slot[capacity - 1] │
/// └──────────┴──────────┴─────┴────────────────────┘
///  size_of::<T>() bytes each, no header
/// ```
pub struct MmapSlots<T: Pod> {
    file: MmapFileMut,
    capacity: usize,
    _pd: PhantomData<T>,
}

impl<T: Pod> MmapSlots<T> {
    /// Creates (or truncates) `path` with room for `capacity` zeroed slots.
    ///
    /// # Errors
    /// - `InvalidInput` for zero capacity, zero-sized `T`, or a byte size that
    ///   overflows
    /// - Any I/O error from creating, sizing or mapping the file
    pub fn create<P: AsRef<Path>>(path: P, capacity: usize) -> io::Result<Self> {
        if capacity == 0 || size_of::<T>() == 0 {
            return Err(invalid_input("mmap slots need a non-zero capacity and element size"));
        }
        let bytes = capacity
            .checked_mul(size_of::<T>())
            .ok_or_else(|| invalid_input("slot region size overflows usize"))?;

        let file = MmapFileMut::create_rw(path, bytes as u64)?;
        debug!(capacity, bytes, "mapped bip slot file");
        Self::from_file(file, capacity)
    }

    /// Maps an existing slot file. The capacity is derived from the file size,
    /// which must be a whole number of slots.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        if size_of::<T>() == 0 {
            return Err(invalid_input("zero-sized slot type"));
        }
        let file = MmapFileMut::open_rw(path)?;
        if file.is_empty() || file.len() % size_of::<T>() != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "file size is not a whole number of slots",
            ));
        }
        let capacity = file.len() / size_of::<T>();
        Self::from_file(file, capacity)
    }

    fn from_file(file: MmapFileMut, capacity: usize) -> io::Result<Self> {
        // Mappings are page aligned, so this only trips for exotic alignments.
        if (file.as_ptr() as usize) % align_of::<T>() != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "mapping is misaligned for slot type",
            ));
        }
        Ok(Self {
            file,
            capacity,
            _pd: PhantomData,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Writes dirty slot pages back to the file.
    pub fn flush(&self) -> io::Result<()> {
        self.file.flush()
    }
}

impl<T: Pod> SlotStorage<T> for MmapSlots<T> {
    #[inline(always)]
    fn slots(&self) -> &[T] {
        // SAFETY: the mapping holds exactly `capacity * size_of::<T>()` bytes,
        // is aligned for T (checked in `from_file`), and any bit pattern is a
        // valid T (Pod). The borrow is tied to &self, which owns the mapping.
        unsafe { std::slice::from_raw_parts(self.file.as_ptr() as *const T, self.capacity) }
    }

    #[inline(always)]
    fn slots_mut(&mut self) -> &mut [T] {
        // SAFETY: as above, and &mut self guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.file.as_mut_ptr() as *mut T, self.capacity) }
    }
}

fn invalid_input(msg: &'static str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, msg)
}
