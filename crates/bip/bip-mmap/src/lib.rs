//! File-backed slot storage for `BipBuffer`.
//!
//! The slots live in a memory-mapped file instead of the heap. Only slot
//! contents are mapped; the buffer's cursors stay in process memory and are
//! not recovered when the file is reopened.

mod slots;

pub use slots::{MmapSlots, Pod};

use memmap2::MmapMut;
use std::{
    fs::{File, OpenOptions},
    io,
    path::Path,
};

/// A slot file mapped read-write. The file handle lives as long as the map.
pub struct MmapFileMut {
    _file: File,
    mmap: MmapMut,
}

impl MmapFileMut {
    /// Creates (or truncates) the slot file at `path`, sizes it to
    /// `size_bytes` zeroed bytes and maps it read-write.
    ///
    /// The caller must not resize the slot file while it is mapped.
    pub fn create_rw<P: AsRef<Path>>(path: P, size_bytes: u64) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        file.set_len(size_bytes)?;

        // SAFETY: the file was just created and truncated by us; nothing else
        // is expected to resize it while mapped.
        let mmap = unsafe { MmapMut::map_mut(&file)? };
        Ok(Self { _file: file, mmap })
    }

    /// Maps an existing slot file read-write at its current length.
    ///
    /// Slot contents are whatever the file holds; the caller must not resize
    /// or truncate the file while it is mapped.
    pub fn open_rw<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;

        // SAFETY: the slot file is not resized while mapped (see above).
        let mmap = unsafe { MmapMut::map_mut(&file)? };

        Ok(Self { _file: file, mmap })
    }

    /// First byte of the mapped slots.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.mmap.as_ptr()
    }

    /// Mutable pointer to the first mapped slot byte.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.mmap.as_mut_ptr()
    }

    /// Mapped length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Writes dirty slot pages back to the file before returning.
    pub fn flush(&self) -> io::Result<()> {
        self.mmap.flush()
    }
}
