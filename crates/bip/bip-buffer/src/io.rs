//! `std::io` adapters for byte buffers.
//!
//! Writing copies into one contiguous window per call, so a single `write`
//! may accept fewer bytes than offered (standard `Write` semantics). A full
//! buffer reports `WouldBlock`; an empty buffer reads as `Ok(0)`.
//!
//! # Name clash with `BipBuffer::read`
//! With `std::io::Read` in scope, `buf.read()` on a `&mut BipBuffer<u8, _>`
//! resolves to `io::Read::read` (the `&mut self` receiver is tried before
//! `&self`) and fails to compile. Call the block view through its path:
//!
//! ```
//! use bip_buffer::BipBuffer;
//! use std::io::{Read, Write};
//!
//! let mut buf = BipBuffer::<u8>::new(8).unwrap();
//! buf.write_all(b"abc").unwrap();
//! assert_eq!(BipBuffer::read(&buf), Some(&b"abc"[..]));
//!
//! let mut out = [0u8; 3];
//! buf.read_exact(&mut out).unwrap();
//! assert_eq!(&out, b"abc");
//! ```

use crate::buffer::BipBuffer;
use crate::storage::SlotStorage;
use std::io;

impl<S: SlotStorage<u8>> io::Write for BipBuffer<u8, S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.write_from(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: SlotStorage<u8>> io::Read for BipBuffer<u8, S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_into(buf))
    }
}
