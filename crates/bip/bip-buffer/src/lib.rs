//! # bip-buffer
//!
//! A bi-partite circular buffer: fixed-capacity storage that always hands out
//! contiguous write and read windows, even when the logical data straddles the
//! end of the backing slots.
//!
//! - Producer workflow: `reserve` → write into the window → `commit`
//! - Consumer workflow: `read` → process the block → `decommit`
//!
//! ## Example
//!
//! ```
//! use bip_buffer::BipBuffer;
//!
//! let mut buf = BipBuffer::<u8>::new(4).unwrap();
//!
//! let window = buf.reserve(4).unwrap();
//! window.copy_from_slice(&[7, 22, 218, 56]);
//! buf.commit(4);
//!
//! buf.decommit(2);
//! assert_eq!(buf.read(), Some(&[218, 56][..]));
//!
//! // Only the two freed slots at the front are available; the window wraps.
//! let window = buf.reserve(4).unwrap();
//! assert_eq!(window.len(), 2);
//! window.copy_from_slice(&[49, 81]);
//! buf.commit(2);
//!
//! // The wrapped data becomes readable once the old data is consumed.
//! assert_eq!(buf.read(), Some(&[218, 56][..]));
//! buf.decommit(2);
//! assert_eq!(buf.read(), Some(&[49, 81][..]));
//! ```

mod buffer;
mod error;
mod io;
mod region;
mod storage;

pub use buffer::{BipBuffer, Cursors};
pub use error::BipError;
pub use region::{Region, Reservation};
pub use storage::{SlotStorage, heap_slots};
