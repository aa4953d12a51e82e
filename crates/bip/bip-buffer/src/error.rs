use std::collections::TryReserveError;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum BipError {
    /// No contiguous free slot exists. Requests larger than the free span are
    /// truncated instead, so this only fires when the span is exactly zero.
    #[error("no contiguous space available")]
    NoSpace,

    #[error("failed to allocate {capacity} slots")]
    Alloc {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },
}

impl From<BipError> for io::Error {
    fn from(err: BipError) -> Self {
        match err {
            BipError::NoSpace => io::Error::new(io::ErrorKind::WouldBlock, err),
            BipError::Alloc { .. } => io::Error::new(io::ErrorKind::OutOfMemory, err),
        }
    }
}
