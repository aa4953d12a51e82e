//! Streams stdin to stdout through a bip buffer.
//!
//! Input is read straight into reserved windows and output is written straight
//! from readable blocks, so bytes are never staged in a second buffer.
//!
//! ```text
//! bippipe [CONFIG.toml] < input > output
//! ```

use anyhow::{Context, Result};
use bip_buffer::{BipBuffer, BipError, SlotStorage};
use bip_config::PipeConfig;
use bip_mmap::MmapSlots;
use std::io::{self, ErrorKind, Read, Write};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct PumpStats {
    bytes_in: u64,
    bytes_out: u64,
    /// Times a reservation wrapped to the front and started region B.
    wraps: u64,
    /// Times the buffer was full and the writer had to drain first.
    stalls: u64,
}

fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            PipeConfig::load(&path).with_context(|| format!("loading config from {path}"))?
        }
        None => PipeConfig::default(),
    };
    config.validate()?;

    init_tracing(&config.log_level);
    info!(
        capacity = config.capacity,
        chunk_size = config.chunk_size,
        backing_file = ?config.backing_file,
        "bippipe starting"
    );

    let input = io::stdin().lock();
    let output = io::stdout().lock();

    let stats = match &config.backing_file {
        Some(path) => {
            let slots = MmapSlots::<u8>::create(path, config.capacity)
                .with_context(|| format!("mapping slot file {path}"))?;
            let mut buf = BipBuffer::with_storage(slots);
            pump(&mut buf, input, output, config.chunk_size)?
        }
        None => {
            let mut buf =
                BipBuffer::<u8>::new(config.capacity).context("allocating bip buffer")?;
            pump(&mut buf, input, output, config.chunk_size)?
        }
    };

    info!(
        bytes = stats.bytes_out,
        wraps = stats.wraps,
        stalls = stats.stalls,
        "bippipe done"
    );
    Ok(())
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Copies `input` to `output` through `buf` until `input` hits EOF.
///
/// Once half the buffer is committed, the consumer side writes out at most
/// `chunk_size` bytes per step, so region A is drained gradually and the
/// producer regularly wraps into region B.
fn pump<S, R, W>(
    buf: &mut BipBuffer<u8, S>,
    mut input: R,
    mut output: W,
    chunk_size: usize,
) -> io::Result<PumpStats>
where
    S: SlotStorage<u8>,
    R: Read,
    W: Write,
{
    let mut stats = PumpStats::default();
    let high_water = (buf.capacity() / 2).max(1);

    loop {
        let had_b = !buf.cursors().b.is_empty();

        let window = match buf.reserve(chunk_size) {
            Ok(window) => window,
            Err(BipError::NoSpace) => {
                stats.stalls += 1;
                drain_chunk(buf, &mut output, chunk_size, &mut stats)?;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let n = read_retrying(&mut input, window)?;
        if n == 0 {
            buf.commit(0);
            break;
        }
        buf.commit(n);
        stats.bytes_in += n as u64;

        if !had_b && !buf.cursors().b.is_empty() {
            stats.wraps += 1;
        }

        if buf.committed_len() >= high_water {
            drain_chunk(buf, &mut output, chunk_size, &mut stats)?;
        }
    }

    while drain_chunk(buf, &mut output, usize::MAX, &mut stats)? {}
    output.flush()?;

    debug!(?stats, "pump finished");
    Ok(stats)
}

/// Writes up to `max` bytes from the readable block and decommits them.
/// Returns false when nothing was readable.
fn drain_chunk<S: SlotStorage<u8>, W: Write>(
    buf: &mut BipBuffer<u8, S>,
    output: &mut W,
    max: usize,
    stats: &mut PumpStats,
) -> io::Result<bool> {
    // `io::Read` is in scope; name the inherent block view explicitly.
    let Some(block) = BipBuffer::read(&*buf) else {
        return Ok(false);
    };
    let n = block.len().min(max);
    output.write_all(&block[..n])?;
    buf.decommit(n);
    stats.bytes_out += n as u64;
    Ok(true)
}

fn read_retrying<R: Read>(input: &mut R, window: &mut [u8]) -> io::Result<usize> {
    loop {
        match input.read(window) {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 31 % 251) as u8).collect()
    }

    #[test]
    fn output_matches_input() {
        let input = pattern(10_000);
        let mut buf = BipBuffer::<u8>::new(16).unwrap();
        let mut output = Vec::new();

        let stats = pump(&mut buf, Cursor::new(&input), &mut output, 5).unwrap();

        assert_eq!(output, input);
        assert_eq!(stats.bytes_in, 10_000);
        assert_eq!(stats.bytes_out, 10_000);
        assert!(stats.wraps > 0, "{stats:?}");
        assert!(buf.is_empty());
    }

    #[test]
    fn empty_input() {
        let mut buf = BipBuffer::<u8>::new(8).unwrap();
        let mut output = Vec::new();
        let stats = pump(&mut buf, io::empty(), &mut output, 4).unwrap();
        assert!(output.is_empty());
        assert_eq!(stats, PumpStats::default());
    }

    #[test]
    fn chunk_larger_than_capacity() {
        let input = pattern(777);
        let mut buf = BipBuffer::<u8>::new(10).unwrap();
        let mut output = Vec::new();
        pump(&mut buf, Cursor::new(&input), &mut output, 64).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn drain_chunk_writes_at_most_max() {
        let mut buf = BipBuffer::<u8>::new(8).unwrap();
        buf.write_from(&[1, 2, 3, 4, 5]).unwrap();
        let mut output = Vec::new();
        let mut stats = PumpStats::default();

        assert!(drain_chunk(&mut buf, &mut output, 2, &mut stats).unwrap());
        assert_eq!(output, [1, 2]);
        assert_eq!(stats.bytes_out, 2);
        assert_eq!(buf.committed_len(), 3);

        assert!(drain_chunk(&mut buf, &mut output, usize::MAX, &mut stats).unwrap());
        assert_eq!(output, [1, 2, 3, 4, 5]);
        assert!(!drain_chunk(&mut buf, &mut output, usize::MAX, &mut stats).unwrap());
    }

    /// A reader that hands out one byte at a time and is interrupted between.
    struct Trickle<'a> {
        data: &'a [u8],
        interrupt: bool,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            let Some((&first, rest)) = self.data.split_first() else {
                return Ok(0);
            };
            out[0] = first;
            self.data = rest;
            Ok(1)
        }
    }

    #[test]
    fn interrupted_and_short_reads() {
        let input = pattern(300);
        let mut buf = BipBuffer::<u8>::new(7).unwrap();
        let mut output = Vec::new();
        let reader = Trickle {
            data: &input,
            interrupt: false,
        };
        pump(&mut buf, reader, &mut output, 3).unwrap();
        assert_eq!(output, input);
    }
}
