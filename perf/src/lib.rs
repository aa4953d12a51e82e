//! Shared measurement helpers and workloads for the bip buffer benchmarks.
//!
//! Criterion benches and the `perf_report` binary drive the same workloads,
//! so their numbers describe the same code paths.

use bip_buffer::BipBuffer;
use std::hint::black_box;
use std::time::Instant;

// ─── Statistics ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Stats {
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub stddev: f64,
    pub p50: u64,
    pub p90: u64,
    pub p99: u64,
    pub p999: u64,
    pub count: usize,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct BenchResult {
    pub name: String,
    pub unit: String,
    /// Elements moved per measured op; lets the report derive throughput.
    pub elems_per_op: usize,
    pub stats: Stats,
}

/// Sorts `samples` in place and summarizes them.
///
/// # Panics
/// Panics on an empty sample set.
pub fn compute_stats(samples: &mut [u64]) -> Stats {
    assert!(!samples.is_empty(), "cannot compute stats on empty samples");
    samples.sort_unstable();

    let count = samples.len();
    let mean = samples.iter().map(|&x| x as f64).sum::<f64>() / count as f64;
    let variance = samples
        .iter()
        .map(|&x| (x as f64 - mean).powi(2))
        .sum::<f64>()
        / count as f64;

    Stats {
        min: samples[0],
        max: samples[count - 1],
        mean,
        stddev: variance.sqrt(),
        p50: percentile_sorted(samples, 50.0),
        p90: percentile_sorted(samples, 90.0),
        p99: percentile_sorted(samples, 99.0),
        p999: percentile_sorted(samples, 99.9),
        count,
    }
}

/// Nearest-rank percentile over an already sorted slice.
pub fn percentile_sorted(sorted: &[u64], pct: f64) -> u64 {
    let rank = (pct / 100.0 * sorted.len() as f64).ceil() as usize;
    sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
}

// ─── Measurement Harness ────────────────────────────────────────────────────

/// Times `batches` runs of `batch_size` calls to `f` and reports ns per call.
///
/// Batching amortizes the cost of `Instant::now()` for operations that take
/// only a few nanoseconds.
pub fn measure_batched<F: FnMut()>(
    name: &str,
    elems_per_op: usize,
    batches: usize,
    batch_size: usize,
    warmup: usize,
    mut f: F,
) -> BenchResult {
    for _ in 0..warmup * batch_size {
        f();
    }

    let mut samples = Vec::with_capacity(batches);
    for _ in 0..batches {
        let start = Instant::now();
        for _ in 0..batch_size {
            f();
        }
        let total = start.elapsed().as_nanos();
        let per_op = (total + batch_size as u128 / 2) / batch_size as u128;
        samples.push((per_op as u64).max(1));
    }

    BenchResult {
        name: name.to_string(),
        unit: "ns/op".to_string(),
        elems_per_op,
        stats: compute_stats(&mut samples),
    }
}

// ─── Workloads ──────────────────────────────────────────────────────────────

/// A byte buffer kept partially full so that producing and consuming in
/// lock-step keeps wrapping the write window into region B.
pub struct Workload {
    pub buf: BipBuffer<u8>,
    chunk: usize,
    payload: Vec<u8>,
}

impl Workload {
    /// Builds a buffer of `capacity` bytes, half full, with region A starting
    /// off offset 0.
    ///
    /// # Panics
    /// Panics if `chunk` is zero or larger than `capacity / 4`.
    pub fn new(capacity: usize, chunk: usize) -> Self {
        assert!(chunk > 0 && chunk <= capacity / 4, "chunk must fit four times");
        let mut buf = BipBuffer::<u8>::new(capacity).expect("allocate workload buffer");
        let payload: Vec<u8> = (0..chunk).map(|i| i as u8).collect();

        // Start with a short head block so that, once released, region A
        // sits off offset 0 and the producer has to wrap.
        let skew = chunk / 2 + 1;
        buf.reserve(skew).expect("fresh buffer has space");
        buf.commit(skew);

        let mut w = Self {
            buf,
            chunk,
            payload,
        };
        while w.buf.committed_len() < capacity / 2 + skew {
            w.produce();
        }
        w.buf.decommit(skew);
        w
    }

    /// Reserve, fill and commit one chunk. Returns the bytes committed.
    #[inline]
    pub fn produce(&mut self) -> usize {
        match self.buf.reserve(self.chunk) {
            Ok(window) => {
                let n = window.len();
                window.copy_from_slice(&self.payload[..n]);
                self.buf.commit(n);
                n
            }
            Err(_) => 0,
        }
    }

    /// Read and decommit up to one chunk. Returns the bytes released.
    #[inline]
    pub fn consume(&mut self) -> usize {
        match self.buf.read() {
            Some(block) => {
                let n = block.len().min(self.chunk);
                black_box(&block[..n]);
                self.buf.decommit(n);
                n
            }
            None => 0,
        }
    }

    /// One produce plus one consume.
    #[inline]
    pub fn step(&mut self) -> usize {
        self.produce() + self.consume()
    }
}

/// Fill the whole window, publish it, then read and release everything.
/// Region A stays anchored at 0, so no wraps happen.
#[inline]
pub fn steady_cycle(buf: &mut BipBuffer<u8>, payload: &[u8]) -> usize {
    let n = buf.write_from(payload).unwrap_or(0);
    if let Some(block) = buf.read() {
        black_box(block);
        let len = block.len();
        buf.decommit(len);
    }
    n
}

pub fn format_ns(ns: f64) -> String {
    let abs = ns.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1} ms", ns / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.1} us", ns / 1_000.0)
    } else {
        format!("{:.0} ns", ns)
    }
}
