//! Batched latency report for the bip buffer.
//!
//! Prints a percentile table per workload, then the same results as JSON so
//! runs can be diffed or plotted.

use std::hint::black_box;
use std::mem::size_of;

use bip_buffer::{BipBuffer, Cursors};
use bip_perf::*;

const CAPACITY: usize = 1 << 16;
const BATCHES: usize = 1_000;
const BATCH_SIZE: usize = 1_000;
const WARMUP: usize = 50;

fn main() {
    let mut results: Vec<BenchResult> = Vec::new();

    print_banner();
    section_layout();

    section_header("STEADY CYCLE (no wrap)");
    print_table_header();
    for chunk in [64usize, 1024, 16 * 1024] {
        let mut buf = BipBuffer::<u8>::new(CAPACITY).expect("allocate buffer");
        let payload = vec![0x5A; chunk];
        let r = measure_batched(
            &format!("steady {chunk}B"),
            chunk,
            BATCHES,
            BATCH_SIZE,
            WARMUP,
            || {
                black_box(steady_cycle(&mut buf, &payload));
            },
        );
        print_result_row(&r);
        results.push(r);
    }

    section_header("WRAP CYCLE (half full, rotating)");
    print_table_header();
    for chunk in [64usize, 1024, 16 * 1024] {
        let mut w = Workload::new(CAPACITY, chunk);
        let r = measure_batched(
            &format!("wrap {chunk}B"),
            chunk,
            BATCHES,
            BATCH_SIZE,
            WARMUP,
            || {
                black_box(w.step());
            },
        );
        print_result_row(&r);
        results.push(r);
    }

    section_header("QUERIES");
    print_table_header();
    let w = Workload::new(CAPACITY, 64);
    let r = measure_batched("committed_len", 1, BATCHES, BATCH_SIZE, WARMUP, || {
        black_box(w.buf.committed_len());
    });
    print_result_row(&r);
    results.push(r);
    let r = measure_batched("is_full", 1, BATCHES, BATCH_SIZE, WARMUP, || {
        black_box(w.buf.is_full());
    });
    print_result_row(&r);
    results.push(r);

    section_header("JSON");
    match serde_json::to_string_pretty(&results) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("failed to serialize results: {e}"),
    }
}

fn print_banner() {
    let bar = "\u{2550}".repeat(90);
    println!("\n{bar}");
    println!("  BIP BUFFER PERFORMANCE REPORT");
    println!("  batched: {BATCHES} batches x {BATCH_SIZE} ops, {WARMUP} warmup batches");
    println!("{bar}\n");
}

fn section_layout() {
    section_header("LAYOUT");
    println!("  {:<32} {:>8}", "BipBuffer<u8> (struct)", size_of::<BipBuffer<u8>>());
    println!("  {:<32} {:>8}", "Cursors snapshot", size_of::<Cursors>());
    println!("  {:<32} {:>8}", "capacity (slots)", CAPACITY);
}

fn section_header(title: &str) {
    println!("\n{}", "\u{2500}".repeat(90));
    println!("  {title}");
    println!("{}\n", "\u{2500}".repeat(90));
}

fn print_table_header() {
    println!(
        "  {:<24} {:>10} {:>10} {:>10} {:>10} {:>10} {:>12}",
        "Workload", "p50", "p90", "p99", "p99.9", "max", "GB/s @p50"
    );
}

fn print_result_row(r: &BenchResult) {
    let s = &r.stats;
    // bytes per ns is GB/s
    let gbps = r.elems_per_op as f64 / s.p50 as f64;
    println!(
        "  {:<24} {:>10} {:>10} {:>10} {:>10} {:>10} {:>12.2}",
        r.name,
        format_ns(s.p50 as f64),
        format_ns(s.p90 as f64),
        format_ns(s.p99 as f64),
        format_ns(s.p999 as f64),
        format_ns(s.max as f64),
        gbps,
    );
}
