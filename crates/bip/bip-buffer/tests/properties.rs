//! Property tests: the buffer against a `VecDeque` model.
//!
//! Random operation sequences are applied to both the buffer and a plain FIFO
//! queue. Reservations may stay pending across consumer steps. After every
//! step the committed and reserved lengths must match the model, the cursor
//! invariants must hold, and draining must yield the model's contents in
//! order.

use bip_buffer::{BipBuffer, Cursors};
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Op {
    /// reserve(len), fill with a running counter, commit(commit)
    Write { len: usize, commit: usize },
    /// reserve(len) then commit(0)
    Abandon { len: usize },
    /// reserve(len) and fill it, leaving the window pending
    Reserve { len: usize },
    /// commit(len) whatever window is pending
    Commit { len: usize },
    /// decommit(len) from the current read block
    Consume { len: usize },
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0usize..24, 0usize..24).prop_map(|(len, commit)| Op::Write { len, commit }),
        1 => (0usize..24).prop_map(|len| Op::Abandon { len }),
        2 => (0usize..24).prop_map(|len| Op::Reserve { len }),
        2 => (0usize..24).prop_map(|len| Op::Commit { len }),
        4 => (0usize..24).prop_map(|len| Op::Consume { len }),
        1 => Just(Op::Clear),
    ]
}

fn assert_invariants(c: &Cursors, capacity: usize) {
    assert!(c.a.head <= c.a.tail && c.a.tail <= capacity, "{c:?}");
    assert!(c.b.head <= c.b.tail && c.b.tail <= capacity, "{c:?}");
    if !c.b.is_empty() {
        assert!(!c.a.is_empty(), "B without A: {c:?}");
        assert!(c.b.tail <= c.a.head, "B overlaps A: {c:?}");
    }
    if let Some(r) = c.reservation {
        assert!(r.start <= r.end && r.end <= capacity, "{c:?}");
        if !r.is_empty() {
            for region in [c.a, c.b] {
                let disjoint = region.is_empty() || r.end <= region.head || r.start >= region.tail;
                assert!(disjoint, "window overlaps committed data: {c:?}");
            }
        }
    }
}

/// Fills `window` from the running counter and returns what was written.
fn fill(window: &mut [u32], next: &mut u32) -> Vec<u32> {
    for slot in window.iter_mut() {
        *slot = *next;
        *next += 1;
    }
    window.to_vec()
}

proptest! {
    #[test]
    fn behaves_like_a_fifo(capacity in 0usize..20, ops in prop::collection::vec(op(), 1..64)) {
        let mut buf = BipBuffer::<u32>::new(capacity).unwrap();
        let mut model: VecDeque<u32> = VecDeque::new();
        let mut next = 0u32;
        // Contents of the pending window, if any.
        let mut pending: Option<Vec<u32>> = None;

        for op in ops {
            match op {
                Op::Write { len, commit } => {
                    let full = buf.is_full();
                    match buf.reserve(len) {
                        Ok(window) => {
                            prop_assert!(!full);
                            prop_assert!(window.len() <= len);
                            let reserved = fill(window, &mut next);
                            buf.commit(commit);
                            let n = commit.min(reserved.len());
                            model.extend(&reserved[..n]);
                        }
                        Err(_) => prop_assert!(full),
                    }
                    pending = None;
                }
                Op::Abandon { len } => {
                    let _ = buf.reserve(len);
                    buf.commit(0);
                    pending = None;
                }
                Op::Reserve { len } => {
                    pending = match buf.reserve(len) {
                        Ok(window) => Some(fill(window, &mut next)),
                        Err(_) => None,
                    };
                }
                Op::Commit { len } => {
                    buf.commit(len);
                    if let Some(reserved) = pending.take() {
                        model.extend(&reserved[..len.min(reserved.len())]);
                    }
                }
                Op::Consume { len } => {
                    let block_len = buf.read().map_or(0, <[u32]>::len);
                    if let Some(block) = buf.read() {
                        prop_assert!(block.iter().eq(model.iter().take(block.len())));
                    }
                    buf.decommit(len);
                    // Over-consuming drains A only; B rotates in untouched.
                    model.drain(..len.min(block_len));
                }
                Op::Clear => {
                    buf.clear();
                    model.clear();
                    pending = None;
                }
            }

            prop_assert_eq!(buf.committed_len(), model.len());
            prop_assert_eq!(buf.reserved_len(), pending.as_ref().map_or(0, Vec::len));
            assert_invariants(&buf.cursors(), capacity);
        }

        buf.commit(0);
        let mut drained = Vec::new();
        while let Some(block) = buf.read() {
            drained.extend_from_slice(block);
            let n = block.len();
            buf.decommit(n);
        }
        prop_assert_eq!(drained, model.into_iter().collect::<Vec<_>>());
        prop_assert!(buf.read().is_none());
    }

    #[test]
    fn reserve_returns_whole_free_span(capacity in 1usize..32, fill in 0usize..32, drain in 0usize..32) {
        let mut buf = BipBuffer::<u8>::new(capacity).unwrap();
        let fill = fill.min(capacity);
        buf.reserve(fill).unwrap();
        buf.commit(fill);
        buf.decommit(drain.min(fill.saturating_sub(1)));

        let c = buf.cursors();
        let free = if capacity - c.a.tail >= c.a.head {
            capacity - c.a.tail
        } else {
            c.a.head
        };

        match buf.reserve(usize::MAX) {
            Ok(window) => prop_assert_eq!(window.len(), free),
            Err(_) => prop_assert_eq!(free, 0),
        }
    }
}
