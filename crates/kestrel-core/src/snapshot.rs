//! Lock-free top-of-book publication.
//!
//! The book writer publishes `{best_bid, best_ask, sequence}` after every
//! successful mutation through a sequence-locked cell. Readers on other
//! threads only ever see a complete publication: they retry while the
//! version is odd (write in flight) or changed underneath them.
//!
//! Single writer, any number of readers. All fields are atomics, so a torn
//! read is detected rather than being undefined behaviour.

use core::sync::atomic::{fence, AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use crate::fixed::Price;

/// Raw value stored for an empty side.
const ABSENT: i64 = i64::MIN;

/// Padded atomic counter to prevent false sharing with the payload.
/// Uses 128-byte alignment to ensure it occupies its own cache line.
#[repr(C, align(128))]
struct PaddedAtomicU64 {
    value: AtomicU64,
}

impl PaddedAtomicU64 {
    const fn new(v: u64) -> Self {
        Self {
            value: AtomicU64::new(v),
        }
    }
}

/// Consistent view of the top of the book.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TopOfBook {
    pub best_bid: Option<Price>,
    pub best_ask: Option<Price>,
    /// Book sequence at publication time.
    pub sequence: u64,
}

#[inline(always)]
fn encode(price: Option<Price>) -> i64 {
    price.map_or(ABSENT, |p| p.0)
}

#[inline(always)]
fn decode(raw: i64) -> Option<Price> {
    if raw == ABSENT { None } else { Some(Price(raw)) }
}

/// Sequence-locked publication cell.
#[repr(C)]
pub struct SnapshotCell {
    /// Even = stable, odd = write in progress.
    version: PaddedAtomicU64,
    best_bid: AtomicI64,
    best_ask: AtomicI64,
    sequence: AtomicU64,
}

impl SnapshotCell {
    /// Create a cell holding the empty-book snapshot.
    pub const fn new() -> Self {
        Self {
            version: PaddedAtomicU64::new(0),
            best_bid: AtomicI64::new(ABSENT),
            best_ask: AtomicI64::new(ABSENT),
            sequence: AtomicU64::new(0),
        }
    }

    /// Publish a new snapshot.
    ///
    /// Must only be called by the single writer.
    #[inline]
    pub fn publish(&self, top: TopOfBook) {
        let version = self.version.value.load(Ordering::Relaxed);
        self.version.value.store(version.wrapping_add(1), Ordering::Relaxed);
        // Odd version must be visible before any payload store
        fence(Ordering::Release);

        self.best_bid.store(encode(top.best_bid), Ordering::Relaxed);
        self.best_ask.store(encode(top.best_ask), Ordering::Relaxed);
        self.sequence.store(top.sequence, Ordering::Relaxed);

        self.version.value.store(version.wrapping_add(2), Ordering::Release);
    }

    /// Try to read a consistent snapshot once.
    ///
    /// Returns `None` if a publication raced with the read.
    #[inline]
    pub fn try_load(&self) -> Option<TopOfBook> {
        let before = self.version.value.load(Ordering::Acquire);
        if before & 1 == 1 {
            return None;
        }

        let best_bid = self.best_bid.load(Ordering::Relaxed);
        let best_ask = self.best_ask.load(Ordering::Relaxed);
        let sequence = self.sequence.load(Ordering::Relaxed);

        fence(Ordering::Acquire);
        let after = self.version.value.load(Ordering::Relaxed);
        if before != after {
            return None;
        }

        Some(TopOfBook {
            best_bid: decode(best_bid),
            best_ask: decode(best_ask),
            sequence,
        })
    }

    /// Read a consistent snapshot, spinning while a write is in flight.
    #[inline]
    pub fn load(&self) -> TopOfBook {
        loop {
            if let Some(top) = self.try_load() {
                return top;
            }
            core::hint::spin_loop();
        }
    }
}

impl Default for SnapshotCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable read handle onto a book's published top of book.
#[derive(Clone)]
pub struct TopOfBookReader {
    cell: Arc<SnapshotCell>,
}

impl TopOfBookReader {
    pub(crate) fn new(cell: Arc<SnapshotCell>) -> Self {
        Self { cell }
    }

    /// Latest published snapshot.
    #[inline(always)]
    pub fn load(&self) -> TopOfBook {
        self.cell.load()
    }

    /// Latest published `(best_bid, best_ask)`.
    #[inline(always)]
    pub fn best_bid_ask(&self) -> (Option<Price>, Option<Price>) {
        let top = self.cell.load();
        (top.best_bid, top.best_ask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_empty_snapshot() {
        let cell = SnapshotCell::new();
        assert_eq!(cell.load(), TopOfBook::default());
    }

    #[test]
    fn test_publish_load() {
        let cell = SnapshotCell::new();
        let top = TopOfBook {
            best_bid: Some(Price(100)),
            best_ask: None,
            sequence: 7,
        };
        cell.publish(top);
        assert_eq!(cell.load(), top);
        assert_eq!(cell.try_load(), Some(top));
    }

    #[test]
    fn test_concurrent_readers_never_see_torn_state() {
        let cell = Arc::new(SnapshotCell::new());
        let reader = TopOfBookReader::new(Arc::clone(&cell));

        // Every publication satisfies ask = bid + 1 and bid = sequence
        let writer = thread::spawn(move || {
            for seq in 1..=20_000u64 {
                cell.publish(TopOfBook {
                    best_bid: Some(Price(seq as i64)),
                    best_ask: Some(Price(seq as i64 + 1)),
                    sequence: seq,
                });
            }
        });

        let mut last_seq = 0;
        while last_seq < 20_000 {
            let top = reader.load();
            if top.sequence == 0 {
                continue;
            }
            assert_eq!(top.best_bid, Some(Price(top.sequence as i64)));
            assert_eq!(top.best_ask, Some(Price(top.sequence as i64 + 1)));
            assert!(top.sequence >= last_seq);
            last_seq = top.sequence;
        }

        writer.join().unwrap();
    }
}
