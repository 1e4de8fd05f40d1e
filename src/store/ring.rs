//! Fixed-capacity circular sample buffer.
//!
//! Holds parallel arrays of time deltas and packed coordinate deltas. Slot `i`
//! of the logical sequence always lives at `i mod capacity`; the
//! `(capacity + 1)`-th push overwrites slot 0.
//!
//! # Invariants
//! - `total_pushed` is monotonic and may exceed `capacity`.
//! - The number of resident samples is `min(total_pushed, capacity)`.
//! - Slot 0 initially holds the origin sample, which has no predecessor. It is
//!   excluded from snapshots until the ring wraps over it.

use alloc::vec;
use alloc::vec::Vec;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::CoordDelta;

/// Circular buffer of time and coordinate deltas.
pub struct SampleStore {
    time: Vec<u32>,
    coord: Vec<u32>,
    total_pushed: u64,
}

/// Ordered copy of the resident deltas, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Snapshot {
    /// Time deltas in ticks.
    pub time: Vec<u32>,
    /// Coordinate deltas.
    pub coord: Vec<CoordDelta>,
}

impl Snapshot {
    /// Number of samples in the snapshot.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// True when no usable sample is present.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

impl SampleStore {
    /// Creates an empty store holding up to `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            time: vec![0; capacity],
            coord: vec![0; capacity],
            total_pushed: 0,
        }
    }

    /// Rebuilds a store from raw slot contents.
    ///
    /// Both slices must have the same length, which becomes the capacity.
    pub(crate) fn from_parts(time: Vec<u32>, coord: Vec<u32>, total_pushed: u64) -> Self {
        debug_assert_eq!(time.len(), coord.len());
        Self {
            time,
            coord,
            total_pushed,
        }
    }

    /// Maximum number of resident samples.
    pub fn capacity(&self) -> usize {
        self.time.len()
    }

    /// Total samples ever pushed.
    pub fn total_pushed(&self) -> u64 {
        self.total_pushed
    }

    /// Number of resident samples, `min(total_pushed, capacity)`.
    pub fn len(&self) -> usize {
        let cap = self.capacity() as u64;
        self.total_pushed.min(cap) as usize
    }

    /// True when nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.total_pushed == 0
    }

    /// Appends one sample, evicting the oldest when full.
    pub fn push(&mut self, time_delta: u32, coord_delta: CoordDelta) {
        let cap = self.capacity();
        if cap == 0 {
            return;
        }
        let slot = (self.total_pushed % cap as u64) as usize;
        self.time[slot] = time_delta;
        self.coord[slot] = coord_delta.pack();
        self.total_pushed = self.total_pushed.wrapping_add(1);
    }

    /// Slot indices of the usable samples in insertion order.
    fn ordered_slots(&self) -> impl Iterator<Item = usize> {
        let cap = self.capacity();
        let (start, len) = if self.total_pushed <= cap as u64 {
            // Origin sample still resident in slot 0.
            (1, self.len().saturating_sub(1))
        } else {
            ((self.total_pushed % cap as u64) as usize, cap)
        };
        (0..len).map(move |i| (start + i) % cap)
    }

    /// Copies the usable samples out, oldest first.
    pub fn snapshot(&self) -> Snapshot {
        let mut snap = Snapshot {
            time: Vec::with_capacity(self.len()),
            coord: Vec::with_capacity(self.len()),
        };
        for slot in self.ordered_slots() {
            snap.time.push(self.time[slot]);
            snap.coord.push(CoordDelta::unpack(self.coord[slot]));
        }
        snap
    }

    /// Raw time slots in storage order.
    pub fn raw_time(&self) -> &[u32] {
        &self.time
    }

    /// Raw packed coordinate slots in storage order.
    pub fn raw_coord(&self) -> &[u32] {
        &self.coord
    }

    /// Wipes every slot and forgets the push count.
    pub fn reset(&mut self) {
        // Vec::zeroize also truncates, so restore the slots afterwards.
        let cap = self.capacity();
        self.time.zeroize();
        self.coord.zeroize();
        self.time.resize(cap, 0);
        self.coord.resize(cap, 0);
        self.total_pushed = 0;
        log::info!("Sample store reset (capacity {})", cap);
    }
}

impl Drop for SampleStore {
    fn drop(&mut self) {
        self.time.zeroize();
        self.coord.zeroize();
    }
}
