//! Histogram construction over quantized sequences.
//!
//! # Components
//! - `dedup`: collapses runs of equal raw values before quantization.
//! - `Histogram`: symbol -> count table.
//! - `ContextHistogram`: order-k table mapping the `k` preceding bars to a
//!   histogram of the following bar.
//!
//! Context keys are windows borrowed from the bar sequence itself, so building
//! a table of any order allocates nothing per key.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::borrow::Borrow;

use super::quantize::Bar;

/// Collapses consecutive equal values to a single occurrence.
///
/// This biases the estimate down, never up: bursts of identical deltas (for
/// example coalesced events) would otherwise look like a very certain symbol.
pub fn dedup<T: Copy + PartialEq>(seq: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(seq.len());
    for &v in seq {
        if out.last() != Some(&v) {
            out.push(v);
        }
    }
    out
}

/// Element at index `len / 2` of the sorted sequence, or 0 when empty.
pub fn median(seq: &[u32]) -> u32 {
    if seq.is_empty() {
        return 0;
    }
    let mut sorted = seq.to_vec();
    sorted.sort_unstable();
    let m = sorted[sorted.len() >> 1];
    zeroize::Zeroize::zeroize(&mut sorted);
    m
}

/// Occurrence counts keyed by symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram<K: Ord> {
    counts: BTreeMap<K, u32>,
    total: u64,
}

impl<K: Ord> Default for Histogram<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> Histogram<K> {
    /// Creates an empty histogram.
    pub fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
            total: 0,
        }
    }

    /// Adds one occurrence of `key`, returning its new count.
    pub fn add(&mut self, key: K) -> u32 {
        self.total += 1;
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;
        *count
    }

    /// Count for `key`, 0 when absent.
    pub fn get<Q>(&self, key: &Q) -> u32
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct symbols.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// True when nothing was added.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Symbols and counts in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u32)> {
        self.counts.iter().map(|(k, &c)| (k, c))
    }
}

impl<K: Ord> FromIterator<K> for Histogram<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut h = Histogram::new();
        for k in iter {
            h.add(k);
        }
        h
    }
}

impl<'a> Histogram<&'a [Bar]> {
    /// Tallies every length-`width` window of `bars`.
    ///
    /// Width 1 gives the order-0 histogram keyed by one-bar sequences. Width
    /// `k + 1` gives the flattened order-k table where each (context, outcome)
    /// pair is its own symbol.
    pub fn windows(bars: &'a [Bar], width: usize) -> Self {
        if width == 0 {
            return Histogram::new();
        }
        bars.windows(width).collect()
    }
}

/// Order-k conditional table: context of `k` bars -> histogram of the next bar.
#[derive(Debug, Clone)]
pub struct ContextHistogram<'a> {
    bars: &'a [Bar],
    order: usize,
    tables: BTreeMap<&'a [Bar], Histogram<Bar>>,
    dependent: usize,
}

impl<'a> ContextHistogram<'a> {
    /// Builds the order-`order` table over `bars`.
    ///
    /// Each position `i >= order` adds its bar to the histogram keyed by
    /// `bars[i - order..i]`. A position counts as dependent when its
    /// (context, outcome) pair has been seen before.
    pub fn build(bars: &'a [Bar], order: usize) -> Self {
        let mut tables: BTreeMap<&'a [Bar], Histogram<Bar>> = BTreeMap::new();
        let mut dependent = 0;

        if order > 0 {
            for i in order..bars.len() {
                let seen = tables.entry(&bars[i - order..i]).or_default().add(bars[i]);
                if seen > 1 {
                    dependent += 1;
                }
            }
        }

        Self {
            bars,
            order,
            tables,
            dependent,
        }
    }

    /// Context length.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Positions whose (context, outcome) pair recurred.
    pub fn dependent(&self) -> usize {
        self.dependent
    }

    /// Positions that contributed an outcome, `len - order`.
    pub fn positions(&self) -> usize {
        self.bars.len().saturating_sub(self.order)
    }

    /// Number of distinct contexts.
    pub fn contexts(&self) -> usize {
        self.tables.len()
    }

    /// Outcome histogram for `context`.
    pub fn get(&self, context: &[Bar]) -> Option<&Histogram<Bar>> {
        self.tables.get(context)
    }

    /// Contexts and their outcome histograms in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&&'a [Bar], &Histogram<Bar>)> {
        self.tables.iter()
    }

    /// Collapses the two-level table into one histogram keyed by
    /// `context ++ outcome`.
    ///
    /// Contexts are contiguous windows, so every such key is itself a
    /// length-`order + 1` window of the sequence and can be borrowed from it.
    pub fn flatten(&self) -> Histogram<&'a [Bar]> {
        Histogram::windows(self.bars, self.order + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_dedup_collapses_runs() {
        assert_eq!(dedup(&[1, 1, 2, 2, 2, 1, 3, 3]), vec![1, 2, 1, 3]);
        assert_eq!(dedup::<u32>(&[]), Vec::<u32>::new());
        assert_eq!(dedup(&[7; 100]), vec![7]);
    }

    #[test]
    fn test_dedup_idempotent() {
        let seq = [5u32, 5, 9, 1, 1, 1, 9, 9, 4, 5];
        let once = dedup(&seq);
        assert_eq!(dedup(&once), once);
    }

    #[test]
    fn test_median_takes_upper_middle() {
        assert_eq!(median(&[]), 0);
        assert_eq!(median(&[9]), 9);
        assert_eq!(median(&[4, 1, 3, 2]), 3);
        assert_eq!(median(&[30, 10, 20]), 20);
    }

    #[test]
    fn test_histogram_total_matches_adds() {
        let h: Histogram<Bar> = [1, -2, 1, 0, 1].into_iter().collect();
        assert_eq!(h.total(), 5);
        assert_eq!(h.get(&1), 3);
        assert_eq!(h.get(&-2), 1);
        assert_eq!(h.get(&4), 0);
        assert_eq!(h.distinct(), 3);
        assert_eq!(h.iter().map(|(_, c)| c as u64).sum::<u64>(), h.total());
    }

    #[test]
    fn test_context_histogram_and_dependency() {
        let bars = [0, 1, 0, 1, 0, 2];
        let ctx = ContextHistogram::build(&bars, 1);
        assert_eq!(ctx.positions(), 5);
        assert_eq!(ctx.contexts(), 2);
        let after_zero = ctx.get(&[0]).unwrap();
        assert_eq!(after_zero.get(&1), 2);
        assert_eq!(after_zero.get(&2), 1);
        assert_eq!(ctx.get(&[1]).unwrap().get(&0), 2);
        // (0 -> 1) and (1 -> 0) each recur once.
        assert_eq!(ctx.dependent(), 2);
    }

    #[test]
    fn test_no_dependency_for_singletons() {
        let bars = [3, 1, 4, 5, 9, 2, 6];
        assert_eq!(ContextHistogram::build(&bars, 1).dependent(), 0);
        assert_eq!(ContextHistogram::build(&bars, 0).contexts(), 0);
    }

    #[test]
    fn test_flatten_matches_two_level_counts() {
        let bars = [0, 1, 0, 1, 0, 2, 0, 1];
        let ctx = ContextHistogram::build(&bars, 2);
        let flat = ctx.flatten();

        let mut total = 0u64;
        for (context, outcomes) in ctx.iter() {
            for (&bar, count) in outcomes.iter() {
                let mut key = context.to_vec();
                key.push(bar);
                assert_eq!(flat.get(key.as_slice()), count);
                total += count as u64;
            }
        }
        assert_eq!(flat.total(), total);
        assert_eq!(flat.total(), ctx.positions() as u64);
    }
}
