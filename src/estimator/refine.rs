//! Order-Adaptive Refiner.
//!
//! Raises the context order one step at a time, re-estimating conditional
//! entropy, until extra history stops changing the estimate.
//!
//! # States
//! - **Order 0**: plain order-0 entropy of the quantized sequence.
//! - **Order u**: entropy conditioned on the `u` preceding bars.
//! - **Converged**: relative change of the count-scaled entropy fell below the
//!   threshold; the new estimate is adopted.
//! - **NoDependency**: no (context, outcome) pair recurred; the previous
//!   estimate is kept.
//! - **Exhausted**: the order reached `len - 2`.
//!
//! All values are count-scaled: the per-symbol entropy times the number of
//! positions contributing at that order.

use alloc::vec::Vec;

use super::histogram::{ContextHistogram, Histogram};
use super::quantize::{Bar, Quantizer};
use super::shannon;
use crate::config::ConvergencePolicy;

/// Why the refiner stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Termination {
    /// Fewer than two symbols; no refinement possible.
    SingleSymbol,
    /// No context recurred with a repeatable outcome.
    NoDependency,
    /// Relative change fell below the threshold.
    Converged,
    /// Every usable order was tried.
    Exhausted,
}

/// Outcome of refining one dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DimensionReport {
    /// Length of the deduplicated sequence.
    pub symbols: usize,
    /// Highest order whose estimate was adopted.
    pub order: usize,
    /// Why refinement stopped.
    pub termination: Termination,
    /// Count-scaled entropy in nats.
    pub nats: f64,
    /// `floor(nats / ln 2)`, never negative.
    pub bits: u64,
}

impl DimensionReport {
    fn new(symbols: usize, order: usize, termination: Termination, nats: f64) -> Self {
        Self {
            symbols,
            order,
            termination,
            nats,
            bits: nats_to_bits(nats),
        }
    }

    /// Report for a dimension with no usable samples.
    pub fn empty() -> Self {
        Self::new(0, 0, Termination::SingleSymbol, 0.0)
    }
}

/// Whole bits in `nats`, clamped at zero.
pub fn nats_to_bits(nats: f64) -> u64 {
    let bits = libm::floor(nats / core::f64::consts::LN_2);
    if bits.is_finite() && bits > 0.0 {
        bits as u64
    } else {
        0
    }
}

/// Convergence test between two consecutive count-scaled estimates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convergence {
    /// Relative change threshold.
    pub threshold: f64,
    /// Direction handling.
    pub policy: ConvergencePolicy,
}

impl Convergence {
    /// True when moving from `prev` to `cur` counts as converged.
    ///
    /// A zero `prev` has no relative scale: it converges only if `cur` is
    /// zero as well.
    pub fn reached(&self, prev: f64, cur: f64) -> bool {
        if prev == 0.0 {
            return cur == 0.0;
        }
        let change = match self.policy {
            ConvergencePolicy::Absolute => libm::fabs(prev - cur) / libm::fabs(prev),
            ConvergencePolicy::Signed => (prev - cur) / prev,
        };
        change < self.threshold
    }
}

/// Runs the refinement loop over a deduplicated sequence.
pub fn refine<Q: Quantizer>(quantizer: &Q, seq: &[Q::Sample], convergence: Convergence) -> DimensionReport {
    let len = seq.len();
    if len < 2 {
        // A lone symbol carries nothing, whatever its bin width.
        return DimensionReport::new(len, 0, Termination::SingleSymbol, 0.0);
    }

    let bars: Vec<Bar> = seq.iter().map(|&s| quantizer.bar(s)).collect();

    let mut reference = Histogram::windows(&bars, 1);
    let mut scaled = shannon::entropy(&reference, |key: &&[Bar]| quantizer.width(key[0])) * len as f64;
    log::trace!("order 0: {} symbols, {} distinct, {:.3} nats", len, reference.distinct(), scaled);

    let mut order = 0;
    let mut u = 1;
    while u + 1 < len {
        let family = ContextHistogram::build(&bars, u);
        if family.dependent() == 0 {
            log::trace!("order {}: no recurring context", u);
            return DimensionReport::new(len, order, Termination::NoDependency, scaled);
        }

        let h1 = shannon::conditional_entropy(&reference, &family, |bar| quantizer.width(bar));
        let next = h1 * family.positions() as f64;
        log::trace!(
            "order {}: {} contexts, {} dependent, {:.3} nats",
            u,
            family.contexts(),
            family.dependent(),
            next
        );

        if convergence.reached(scaled, next) {
            return DimensionReport::new(len, u, Termination::Converged, next);
        }

        reference = family.flatten();
        scaled = next;
        order = u;
        u += 1;
    }

    DimensionReport::new(len, order, Termination::Exhausted, scaled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::quantize::TimeQuantizer;

    fn absolute() -> Convergence {
        Convergence { threshold: 0.01, policy: ConvergencePolicy::Absolute }
    }

    fn signed() -> Convergence {
        Convergence { threshold: 0.01, policy: ConvergencePolicy::Signed }
    }

    #[test]
    fn test_nats_to_bits() {
        assert_eq!(nats_to_bits(0.0), 0);
        assert_eq!(nats_to_bits(-3.0), 0);
        assert_eq!(nats_to_bits(f64::NAN), 0);
        assert_eq!(nats_to_bits(core::f64::consts::LN_2 * 10.5), 10);
    }

    #[test]
    fn test_convergence_policies() {
        let abs = absolute();
        assert!(abs.reached(100.0, 99.5));
        assert!(abs.reached(100.0, 100.5));
        assert!(!abs.reached(100.0, 90.0));
        assert!(!abs.reached(100.0, 110.0));

        let sig = signed();
        assert!(sig.reached(100.0, 99.5));
        assert!(sig.reached(100.0, 110.0));
        assert!(!sig.reached(100.0, 90.0));

        assert!(abs.reached(0.0, 0.0));
        assert!(!abs.reached(0.0, 1.0));
    }

    #[test]
    fn test_empty_and_single() {
        let q = TimeQuantizer::new(0, 1);
        let empty = refine(&q, &[], absolute());
        assert_eq!(empty.termination, Termination::SingleSymbol);
        assert_eq!(empty.bits, 0);

        let single = refine(&q, &[42], absolute());
        assert_eq!(single.symbols, 1);
        assert_eq!(single.termination, Termination::SingleSymbol);
        assert_eq!(single.bits, 0);
    }

    #[test]
    fn test_stops_without_dependency() {
        // Distinct bars, so no context repeats at order 1.
        let seq = [1u32, 3, 7, 15, 31, 63];
        let q = TimeQuantizer::new(0, 1);
        let report = refine(&q, &seq, absolute());
        assert_eq!(report.termination, Termination::NoDependency);
        assert_eq!(report.order, 0);
        assert!(report.nats > 0.0);
    }

    #[test]
    fn test_periodic_sequence_collapses() {
        // Deterministic alternation over two unit-width bins (bars -1 and 0):
        // order 1 drops to zero and order 2 confirms it.
        let seq: Vec<u32> = (0..64).map(|i| if i % 2 == 0 { 1 } else { 2 }).collect();
        let q = TimeQuantizer::new(2, 1);
        let report = refine(&q, &seq, absolute());
        assert_eq!(report.termination, Termination::Converged);
        assert_eq!(report.order, 2);
        assert_eq!(report.bits, 0);
    }

    #[test]
    fn test_terminates_within_bound() {
        let seq: Vec<u32> = (0..40u32).map(|i| (i * 37) % 11).collect();
        let q = TimeQuantizer::new(5, 1);
        for conv in [absolute(), signed()] {
            let report = refine(&q, &seq, conv);
            assert!(report.order <= seq.len() - 2);
            assert!(report.nats.is_finite());
        }
    }

    #[test]
    fn test_signed_policy_stops_on_rise() {
        let sig = signed();
        assert!(sig.reached(100.0, 150.0));
        assert!(sig.reached(100.0, 100.0));
        assert!(!sig.reached(100.0, 50.0));
        assert!(!absolute().reached(100.0, 150.0));
    }

    #[test]
    fn test_exhausts_on_single_wide_bar() {
        // Distinct deltas that all land in bar 3 (width 8): every order keeps
        // recurring and the scaled estimate keeps shrinking by 1 / (len - u).
        let seq = [8u32, 9, 10, 11, 12, 13];
        let q = TimeQuantizer::new(0, 1);
        let report = refine(&q, &seq, absolute());
        assert_eq!(report.termination, Termination::Exhausted);
        assert_eq!(report.order, seq.len() - 2);
        assert!((report.nats - 2.0 * 8.0f64.ln()).abs() < 1e-9);
        assert_eq!(report.bits, 6);
    }

    #[test]
    fn test_no_dependency_at_last_order() {
        // Bars -1, 0, -1, 0: order 1 recurs, order len - 2 = 2 does not.
        let seq = [1u32, 2, 1, 2];
        let q = TimeQuantizer::new(2, 1);
        let report = refine(&q, &seq, absolute());
        assert_eq!(report.termination, Termination::NoDependency);
        assert_eq!(report.order, 1);
        assert_eq!(report.bits, 0);
    }
}
