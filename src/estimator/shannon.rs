//! Bin-width-corrected Shannon entropy, in nats.
//!
//! Plain discrete entropy treats a coarse bin as just as informative as a fine
//! one. Dividing each probability by its bin width before taking the log
//! approximates the differential entropy of the underlying continuous delta:
//!
//! ```text
//! H0(A, W)    = -sum_k p_k * ln(p_k / W(k)),   p_k = A[k] / n
//! H1(A, B, W) =  sum_c (A[c] / n) * H0(B[c], W)
//! ```
//!
//! Terms with zero probability or a non-positive width are skipped, and an
//! empty histogram has zero entropy.

use super::histogram::{ContextHistogram, Histogram};
use super::quantize::Bar;

/// Order-0 entropy of `hist` with bin widths from `width`.
pub fn entropy<K, W>(hist: &Histogram<K>, width: W) -> f64
where
    K: Ord,
    W: Fn(&K) -> f64,
{
    let n = hist.total();
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;

    let mut h = 0.0;
    for (key, count) in hist.iter() {
        let p = count as f64 / n;
        if p <= 0.0 {
            continue;
        }
        let w = width(key);
        if w <= 0.0 {
            continue;
        }
        h -= p * libm::log(p / w);
    }
    h
}

/// Conditional entropy of the outcome given its context.
///
/// Each context's outcome entropy is weighted by that context's frequency in
/// `reference`, the previous round's histogram over the same key space.
/// Contexts missing from `reference` are skipped.
pub fn conditional_entropy<W>(
    reference: &Histogram<&[Bar]>,
    family: &ContextHistogram<'_>,
    width: W,
) -> f64
where
    W: Fn(Bar) -> f64,
{
    let n = reference.total();
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;

    let mut h = 0.0;
    for (context, count) in reference.iter() {
        let Some(outcomes) = family.get(context) else {
            continue;
        };
        let p = count as f64 / n;
        if p <= 0.0 {
            continue;
        }
        h += p * entropy(outcomes, |&bar| width(bar));
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    const LN2: f64 = core::f64::consts::LN_2;

    fn unit(_: &Bar) -> f64 {
        1.0
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_empty_is_zero() {
        let h: Histogram<Bar> = Histogram::new();
        assert_eq!(entropy(&h, unit), 0.0);
    }

    #[test]
    fn test_uniform_unit_width() {
        let h: Histogram<Bar> = [0, 1, 2, 3].into_iter().collect();
        assert!(close(entropy(&h, unit), 4.0f64.ln()));

        let single: Histogram<Bar> = [5, 5, 5].into_iter().collect();
        assert_eq!(entropy(&single, unit), 0.0);
    }

    #[test]
    fn test_width_correction_adds_log_width() {
        let h: Histogram<Bar> = [0, 1].into_iter().collect();
        let wide = entropy(&h, |_| 4.0);
        assert!(close(wide, LN2 + 4.0f64.ln()));
    }

    #[test]
    fn test_skips_non_positive_width() {
        let h: Histogram<Bar> = [-3, 0, 0, 0].into_iter().collect();
        let hz = entropy(&h, |&b| if b < 0 { 0.0 } else { 1.0 });
        // Only the bar-0 term remains: -0.75 * ln(0.75).
        assert!(close(hz, -0.75 * 0.75f64.ln()));
    }

    #[test]
    fn test_non_negative_for_unit_or_wider_bins() {
        let h: Histogram<Bar> = [0, 0, 1, 2, 2, 2, 7, -1].into_iter().collect();
        for w in [1.0, 2.0, 64.0] {
            let e = entropy(&h, |_| w);
            assert!(e.is_finite());
            assert!(e >= 0.0);
        }
        // Sub-unit bins may go negative but stay finite.
        assert!(entropy(&h, |_| 0.01).is_finite());
    }

    #[test]
    fn test_conditional_entropy_deterministic_context() {
        // Strict alternation: the previous bar fixes the next one.
        let bars = [0, 1, 0, 1, 0, 1, 0, 1];
        let reference = Histogram::windows(&bars, 1);
        let family = ContextHistogram::build(&bars, 1);
        assert_eq!(conditional_entropy(&reference, &family, |_| 1.0), 0.0);
    }

    #[test]
    fn test_conditional_entropy_weights_by_reference() {
        // After 0 the outcome is a fair coin; after 1 it is always 0.
        let bars = [0, 0, 1, 0, 0, 1, 0];
        let reference = Histogram::windows(&bars, 1);
        let family = ContextHistogram::build(&bars, 1);
        let h1 = conditional_entropy(&reference, &family, |_| 1.0);
        // P(ctx=0) = 5/7, outcomes after 0: {0: 2, 1: 2} -> ln 2.
        assert!(close(h1, 5.0 / 7.0 * LN2));
    }
}
