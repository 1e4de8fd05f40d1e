//! Entropy Estimation Engine.
//!
//! Recomputes, on demand, a conservative bit estimate from a [`Snapshot`] of
//! the sample store. Nothing here persists between calls.
//!
//! # Pipeline
//! ```text
//! Snapshot -> dedup -> quantize -> histograms -> entropy <-> refiner -> aggregate
//! ```
//! - `quantize`: log-scale bars and bin widths for time and coordinate deltas.
//! - `histogram`: dedup, order-0 and order-k context tables.
//! - `shannon`: bin-width-corrected order-0 and conditional entropy.
//! - `refine`: order-adaptive refinement loop per dimension.
//! - `aggregate`: sums the per-dimension bit counts.

pub mod aggregate;
pub mod histogram;
pub mod quantize;
pub mod refine;
pub mod shannon;

pub use aggregate::EstimateReport;
pub use refine::{DimensionReport, Termination};

use zeroize::Zeroizing;

use crate::config::CollectorConfig;
use crate::store::Snapshot;
use histogram::{dedup, median};
use quantize::{CoordQuantizer, TimeQuantizer};
use refine::{refine, Convergence};

/// Estimates the entropy carried by `snapshot`.
///
/// `events` is passed through to the report as the captured-events counter.
pub fn estimate(snapshot: &Snapshot, config: &CollectorConfig, events: usize) -> EstimateReport {
    if snapshot.is_empty() {
        return EstimateReport::empty(events);
    }

    let convergence = Convergence {
        threshold: config.convergence_threshold,
        policy: config.convergence,
    };

    let time = estimate_time(&snapshot.time, config.tick_precision, convergence);
    let coord = estimate_coord(snapshot, convergence);

    let report = EstimateReport::combine(time, coord, events);
    log::debug!(
        "Entropy estimate: {} bits (time {} bits over {} symbols, order {}, {:?}; coord {} bits over {} symbols, order {}, {:?})",
        report.bits,
        time.bits,
        time.symbols,
        time.order,
        time.termination,
        coord.bits,
        coord.symbols,
        coord.order,
        coord.termination
    );
    report
}

/// Time dimension: dedup, centre on the median, refine.
pub(crate) fn estimate_time(deltas: &[u32], tick_precision: u32, convergence: Convergence) -> DimensionReport {
    let seq = Zeroizing::new(dedup(deltas));
    let quantizer = TimeQuantizer::new(median(&seq), tick_precision);
    refine(&quantizer, &seq, convergence)
}

/// Coordinate dimension: dedup packed displacements, refine.
fn estimate_coord(snapshot: &Snapshot, convergence: Convergence) -> DimensionReport {
    let seq = Zeroizing::new(dedup(&snapshot.coord));
    refine(&CoordQuantizer, &seq, convergence)
}
