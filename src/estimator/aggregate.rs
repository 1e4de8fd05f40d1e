//! Aggregator.
//!
//! Treats the time and coordinate dimensions as independent sources and sums
//! their whole-bit estimates.

use super::refine::DimensionReport;

/// Final estimate over both dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EstimateReport {
    /// Time-delta dimension.
    pub time: DimensionReport,
    /// Coordinate-delta dimension.
    pub coord: DimensionReport,
    /// `time.bits + coord.bits`.
    pub bits: u64,
    /// Resident samples, `min(total_pushed, capacity)`.
    pub events: usize,
}

impl EstimateReport {
    /// Combines two dimension reports.
    pub fn combine(time: DimensionReport, coord: DimensionReport, events: usize) -> Self {
        Self {
            time,
            coord,
            bits: time.bits.saturating_add(coord.bits),
            events,
        }
    }

    /// Report for a store with nothing to analyse.
    pub fn empty(events: usize) -> Self {
        Self::combine(DimensionReport::empty(), DimensionReport::empty(), events)
    }
}
