//! Log-scale quantization of deltas into bars.
//!
//! Time deltas are bucketed by `floor(log2(1 + |t - m| / precision))`, signed by
//! which side of the median `m` they fall on. Coordinate deltas are bucketed
//! jointly by log-scaled swept area (high bits) and one of 16 angular sectors
//! (low 4 bits).
//!
//! Every quantizer also reports the real-valued width of a bar's bin, used by
//! the entropy estimator to turn discrete entropy into a differential-style
//! estimate.

use core::f64::consts::PI;

use crate::store::CoordDelta;

/// Quantized symbol.
pub type Bar = i32;

/// Number of angular sectors packed into the low bits of a coordinate bar.
pub const ANGLE_SECTORS: i32 = 16;
const ANGLE_BITS: u32 = 4;

/// Maps raw samples to bars and bars to bin widths.
pub trait Quantizer {
    /// Raw sample type.
    type Sample: Copy + PartialEq;

    /// Bucket index of `sample`.
    fn bar(&self, sample: Self::Sample) -> Bar;

    /// Width of the bin behind `bar`, in normalized units.
    fn width(&self, bar: Bar) -> f64;
}

/// Signed log2 bucketing of time deltas around a reference median.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeQuantizer {
    median: u32,
    tick_precision: u32,
}

impl TimeQuantizer {
    /// Creates a quantizer centred on `median` ticks.
    ///
    /// `tick_precision` is validated non-zero by the configuration layer.
    pub fn new(median: u32, tick_precision: u32) -> Self {
        Self {
            median,
            tick_precision: tick_precision.max(1),
        }
    }

    /// Reference median in ticks.
    pub fn median(&self) -> u32 {
        self.median
    }

    /// Bin span of `bar` in ticks.
    ///
    /// The bin covers `[m + s(2^|b| - 1), m + s(2^(|b|+1) - 1)]` in normalized
    /// units, each end clamped at zero, where `s` is the sign of `b`.
    pub fn interval_ticks(&self, bar: Bar) -> f64 {
        let precision = self.tick_precision as f64;
        let m = self.median as f64 / precision;
        let s = if bar < 0 { -1.0 } else { 1.0 };
        let k = bar.unsigned_abs().min(1023) as i32;

        let t0 = (m + s * (libm::ldexp(1.0, k) - 1.0)).max(0.0);
        let t1 = (m + s * (libm::ldexp(1.0, k + 1) - 1.0)).max(0.0);
        libm::fabs(t1 - t0) * precision
    }
}

impl Quantizer for TimeQuantizer {
    type Sample = u32;

    fn bar(&self, t: u32) -> Bar {
        let d = t.abs_diff(self.median) as f64 / self.tick_precision as f64;
        let b = libm::floor(libm::log2(1.0 + d)) as Bar;
        if t < self.median {
            -b
        } else {
            b
        }
    }

    fn width(&self, bar: Bar) -> f64 {
        self.interval_ticks(bar) / self.tick_precision as f64
    }
}

/// Joint magnitude/direction bucketing of pointer displacements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoordQuantizer;

impl CoordQuantizer {
    /// Magnitude part of a coordinate bar.
    pub fn magnitude(bar: Bar) -> i32 {
        bar >> ANGLE_BITS
    }

    /// Angular sector of a coordinate bar, `0..16`.
    pub fn sector(bar: Bar) -> i32 {
        bar & (ANGLE_SECTORS - 1)
    }
}

impl Quantizer for CoordQuantizer {
    type Sample = CoordDelta;

    fn bar(&self, delta: CoordDelta) -> Bar {
        let x = delta.dx as f64;
        let y = delta.dy as f64;

        let area = PI * (x * x + y * y) / 16.0;
        let mut angle = libm::atan2(y, x);
        if angle == PI {
            angle = -PI;
        }

        let magnitude = libm::floor(libm::log2(1.0 + area)) as i32;
        // Rounding can push the last sector boundary up to 16.
        let sector = (libm::floor(8.0 * (angle + PI) / PI) as i32).clamp(0, ANGLE_SECTORS - 1);
        (magnitude << ANGLE_BITS) | sector
    }

    fn width(&self, bar: Bar) -> f64 {
        let m = Self::magnitude(bar).clamp(0, 1023);
        let lo = libm::ldexp(1.0, m) - 1.0;
        let hi = libm::ldexp(1.0, m + 1) - 1.0;
        hi - lo
    }
}
