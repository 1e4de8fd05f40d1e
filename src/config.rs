//! Configuration for the input entropy collector.
//!
//! Defines the construction parameters supplied once by the host application.
//! Misconfiguration is rejected here, never during estimation.

use core::fmt;

/// Default ring capacity in samples.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Default relative-change threshold for order refinement (1%).
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 0.01;

/// Errors raised when validating a [`CollectorConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Ring capacity must hold at least one sample.
    ZeroCapacity,
    /// Tick precision must be a positive number of ticks per unit.
    InvalidTickPrecision,
    /// Convergence threshold must be finite and positive.
    InvalidThreshold,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCapacity => write!(f, "Sample capacity must be non-zero"),
            ConfigError::InvalidTickPrecision => write!(f, "Tick precision must be positive"),
            ConfigError::InvalidThreshold => write!(f, "Convergence threshold must be finite and positive"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// How the order refiner decides that extra context stopped paying off.
///
/// Two revisions of the estimator disagree here. `Absolute` stops when the
/// estimate moves by less than the threshold in either direction. `Signed`
/// stops on any rise (the signed change goes negative) and keeps refining
/// only while the estimate falls by at least the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ConvergencePolicy {
    /// `|prev - cur| / |prev| < threshold`.
    #[default]
    Absolute,
    /// `(prev - cur) / prev < threshold`: converges on a rise, a flat step,
    /// or a fall smaller than the threshold.
    Signed,
}

/// Construction parameters for an [`EntropyCollector`](crate::collector::EntropyCollector).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectorConfig {
    /// Number of samples the ring retains.
    pub capacity: usize,
    /// Timestamp ticks per normalized time unit.
    pub tick_precision: u32,
    /// Relative change below which refinement stops.
    pub convergence_threshold: f64,
    /// Direction handling for the convergence check.
    pub convergence: ConvergencePolicy,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            tick_precision: 1,
            convergence_threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            convergence: ConvergencePolicy::Absolute,
        }
    }
}

impl CollectorConfig {
    /// Timestamps from a sub-millisecond timer already expressed in microseconds.
    pub fn high_resolution() -> Self {
        Self::default()
    }

    /// Timestamps from a millisecond wall clock scaled up to microseconds.
    ///
    /// Only every 1000th tick is reachable, so deltas are normalized by 1000
    /// before quantization.
    pub fn coarse_clock() -> Self {
        Self {
            tick_precision: 1000,
            ..Self::default()
        }
    }

    /// Overrides the ring capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Overrides the convergence policy.
    pub fn with_convergence(mut self, convergence: ConvergencePolicy) -> Self {
        self.convergence = convergence;
        self
    }

    /// Checks every field, returning the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.tick_precision == 0 {
            return Err(ConfigError::InvalidTickPrecision);
        }
        if !self.convergence_threshold.is_finite() || self.convergence_threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = CollectorConfig::default();
        assert_eq!(config.capacity, 1024);
        assert_eq!(config.tick_precision, 1);
        assert_eq!(config.convergence, ConvergencePolicy::Absolute);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(CollectorConfig::coarse_clock().tick_precision, 1000);
        assert_eq!(CollectorConfig::high_resolution().tick_precision, 1);
        let small = CollectorConfig::default().with_capacity(16);
        assert_eq!(small.capacity, 16);
    }

    #[test]
    fn test_rejects_misconfiguration() {
        let zero_cap = CollectorConfig::default().with_capacity(0);
        assert_eq!(zero_cap.validate(), Err(ConfigError::ZeroCapacity));

        let zero_tick = CollectorConfig { tick_precision: 0, ..Default::default() };
        assert_eq!(zero_tick.validate(), Err(ConfigError::InvalidTickPrecision));

        let nan = CollectorConfig { convergence_threshold: f64::NAN, ..Default::default() };
        assert_eq!(nan.validate(), Err(ConfigError::InvalidThreshold));

        let negative = CollectorConfig { convergence_threshold: -0.5, ..Default::default() };
        assert_eq!(negative.validate(), Err(ConfigError::InvalidThreshold));
    }
}
