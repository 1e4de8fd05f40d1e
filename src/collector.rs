//! Input Event Entropy Collector.
//!
//! The boundary between the host's event delivery and the estimation engine.
//! The host calls [`EntropyCollector::push_sample`] once per pointer, key or
//! touch event with a monotonic timestamp and optional screen coordinates; the
//! collector turns those into deltas and keeps them in its [`SampleStore`].
//!
//! # Design
//! - **Independent instances**: every collector owns its buffer and config.
//! - **On-demand estimation**: nothing is maintained incrementally; each call
//!   to `estimate_entropy_bits` recomputes from the current buffer.
//! - **Concurrency**: `SharedCollector` (requires `std`) serializes pushes and
//!   snapshots behind a mutex and estimates outside the lock.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::config::{CollectorConfig, ConfigError};
use crate::estimator::{self, EstimateReport};
use crate::store::export::{self, Cursor};
use crate::store::{CoordDelta, SampleStore, Snapshot, StoreError};

/// Errors returned at construction or restore time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorError {
    /// Configuration rejected.
    Config(ConfigError),
    /// Raw image rejected.
    Store(StoreError),
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectorError::Config(e) => write!(f, "Invalid collector configuration: {}", e),
            CollectorError::Store(e) => write!(f, "Invalid sample image: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CollectorError {}

impl From<ConfigError> for CollectorError {
    fn from(err: ConfigError) -> Self {
        CollectorError::Config(err)
    }
}

impl From<StoreError> for CollectorError {
    fn from(err: StoreError) -> Self {
        CollectorError::Store(err)
    }
}

/// Collects timing and displacement samples and estimates their entropy.
pub struct EntropyCollector {
    config: CollectorConfig,
    store: SampleStore,
    cursor: Cursor,
}

impl EntropyCollector {
    /// Creates a collector with an empty store.
    ///
    /// # Errors
    /// Returns `CollectorError::Config` if `config` fails validation.
    pub fn new(config: CollectorConfig) -> Result<Self, CollectorError> {
        if let Err(e) = config.validate() {
            log::warn!("Rejected collector configuration: {}", e);
            return Err(e.into());
        }
        Ok(Self {
            store: SampleStore::new(config.capacity),
            config,
            cursor: Cursor::default(),
        })
    }

    /// Restores a collector from an image produced by [`export_raw`](Self::export_raw).
    ///
    /// # Errors
    /// * `CollectorError::Config` if `config` fails validation.
    /// * `CollectorError::Store` if the image is malformed, was taken with a
    ///   different capacity, or fails its digest check.
    pub fn from_raw(config: CollectorConfig, bytes: &[u8]) -> Result<Self, CollectorError> {
        config.validate()?;
        let (store, cursor) = export::decode(bytes, config.capacity).map_err(|e| {
            log::warn!("Rejected sample image: {}", e);
            CollectorError::from(e)
        })?;
        Ok(Self {
            config,
            store,
            cursor,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Records one input event.
    ///
    /// `timestamp` is in monotonic ticks. `coords` is the event's screen
    /// position, if it has one; events without coordinates record a zero
    /// displacement and leave the last known position untouched. The first
    /// event only establishes the reference point.
    pub fn push_sample(&mut self, timestamp: u64, coords: Option<(i16, i16)>) {
        let (time_delta, coord_delta) = if self.store.is_empty() {
            (0, CoordDelta::default())
        } else {
            let dt = timestamp.saturating_sub(self.cursor.last_timestamp);
            let dt = u32::try_from(dt).unwrap_or(u32::MAX);
            let dc = coords
                .map(|c| CoordDelta::between(self.cursor.last_coords, c))
                .unwrap_or_default();
            (dt, dc)
        };

        self.store.push(time_delta, coord_delta);
        self.cursor.last_timestamp = timestamp;
        if let Some(c) = coords {
            self.cursor.last_coords = c;
        }
    }

    /// Resident samples, `min(total pushed, capacity)`.
    pub fn events_captured(&self) -> usize {
        self.store.len()
    }

    /// Total samples ever pushed.
    pub fn total_pushed(&self) -> u64 {
        self.store.total_pushed()
    }

    /// Ordered copy of the usable deltas.
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    /// Full estimate with per-dimension detail.
    pub fn estimate_report(&self) -> EstimateReport {
        let snapshot = self.store.snapshot();
        estimator::estimate(&snapshot, &self.config, self.events_captured())
    }

    /// Recomputes the entropy estimate, in whole bits.
    pub fn estimate_entropy_bits(&self) -> u64 {
        self.estimate_report().bits
    }

    /// Raw buffer image for diagnostics or later restore.
    pub fn export_raw(&self) -> Vec<u8> {
        export::encode(&self.store, &self.cursor)
    }

    /// Lowercase hex of [`export_raw`](Self::export_raw).
    pub fn export_hex(&self) -> String {
        hex::encode(self.export_raw())
    }

    /// Wipes all samples and the ingestion cursor.
    pub fn reset(&mut self) {
        self.store.reset();
        self.cursor = Cursor::default();
    }
}

#[cfg(feature = "std")]
pub use shared::SharedCollector;

#[cfg(feature = "std")]
mod shared {
    use std::sync::{Arc, Mutex, MutexGuard};

    use super::{CollectorError, EntropyCollector};
    use crate::config::CollectorConfig;
    use crate::estimator::{self, EstimateReport};

    /// Thread-safe handle to a collector.
    ///
    /// Pushes and snapshots are serialized by a mutex; estimation runs on the
    /// caller's thread after the lock is released.
    #[derive(Clone)]
    pub struct SharedCollector {
        inner: Arc<Mutex<EntropyCollector>>,
    }

    impl SharedCollector {
        /// Creates a shared collector with an empty store.
        pub fn new(config: CollectorConfig) -> Result<Self, CollectorError> {
            Ok(Self::from(EntropyCollector::new(config)?))
        }

        // The ring holds no invariant spanning calls, so a poisoned lock is
        // still consistent.
        fn lock(&self) -> MutexGuard<'_, EntropyCollector> {
            self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }

        /// Records one input event.
        pub fn push_sample(&self, timestamp: u64, coords: Option<(i16, i16)>) {
            self.lock().push_sample(timestamp, coords);
        }

        /// Resident samples.
        pub fn events_captured(&self) -> usize {
            self.lock().events_captured()
        }

        /// Full estimate, computed outside the lock.
        pub fn estimate_report(&self) -> EstimateReport {
            let (snapshot, config, events) = {
                let guard = self.lock();
                (guard.snapshot(), *guard.config(), guard.events_captured())
            };
            estimator::estimate(&snapshot, &config, events)
        }

        /// Recomputes the entropy estimate, in whole bits.
        pub fn estimate_entropy_bits(&self) -> u64 {
            self.estimate_report().bits
        }

        /// Raw buffer image.
        pub fn export_raw(&self) -> Vec<u8> {
            self.lock().export_raw()
        }
    }

    impl From<EntropyCollector> for SharedCollector {
        fn from(collector: EntropyCollector) -> Self {
            Self {
                inner: Arc::new(Mutex::new(collector)),
            }
        }
    }
}
