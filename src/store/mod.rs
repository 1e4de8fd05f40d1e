//! Sample Store Module.
//!
//! Owns all raw data observed from input events:
//! - `ring`: fixed-capacity circular buffer of time and coordinate deltas.
//! - `coord`: the packed 2-D displacement word kept in the ring.
//! - `export`: self-describing byte image of the ring for diagnostics and restore.
//!
//! # Security
//! - **Zeroization**: Sample buffers and snapshots are wiped on drop and reset.
//! - **Integrity**: Exported images carry a BLAKE3 digest checked on import.

pub mod coord;
pub mod export;
pub mod ring;

pub use coord::CoordDelta;
pub use ring::{SampleStore, Snapshot};

use core::fmt;

/// Errors related to restoring a store from raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Image is shorter than its header or declared payload.
    Truncated,
    /// Image does not start with the expected magic.
    BadMagic,
    /// Image capacity does not match the configured capacity.
    CapacityMismatch,
    /// Digest check failed.
    Corruption,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Truncated => write!(f, "Sample image is truncated"),
            StoreError::BadMagic => write!(f, "Sample image has an unknown magic"),
            StoreError::CapacityMismatch => write!(f, "Sample image capacity does not match configuration"),
            StoreError::Corruption => write!(f, "Sample image digest mismatch"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StoreError {}
