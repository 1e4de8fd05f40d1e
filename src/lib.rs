//! Conservative entropy estimation for user input events.
//!
//! Pointer movement, key presses and touches arrive at unpredictable times
//! and places. This crate keeps a bounded history of their time and
//! displacement deltas and estimates, on demand, how many bits of Shannon
//! entropy that history carries, for use as a seed-quality gauge in front of
//! a random number generator.
//!
//! The estimate is deliberately conservative: repeated deltas are collapsed,
//! coarse bins are corrected for their width, and context order is raised
//! until extra history stops changing the answer. It does not whiten or
//! extract key material.
//!
//! # Modules
//! - [`config`]: construction parameters and their validation.
//! - [`store`]: the fixed-capacity sample ring and its raw image.
//! - [`estimator`]: quantization, histograms, entropy and order refinement.
//! - [`collector`]: the event ingestion boundary.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod collector;
pub mod config;
pub mod estimator;
pub mod store;

pub use collector::{CollectorError, EntropyCollector};
#[cfg(feature = "std")]
pub use collector::SharedCollector;
pub use config::{CollectorConfig, ConfigError, ConvergencePolicy};
pub use estimator::{DimensionReport, EstimateReport, Termination};
