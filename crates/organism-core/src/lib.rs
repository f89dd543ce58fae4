//! organism core: runtime-free metrics primitives and the shared error type.
//!
//! This crate owns the instrumentation model used by every organ: a metric
//! registry holding labelled counters and histograms, a scoped latency timer,
//! and the Prometheus text exposition renderer. It carries no transport or
//! async runtime dependencies so handlers can be unit-tested against a fresh
//! registry.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `OrganismError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metrics;

/// Shared result type.
pub use error::{ErrorCode, OrganismError, Result};
