//! In-process metrics registry.
//!
//! Counters and histograms with declared label names, backed by `DashMap`
//! and atomics. Label sets are flattened into sorted key vectors to keep
//! deterministic ordering. Output is the Prometheus text exposition format.

pub mod counter;
pub mod exposition;
pub mod histogram;
pub mod labels;
pub mod registry;

pub use counter::{Counter, CounterVec};
pub use exposition::{
    Exposition, HistogramSnapshot, MetricFamily, MetricType, Series, SeriesValue,
    TEXT_CONTENT_TYPE,
};
pub use histogram::{validate_buckets, Histogram, HistogramTimer, HistogramVec};
pub use labels::{LabelSet, MetricOpts};
pub use registry::{Instrument, MetricKind, Registry};
