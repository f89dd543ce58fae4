//! Cumulative histograms with caller-defined bucket bounds.
//!
//! Each series keeps one atomic per bucket plus an atomic count and an f64 sum
//! stored as bits. An observation bumps only the first bucket whose bound is
//! >= the value; snapshots read the buckets, build the cumulative totals, and
//! read the count last. The implicit `+Inf` bucket is never below the last
//! finite bucket, so every snapshot is monotonic even under concurrent writes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::exposition::{HistogramSnapshot, MetricFamily, MetricType, Series, SeriesValue};
use super::labels::{Desc, LabelSet};
use crate::error::{OrganismError, Result};

/// Check bounds are non-empty, finite and strictly increasing.
pub fn validate_buckets(buckets: &[f64]) -> Result<()> {
    if buckets.is_empty() {
        return Err(OrganismError::InvalidBuckets("no buckets".into()));
    }
    if let Some(b) = buckets.iter().find(|b| !b.is_finite()) {
        return Err(OrganismError::InvalidBuckets(format!(
            "bound {b} is not finite"
        )));
    }
    if let Some(w) = buckets.windows(2).find(|w| w[0] >= w[1]) {
        return Err(OrganismError::InvalidBuckets(format!(
            "bounds must be strictly increasing ({} then {})",
            w[0], w[1]
        )));
    }
    Ok(())
}

fn check_observation(v: f64) -> Result<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(OrganismError::InvalidObservation(v))
    }
}

#[derive(Debug)]
struct AtomicHistogram {
    bounds: Arc<[f64]>,
    buckets: Box<[AtomicU64]>,
    count: AtomicU64,
    sum_bits: AtomicU64,
}

impl AtomicHistogram {
    fn new(bounds: Arc<[f64]>) -> Self {
        let buckets = bounds.iter().map(|_| AtomicU64::new(0)).collect();
        Self {
            bounds,
            buckets,
            count: AtomicU64::new(0),
            sum_bits: AtomicU64::new(0.0f64.to_bits()),
        }
    }

    fn observe(&self, v: f64) -> Result<()> {
        check_observation(v)?;

        // first bound >= v; past the last bound only the count moves
        let idx = self.bounds.partition_point(|&le| le < v);
        if let Some(bucket) = self.buckets.get(idx) {
            bucket.fetch_add(1, Ordering::Relaxed);
        }
        // fetch_update only fails when the closure returns None.
        let _ = self
            .sum_bits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some((f64::from_bits(bits) + v).to_bits())
            });
        self.count.fetch_add(1, Ordering::Release);
        Ok(())
    }

    fn count(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }

    fn sum(&self) -> f64 {
        f64::from_bits(self.sum_bits.load(Ordering::Acquire))
    }

    fn snapshot(&self) -> HistogramSnapshot {
        let mut cumulative = 0u64;
        let buckets: Vec<(f64, u64)> = self
            .bounds
            .iter()
            .zip(self.buckets.iter())
            .map(|(&le, c)| {
                cumulative += c.load(Ordering::Acquire);
                (le, cumulative)
            })
            .collect();
        let sum = self.sum();
        let count = self.count().max(cumulative);
        HistogramSnapshot { buckets, sum, count }
    }
}

/// Histogram with one series per label set and fixed bucket bounds.
#[derive(Debug)]
pub struct HistogramVec {
    desc: Desc,
    bounds: Arc<[f64]>,
    map: DashMap<LabelSet, Arc<AtomicHistogram>>,
}

impl HistogramVec {
    pub(crate) fn new(desc: Desc, buckets: Vec<f64>) -> Result<Self> {
        validate_buckets(&buckets)?;
        Ok(Self {
            desc,
            bounds: buckets.into(),
            map: DashMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.desc.name
    }

    pub fn buckets(&self) -> &[f64] {
        &self.bounds
    }

    /// Resolve (creating empty if absent) the child for a label set.
    pub fn with_labels(&self, labels: &[(&str, &str)]) -> Result<Histogram> {
        let key = self.desc.resolve(labels)?;
        let inner = self
            .map
            .entry(key)
            .or_insert_with(|| Arc::new(AtomicHistogram::new(Arc::clone(&self.bounds))))
            .clone();
        Ok(Histogram { inner })
    }

    /// Record one observation. A rejected value leaves the histogram untouched.
    pub fn observe(&self, labels: &[(&str, &str)], v: f64) -> Result<()> {
        check_observation(v)?;
        self.with_labels(labels)?.observe(v)
    }

    pub fn snapshot_for(&self, labels: &[(&str, &str)]) -> Option<HistogramSnapshot> {
        let key = LabelSet::new(labels);
        self.map.get(&key).map(|h| h.snapshot())
    }

    pub(crate) fn snapshot(&self) -> MetricFamily {
        let mut series: Vec<Series> = self
            .map
            .iter()
            .map(|r| Series {
                labels: r.key().clone(),
                value: SeriesValue::Histogram(r.value().snapshot()),
            })
            .collect();
        series.sort_by(|a, b| a.labels.cmp(&b.labels));

        MetricFamily {
            name: self.desc.name.clone(),
            help: self.desc.help.clone(),
            kind: MetricType::Histogram,
            series,
        }
    }
}

/// Handle to one labelled histogram series.
#[derive(Debug, Clone)]
pub struct Histogram {
    inner: Arc<AtomicHistogram>,
}

impl Histogram {
    pub fn observe(&self, v: f64) -> Result<()> {
        self.inner.observe(v)
    }

    /// Start a scoped timer that observes elapsed seconds when dropped.
    pub fn start_timer(&self) -> HistogramTimer {
        HistogramTimer {
            histogram: self.clone(),
            start: Instant::now(),
            observed: false,
        }
    }

    pub fn count(&self) -> u64 {
        self.inner.count()
    }

    pub fn sum(&self) -> f64 {
        self.inner.sum()
    }

    pub fn snapshot(&self) -> HistogramSnapshot {
        self.inner.snapshot()
    }
}

/// Scoped latency measurement.
///
/// Exactly one observation is recorded per timer: either by
/// [`HistogramTimer::observe_duration`] or, on any other exit path, by `Drop`.
#[must_use = "dropping the timer immediately records a near-zero latency"]
#[derive(Debug)]
pub struct HistogramTimer {
    histogram: Histogram,
    start: Instant,
    observed: bool,
}

impl HistogramTimer {
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Observe now and return the recorded seconds.
    pub fn observe_duration(mut self) -> Result<f64> {
        self.observed = true;
        let secs = self.start.elapsed().as_secs_f64();
        self.histogram.observe(secs)?;
        Ok(secs)
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        if self.observed {
            return;
        }
        self.observed = true;
        let secs = self.start.elapsed().as_secs_f64();
        if let Err(e) = self.histogram.observe(secs) {
            tracing::warn!(error = %e, "histogram timer observation rejected");
        }
    }
}
