use std::sync::{Arc, PoisonError, RwLock};

use super::counter::CounterVec;
use super::exposition::Exposition;
use super::histogram::HistogramVec;
use super::labels::{Desc, MetricOpts};
use crate::error::{OrganismError, Result};

/// What to register, with the per-kind configuration.
#[derive(Debug, Clone)]
pub enum MetricKind {
    Counter,
    Histogram { buckets: Vec<f64> },
}

/// A registered instrument. Cloning shares the same underlying metric.
#[derive(Debug, Clone)]
pub enum Instrument {
    Counter(Arc<CounterVec>),
    Histogram(Arc<HistogramVec>),
}

impl Instrument {
    pub fn name(&self) -> &str {
        match self {
            Instrument::Counter(c) => c.name(),
            Instrument::Histogram(h) => h.name(),
        }
    }
}

/// Process-wide set of named instruments.
///
/// Construct once at startup and hand an `Arc<Registry>` to every component
/// that records or renders. Instruments are never removed; rendering follows
/// registration order.
#[derive(Debug, Default)]
pub struct Registry {
    families: RwLock<Vec<Instrument>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new instrument. Fails if the name is taken.
    pub fn register(&self, opts: MetricOpts, kind: MetricKind) -> Result<Instrument> {
        let instrument = match kind {
            MetricKind::Counter => {
                Instrument::Counter(Arc::new(CounterVec::new(Desc::new(opts, false)?)))
            }
            MetricKind::Histogram { buckets } => Instrument::Histogram(Arc::new(
                HistogramVec::new(Desc::new(opts, true)?, buckets)?,
            )),
        };

        let mut families = self.families.write().unwrap_or_else(PoisonError::into_inner);
        if families.iter().any(|f| f.name() == instrument.name()) {
            return Err(OrganismError::DuplicateMetricName(
                instrument.name().to_string(),
            ));
        }
        tracing::debug!(metric = %instrument.name(), "metric registered");
        families.push(instrument.clone());
        Ok(instrument)
    }

    pub fn register_counter(&self, opts: MetricOpts) -> Result<Arc<CounterVec>> {
        match self.register(opts, MetricKind::Counter)? {
            Instrument::Counter(c) => Ok(c),
            Instrument::Histogram(h) => Err(OrganismError::Internal(format!(
                "{} registered as histogram",
                h.name()
            ))),
        }
    }

    pub fn register_histogram(
        &self,
        opts: MetricOpts,
        buckets: Vec<f64>,
    ) -> Result<Arc<HistogramVec>> {
        match self.register(opts, MetricKind::Histogram { buckets })? {
            Instrument::Histogram(h) => Ok(h),
            Instrument::Counter(c) => Err(OrganismError::Internal(format!(
                "{} registered as counter",
                c.name()
            ))),
        }
    }

    /// Registered metric names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.families
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|f| f.name().to_string())
            .collect()
    }

    /// Snapshot every instrument. Read-only with respect to metric values.
    pub fn gather(&self) -> Exposition {
        let families = self
            .families
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|f| match f {
                Instrument::Counter(c) => c.snapshot(),
                Instrument::Histogram(h) => h.snapshot(),
            })
            .collect();
        Exposition::new(families)
    }

    /// Render every instrument in Prometheus text exposition format.
    pub fn render(&self) -> String {
        self.gather().to_string()
    }
}
