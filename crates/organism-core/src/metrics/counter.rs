use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use super::exposition::{MetricFamily, MetricType, Series, SeriesValue};
use super::labels::{Desc, LabelSet};
use crate::error::Result;

/// Monotonic counter with one value per label set.
#[derive(Debug)]
pub struct CounterVec {
    desc: Desc,
    map: DashMap<LabelSet, Arc<AtomicU64>>,
}

impl CounterVec {
    pub(crate) fn new(desc: Desc) -> Self {
        Self {
            desc,
            map: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.desc.name
    }

    /// Resolve (creating at 0 if absent) the child for a label set.
    pub fn with_labels(&self, labels: &[(&str, &str)]) -> Result<Counter> {
        let key = self.desc.resolve(labels)?;
        let cell = self
            .map
            .entry(key)
            .or_insert_with(|| Arc::new(AtomicU64::new(0)))
            .clone();
        Ok(Counter { cell })
    }

    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) -> Result<()> {
        self.inc_by(labels, 1)
    }

    /// Increment by an arbitrary value.
    pub fn inc_by(&self, labels: &[(&str, &str)], v: u64) -> Result<()> {
        self.with_labels(labels)?.inc_by(v);
        Ok(())
    }

    /// Current value, or `None` if the label set was never observed.
    pub fn get(&self, labels: &[(&str, &str)]) -> Option<u64> {
        let key = LabelSet::new(labels);
        self.map.get(&key).map(|c| c.load(Ordering::Relaxed))
    }

    pub(crate) fn snapshot(&self) -> MetricFamily {
        let mut series: Vec<Series> = self
            .map
            .iter()
            .map(|r| Series {
                labels: r.key().clone(),
                value: SeriesValue::Counter(r.value().load(Ordering::Relaxed)),
            })
            .collect();
        series.sort_by(|a, b| a.labels.cmp(&b.labels));

        MetricFamily {
            name: self.desc.name.clone(),
            help: self.desc.help.clone(),
            kind: MetricType::Counter,
            series,
        }
    }
}

/// Handle to one labelled counter series.
///
/// Cloning shares the underlying cell; resolve once, then increment on the hot
/// path without touching the label map again.
#[derive(Debug, Clone)]
pub struct Counter {
    cell: Arc<AtomicU64>,
}

impl Counter {
    pub fn inc(&self) {
        self.inc_by(1);
    }

    pub fn inc_by(&self, v: u64) {
        self.cell.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.cell.load(Ordering::Relaxed)
    }
}
