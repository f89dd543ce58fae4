use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use organism_core::error::Result;
use organism_core::metrics::{Histogram, MetricOpts, Registry};

use super::{Organ, SERVICE_LABEL};
use crate::config::BrainSection;
use crate::delay::{DelaySource, UniformDelay};

pub const THINK_PATH: &str = "/think";
pub const THOUGHT_BODY: &str = "thought processed";
pub const LATENCY_METRIC: &str = "http_request_duration_seconds";
const LATENCY_HELP: &str =
    "Histogram of request latencies, representing cognitive processing time.";

/// Cognitive-work organ: sleeps a random while and records how long it took.
pub struct BrainService {
    service_name: String,
    latency: Histogram,
    delays: Arc<dyn DelaySource>,
}

impl BrainService {
    pub fn new(
        registry: &Registry,
        cfg: &BrainSection,
        delays: Arc<dyn DelaySource>,
    ) -> Result<Self> {
        let durations = registry.register_histogram(
            MetricOpts::new(LATENCY_METRIC, LATENCY_HELP).label_names(&[SERVICE_LABEL]),
            cfg.buckets.clone(),
        )?;
        let latency = durations.with_labels(&[(SERVICE_LABEL, cfg.service_name.as_str())])?;

        Ok(Self {
            service_name: cfg.service_name.clone(),
            latency,
            delays,
        })
    }

    /// Uniform delays over the configured bounds, clock-seeded.
    pub fn from_config(registry: &Registry, cfg: &BrainSection) -> Result<Self> {
        let delays = UniformDelay::new(
            Duration::from_millis(cfg.min_delay_ms),
            Duration::from_millis(cfg.max_delay_ms),
        )?;
        Self::new(registry, cfg, Arc::new(delays))
    }
}

#[async_trait]
impl Organ for BrainService {
    fn service_name(&self) -> &str {
        &self.service_name
    }

    fn path(&self) -> &'static str {
        THINK_PATH
    }

    async fn handle(&self) -> &'static str {
        // observed on drop, whichever way this returns
        let _timer = self.latency.start_timer();

        let delay = self.delays.next_delay();
        tokio::time::sleep(delay).await;
        tracing::trace!(service = %self.service_name, ?delay, "thought");

        THOUGHT_BODY
    }
}
