use async_trait::async_trait;

use organism_core::error::Result;
use organism_core::metrics::{Counter, MetricOpts, Registry};

use super::{Organ, SERVICE_LABEL};
use crate::config::HeartSection;

pub const BEAT_PATH: &str = "/beat";
pub const BEAT_BODY: &str = "lub-dub";
pub const REQUESTS_METRIC: &str = "http_requests_total";
const REQUESTS_HELP: &str =
    "Total number of HTTP requests processed, representing the organism's pulse.";

/// Heartbeat organ: counts every beat.
pub struct HeartService {
    service_name: String,
    beats: Counter,
}

impl HeartService {
    pub fn new(registry: &Registry, cfg: &HeartSection) -> Result<Self> {
        let requests = registry.register_counter(
            MetricOpts::new(REQUESTS_METRIC, REQUESTS_HELP).label_names(&[SERVICE_LABEL]),
        )?;
        let beats = requests.with_labels(&[(SERVICE_LABEL, cfg.service_name.as_str())])?;

        Ok(Self {
            service_name: cfg.service_name.clone(),
            beats,
        })
    }
}

#[async_trait]
impl Organ for HeartService {
    fn service_name(&self) -> &str {
        &self.service_name
    }

    fn path(&self) -> &'static str {
        BEAT_PATH
    }

    async fn handle(&self) -> &'static str {
        self.beats.inc();
        tracing::trace!(service = %self.service_name, "beat");
        BEAT_BODY
    }
}
