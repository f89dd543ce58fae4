//! Organs: the single functional endpoint each service exposes.
//!
//! An organ resolves its instruments once at construction (registration can
//! fail; that is a startup error) and then handles requests infallibly.

pub mod brain;
pub mod heart;

use std::sync::Arc;

use async_trait::async_trait;

use organism_core::error::Result;
use organism_core::metrics::Registry;

use crate::config::OrganismConfig;

pub use brain::BrainService;
pub use heart::HeartService;

/// Label name carrying the organ's identity on every series.
pub const SERVICE_LABEL: &str = "service";

#[async_trait]
pub trait Organ: Send + Sync {
    /// Value of the `service` label, e.g. `heart-service`.
    fn service_name(&self) -> &str;
    /// Exact path of the functional endpoint.
    fn path(&self) -> &'static str;
    /// Do the work and return the acknowledgement body.
    async fn handle(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganKind {
    Heart,
    Brain,
}

impl OrganKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OrganKind::Heart => "heart",
            OrganKind::Brain => "brain",
        }
    }

    /// Startup announcement.
    pub fn greeting(self) -> &'static str {
        match self {
            OrganKind::Heart => "Heart-Service is alive and beating",
            OrganKind::Brain => "Brain-Service is online and thinking",
        }
    }
}

/// Build the organ for `kind`, registering its instruments in `registry`.
pub fn build(kind: OrganKind, cfg: &OrganismConfig, registry: &Registry) -> Result<Arc<dyn Organ>> {
    let organ: Arc<dyn Organ> = match kind {
        OrganKind::Heart => Arc::new(HeartService::new(registry, &cfg.heart)?),
        OrganKind::Brain => Arc::new(BrainService::from_config(registry, &cfg.brain)?),
    };
    Ok(organ)
}
