//! Shared application state for an organ process.
//!
//! The registry is built here, explicitly, and handed to the organ and the
//! exposition endpoint. Nothing reaches for a global.

use std::sync::Arc;

use organism_core::error::Result;
use organism_core::metrics::Registry;

use crate::config::OrganismConfig;
use crate::organs::{self, Organ, OrganKind};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    registry: Arc<Registry>,
    organ: Arc<dyn Organ>,
}

impl AppState {
    pub fn new(registry: Arc<Registry>, organ: Arc<dyn Organ>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { registry, organ }),
        }
    }

    /// Fresh registry plus the organ for `kind`.
    /// Registration errors surface here, before anything binds.
    pub fn for_organ(kind: OrganKind, cfg: &OrganismConfig) -> Result<Self> {
        let registry = Arc::new(Registry::new());
        let organ = organs::build(kind, cfg, &registry)?;
        Ok(Self::new(registry, organ))
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    pub fn organ(&self) -> Arc<dyn Organ> {
        Arc::clone(&self.inner.organ)
    }
}
