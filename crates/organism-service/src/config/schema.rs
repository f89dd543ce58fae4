use std::net::SocketAddr;

use organism_core::error::{OrganismError, Result};
use organism_core::metrics::validate_buckets;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrganismConfig {
    pub version: u32,

    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default)]
    pub log: LogSection,

    #[serde(default)]
    pub heart: HeartSection,

    #[serde(default)]
    pub brain: BrainSection,
}

impl Default for OrganismConfig {
    fn default() -> Self {
        Self {
            version: 1,
            listen: default_listen(),
            log: LogSection::default(),
            heart: HeartSection::default(),
            brain: BrainSection::default(),
        }
    }
}

impl OrganismConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(OrganismError::BadConfig(format!(
                "unsupported config version {}",
                self.version
            )));
        }
        self.listen_addr()?;
        self.heart.validate()?;
        self.brain.validate()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            OrganismError::BadConfig(format!(
                "listen must be a valid SocketAddr ({}): {e}",
                self.listen
            ))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeartSection {
    #[serde(default = "default_heart_name")]
    pub service_name: String,
}

impl Default for HeartSection {
    fn default() -> Self {
        Self {
            service_name: default_heart_name(),
        }
    }
}

impl HeartSection {
    pub fn validate(&self) -> Result<()> {
        if self.service_name.trim().is_empty() {
            return Err(OrganismError::BadConfig(
                "heart.service_name must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrainSection {
    #[serde(default = "default_brain_name")]
    pub service_name: String,

    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    #[serde(default = "default_buckets")]
    pub buckets: Vec<f64>,
}

impl Default for BrainSection {
    fn default() -> Self {
        Self {
            service_name: default_brain_name(),
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            buckets: default_buckets(),
        }
    }
}

impl BrainSection {
    pub fn validate(&self) -> Result<()> {
        if self.service_name.trim().is_empty() {
            return Err(OrganismError::BadConfig(
                "brain.service_name must not be empty".into(),
            ));
        }
        if self.min_delay_ms > self.max_delay_ms {
            return Err(OrganismError::BadConfig(
                "brain.min_delay_ms must not exceed brain.max_delay_ms".into(),
            ));
        }
        validate_buckets(&self.buckets)
            .map_err(|e| OrganismError::BadConfig(format!("brain.buckets: {e}")))?;
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_log_filter() -> String {
    "info".into()
}
fn default_heart_name() -> String {
    "heart-service".into()
}
fn default_brain_name() -> String {
    "brain-service".into()
}
fn default_min_delay_ms() -> u64 {
    50
}
fn default_max_delay_ms() -> u64 {
    750
}
fn default_buckets() -> Vec<f64> {
    vec![0.05, 0.1, 0.25, 0.5, 0.75, 1.0]
}
