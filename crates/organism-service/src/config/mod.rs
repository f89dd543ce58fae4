//! Organ config loader (strict parsing).

pub mod schema;

use std::fs;

use organism_core::error::{OrganismError, Result};

pub use schema::{BrainSection, HeartSection, LogSection, OrganismConfig};

/// Environment variable naming the YAML config file.
pub const CONFIG_ENV: &str = "ORGANISM_CONFIG";

pub fn load_from_file(path: &str) -> Result<OrganismConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| OrganismError::BadConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<OrganismConfig> {
    let cfg: OrganismConfig = serde_yaml::from_str(s)
        .map_err(|e| OrganismError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load the file named by `ORGANISM_CONFIG`, or fall back to defaults.
pub fn load_from_env() -> Result<OrganismConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) if !path.is_empty() => load_from_file(&path),
        _ => Ok(OrganismConfig::default()),
    }
}
