use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogSection;

/// Install the global fmt subscriber. `RUST_LOG` wins over the config filter.
///
/// A subscriber that is already installed is kept.
pub fn init_tracing(cfg: &LogSection) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.filter));
    let _ = fmt().with_env_filter(filter).try_init();
}
