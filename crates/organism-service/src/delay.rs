//! Simulated processing delay.
//!
//! The brain organ asks a [`DelaySource`] how long to "think". Production uses
//! [`UniformDelay`], a clock-seeded PRNG shared by all requests; tests inject
//! [`FixedDelay`] to pin the latency and therefore the histogram bucket.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use organism_core::error::{OrganismError, Result};

pub trait DelaySource: Send + Sync {
    fn next_delay(&self) -> Duration;
}

/// Uniform delay over the closed interval `[min, max]`.
#[derive(Debug)]
pub struct UniformDelay {
    min_nanos: u64,
    max_nanos: u64,
    rng: Mutex<StdRng>,
}

impl UniformDelay {
    /// Seeded once from the wall clock.
    pub fn new(min: Duration, max: Duration) -> Result<Self> {
        Self::with_seed(min, max, time_seed())
    }

    pub fn with_seed(min: Duration, max: Duration, seed: u64) -> Result<Self> {
        if min > max {
            return Err(OrganismError::BadConfig(format!(
                "delay min {min:?} exceeds max {max:?}"
            )));
        }
        Ok(Self {
            min_nanos: saturating_nanos(min),
            max_nanos: saturating_nanos(max),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        })
    }

    pub fn bounds(&self) -> (Duration, Duration) {
        (
            Duration::from_nanos(self.min_nanos),
            Duration::from_nanos(self.max_nanos),
        )
    }
}

impl DelaySource for UniformDelay {
    fn next_delay(&self) -> Duration {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Duration::from_nanos(rng.gen_range(self.min_nanos..=self.max_nanos))
    }
}

/// Always the same delay.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl DelaySource for FixedDelay {
    fn next_delay(&self) -> Duration {
        self.0
    }
}

fn saturating_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
