//! Multi-run configuration.

use crate::error::{Error, Result};
use crate::sa::SaConfig;
use std::time::Duration;

/// Configuration for a batch of annealing runs.
///
/// `anneal.seed`, when set, is the base seed of the batch: run `i` uses
/// [`derive_seed`](crate::random::derive_seed)`(seed, i)`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_geotsp::multirun::MultiRunConfig;
/// use u_geotsp::sa::SaConfig;
///
/// let config = MultiRunConfig::default()
///     .with_runs(8)
///     .with_anneal(SaConfig::fast().with_seed(7))
///     .with_time_limit(Duration::from_secs(30));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiRunConfig {
    /// Number of independent runs.
    pub runs: usize,

    /// Configuration shared by every run.
    pub anneal: SaConfig,

    /// Execute runs on the rayon pool. When `false`, runs execute one
    /// after another on the calling thread.
    pub parallel: bool,

    /// Size of a dedicated thread pool. `None` uses the global rayon pool.
    pub threads: Option<usize>,

    /// Wall-clock budget for the whole batch. Runs still going when it
    /// expires are cancelled and discarded.
    pub time_limit: Option<Duration>,
}

impl Default for MultiRunConfig {
    fn default() -> Self {
        Self {
            runs: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            anneal: SaConfig::default(),
            parallel: true,
            threads: None,
            time_limit: None,
        }
    }
}

impl MultiRunConfig {
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    pub fn with_anneal(mut self, anneal: SaConfig) -> Self {
        self.anneal = anneal;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.runs < 1 {
            return Err(Error::InvalidRunCount(self.runs));
        }
        self.anneal.validate()
    }
}
