//! SA configuration, cooling schedules and neighborhood choice.

use crate::error::{Error, Result};

/// Cooling schedule for temperature reduction, applied once per iteration.
///
/// # References
///
/// - Geometric: standard textbook approach
/// - TwoPhase: geometric with a slower tail near convergence
/// - LundyMees: Lundy & Mees (1986), with convergence proof
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingSchedule {
    /// Geometric (exponential) cooling: `T_{k+1} = alpha * T_k`.
    ///
    /// Typical `alpha` for per-iteration cooling: 0.999–0.99999.
    Geometric {
        /// Cooling factor in (0, 1). Higher = slower cooling.
        alpha: f64,
    },

    /// Dual-rate geometric cooling.
    ///
    /// `T_{k+1} = alpha * T_k` while `T_k >= threshold`, then
    /// `T_{k+1} = slow_alpha * T_k`. With `slow_alpha == alpha` this is
    /// plain geometric cooling.
    TwoPhase {
        /// Cooling factor above the threshold, in (0, 1).
        alpha: f64,
        /// Temperature at which the second rate takes over.
        threshold: f64,
        /// Cooling factor below the threshold, in (0, 1).
        slow_alpha: f64,
    },

    /// Lundy-Mees cooling: `T_{k+1} = T_k / (1 + beta * T_k)`.
    ///
    /// Cools fast at high T, slow at low T.
    ///
    /// Reference: Lundy & Mees (1986)
    LundyMees {
        /// Cooling parameter. Typically `(T_0 - T_min) / (max_iter * T_0 * T_min)`.
        beta: f64,
    },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.9995 }
    }
}

impl CoolingSchedule {
    /// Next temperature after one iteration at `temperature`.
    pub fn next(&self, temperature: f64) -> f64 {
        match *self {
            CoolingSchedule::Geometric { alpha } => temperature * alpha,
            CoolingSchedule::TwoPhase {
                alpha,
                threshold,
                slow_alpha,
            } => {
                if temperature >= threshold {
                    temperature * alpha
                } else {
                    temperature * slow_alpha
                }
            }
            CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            CoolingSchedule::Geometric { alpha } => check_rate("alpha", alpha),
            CoolingSchedule::TwoPhase {
                alpha,
                threshold,
                slow_alpha,
            } => {
                check_rate("alpha", alpha)?;
                check_rate("slow_alpha", slow_alpha)?;
                if !(threshold > 0.0 && threshold.is_finite()) {
                    return Err(Error::InvalidTemperature(format!(
                        "cooling threshold must be positive, got {threshold}"
                    )));
                }
                Ok(())
            }
            CoolingSchedule::LundyMees { beta } => {
                if !(beta > 0.0 && beta.is_finite()) {
                    return Err(Error::InvalidCoolingRate(format!(
                        "lundy-mees beta must be positive, got {beta}"
                    )));
                }
                Ok(())
            }
        }
    }
}

fn check_rate(name: &str, rate: f64) -> Result<()> {
    if rate > 0.0 && rate < 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidCoolingRate(format!(
            "{name} must be in (0, 1), got {rate}"
        )))
    }
}

/// Local perturbation used to generate neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NeighborMove {
    /// Exchange the cities at two positions.
    Swap,
    /// Reverse the segment between two positions (2-opt).
    #[default]
    Reverse,
    /// Reverse with the given probability, otherwise swap.
    Mixed { reverse_probability: f64 },
}

/// Where a run's initial tour comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeedTour {
    /// A uniformly random permutation drawn from the run's generator.
    #[default]
    Random,
    /// The nearest-neighbor tour from `start`.
    NearestNeighbor { start: usize },
}

/// Configuration for a single annealing run.
///
/// # Examples
///
/// ```
/// use u_geotsp::sa::{CoolingSchedule, NeighborMove, SaConfig};
///
/// let config = SaConfig::default()
///     .with_initial_temperature(5_000.0)
///     .with_min_temperature(1e-6)
///     .with_cooling(CoolingSchedule::TwoPhase {
///         alpha: 0.999,
///         threshold: 1.0,
///         slow_alpha: 0.99999,
///     })
///     .with_neighbor(NeighborMove::Reverse)
///     .with_max_iterations(200_000)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Initial temperature. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// Temperature floor. The run stops once T drops below it.
    pub min_temperature: f64,

    /// Cooling schedule.
    pub cooling: CoolingSchedule,

    /// Maximum total iterations (hard budget). 0 = no limit.
    pub max_iterations: usize,

    /// Neighborhood move.
    pub neighbor: NeighborMove,

    /// Keep position 0 in place so every tour starts at the same city.
    pub fix_start: bool,

    /// Initial tour source.
    pub seed_tour: SeedTour,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,

    /// Record `(temperature, best cost)` every this many iterations.
    /// 0 disables the trajectory.
    pub trajectory_interval: usize,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 10_000.0,
            min_temperature: 1e-8,
            cooling: CoolingSchedule::default(),
            max_iterations: 1_000_000,
            neighbor: NeighborMove::default(),
            fix_start: false,
            seed_tour: SeedTour::default(),
            seed: None,
            trajectory_interval: 0,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_neighbor(mut self, neighbor: NeighborMove) -> Self {
        self.neighbor = neighbor;
        self
    }

    pub fn with_fix_start(mut self, fix_start: bool) -> Self {
        self.fix_start = fix_start;
        self
    }

    pub fn with_seed_tour(mut self, seed_tour: SeedTour) -> Self {
        self.seed_tour = seed_tour;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_trajectory_interval(mut self, every: usize) -> Self {
        self.trajectory_interval = every;
        self
    }

    /// Short runs for small instances or quick checks.
    ///
    /// - Iterations: 100k, geometric alpha 0.9999
    pub fn fast() -> Self {
        Self {
            max_iterations: 100_000,
            cooling: CoolingSchedule::Geometric { alpha: 0.9999 },
            ..Self::default()
        }
    }

    /// Long runs with a slow tail near convergence.
    ///
    /// - Iterations: 5M, alpha 0.99999 above T = 1, 0.999999 below
    pub fn quality() -> Self {
        Self {
            max_iterations: 5_000_000,
            min_temperature: 1e-6,
            cooling: CoolingSchedule::TwoPhase {
                alpha: 0.99999,
                threshold: 1.0,
                slow_alpha: 0.999_999,
            },
            ..Self::default()
        }
    }

    /// Selects a preset from the number of cities.
    ///
    /// - `n < 200` → [`fast()`](Self::fast)
    /// - `200 ≤ n < 1000` → [`default()`](Self::default)
    /// - `n ≥ 1000` → [`quality()`](Self::quality)
    pub fn auto_select(n: usize) -> Self {
        if n < 200 {
            Self::fast()
        } else if n < 1000 {
            Self::default()
        } else {
            Self::quality()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temperature > 0.0 && self.initial_temperature.is_finite()) {
            return Err(Error::InvalidTemperature(format!(
                "initial_temperature must be positive, got {}",
                self.initial_temperature
            )));
        }
        if !(self.min_temperature > 0.0) {
            return Err(Error::InvalidTemperature(format!(
                "min_temperature must be positive, got {}",
                self.min_temperature
            )));
        }
        if self.min_temperature >= self.initial_temperature {
            return Err(Error::InvalidTemperature(
                "min_temperature must be less than initial_temperature".into(),
            ));
        }
        self.cooling.validate()?;
        if let NeighborMove::Mixed {
            reverse_probability,
        } = self.neighbor
        {
            if !(0.0..=1.0).contains(&reverse_probability) {
                return Err(Error::InvalidNeighbor(format!(
                    "reverse_probability must be in [0, 1], got {reverse_probability}"
                )));
            }
        }
        Ok(())
    }
}
