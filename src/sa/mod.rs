//! Simulated Annealing (SA) over tours.
//!
//! A single-solution trajectory search: each iteration perturbs the
//! current tour, accepts the perturbation by the Metropolis criterion, and
//! cools the temperature. Worsening moves become rarer as the temperature
//! drops, so the search drifts from exploration to plain descent.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"
//! - Lundy & Mees (1986), "Convergence of an Annealing Algorithm"

mod config;
mod runner;
mod types;

pub use config::{CoolingSchedule, NeighborMove, SaConfig, SeedTour};
pub use runner::{metropolis_accept, SaRunner};
pub use types::{AnnealingState, Move, RunResult, TrajectoryPoint};
