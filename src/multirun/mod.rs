//! Multi-run coordination.
//!
//! Independent annealing runs, each with its own seed and state, execute
//! concurrently against one shared [`DistanceMatrix`](crate::geo::DistanceMatrix).
//! Once all of them finish (or the batch is cancelled), the best completed
//! run wins; the lowest run index breaks exact ties.

mod config;
mod runner;
mod types;

pub use config::MultiRunConfig;
pub use runner::{select_best, MultiRunner};
pub use types::{Baseline, MultiRunResult};
