//! Approximate Traveling Salesman tours over geographic points.
//!
//! Cities are longitude/latitude pairs on a sphere; the tour length is the
//! sum of haversine great-circle distances. The crate provides:
//!
//! - **Geodesic model** ([`geo`]): haversine distance and a precomputed,
//!   read-only [`DistanceMatrix`](geo::DistanceMatrix).
//! - **Tours** ([`tour`]): permutation type and the single cost evaluator
//!   shared by every component.
//! - **Nearest neighbor** ([`nearest`]): deterministic greedy baseline.
//! - **Simulated Annealing** ([`sa`]): swap / segment-reversal moves,
//!   Metropolis acceptance, geometric, dual-rate and Lundy-Mees cooling.
//! - **Multi-run coordination** ([`multirun`]): independent seeded runs on
//!   a rayon pool, reduced to the best tour.
//! - **City files** ([`dataset`]): reading coordinates and writing routes.
//!
//! # Example
//!
//! ```
//! use u_geotsp::geo::Coordinate;
//! use u_geotsp::multirun::{MultiRunConfig, MultiRunner};
//! use u_geotsp::sa::SaConfig;
//!
//! let coords: Vec<Coordinate> = (0..12)
//!     .map(|k| Coordinate::new((k as f64 * 7.0) % 20.0, (k as f64 * 13.0) % 40.0))
//!     .collect();
//! let config = MultiRunConfig::default()
//!     .with_runs(2)
//!     .with_anneal(SaConfig::fast().with_seed(1));
//! let result = MultiRunner::solve(&coords, &config).unwrap();
//! assert_eq!(result.best.len(), 12);
//! assert!(result.best_cost <= result.baseline.random_cost);
//! ```

pub mod dataset;
pub mod error;
pub mod geo;
pub mod multirun;
pub mod nearest;
pub mod random;
pub mod sa;
pub mod tour;

pub use error::{Error, Result};
