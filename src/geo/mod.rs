//! Geodesic model.
//!
//! Cities live on a sphere of radius [`EARTH_RADIUS_KM`]; the distance
//! between two of them is the haversine great-circle distance. The
//! [`DistanceMatrix`] caches every pairwise distance once so the search
//! never touches trigonometry.

mod haversine;
mod matrix;

pub use haversine::{haversine_km, Coordinate, EARTH_RADIUS_KM};
pub use matrix::DistanceMatrix;
