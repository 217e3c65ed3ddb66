//! Nearest-neighbor construction heuristic.

use crate::error::{ensure_cities, Error, Result};
use crate::geo::DistanceMatrix;
use crate::tour::Tour;

/// Greedy tour from `start`: always step to the closest unvisited city,
/// lowest index winning ties.
///
/// Deterministic for a given matrix and start. Returns the tour together
/// with its closed length.
///
/// # Examples
///
/// ```
/// use u_geotsp::geo::{Coordinate, DistanceMatrix};
/// use u_geotsp::nearest::nearest_neighbor;
///
/// let coords = [
///     Coordinate::new(0.0, 0.0),
///     Coordinate::new(0.0, 1.0),
///     Coordinate::new(1.0, 1.0),
///     Coordinate::new(1.0, 0.0),
/// ];
/// let matrix = DistanceMatrix::from_coordinates(&coords);
/// let (tour, _cost) = nearest_neighbor(&matrix, 0).unwrap();
/// assert_eq!(tour.closed(), vec![0, 1, 2, 3, 0]);
/// ```
pub fn nearest_neighbor(matrix: &DistanceMatrix, start: usize) -> Result<(Tour, f64)> {
    let n = matrix.len();
    ensure_cities(n)?;
    if start >= n {
        return Err(Error::InvalidStartCity { start, len: n });
    }

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    visited[start] = true;
    order.push(start);

    let mut last = start;
    for _ in 1..n {
        let row = matrix.row(last);
        let mut next = None;
        let mut best = f64::INFINITY;
        for (city, &d) in row.iter().enumerate() {
            if !visited[city] && (next.is_none() || d < best) {
                best = d;
                next = Some(city);
            }
        }
        // n - 1 iterations over n cities always leave one unvisited.
        let Some(city) = next else { break };
        visited[city] = true;
        order.push(city);
        last = city;
    }

    let tour = Tour::from_order_unchecked(order);
    let cost = tour.cost(matrix);
    Ok((tour, cost))
}
