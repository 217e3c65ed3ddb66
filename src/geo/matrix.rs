//! Pairwise distance matrix.

use super::haversine::{haversine_km, Coordinate};
use crate::error::{Error, Result};
use rayon::prelude::*;

/// Below this size rows are filled on the calling thread.
const PARALLEL_THRESHOLD: usize = 256;

/// Dense, symmetric matrix of great-circle distances in kilometers.
///
/// Stored row-major in one allocation. Built once, then only read; all
/// concurrent runs share it by reference.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Computes every pairwise haversine distance.
    ///
    /// Rows are independent, so large instances fill them in parallel.
    pub fn from_coordinates(coords: &[Coordinate]) -> Self {
        Self::build(coords, coords.len() >= PARALLEL_THRESHOLD)
    }

    /// Like [`from_coordinates`](Self::from_coordinates) but with explicit
    /// control over parallel row computation.
    pub fn build(coords: &[Coordinate], parallel: bool) -> Self {
        let n = coords.len();
        let mut data = vec![0.0; n * n];
        if n == 0 {
            return Self { n, data };
        }

        let fill_row = |(i, row): (usize, &mut [f64])| {
            let origin = &coords[i];
            for (j, cell) in row.iter_mut().enumerate() {
                if i != j {
                    *cell = haversine_km(origin, &coords[j]);
                }
            }
        };

        if parallel {
            data.par_chunks_mut(n).enumerate().for_each(fill_row);
        } else {
            data.chunks_mut(n).enumerate().for_each(fill_row);
        }

        Self { n, data }
    }

    /// Wraps precomputed distances.
    ///
    /// Rows must form a square, symmetric, nonnegative matrix with an
    /// exactly zero diagonal.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(Error::SizeMismatch {
                    expected: n,
                    actual: row.len(),
                });
            }
            if row[i] != 0.0 {
                return Err(Error::invalid_matrix(format!(
                    "diagonal entry ({i}, {i}) is {}",
                    row[i]
                )));
            }
            data.extend(row);
        }

        for i in 0..n {
            for j in 0..n {
                let d = data[i * n + j];
                if !d.is_finite() || d < 0.0 {
                    return Err(Error::invalid_matrix(format!(
                        "entry ({i}, {j}) is {d}"
                    )));
                }
                if d != data[j * n + i] {
                    return Err(Error::invalid_matrix(format!(
                        "entries ({i}, {j}) and ({j}, {i}) differ"
                    )));
                }
            }
        }

        Ok(Self { n, data })
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance between cities `i` and `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Distances from city `i` to every city.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_coords() -> Vec<Coordinate> {
        vec![
            Coordinate::new(40.71, -74.00),
            Coordinate::new(34.05, -118.24),
            Coordinate::new(41.88, -87.63),
            Coordinate::new(29.76, -95.37),
            Coordinate::new(47.61, -122.33),
        ]
    }

    #[test]
    fn test_symmetric_zero_diagonal() {
        let m = DistanceMatrix::from_coordinates(&sample_coords());
        assert_eq!(m.len(), 5);
        for i in 0..m.len() {
            assert_eq!(m.get(i, i), 0.0);
            for j in 0..m.len() {
                assert_eq!(m.get(i, j), m.get(j, i));
                assert!(m.get(i, j) >= 0.0);
            }
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let coords: Vec<Coordinate> = (0..40)
            .map(|k| Coordinate::new((k as f64 * 7.3) % 90.0, (k as f64 * 13.1) % 180.0))
            .collect();
        let seq = DistanceMatrix::build(&coords, false);
        let par = DistanceMatrix::build(&coords, true);
        assert_eq!(seq, par);
    }

    #[test]
    fn test_entries_match_haversine() {
        let coords = sample_coords();
        let m = DistanceMatrix::from_coordinates(&coords);
        assert_eq!(m.get(0, 3), haversine_km(&coords[0], &coords[3]));
        assert_eq!(m.row(2)[4], m.get(2, 4));
    }

    #[test]
    fn test_empty() {
        let m = DistanceMatrix::from_coordinates(&[]);
        assert!(m.is_empty());
    }

    #[test]
    fn test_from_rows_ok() {
        let m = DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.0, 3.0],
            vec![2.0, 3.0, 0.0],
        ])
        .unwrap();
        assert_eq!(m.get(1, 2), 3.0);
    }

    #[test]
    fn test_from_rows_rejects_asymmetric() {
        let err = DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![2.0, 0.0]]);
        assert!(matches!(err, Err(Error::InvalidMatrix(_))));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0]]);
        assert!(matches!(err, Err(Error::SizeMismatch { .. })));
    }

    #[test]
    fn test_from_rows_rejects_diagonal() {
        let err = DistanceMatrix::from_rows(vec![vec![0.5, 1.0], vec![1.0, 0.0]]);
        assert!(matches!(err, Err(Error::InvalidMatrix(_))));
    }
}
