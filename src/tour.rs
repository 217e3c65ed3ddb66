//! Tour representation and cost evaluation.

use crate::error::{Error, Result};
use crate::geo::DistanceMatrix;
use crate::random::shuffle;
use rand::Rng;

/// Total length of the closed tour visiting `order` and returning to its
/// first city.
///
/// This is the single objective function: the heuristic, the annealer and
/// the coordinator all report costs computed here.
pub fn tour_cost(order: &[usize], matrix: &DistanceMatrix) -> f64 {
    match order {
        [] | [_] => 0.0,
        [first, .., last] => {
            let path: f64 = order.windows(2).map(|w| matrix.get(w[0], w[1])).sum();
            path + matrix.get(*last, *first)
        }
    }
}

/// A permutation of `0..n` visited in order, implicitly returning to the
/// first city.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tour {
    order: Vec<usize>,
}

impl Tour {
    /// Validates and wraps a visiting order.
    ///
    /// A trailing repeat of the first city (the closed form) is accepted
    /// and stripped.
    pub fn new(mut order: Vec<usize>) -> Result<Self> {
        if order.len() > 1 && order.first() == order.last() {
            order.pop();
        }
        check_permutation(&order)?;
        Ok(Self { order })
    }

    /// Visits cities in index order.
    pub fn identity(n: usize) -> Self {
        Self {
            order: (0..n).collect(),
        }
    }

    /// A uniformly random permutation of `0..n`.
    pub fn random<R: Rng>(n: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..n).collect();
        shuffle(&mut order, rng);
        Self { order }
    }

    pub(crate) fn from_order_unchecked(order: Vec<usize>) -> Self {
        debug_assert!(check_permutation(&order).is_ok());
        Self { order }
    }

    /// Number of cities visited.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The visiting order, without the closing return.
    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.order
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [usize] {
        &mut self.order
    }

    /// The visiting order with the first city repeated at the end.
    pub fn closed(&self) -> Vec<usize> {
        let mut closed = self.order.clone();
        if let Some(&first) = self.order.first() {
            closed.push(first);
        }
        closed
    }

    /// The same cycle, rotated so that it starts at `city`.
    ///
    /// Returns `None` if `city` is not on the tour.
    pub fn rotated_to(&self, city: usize) -> Option<Tour> {
        let pos = self.order.iter().position(|&c| c == city)?;
        let mut order = self.order.clone();
        order.rotate_left(pos);
        Some(Self { order })
    }

    /// Closed-tour length under `matrix`.
    pub fn cost(&self, matrix: &DistanceMatrix) -> f64 {
        tour_cost(&self.order, matrix)
    }

    /// Checks that this tour is a permutation of exactly `n` cities.
    pub fn ensure_len(&self, n: usize) -> Result<()> {
        if self.order.len() != n {
            return Err(Error::SizeMismatch {
                expected: n,
                actual: self.order.len(),
            });
        }
        Ok(())
    }
}

impl AsRef<[usize]> for Tour {
    fn as_ref(&self) -> &[usize] {
        &self.order
    }
}

impl TryFrom<Vec<usize>> for Tour {
    type Error = Error;

    fn try_from(order: Vec<usize>) -> Result<Self> {
        Tour::new(order)
    }
}

fn check_permutation(order: &[usize]) -> Result<()> {
    let n = order.len();
    let mut seen = vec![false; n];
    for &city in order {
        if city >= n {
            return Err(Error::invalid_tour(format!(
                "city {city} out of range for {n} cities"
            )));
        }
        if std::mem::replace(&mut seen[city], true) {
            return Err(Error::invalid_tour(format!("city {city} visited twice")));
        }
    }
    Ok(())
}
