//! Deterministic fixtures shared by unit, behaviour and property tests.
//!
//! Enabled for this crate's own tests and, through the `test-support`
//! feature, for the solver crates.

use crate::{CostMatrix, InvalidMatrixError, MatrixError, MatrixProvider, Place, TourMode};

/// Four places on the corners of a small square near the equator, listed
/// clockwise from the south-west corner.
#[must_use]
pub fn square_places() -> Vec<Place> {
    vec![
        Place::from_lat_lon(1, 0.0, 0.0),
        Place::from_lat_lon(2, 0.01, 0.0),
        Place::from_lat_lon(3, 0.01, 0.01),
        Place::from_lat_lon(4, 0.0, 0.01),
    ]
}

/// Unit square with sides of cost `1` and diagonals of cost `1.5`.
///
/// Places are ordered around the perimeter, so `[0, 1, 2, 3]` and
/// `[0, 3, 2, 1]` are the optimal cycles with cost `4`.
///
/// # Panics
///
/// Never panics; the literal matrix is valid.
#[must_use]
#[expect(clippy::expect_used, reason = "fixture matrix is a valid literal")]
pub fn square_matrix() -> CostMatrix {
    CostMatrix::from_rows(vec![
        vec![0.0, 1.0, 1.5, 1.0],
        vec![1.0, 0.0, 1.0, 1.5],
        vec![1.5, 1.0, 0.0, 1.0],
        vec![1.0, 1.5, 1.0, 0.0],
    ])
    .expect("square fixture is valid")
}

/// Directed three-place matrix whose best path is `[0, 1, 2]` at cost `2`.
///
/// Travelling the same order against the arrows costs `11`.
///
/// # Panics
///
/// Never panics; the literal matrix is valid.
#[must_use]
#[expect(clippy::expect_used, reason = "fixture matrix is a valid literal")]
pub fn asymmetric_matrix() -> CostMatrix {
    CostMatrix::from_rows(vec![
        vec![0.0, 1.0, 4.0],
        vec![5.0, 0.0, 1.0],
        vec![1.0, 6.0, 0.0],
    ])
    .expect("asymmetric fixture is valid")
}

/// Cheapest tour by exhaustive enumeration of every order starting at `0`.
///
/// Only suitable for small matrices. Ties keep the first order enumerated.
#[must_use]
pub fn brute_force_best(matrix: &CostMatrix, mode: TourMode) -> (Vec<usize>, f64) {
    let mut rest: Vec<usize> = (1..matrix.size()).collect();
    let mut best_order: Vec<usize> = (0..matrix.size()).collect();
    let mut best_cost = matrix.tour_cost(&best_order, mode);
    permute(&mut rest, 0, &mut |tail| {
        let mut order = Vec::with_capacity(tail.len().saturating_add(1));
        order.push(0);
        order.extend_from_slice(tail);
        let cost = matrix.tour_cost(&order, mode);
        if cost < best_cost {
            best_cost = cost;
            best_order = order;
        }
    });
    (best_order, best_cost)
}

fn permute<F>(items: &mut [usize], fixed: usize, visit: &mut F)
where
    F: FnMut(&[usize]),
{
    if fixed >= items.len() {
        visit(items);
        return;
    }
    for candidate in fixed..items.len() {
        items.swap(fixed, candidate);
        permute(items, fixed.saturating_add(1), visit);
        items.swap(fixed, candidate);
    }
}

/// `MatrixProvider` that ignores coordinates and returns a stored matrix.
#[derive(Debug, Clone)]
pub struct FixedMatrixProvider {
    matrix: CostMatrix,
}

impl FixedMatrixProvider {
    /// Serve `matrix` for every request of matching size.
    #[must_use]
    pub const fn new(matrix: CostMatrix) -> Self {
        Self { matrix }
    }
}

impl MatrixProvider for FixedMatrixProvider {
    fn cost_matrix(&self, places: &[Place]) -> Result<CostMatrix, MatrixError> {
        if places.is_empty() {
            return Err(MatrixError::Empty);
        }
        if places.len() != self.matrix.size() {
            return Err(InvalidMatrixError::PlaceCountMismatch {
                places: places.len(),
                size: self.matrix.size(),
            }
            .into());
        }
        Ok(self.matrix.clone())
    }
}

/// Places with identifiers `1..=size` and no coordinates.
#[must_use]
pub fn unlocated_places(size: usize) -> Vec<Place> {
    (1..=size as u64).map(Place::without_location).collect()
}
