//! Initial tour construction.

use rand::Rng;
use wayfarer_core::CostMatrix;

/// Greedy tour from place `0`, always moving to the cheapest unvisited place.
///
/// Ties go to the lowest index. When every remaining leg is unreachable the
/// lowest unvisited index is taken so the result is still a full tour.
pub(crate) fn nearest_neighbour(matrix: &CostMatrix) -> Vec<usize> {
    build(matrix, |current, unvisited| {
        let mut best: Option<(usize, f64)> = None;
        for &candidate in unvisited {
            let cost = matrix.cost(current, candidate);
            if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                best = Some((candidate, cost));
            }
        }
        best.map(|(candidate, _)| candidate)
    })
}

/// Randomised greedy tour: each step picks uniformly among the `pool`
/// cheapest unvisited places.
///
/// A `pool` of one reproduces [`nearest_neighbour`].
pub(crate) fn randomised_greedy<R: Rng>(
    matrix: &CostMatrix,
    pool: usize,
    rng: &mut R,
) -> Vec<usize> {
    let shortlist = pool.max(1);
    build(matrix, |current, unvisited| {
        let mut ranked: Vec<(f64, usize)> = unvisited
            .iter()
            .map(|&candidate| (matrix.cost(current, candidate), candidate))
            .collect();
        ranked.sort_unstable_by(|lhs, rhs| lhs.0.total_cmp(&rhs.0).then(lhs.1.cmp(&rhs.1)));
        ranked.truncate(shortlist);
        if ranked.is_empty() {
            return None;
        }
        let pick = rng.gen_range(0..ranked.len());
        ranked.get(pick).map(|&(_, candidate)| candidate)
    })
}

fn build<F>(matrix: &CostMatrix, mut choose: F) -> Vec<usize>
where
    F: FnMut(usize, &[usize]) -> Option<usize>,
{
    let size = matrix.size();
    let mut order = Vec::with_capacity(size);
    order.push(0);
    let mut unvisited: Vec<usize> = (1..size).collect();
    let mut current = 0;
    while let Some(next) = choose(current, &unvisited) {
        unvisited.retain(|&index| index != next);
        order.push(next);
        current = next;
    }
    order
}
