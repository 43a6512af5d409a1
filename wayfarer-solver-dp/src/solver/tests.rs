//! Tests for the `HeldKarpSolver`.

use super::*;
use rstest::{fixture, rstest};
use wayfarer_core::test_support::{asymmetric_matrix, brute_force_best, square_matrix};

const GENEROUS: Duration = Duration::from_secs(10);

#[fixture]
fn solver() -> HeldKarpSolver {
    HeldKarpSolver::new()
}

fn transpose(matrix: &CostMatrix) -> CostMatrix {
    CostMatrix::from_fn(matrix.size(), |from, to| matrix.cost(to, from)).expect("valid matrix")
}

#[rstest]
fn single_place_is_trivial(solver: HeldKarpSolver) {
    let matrix = CostMatrix::from_rows(vec![vec![0.0]]).expect("valid matrix");
    let exact = solver
        .solve(&matrix, TourMode::Cycle, GENEROUS)
        .expect("trivial tour");
    assert_eq!(exact.tour.order(), &[0]);
    assert_eq!(exact.cost, 0.0);
}

#[rstest]
#[case(TourMode::Path, 3.0)]
#[case(TourMode::Cycle, 7.0)]
fn two_places_take_the_only_order(
    solver: HeldKarpSolver,
    #[case] mode: TourMode,
    #[case] expected: f64,
) {
    let matrix = CostMatrix::from_rows(vec![vec![0.0, 3.0], vec![4.0, 0.0]]).expect("valid");
    let exact = solver.solve(&matrix, mode, GENEROUS).expect("solved");
    assert_eq!(exact.tour.order(), &[0, 1]);
    assert_eq!(exact.cost, expected);
}

#[rstest]
fn respects_edge_direction(solver: HeldKarpSolver) {
    let forward = asymmetric_matrix();
    let exact = solver
        .solve(&forward, TourMode::Path, GENEROUS)
        .expect("solved");
    assert_eq!(exact.tour.order(), &[0, 1, 2]);
    assert_eq!(exact.cost, 2.0);

    let backward = transpose(&forward);
    assert_eq!(backward.tour_cost(&[0, 1, 2], TourMode::Path), 11.0);
    let reversed = solver
        .solve(&backward, TourMode::Path, GENEROUS)
        .expect("solved");
    assert_eq!(reversed.tour.order(), &[0, 2, 1]);
    assert_eq!(reversed.cost, 2.0);
}

#[rstest]
fn square_cycle_follows_the_perimeter(solver: HeldKarpSolver) {
    let exact = solver
        .solve(&square_matrix(), TourMode::Cycle, GENEROUS)
        .expect("solved");
    assert_eq!(exact.cost, 4.0);
    assert_eq!(exact.tour.order(), &[0, 3, 2, 1]);
}

#[rstest]
fn square_path_avoids_diagonals(solver: HeldKarpSolver) {
    let matrix = square_matrix();
    let exact = solver
        .solve(&matrix, TourMode::Path, GENEROUS)
        .expect("solved");
    assert_eq!(exact.cost, 3.0);
    assert!(
        exact
            .tour
            .order()
            .windows(2)
            .all(|leg| matches!(leg, [from, to] if matrix.cost(*from, *to) == 1.0))
    );
}

#[rstest]
fn ties_resolve_identically_across_calls(solver: HeldKarpSolver) {
    let matrix = CostMatrix::from_fn(6, |_, _| 1.0).expect("valid matrix");
    let first = solver
        .solve(&matrix, TourMode::Cycle, GENEROUS)
        .expect("solved");
    let second = solver
        .solve(&matrix, TourMode::Cycle, GENEROUS)
        .expect("solved");
    assert_eq!(first, second);
}

#[rstest]
#[case(TourMode::Path)]
#[case(TourMode::Cycle)]
fn matches_brute_force_on_a_fixed_instance(solver: HeldKarpSolver, #[case] mode: TourMode) {
    let matrix = CostMatrix::from_rows(vec![
        vec![0.0, 7.0, 3.0, 9.0, 4.0, 6.0],
        vec![2.0, 0.0, 8.0, 1.0, 5.0, 9.0],
        vec![6.0, 4.0, 0.0, 7.0, 2.0, 3.0],
        vec![5.0, 9.0, 1.0, 0.0, 8.0, 2.0],
        vec![3.0, 2.0, 6.0, 4.0, 0.0, 7.0],
        vec![8.0, 1.0, 5.0, 3.0, 9.0, 0.0],
    ])
    .expect("valid matrix");
    let exact = solver.solve(&matrix, mode, GENEROUS).expect("solved");
    let (_, best) = brute_force_best(&matrix, mode);
    assert_eq!(exact.cost, best);
    assert_eq!(matrix.tour_cost(exact.tour.order(), mode), exact.cost);
}

#[rstest]
fn avoids_unreachable_legs_when_possible(solver: HeldKarpSolver) {
    let gap = CostMatrix::UNREACHABLE;
    let matrix = CostMatrix::from_rows(vec![
        vec![0.0, gap, 1.0],
        vec![gap, 0.0, gap],
        vec![gap, 1.0, 0.0],
    ])
    .expect("valid matrix");
    let exact = solver
        .solve(&matrix, TourMode::Path, GENEROUS)
        .expect("solved");
    assert_eq!(exact.tour.order(), &[0, 2, 1]);
    assert_eq!(exact.cost, 2.0);
}

#[rstest]
fn fully_unreachable_graphs_still_yield_a_tour(solver: HeldKarpSolver) {
    let matrix =
        CostMatrix::from_fn(4, |_, _| CostMatrix::UNREACHABLE).expect("sentinel is valid");
    let exact = solver
        .solve(&matrix, TourMode::Path, GENEROUS)
        .expect("solved");
    assert_eq!(exact.tour.len(), 4);
    assert_eq!(exact.cost, f64::INFINITY);
}

#[rstest]
fn rejects_oversized_trips_before_allocating(solver: HeldKarpSolver) {
    let size = MAX_EXACT_PLACES + 1;
    let matrix = CostMatrix::from_fn(size, |_, _| 1.0).expect("valid matrix");
    let err = solver
        .solve(&matrix, TourMode::Path, GENEROUS)
        .expect_err("too many places");
    assert_eq!(
        err,
        ExactError::TooManyPlaces {
            size,
            max: MAX_EXACT_PLACES
        }
    );
}

#[rstest]
fn zero_budget_times_out(solver: HeldKarpSolver) {
    let matrix = CostMatrix::from_fn(5, |_, _| 1.0).expect("valid matrix");
    let err = solver
        .solve(&matrix, TourMode::Path, Duration::ZERO)
        .expect_err("no time to fill the table");
    assert!(matches!(err, ExactError::TimedOut { .. }));
}

#[rstest]
fn large_trip_stops_near_its_deadline(solver: HeldKarpSolver) {
    let matrix =
        CostMatrix::from_fn(MAX_EXACT_PLACES, |from, to| if from < to { 2.0 } else { 3.0 })
            .expect("valid matrix");
    let started = Instant::now();
    let outcome = solver.solve(&matrix, TourMode::Cycle, Duration::from_millis(1));
    assert!(matches!(outcome, Err(ExactError::TimedOut { .. })));
    assert!(started.elapsed() < Duration::from_millis(500));
}

#[rstest]
fn unbounded_deadline_completes(solver: HeldKarpSolver) {
    let matrix = square_matrix();
    let exact = solver
        .solve_until(&matrix, TourMode::Cycle, Instant::now(), None)
        .expect("solved");
    assert_eq!(exact.cost, 4.0);
}
