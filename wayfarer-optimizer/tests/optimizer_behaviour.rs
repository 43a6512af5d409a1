//! Behavioural tests for `TripOptimizer` using rstest-bdd.

use std::cell::RefCell;
use std::time::Duration;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use wayfarer_core::test_support::{asymmetric_matrix, square_matrix};
use wayfarer_core::{
    CostMatrix, InvalidMatrixError, Place, Solution, SolveConfig, SolveError, Strategy, TourMode,
};
use wayfarer_optimizer::TripOptimizer;

#[derive(Debug)]
struct TripWorld {
    places: RefCell<Vec<Place>>,
    matrix: RefCell<Option<CostMatrix>>,
    config: RefCell<SolveConfig>,
    outcome: RefCell<Option<Result<Solution, SolveError>>>,
}

impl TripWorld {
    fn new() -> Self {
        Self {
            places: RefCell::new(Vec::new()),
            matrix: RefCell::new(None),
            config: RefCell::new(SolveConfig::default()),
            outcome: RefCell::new(None),
        }
    }

    fn set_places(&self, count: u64) {
        self.places
            .replace((0..count).map(Place::without_location).collect());
    }

    fn update_config(&self, update: impl FnOnce(SolveConfig) -> SolveConfig) {
        let current = *self.config.borrow();
        self.config.replace(update(current));
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn expect_outcome(&self) -> Result<Solution, SolveError> {
        self.outcome
            .borrow()
            .clone()
            .expect("outcome should be recorded before assertions")
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn expect_solution(&self) -> Solution {
        self.expect_outcome().expect("expected a solution")
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn expect_error(&self) -> SolveError {
        self.expect_outcome().expect_err("expected the request to fail")
    }
}

#[fixture]
fn world() -> TripWorld {
    TripWorld::new()
}

#[given("a trip with a single place")]
fn given_one_place(world: &TripWorld) {
    world.set_places(1);
}

#[given("a trip with {count} places")]
fn given_places(world: &TripWorld, count: u64) {
    world.set_places(count);
}

#[given("a trip over the unit square")]
fn given_square(world: &TripWorld) {
    world.set_places(4);
    world.matrix.replace(Some(square_matrix()));
}

#[given("a trip with one cheap direction")]
fn given_asymmetric(world: &TripWorld) {
    world.set_places(3);
    world.matrix.replace(Some(asymmetric_matrix()));
}

#[given("a trip with {count} places and uneven directed costs")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn given_uneven(world: &TripWorld, count: u64) {
    world.set_places(count);
    let size = usize::try_from(count).expect("trip size fits in usize");
    let matrix = CostMatrix::from_fn(size, |from, to| if from < to { 2.0 } else { 3.0 })
        .expect("uneven matrix is valid");
    world.matrix.replace(Some(matrix));
}

#[given("a supplied unit square matrix")]
fn given_supplied_square(world: &TripWorld) {
    world.matrix.replace(Some(square_matrix()));
}

#[given("the tour returns to the start")]
fn given_cycle(world: &TripWorld) {
    world.update_config(|config| config.with_tour_mode(TourMode::Cycle));
}

#[given("an exact threshold of {threshold}")]
fn given_threshold(world: &TripWorld, threshold: usize) {
    world.update_config(|config| config.with_exact_size_threshold(threshold));
}

#[given("an exact budget of {millis} millisecond")]
fn given_budget(world: &TripWorld, millis: u64) {
    world.update_config(|config| {
        config
            .with_time_budget(Duration::from_millis(millis))
            .with_improvement_budget(Duration::from_millis(50))
    });
}

#[when("the trip is optimised")]
fn when_optimised(world: &TripWorld) {
    let places = world.places.borrow().clone();
    let matrix = world.matrix.borrow().clone();
    let config = *world.config.borrow();
    let outcome = TripOptimizer::new().solve(&places, matrix, &config);
    world.outcome.replace(Some(outcome));
}

#[then("the tour is 0")]
fn then_single(world: &TripWorld) {
    assert_eq!(world.expect_solution().tour.order(), &[0]);
}

#[then("the tour is 0, 1, 2")]
fn then_forward(world: &TripWorld) {
    assert_eq!(world.expect_solution().tour.order(), &[0, 1, 2]);
}

#[then("the total cost is {cost}")]
#[expect(clippy::float_cmp, reason = "fixture costs are small integers")]
fn then_cost(world: &TripWorld, cost: f64) {
    assert_eq!(world.expect_solution().total_cost, cost);
}

#[then("the solution is exact")]
fn then_exact(world: &TripWorld) {
    let solution = world.expect_solution();
    assert!(solution.is_exact);
    assert!(!solution.timed_out);
}

#[then("the solution is approximate without a timeout")]
fn then_approximate(world: &TripWorld) {
    let solution = world.expect_solution();
    assert_eq!(solution.strategy, Strategy::Approximate);
    assert!(!solution.is_exact);
    assert!(!solution.timed_out);
}

#[then("the exact search timed out")]
fn then_timed_out(world: &TripWorld) {
    let solution = world.expect_solution();
    assert!(solution.timed_out);
    assert!(!solution.is_exact);
    assert_eq!(solution.strategy, Strategy::Approximate);
}

#[then("the tour visits every place once")]
fn then_permutation(world: &TripWorld) {
    let size = world.places.borrow().len();
    let mut order = world.expect_solution().tour.into_order();
    assert_eq!(order.first(), Some(&0));
    order.sort_unstable();
    assert_eq!(order, (0..size).collect::<Vec<_>>());
}

#[then("the request fails as empty")]
fn then_empty(world: &TripWorld) {
    assert_eq!(world.expect_error(), SolveError::EmptyInput);
}

#[then("the request fails with a place count mismatch")]
fn then_mismatch(world: &TripWorld) {
    assert!(matches!(
        world.expect_error(),
        SolveError::InvalidMatrix(InvalidMatrixError::PlaceCountMismatch { .. })
    ));
}

#[scenario(path = "tests/features/trip_optimizer.feature", index = 0)]
fn single_place(world: TripWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/trip_optimizer.feature", index = 1)]
fn empty_trip(world: TripWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/trip_optimizer.feature", index = 2)]
fn exact_loop(world: TripWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/trip_optimizer.feature", index = 3)]
fn directed_costs(world: TripWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/trip_optimizer.feature", index = 4)]
fn timeout_fallback(world: TripWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/trip_optimizer.feature", index = 5)]
fn above_threshold(world: TripWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/trip_optimizer.feature", index = 6)]
fn size_mismatch(world: TripWorld) {
    let _ = world;
}
