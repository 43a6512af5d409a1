//! `vrp-core` modelling helpers for `VrpTourSolver`.
//!
//! This module converts a cost matrix into a single-vehicle `vrp-core`
//! problem, runs the solver, and translates the resulting route back into a
//! visiting order over place indices.

use std::sync::Arc;
use std::time::Duration;

use vrp_core::models::common::{Location, Profile};
use vrp_core::models::problem::TravelTime;
use vrp_core::models::solution::Route as VrpRoute;
use vrp_core::prelude::*;
use vrp_core::rosomaxa::evolution::TelemetryMode;
use vrp_core::rosomaxa::utils::Parallelism;
use wayfarer_core::{CostMatrix, TourMode};

/// Vehicle identifier used for the single traveller.
const TRAVELLER_ID: &str = "traveller";
/// How often the search reports its best solution, in generations.
const LOG_BEST_EVERY: usize = 100;
/// How often the search reports its population, in generations.
const LOG_POPULATION_EVERY: usize = 1000;

/// Route `vrp-core` progress messages through `log` at debug level.
///
/// The library prints to stdout unless given a logger, and stdout carries
/// the CLI's JSON report.
fn debug_logger() -> InfoLogger {
    Arc::new(|message: &str| log::debug!(target: "vrp_core", "{message}"))
}

/// `vrp-core` only accepts whole seconds; round up and never go below one.
fn whole_seconds(budget: Duration) -> usize {
    let seconds = budget
        .as_secs()
        .saturating_add(u64::from(budget.subsec_nanos() > 0))
        .max(1);
    usize::try_from(seconds).unwrap_or(usize::MAX)
}

/// Matrix-backed transport costs with unreachable legs replaced by a large
/// finite penalty, since `vrp-core` cannot rank infinite costs.
///
/// In path mode an extra sink location follows the places. The vehicle ends
/// there, every place reaches it for free, and so the route pays no return
/// leg.
struct MatrixTransportCost {
    size: usize,
    costs: Vec<f64>,
    penalty: f64,
    sink: Option<Location>,
}

impl MatrixTransportCost {
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "the penalty scales the largest finite leg by the trip size"
    )]
    fn new(matrix: &CostMatrix, mode: TourMode) -> Self {
        let size = matrix.size();
        let largest = matrix
            .rows()
            .flatten()
            .copied()
            .filter(|cost| cost.is_finite())
            .fold(0.0_f64, f64::max);
        let penalty = (largest + 1.0) * (size as f64 + 1.0);
        let costs = matrix
            .rows()
            .flatten()
            .map(|&cost| if cost.is_finite() { cost } else { penalty })
            .collect();
        let sink = match mode {
            TourMode::Path => Some(size),
            TourMode::Cycle => None,
        };
        Self {
            size,
            costs,
            penalty,
            sink,
        }
    }

    /// Location where the vehicle finishes.
    fn end_location(&self) -> Location {
        self.sink.unwrap_or(0)
    }

    fn leg(&self, from: Location, to: Location) -> f64 {
        if from == to {
            return 0.0;
        }
        if Some(to) == self.sink {
            return 0.0;
        }
        if Some(from) == self.sink {
            return self.penalty;
        }
        let result = from
            .checked_mul(self.size)
            .and_then(|row| row.checked_add(to))
            .and_then(|slot| self.costs.get(slot))
            .copied();
        debug_assert!(result.is_some(), "matrix lookup failed: from={from}, to={to}");
        result.unwrap_or(self.penalty)
    }
}

impl TransportCost for MatrixTransportCost {
    // The trait passes `route` and `departure` so that other implementations
    // can model time-dependent costs; a static matrix ignores them.
    fn distance(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> Cost {
        self.leg(from, to)
    }

    fn duration(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> f64 {
        self.leg(from, to)
    }

    fn distance_approx(&self, profile: &Profile, from: usize, to: usize) -> f64 {
        self.duration_approx(profile, from, to)
    }

    fn duration_approx(&self, _profile: &Profile, from: usize, to: usize) -> f64 {
        self.leg(from, to)
    }
}

fn define_goal(transport: Arc<dyn TransportCost>) -> GenericResult<GoalContext> {
    let minimize_unassigned = MinimizeUnassignedBuilder::new("min-unassigned").build()?;
    let transport_feature = TransportFeatureBuilder::new("min-distance")
        .set_transport_cost(transport)
        .set_time_constrained(false)
        .build_minimize_distance()?;

    GoalContextBuilder::with_features(&[minimize_unassigned, transport_feature])?.build()
}

fn define_problem(
    size: usize,
    end_location: Location,
    transport: Arc<dyn TransportCost>,
    goal: GoalContext,
    logger: InfoLogger,
) -> GenericResult<Problem> {
    let jobs = (1..size)
        .map(|location| {
            SingleBuilder::default()
                .id(format!("place{location}").as_str())
                .location(location)?
                .build_as_job()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let vehicle = VehicleBuilder::default()
        .id(TRAVELLER_ID)
        .add_detail(
            VehicleDetailBuilder::default()
                .set_start_location(0)
                .set_start_time(0.0)
                .set_end_location(end_location)
                .build()?,
        )
        .build()?;

    ProblemBuilder::default()
        .add_jobs(jobs.into_iter())
        .add_vehicles(std::iter::once(vehicle))
        .with_goal(goal)
        .with_transport_cost(transport)
        .with_logger(logger)
        .build()
}

/// Solve `matrix` with `vrp-core` and return the visiting order.
///
/// The search stops after `max_generations` or once `max_time` (rounded up
/// to whole seconds) has passed, whichever comes first. The start place is
/// always first. Places the solver left unassigned are missing from the
/// result, so callers must validate its length.
pub(super) fn solve_order(
    matrix: &CostMatrix,
    mode: TourMode,
    max_generations: usize,
    max_time: Duration,
) -> GenericResult<Vec<usize>> {
    let size = matrix.size();
    let logger = debug_logger();
    let transport = Arc::new(MatrixTransportCost::new(matrix, mode));
    let end_location = transport.end_location();
    let goal = define_goal(transport.clone())?;
    let problem = Arc::new(define_problem(
        size,
        end_location,
        transport,
        goal,
        logger.clone(),
    )?);

    let environment = Arc::new(Environment::new(
        Arc::new(DefaultRandom::default()),
        None,
        Parallelism::default(),
        logger.clone(),
        false,
    ));
    let vrp_config = VrpConfigBuilder::new(problem.clone())
        .set_environment(environment)
        .set_telemetry_mode(TelemetryMode::OnlyLogging {
            logger,
            log_best: LOG_BEST_EVERY,
            log_population: LOG_POPULATION_EVERY,
        })
        .prebuild()?
        .with_max_generations(Some(max_generations))
        .with_max_time(Some(whole_seconds(max_time)))
        .build()?;

    let solution = vrp_core::solver::Solver::new(problem, vrp_config).solve()?;

    let mut order = Vec::with_capacity(size);
    order.push(0);
    order.extend(
        solution
            .get_locations()
            .flatten()
            .filter(|&location| location != 0 && location < size),
    );
    Ok(order)
}
