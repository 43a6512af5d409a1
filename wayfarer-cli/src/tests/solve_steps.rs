//! Behaviour-driven step definitions driving the solve CLI scenarios.

use super::helpers::{DIRECTED_TRIP, SQUARE_TRIP, Workspace, write_utf8};
use super::*;
use crate::options::ARG_TIME_BUDGET_MS;
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use wayfarer_core::{SolveConfigError, SolveError};

#[derive(Debug)]
struct SolveWorld {
    _workspace: Workspace,
    request_path: Utf8PathBuf,
    include_request: RefCell<bool>,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl SolveWorld {
    fn new() -> Self {
        let workspace = Workspace::new();
        let request_path = workspace.path("request.json");
        Self {
            _workspace: workspace,
            request_path,
            include_request: RefCell::new(true),
            cli_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn write_request(&self, contents: &str) {
        write_utf8(&self.request_path, contents.as_bytes());
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["wayfarer".to_owned(), "solve".to_owned()];
        if *self.include_request.borrow() {
            argv.push(self.request_path.as_str().to_owned());
        }
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn report(&self) -> serde_json::Value {
        let stdout = String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8");
        serde_json::from_str(&stdout).expect("output should be a JSON report")
    }

    fn error(&self) -> CliError {
        self.result
            .borrow_mut()
            .take()
            .expect("result recorded")
            .expect_err("expected the command to fail")
    }
}

#[fixture]
fn world() -> SolveWorld {
    SolveWorld::new()
}

#[given("a square trip request exists on disk")]
fn square_request(#[from(world)] world: &SolveWorld) {
    world.write_request(SQUARE_TRIP);
}

#[given("a trip request with a directed matrix exists on disk")]
fn directed_request(#[from(world)] world: &SolveWorld) {
    world.write_request(DIRECTED_TRIP);
}

#[given("the trip request contains invalid JSON")]
fn invalid_json_request(#[from(world)] world: &SolveWorld) {
    world.write_request("{ not valid json");
}

#[given("a trip request without places exists on disk")]
fn empty_request(#[from(world)] world: &SolveWorld) {
    world.write_request(r#"{ "places": [] }"#);
}

#[given("I omit the trip request path")]
fn omit_request_path(#[from(world)] world: &SolveWorld) {
    world.include_request.replace(false);
}

#[given("I pass --time-budget-ms {millis}")]
fn pass_time_budget(#[from(world)] world: &SolveWorld, millis: u64) {
    world
        .cli_args
        .borrow_mut()
        .extend([format!("--{ARG_TIME_BUDGET_MS}"), millis.to_string()]);
}

#[when("I run the solve command")]
fn run_solve_command(#[from(world)] world: &SolveWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| {
        let mut buffer = world.stdout.borrow_mut();
        dispatch(cli.command, &mut *buffer)
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds and prints the solution")]
fn command_succeeds(#[from(world)] world: &SolveWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    assert!(result.is_ok(), "expected success, found {result:?}");
    let report = world.report();
    assert!(report["tour"].is_array());
    assert!(report["place_ids"].is_array());
}

#[then("the report gives the distance in kilometres")]
fn reports_kilometres(#[from(world)] world: &SolveWorld) {
    let report = world.report();
    let km = report["total_cost_km"].as_f64().expect("kilometres present");
    assert!(km > 3.2 && km < 3.5, "unexpected length {km}");
    assert_eq!(report["strategy"], "exact");
}

#[then("the places are visited as 1, 2, 3")]
fn places_in_order(#[from(world)] world: &SolveWorld) {
    assert_eq!(world.report()["place_ids"], serde_json::json!([1, 2, 3]));
}

#[then("the command fails because the request JSON is invalid")]
fn fails_invalid_json(#[from(world)] world: &SolveWorld) {
    let error = world.error();
    assert!(
        matches!(error, CliError::ParseTripRequest { .. }),
        "expected ParseTripRequest, found {error:?}"
    );
}

#[then("the command fails because the trip is empty")]
fn fails_empty(#[from(world)] world: &SolveWorld) {
    let error = world.error();
    assert!(
        matches!(
            error,
            CliError::Solve {
                source: SolveError::EmptyInput
            }
        ),
        "expected an empty trip error, found {error:?}"
    );
}

#[then("the command fails because the request path is missing")]
fn fails_missing_path(#[from(world)] world: &SolveWorld) {
    let error = world.error();
    assert!(
        matches!(
            error,
            CliError::MissingArgument {
                field: ARG_SOLVE_REQUEST,
                ..
            }
        ),
        "expected MissingArgument, found {error:?}"
    );
}

#[then("the command fails because the settings are invalid")]
fn fails_invalid_settings(#[from(world)] world: &SolveWorld) {
    let error = world.error();
    assert!(
        matches!(
            error,
            CliError::InvalidSettings(SolveConfigError::ZeroTimeBudget)
        ),
        "expected InvalidSettings, found {error:?}"
    );
}

macro_rules! register_solve_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/solve_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: SolveWorld) {
            let _ = world;
        }
    };
}

register_solve_scenario!(solve_happy_path, "solving a trip from JSON");
register_solve_scenario!(solve_supplied_matrix, "solving a trip with a supplied matrix");
register_solve_scenario!(solve_invalid_json, "rejecting invalid JSON input");
register_solve_scenario!(solve_empty_trip, "rejecting trips without places");
register_solve_scenario!(solve_missing_request, "rejecting missing request paths");
register_solve_scenario!(solve_zero_budget, "rejecting a zero time budget");
