//! Behaviour-driven step definitions driving the bench CLI scenarios.

use super::helpers::Workspace;
use super::*;
use crate::bench::{ARG_COMPARE, ARG_OUTPUT, ARG_SIZES, ARG_TRIALS};
use crate::options::ARG_IMPROVEMENT_BUDGET_MS;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

#[derive(Debug)]
struct BenchWorld {
    workspace: Workspace,
    cli_args: RefCell<Vec<String>>,
    output: RefCell<Option<camino::Utf8PathBuf>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl BenchWorld {
    fn new() -> Self {
        Self {
            workspace: Workspace::new(),
            cli_args: RefCell::new(Vec::new()),
            output: RefCell::new(None),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn push_option(&self, name: &str, value: String) {
        self.cli_args
            .borrow_mut()
            .extend([format!("--{name}"), value]);
    }

    fn stdout(&self) -> String {
        String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8")
    }

    fn assert_succeeded(&self) {
        let borrowed = self.result.borrow();
        let result = borrowed.as_ref().expect("result recorded");
        assert!(result.is_ok(), "expected success, found {result:?}");
    }
}

#[fixture]
fn world() -> BenchWorld {
    BenchWorld::new()
}

fn run_count(report: &serde_json::Value) -> usize {
    report["runs"].as_array().map_or(0, Vec::len)
}

#[given("a benchmark of sizes {sizes} with {trials} trials")]
fn benchmark_of(#[from(world)] world: &BenchWorld, sizes: String, trials: usize) {
    world.push_option(ARG_SIZES, sizes);
    world.push_option(ARG_TRIALS, trials.to_string());
    world.push_option(ARG_IMPROVEMENT_BUDGET_MS, "20".to_owned());
}

#[given("the report is written to a nested output file")]
fn nested_output(#[from(world)] world: &BenchWorld) {
    let path = world.workspace.path("reports/latest/bench.json");
    world.push_option(ARG_OUTPUT, path.as_str().to_owned());
    world.output.replace(Some(path));
}

#[given("both tiers are compared")]
fn both_tiers_compared(#[from(world)] world: &BenchWorld) {
    world.cli_args.borrow_mut().push(format!("--{ARG_COMPARE}"));
}

#[when("I run the bench command")]
fn run_bench_command(#[from(world)] world: &BenchWorld) {
    let mut argv = vec!["wayfarer".to_owned(), "bench".to_owned()];
    argv.extend(world.cli_args.borrow().iter().cloned());
    let parsed = Cli::try_parse_from(argv).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| {
        let mut buffer = world.stdout.borrow_mut();
        dispatch(cli.command, &mut *buffer)
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds and prints a report with {runs} runs")]
fn prints_report(#[from(world)] world: &BenchWorld, runs: usize) {
    world.assert_succeeded();
    let report: serde_json::Value =
        serde_json::from_str(&world.stdout()).expect("stdout should be a JSON report");
    assert_eq!(run_count(&report), runs);
}

#[then("the report summarises {sizes} sizes")]
fn summarises_sizes(#[from(world)] world: &BenchWorld, sizes: usize) {
    let report: serde_json::Value =
        serde_json::from_str(&world.stdout()).expect("stdout should be a JSON report");
    let summaries = report["summaries"].as_array().expect("summaries array");
    assert_eq!(summaries.len(), sizes);
    assert!(summaries.iter().all(|summary| summary["runs"] == 2));
}

#[then("the report compares {instances} instances")]
fn compares_instances(#[from(world)] world: &BenchWorld, instances: usize) {
    let report: serde_json::Value =
        serde_json::from_str(&world.stdout()).expect("stdout should be a JSON report");
    let comparisons = report["comparisons"].as_array().expect("comparisons array");
    assert_eq!(comparisons.len(), instances);
    assert!(
        comparisons
            .iter()
            .all(|comparison| comparison["gap_percent"].as_f64().is_some_and(|gap| gap >= -1e-6))
    );
    assert_eq!(report["gaps"].as_array().map(Vec::len), Some(instances));
}

#[then("the report file holds {runs} runs")]
fn report_file_holds(#[from(world)] world: &BenchWorld, runs: usize) {
    world.assert_succeeded();
    let path = world.output.borrow().clone().expect("output path recorded");
    let contents = std::fs::read_to_string(&path).expect("report written");
    let report: serde_json::Value = serde_json::from_str(&contents).expect("report is JSON");
    assert_eq!(run_count(&report), runs);
}

#[then("a summary table is printed")]
fn summary_table_printed(#[from(world)] world: &BenchWorld) {
    let stdout = world.stdout();
    let mut lines = stdout.lines();
    let header = lines.next().expect("table header");
    assert!(header.contains("size") && header.contains("timeouts"));
    assert_eq!(lines.count(), 1);
}

#[then("the command fails because an option is invalid")]
fn fails_invalid_option(#[from(world)] world: &BenchWorld) {
    let error = world
        .result
        .borrow_mut()
        .take()
        .expect("result recorded")
        .expect_err("expected the command to fail");
    assert!(
        matches!(error, CliError::InvalidOption { .. }),
        "expected InvalidOption, found {error:?}"
    );
}

macro_rules! register_bench_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/bench_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: BenchWorld) {
            let _ = world;
        }
    };
}

register_bench_scenario!(bench_prints_report, "printing a benchmark report");
register_bench_scenario!(bench_writes_report, "writing a benchmark report to disk");
register_bench_scenario!(bench_zero_trials, "rejecting zero trials");
register_bench_scenario!(bench_malformed_sizes, "rejecting malformed sizes");
register_bench_scenario!(bench_compare_tiers, "comparing exact and approximate tours");
register_bench_scenario!(bench_repeated_sizes, "rejecting repeated sizes");
