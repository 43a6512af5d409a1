//! Benchmark command: time the optimiser on synthetic trips.
//!
//! Places are drawn uniformly from a bounding box (Da Nang by default) with
//! a seeded generator, so repeated runs see the same instances. Each run
//! records the tier, timing and cost; runs are then aggregated per trip
//! size. With `--compare`, every instance small enough for the exact solver
//! is also solved by both tiers so the heuristic's optimality gap can be
//! read off the report.

use std::collections::BTreeSet;
use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use wayfarer_core::{
    CostMatrix, MatrixProvider, Place, PlaceId, SolveConfig, SolveError, Strategy, TourMode,
};
use wayfarer_optimizer::{Plan, plan};

use crate::options::{
    ARG_EXACT_THRESHOLD, ARG_IMPROVEMENT_BUDGET_MS, ARG_MODE, ARG_SEED, ARG_SOLVER,
    ARG_TIME_BUDGET_MS, CliOptimizer, SolverKind, SolverOptions,
};
use crate::{CliError, write_json};

pub(crate) const ARG_SIZES: &str = "sizes";
pub(crate) const ARG_TRIALS: &str = "trials";
pub(crate) const ARG_BBOX: &str = "bbox";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ARG_COMPARE: &str = "compare";

/// Trip sizes benchmarked when none are given.
pub(crate) const DEFAULT_SIZES: [usize; 18] = [
    5, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 20, 25, 30, 40, 50, 60,
];
/// Trials per size when none are given.
pub(crate) const DEFAULT_TRIALS: usize = 5;
/// Instance seed when none is given.
const DEFAULT_BENCH_SEED: u64 = 0;

const MAX_LATITUDE: f64 = 90.0;
const MAX_LONGITUDE: f64 = 180.0;
const MIN_LATITUDE: f64 = -MAX_LATITUDE;
const MIN_LONGITUDE: f64 = -MAX_LONGITUDE;

/// Rectangle in degrees from which synthetic places are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct BoundingBox {
    pub(crate) min_lat: f64,
    pub(crate) min_lon: f64,
    pub(crate) max_lat: f64,
    pub(crate) max_lon: f64,
}

impl BoundingBox {
    /// Central Da Nang.
    pub(crate) const DA_NANG: Self = Self {
        min_lat: 15.9,
        min_lon: 108.1,
        max_lat: 16.2,
        max_lon: 108.4,
    };

    /// Parse `min_lat,min_lon,max_lat,max_lon`.
    pub(crate) fn parse(value: &str) -> Result<Self, CliError> {
        let invalid = |reason| CliError::InvalidOption {
            field: ARG_BBOX,
            value: value.to_owned(),
            reason,
        };
        let parts = value
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid("expected four comma-separated numbers"))?;
        let [min_lat, min_lon, max_lat, max_lon] = parts.as_slice() else {
            return Err(invalid("expected min_lat,min_lon,max_lat,max_lon"));
        };
        let bbox = Self {
            min_lat: *min_lat,
            min_lon: *min_lon,
            max_lat: *max_lat,
            max_lon: *max_lon,
        };
        if !(bbox.min_lat < bbox.max_lat && bbox.min_lon < bbox.max_lon) {
            return Err(invalid("minimums must be below maximums"));
        }
        if bbox.min_lat < MIN_LATITUDE || bbox.max_lat > MAX_LATITUDE {
            return Err(invalid("latitudes must lie within -90..=90"));
        }
        if bbox.min_lon < MIN_LONGITUDE || bbox.max_lon > MAX_LONGITUDE {
            return Err(invalid("longitudes must lie within -180..=180"));
        }
        Ok(bbox)
    }

    fn sample<R: Rng>(&self, id: PlaceId, rng: &mut R) -> Place {
        let lat = rng.gen_range(self.min_lat..=self.max_lat);
        let lon = rng.gen_range(self.min_lon..=self.max_lon);
        Place::from_lat_lon(id, lat, lon)
    }
}

/// Parse a comma-separated list of trip sizes.
pub(crate) fn parse_sizes(value: &str) -> Result<Vec<usize>, CliError> {
    let invalid = |reason| CliError::InvalidOption {
        field: ARG_SIZES,
        value: value.to_owned(),
        reason,
    };
    let sizes = value
        .split(',')
        .map(|part| part.trim().parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid("expected comma-separated place counts"))?;
    if sizes.contains(&0) {
        return Err(invalid("every size needs at least one place"));
    }
    let distinct: BTreeSet<usize> = sizes.iter().copied().collect();
    if distinct.len() != sizes.len() {
        return Err(invalid("each size may appear only once"));
    }
    Ok(sizes)
}

/// CLI arguments for the `bench` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Run the optimiser on synthetic trips drawn uniformly from a \
                 bounding box and report per-run timings plus per-size \
                 aggregates as JSON.",
    about = "Benchmark the optimiser on synthetic trips"
)]
#[ortho_config(prefix = "WAYFARER")]
pub(crate) struct BenchArgs {
    /// Comma-separated trip sizes, e.g. `5,10,15`.
    #[arg(long = ARG_SIZES, value_name = "n,n,...")]
    #[serde(default)]
    pub(crate) sizes: Option<String>,
    /// Random trips per size.
    #[arg(long = ARG_TRIALS, value_name = "n")]
    #[serde(default)]
    pub(crate) trials: Option<usize>,
    /// Sampling box as `min_lat,min_lon,max_lat,max_lon`.
    #[arg(long = ARG_BBOX, value_name = "box")]
    #[serde(default)]
    pub(crate) bbox: Option<String>,
    /// Write the JSON report here instead of standard output.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Wall-clock budget for the exact solver, in milliseconds.
    #[arg(long = ARG_TIME_BUDGET_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) time_budget_ms: Option<u64>,
    /// Largest trip handed to the exact solver.
    #[arg(long = ARG_EXACT_THRESHOLD, value_name = "places")]
    #[serde(default)]
    pub(crate) exact_threshold: Option<usize>,
    /// Whether tours end at their last place (`path`) or return (`cycle`).
    #[arg(long = ARG_MODE, value_name = "path|cycle")]
    #[serde(default)]
    pub(crate) mode: Option<TourMode>,
    /// Seed for instance generation and the approximate solver.
    #[arg(long = ARG_SEED, value_name = "n")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Wall-clock budget for heuristic improvement, in milliseconds.
    #[arg(long = ARG_IMPROVEMENT_BUDGET_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) improvement_budget_ms: Option<u64>,
    /// Backend for trips above the exact threshold.
    #[arg(long = ARG_SOLVER, value_enum)]
    #[serde(default)]
    pub(crate) solver: Option<SolverKind>,
    /// Also solve each exact-sized instance with both tiers and report the gap.
    #[arg(long = ARG_COMPARE)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) compare: bool,
}

impl BenchArgs {
    pub(crate) fn into_settings(self) -> Result<BenchSettings, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        BenchSettings::try_from(merged)
    }
}

/// Resolved `bench` command settings.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BenchSettings {
    pub(crate) sizes: Vec<usize>,
    pub(crate) trials: usize,
    pub(crate) bbox: BoundingBox,
    pub(crate) seed: u64,
    pub(crate) output: Option<Utf8PathBuf>,
    pub(crate) compare: bool,
    pub(crate) options: SolverOptions,
}

impl TryFrom<BenchArgs> for BenchSettings {
    type Error = CliError;

    fn try_from(args: BenchArgs) -> Result<Self, Self::Error> {
        let sizes = args
            .sizes
            .as_deref()
            .map_or_else(|| Ok(DEFAULT_SIZES.to_vec()), parse_sizes)?;
        let trials = args.trials.unwrap_or(DEFAULT_TRIALS);
        if trials == 0 {
            return Err(CliError::InvalidOption {
                field: ARG_TRIALS,
                value: trials.to_string(),
                reason: "at least one trial is needed",
            });
        }
        let bbox = args
            .bbox
            .as_deref()
            .map_or(Ok(BoundingBox::DA_NANG), BoundingBox::parse)?;
        let seed = args.seed.unwrap_or(DEFAULT_BENCH_SEED);
        Ok(Self {
            sizes,
            trials,
            bbox,
            seed,
            output: args.output,
            compare: args.compare,
            options: SolverOptions {
                time_budget_ms: args.time_budget_ms,
                exact_threshold: args.exact_threshold,
                mode: args.mode,
                seed: Some(seed),
                improvement_budget_ms: args.improvement_budget_ms,
                solver: args.solver,
            },
        })
    }
}

/// One optimiser call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct BenchRecord {
    pub(crate) size: usize,
    pub(crate) trial: usize,
    pub(crate) strategy: Strategy,
    pub(crate) is_exact: bool,
    pub(crate) timed_out: bool,
    pub(crate) elapsed_ms: f64,
    pub(crate) total_cost_m: f64,
}

/// Aggregates over every trial of one size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct SizeSummary {
    pub(crate) size: usize,
    pub(crate) runs: usize,
    pub(crate) mean_elapsed_ms: f64,
    pub(crate) mean_cost_m: f64,
    pub(crate) timeouts: usize,
    pub(crate) timeout_rate: f64,
    pub(crate) exact: usize,
}

/// Both tiers run on the same instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct Comparison {
    pub(crate) size: usize,
    pub(crate) trial: usize,
    pub(crate) exact_cost_m: f64,
    /// False when the exact solver ran out of time and fell back.
    pub(crate) exact_is_optimal: bool,
    pub(crate) approximate_cost_m: f64,
    /// How far the approximate tour lies above the exact one, in percent.
    pub(crate) gap_percent: f64,
}

/// Optimality gap aggregated over the compared instances of one size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct GapSummary {
    pub(crate) size: usize,
    pub(crate) instances: usize,
    pub(crate) optimal: usize,
    pub(crate) mean_gap_percent: f64,
    pub(crate) max_gap_percent: f64,
}

/// Settings echoed into the report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct BenchParameters {
    pub(crate) trials: usize,
    pub(crate) seed: u64,
    pub(crate) bbox: BoundingBox,
    pub(crate) time_budget_ms: u128,
    pub(crate) improvement_budget_ms: u128,
    pub(crate) exact_threshold: usize,
    pub(crate) mode: TourMode,
}

/// Full benchmark output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct BenchReport {
    pub(crate) parameters: BenchParameters,
    pub(crate) summaries: Vec<SizeSummary>,
    pub(crate) runs: Vec<BenchRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) gaps: Vec<GapSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) comparisons: Vec<Comparison>,
}

pub(super) fn run_bench(args: BenchArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let settings = args.into_settings()?;
    let report = execute_bench(&settings)?;
    match &settings.output {
        Some(path) => {
            let mut file =
                wayfarer_fs::create_utf8_file(path).map_err(|source| CliError::CreateReport {
                    path: path.clone(),
                    source,
                })?;
            write_json(&mut file, &report)?;
            write_summary_table(writer, &report.summaries)?;
            log::info!("benchmark report written to {path}");
            Ok(())
        }
        None => write_json(writer, &report),
    }
}

pub(super) fn execute_bench(settings: &BenchSettings) -> Result<BenchReport, CliError> {
    let config = settings.options.solve_config()?;
    let optimizer = settings.options.optimizer()?;
    let mut rng = ChaCha8Rng::seed_from_u64(settings.seed);
    let mut runs = Vec::with_capacity(settings.sizes.len().saturating_mul(settings.trials));
    let mut comparisons = Vec::new();
    for &size in &settings.sizes {
        for trial in 1..=settings.trials {
            let places = synthetic_places(size, settings.bbox, &mut rng);
            let matrix = optimizer
                .provider()
                .cost_matrix(&places)
                .map_err(|err| solve_failed(err.into()))?;
            let record = run_once(&optimizer, &matrix, &config, trial)?;
            log::debug!(
                "size {size} trial {trial}: {} in {:.3} ms",
                record.strategy,
                record.elapsed_ms
            );
            runs.push(record);
            if settings.compare {
                comparisons.extend(compare_once(&optimizer, &matrix, &config, trial)?);
            }
        }
    }
    let summaries = settings
        .sizes
        .iter()
        .map(|&size| summarise(size, &runs))
        .collect();
    let gaps = settings
        .sizes
        .iter()
        .filter_map(|&size| summarise_gaps(size, &comparisons))
        .collect();
    Ok(BenchReport {
        parameters: BenchParameters {
            trials: settings.trials,
            seed: settings.seed,
            bbox: settings.bbox,
            time_budget_ms: config.time_budget.as_millis(),
            improvement_budget_ms: config.improvement_budget.as_millis(),
            exact_threshold: config.exact_size_threshold,
            mode: config.tour_mode,
        },
        summaries,
        runs,
        gaps,
        comparisons,
    })
}

fn synthetic_places<R: Rng>(size: usize, bbox: BoundingBox, rng: &mut R) -> Vec<Place> {
    (0..size)
        .zip(0_u64..)
        .map(|(_, id)| bbox.sample(id, rng))
        .collect()
}

const fn solve_failed(source: SolveError) -> CliError {
    CliError::Solve { source }
}

fn run_once(
    optimizer: &CliOptimizer,
    matrix: &CostMatrix,
    config: &SolveConfig,
    trial: usize,
) -> Result<BenchRecord, CliError> {
    let solution = optimizer
        .solve_matrix(matrix, config)
        .map_err(solve_failed)?;
    Ok(BenchRecord {
        size: matrix.size(),
        trial,
        strategy: solution.strategy,
        is_exact: solution.is_exact,
        timed_out: solution.timed_out,
        elapsed_ms: millis(solution.elapsed),
        total_cost_m: solution.total_cost,
    })
}

/// Aggregate the runs of one `size`.
pub(crate) fn summarise(size: usize, runs: &[BenchRecord]) -> SizeSummary {
    let matching: Vec<&BenchRecord> = runs.iter().filter(|run| run.size == size).collect();
    let timeouts = matching.iter().filter(|run| run.timed_out).count();
    SizeSummary {
        size,
        runs: matching.len(),
        mean_elapsed_ms: mean(matching.iter().map(|run| run.elapsed_ms)),
        mean_cost_m: mean(matching.iter().map(|run| run.total_cost_m)),
        timeouts,
        timeout_rate: ratio(timeouts, matching.len()),
        exact: matching.iter().filter(|run| run.is_exact).count(),
    }
}

/// Solve `matrix` with the exact tier and with the approximate tier alone.
///
/// Returns `None` when the instance is trivial or too large for the exact
/// solver.
fn compare_once(
    optimizer: &CliOptimizer,
    matrix: &CostMatrix,
    config: &SolveConfig,
    trial: usize,
) -> Result<Option<Comparison>, CliError> {
    let size = matrix.size();
    let exact_config = config.with_exact_size_threshold(usize::MAX);
    if plan(size, &exact_config) != Plan::Exact {
        return Ok(None);
    }
    let exact = optimizer
        .solve_matrix(matrix, &exact_config)
        .map_err(solve_failed)?;
    let approximate = optimizer
        .solve_matrix(matrix, &config.with_exact_size_threshold(0))
        .map_err(solve_failed)?;
    log::debug!(
        "size {size} trial {trial}: exact {:.1} m, approximate {:.1} m",
        exact.total_cost,
        approximate.total_cost
    );
    Ok(Some(Comparison {
        size,
        trial,
        exact_cost_m: exact.total_cost,
        exact_is_optimal: exact.is_exact,
        approximate_cost_m: approximate.total_cost,
        gap_percent: gap_percent(approximate.total_cost, exact.total_cost),
    }))
}

/// Aggregate the comparisons of one `size`, if any were made.
pub(crate) fn summarise_gaps(size: usize, comparisons: &[Comparison]) -> Option<GapSummary> {
    let matching: Vec<&Comparison> = comparisons
        .iter()
        .filter(|comparison| comparison.size == size)
        .collect();
    if matching.is_empty() {
        return None;
    }
    Some(GapSummary {
        size,
        instances: matching.len(),
        optimal: matching
            .iter()
            .filter(|comparison| comparison.exact_is_optimal)
            .count(),
        mean_gap_percent: mean(matching.iter().map(|comparison| comparison.gap_percent)),
        max_gap_percent: matching
            .iter()
            .map(|comparison| comparison.gap_percent)
            .fold(f64::NEG_INFINITY, f64::max),
    })
}

#[expect(clippy::float_arithmetic, reason = "relative cost difference")]
pub(crate) fn gap_percent(approximate: f64, exact: f64) -> f64 {
    if exact > 0.0 {
        (approximate - exact) / exact * 100.0
    } else {
        0.0
    }
}

#[expect(clippy::float_arithmetic, reason = "unit conversion")]
fn millis(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1_000.0
}

#[expect(clippy::float_arithmetic, reason = "averaging timings and costs")]
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0_u32), |(sum, count), value| {
        (sum + value, count.saturating_add(1))
    });
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}

#[expect(clippy::float_arithmetic, reason = "rates are fractions of runs")]
fn ratio(part: usize, whole: usize) -> f64 {
    match (u32::try_from(part), u32::try_from(whole)) {
        (Ok(numerator), Ok(denominator)) if denominator > 0 => {
            f64::from(numerator) / f64::from(denominator)
        }
        _ => 0.0,
    }
}

fn write_summary_table(writer: &mut dyn Write, summaries: &[SizeSummary]) -> Result<(), CliError> {
    writeln!(
        writer,
        "{:>5} {:>5} {:>12} {:>14} {:>9} {:>6}",
        "size", "runs", "mean ms", "mean cost m", "timeouts", "exact"
    )
    .map_err(CliError::WriteOutput)?;
    for summary in summaries {
        writeln!(
            writer,
            "{:>5} {:>5} {:>12.3} {:>14.1} {:>9} {:>6}",
            summary.size,
            summary.runs,
            summary.mean_elapsed_ms,
            summary.mean_cost_m,
            summary.timeouts,
            summary.exact
        )
        .map_err(CliError::WriteOutput)?;
    }
    Ok(())
}
