//! Solve command implementation for the Wayfarer CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use wayfarer_core::{PlaceId, Solution, TourMode};

use crate::options::{
    ARG_EXACT_THRESHOLD, ARG_IMPROVEMENT_BUDGET_MS, ARG_MODE, ARG_SEED, ARG_SOLVER,
    ARG_TIME_BUDGET_MS, SolverKind, SolverOptions,
};
use crate::request::load_trip_request;
use crate::{ARG_SOLVE_REQUEST, CliError, ENV_SOLVE_REQUEST, write_json};

/// CLI arguments for the `solve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Order the places of a trip. The request is a JSON file with \
                 a `places` array of `{id, lat, lon}` entries and an optional \
                 `matrix` of travel costs that replaces haversine distances.",
    about = "Order the places of a trip"
)]
#[ortho_config(prefix = "WAYFARER")]
pub(crate) struct SolveArgs {
    /// Path to a JSON file containing a trip request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Wall-clock budget for the exact solver, in milliseconds.
    #[arg(long = ARG_TIME_BUDGET_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) time_budget_ms: Option<u64>,
    /// Largest trip handed to the exact solver.
    #[arg(long = ARG_EXACT_THRESHOLD, value_name = "places")]
    #[serde(default)]
    pub(crate) exact_threshold: Option<usize>,
    /// Whether the tour ends at its last place (`path`) or returns (`cycle`).
    #[arg(long = ARG_MODE, value_name = "path|cycle")]
    #[serde(default)]
    pub(crate) mode: Option<TourMode>,
    /// Seed for the approximate solver.
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
}

impl SolveArgs {
    pub(crate) fn into_settings(self) -> Result<SolveSettings, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SolveSettings::try_from(merged)
    }
}

/// Resolved `solve` command settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SolveSettings {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Solver options as merged from every layer.
    pub(crate) options: SolverOptions,
}

impl SolveSettings {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.request_path, ARG_SOLVE_REQUEST)
    }
}

impl TryFrom<SolveArgs> for SolveSettings {
    type Error = CliError;

    fn try_from(args: SolveArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_SOLVE_REQUEST,
            env: ENV_SOLVE_REQUEST,
        })?;
        Ok(Self {
            request_path,
            options: SolverOptions {
                time_budget_ms: args.time_budget_ms,
                exact_threshold: args.exact_threshold,
                mode: args.mode,
                seed: args.seed,
                improvement_budget_ms: args.improvement_budget_ms,
                solver: args.solver,
            },
        })
    }
}

pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match wayfarer_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// JSON printed by `wayfarer solve`.
#[derive(Debug, Serialize)]
pub(crate) struct SolveReport {
    /// Caller ids in visiting order.
    pub(crate) place_ids: Vec<PlaceId>,
    #[serde(flatten)]
    pub(crate) solution: Solution,
    /// Total in kilometres, to two decimals, when costs are haversine metres.
    pub(crate) total_cost_km: Option<f64>,
}

pub(super) fn run_solve(args: SolveArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let settings = args.into_settings()?;
    settings.validate_sources()?;
    let report = execute_solve(&settings)?;
    write_json(writer, &report)
}

pub(super) fn execute_solve(settings: &SolveSettings) -> Result<SolveReport, CliError> {
    let config = settings.options.solve_config()?;
    let optimizer = settings.options.optimizer()?;
    let request = load_trip_request(&settings.request_path)?;
    let invalid = |source| CliError::InvalidTripRequest {
        path: settings.request_path.clone(),
        source,
    };
    let places = request.places().map_err(invalid)?;
    let matrix = request.cost_matrix().map_err(invalid)?;
    let metres = matrix.is_none();

    let solution = optimizer
        .solve(&places, matrix, &config)
        .map_err(|source| CliError::Solve { source })?;
    log::info!(
        "ordered {} places with the {} tier in {:?}",
        places.len(),
        solution.strategy,
        solution.elapsed
    );
    let total_cost_km = metres.then(|| kilometres(solution.total_cost));
    Ok(SolveReport {
        place_ids: solution.place_ids(&places),
        solution,
        total_cost_km,
    })
}

/// Convert metres to kilometres rounded to two decimal places.
#[expect(clippy::float_arithmetic, reason = "unit conversion")]
pub(crate) fn kilometres(metres: f64) -> f64 {
    (metres / 10.0).round() / 100.0
}

#[cfg(test)]
pub(crate) fn settings_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SolveSettings, CliError> {
    let merged = SolveArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SolveSettings::try_from(merged)
}
