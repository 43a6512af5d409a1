//! Command-line interface for the Wayfarer trip optimiser.
//!
//! `wayfarer solve` orders the places of a JSON trip request and
//! `wayfarer bench` times the optimiser on synthetic trips. Every option can
//! also come from a configuration file or a `WAYFARER_*` environment
//! variable.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Serialize;

mod bench;
mod error;
mod options;
mod request;
mod solve;

pub use error::CliError;
pub use request::TripRequestError;

use bench::{BenchArgs, run_bench};
use solve::{SolveArgs, run_solve};

const ARG_SOLVE_REQUEST: &str = "request";
const ENV_SOLVE_REQUEST: &str = "WAYFARER_CMDS_SOLVE_REQUEST_PATH";

/// Run the Wayfarer CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, input
/// cannot be read, the optimiser fails, or output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &mut stdout)
}

fn dispatch(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Solve(args) => run_solve(args, writer),
        Command::Bench(args) => run_bench(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "wayfarer",
    about = "Order the places of a trip by travel cost",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Order the places of a JSON trip request.
    Solve(SolveArgs),
    /// Benchmark the optimiser on synthetic trips.
    Bench(BenchArgs),
}

/// Write `value` as pretty JSON followed by a newline.
fn write_json<T: Serialize + ?Sized>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *writer, value).map_err(CliError::SerialiseReport)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)
}

#[cfg(test)]
mod tests;
