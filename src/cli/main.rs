#![warn(clippy::all, clippy::pedantic)]
use std::error::Error;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self as stdio, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::thread;
use std::time::Instant;

use clap::{ArgAction, Parser, ValueEnum};
use munkres::{Assignment, Cost, Forest, Matrix, Munkres, Reduction, Solver};
use serde::de::DeserializeOwned;
use serde::Serialize;
use log::SetLoggerError;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

mod io;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Csv,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    /// Step-based Munkres with covers and starred/primed zeros
    Munkres,
    /// Knuth's forest of alternating trees with column slacks
    Forest,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ReductionArg {
    Rows,
    RowsThenColumns,
}

impl From<ReductionArg> for Reduction {
    fn from(value: ReductionArg) -> Self {
        match value {
            ReductionArg::Rows => Reduction::Rows,
            ReductionArg::RowsThenColumns => Reduction::RowsThenColumns,
        }
    }
}

/// Solve minimum-cost assignment problems on dense cost matrices
#[derive(Debug, Parser)]
#[command(name = "munkres-cli", version)]
struct Cli {
    /// Cost matrix files, solved concurrently
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    input_format: Format,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    output_format: Format,

    #[arg(long, value_enum, default_value_t = Algorithm::Munkres)]
    algorithm: Algorithm,

    /// Initial reduction of the munkres solver
    #[arg(long, value_enum, default_value_t = ReductionArg::Rows)]
    reduction: ReductionArg,

    /// Double-check the solution before writing it
    #[arg(long)]
    verify: bool,

    /// Parse costs as floating point numbers instead of integers
    #[arg(long)]
    float: bool,

    /// Precede text output with the elapsed milliseconds
    #[arg(long)]
    timing: bool,

    /// Write results to stdout instead of `<input>.out`
    #[arg(long)]
    stdout: bool,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logger(cli.verbose) {
        eprintln!("munkres-cli: logging disabled, {e}");
    }

    let res = if cli.float {
        solve_files::<f64>(&cli)
    } else {
        solve_files::<i64>(&cli)
    };
    if let Err(e) = res {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Fails if a logger is already installed for this process.
fn init_logger(verbose: u8) -> Result<(), SetLoggerError> {
    TermLogger::init(
        log_level(verbose),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
}

fn solve_files<C>(cli: &Cli) -> Result<(), Box<dyn Error>>
where
    C: Cost + FromStr + DeserializeOwned + Serialize,
    C::Err: Error + 'static,
{
    // solves are independent, one thread per input file
    let outputs: Vec<Result<Vec<u8>, String>> = thread::scope(|s| {
        let handles: Vec<_> = cli
            .inputs
            .iter()
            .map(|path| {
                s.spawn(move || {
                    solve_file::<C>(cli, path).map_err(|e| format!("{}: {e}", path.display()))
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| {
                h.join()
                    .unwrap_or_else(|_| Err("solver thread panicked".to_string()))
            })
            .collect()
    });

    let mut failed = 0;
    for (path, output) in cli.inputs.iter().zip(outputs) {
        match output {
            Ok(bytes) if cli.stdout => stdio::stdout().lock().write_all(&bytes)?,
            Ok(bytes) => {
                let target = output_path(path);
                File::create(&target)?.write_all(&bytes)?;
                log::info!("wrote {}", target.display());
            }
            Err(e) => {
                log::error!("{e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} of {} inputs failed", cli.inputs.len()).into());
    }
    Ok(())
}

fn solve_file<C>(cli: &Cli, path: &Path) -> Result<Vec<u8>, Box<dyn Error>>
where
    C: Cost + FromStr + DeserializeOwned + Serialize,
    C::Err: Error + 'static,
{
    let costs: Matrix<C> = match cli.input_format {
        Format::Text => io::read_text(path)?,
        Format::Csv => io::read_csv(path)?,
    };
    log::info!(
        "{}: {}x{} cost matrix",
        path.display(),
        costs.rows(),
        costs.cols()
    );

    let start = Instant::now();
    let assignment = match cli.algorithm {
        Algorithm::Munkres => solve_with(
            Munkres::new()
                .with_reduction(cli.reduction.into())
                .with_verification(cli.verify),
            &costs,
            cli.verify,
        )?,
        Algorithm::Forest => solve_with(
            Forest::new().with_verification(cli.verify),
            &costs,
            cli.verify,
        )?,
    };
    let elapsed = start.elapsed();
    log::info!(
        "{}: total cost {} in {elapsed:?}",
        path.display(),
        assignment.total_cost()
    );

    let mut out = Vec::new();
    match cli.output_format {
        Format::Text => io::write_text(
            &mut out,
            &assignment,
            cli.timing.then(|| elapsed.as_millis()),
        )?,
        Format::Csv => io::write_csv(&mut out, &costs, &assignment)?,
    }
    Ok(out)
}

fn solve_with<C, S>(
    mut solver: S,
    costs: &Matrix<C>,
    check: bool,
) -> Result<Assignment<C>, munkres::Error>
where
    S: Solver<Cost = C, Error = munkres::Error>,
{
    let assignment = solver.solve(costs)?;
    if check {
        solver.check(costs, &assignment)?;
    }
    Ok(assignment)
}

fn output_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".out");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::{init_logger, log_level, output_path};
    use simplelog::LevelFilter;
    use std::path::Path;

    #[test]
    fn verbosity_raises_the_log_level() {
        assert_eq!(log_level(0), LevelFilter::Warn);
        assert_eq!(log_level(2), LevelFilter::Debug);
        assert_eq!(log_level(7), LevelFilter::Trace);
    }

    #[test]
    fn second_logger_is_refused() {
        // the first call may win or lose against another logger, the second never wins
        let _ = init_logger(0);
        assert!(init_logger(1).is_err());
    }

    #[test]
    fn output_sits_next_to_the_input() {
        assert_eq!(
            output_path(Path::new("data/costs.txt")),
            Path::new("data/costs.txt.out")
        );
    }
}
