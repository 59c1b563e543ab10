//! Recover a star-formation history from an observed white-dwarf
//! luminosity function.
//!
//! Usage:
//! ```
//! wdlf-invert --observed lf.json [--config config.json] [--initial-guess sfr.json] [--output result.json]
//! ```
//!
//! Exit status is 0 when the inversion converged, 1 when it hit the
//! iteration limit or was stopped, 2 for invalid input and 3 when the result
//! could not be written.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use inversion::config::load_json;
use inversion::{
    BinnedSfr, InversionConfig, InversionController, InversionError, InversionOutcome,
    ObservedLuminosityFunction, SfrModel, StellarPhysics,
};
use log::{error, info};
use units::Time;

/// Command line arguments for a luminosity-function inversion
#[derive(Parser, Debug)]
#[command(
    name = "wdlf-invert",
    about = "Inverts a white-dwarf luminosity function into a star-formation history",
    long_about = None
)]
struct Args {
    /// Observed luminosity function (JSON: binCenters, binWidths, density, densityError)
    #[arg(long)]
    observed: PathBuf,

    /// Run configuration (JSON); defaults apply to missing keys
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial formation-rate model (JSON, tagged by "type")
    #[arg(long)]
    initial_guess: Option<PathBuf>,

    /// Number of lookback-time bins for a flat or analytic initial guess
    #[arg(long, default_value_t = 10)]
    bins: usize,

    /// Oldest lookback time in Gyr for the flat initial guess
    #[arg(long, default_value_t = 13.0)]
    max_age_gyr: f64,

    /// Rate of the flat initial guess, stars per year
    #[arg(long, default_value_t = 1.0)]
    initial_rate: f64,

    /// Where to write the result; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(outcome) => {
            info!(
                "{} after {} iterations, final chi-square {:?}",
                outcome.termination,
                outcome.iterations,
                outcome.chi_square_history.last()
            );
            ExitCode::from(outcome.termination.exit_code())
        }
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(args: &Args) -> Result<InversionOutcome, InversionError> {
    let config = match &args.config {
        Some(path) => InversionConfig::from_json_file(path)?,
        None => InversionConfig::default(),
    };
    let observed: ObservedLuminosityFunction = load_json(&args.observed)?;
    let initial = match &args.initial_guess {
        Some(path) => load_json::<SfrModel>(path)?.to_binned(args.bins)?,
        None => BinnedSfr::flat(Time::from_gyr(args.max_age_gyr), args.bins, args.initial_rate)?,
    };
    info!(
        "observed luminosity function: {} bins over M = {:?}; initial guess: {} bins to {:.2} Gyr",
        observed.len(),
        observed.magnitude_range(),
        initial.len(),
        initial.t_max().to_gyr()
    );

    let mut controller =
        InversionController::new(&config, observed, initial, StellarPhysics::reference())?;
    let outcome = controller.run();

    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|source| output_error(path, source))?;
            write_outcome(BufWriter::new(file), &outcome)
                .map_err(|source| output_error(path, source))?;
        }
        None => write_outcome(io::stdout().lock(), &outcome)
            .map_err(|source| output_error(Path::new("<stdout>"), source))?,
    }
    Ok(outcome)
}

fn write_outcome<W: Write>(mut writer: W, outcome: &InversionOutcome) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, outcome)?;
    writeln!(writer)?;
    writer.flush()
}

fn output_error(path: &Path, source: io::Error) -> InversionError {
    InversionError::Output {
        path: path.display().to_string(),
        source,
    }
}
