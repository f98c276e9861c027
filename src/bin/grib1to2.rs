//! `grib1to2 IN OUT` — converts a GRIB-1 file to GRIB-2.

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use gribflip::{convert_1_to_2, IgnoreWarnings, StderrWarn, Warn};

#[derive(Parser)]
#[command(about = "Convert a GRIB edition 1 file to GRIB edition 2")]
struct Args {
    /// Input GRIB-1 file
    input: String,
    /// Output GRIB-2 file
    output: String,
    /// Suppress warnings
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let input = match fs::read(&args.input) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("error: could not read {}: {e}", args.input);
            return ExitCode::FAILURE;
        }
    };

    let warn: &dyn Warn = if args.quiet { &IgnoreWarnings } else { &StderrWarn };

    let output = match convert_1_to_2(&input, warn) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = fs::write(&args.output, output) {
        eprintln!("error: could not write {}: {e}", args.output);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
