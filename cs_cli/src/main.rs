use std::process::ExitCode;

use clap::Parser;
use cs_parser::parse_class_file;

mod ui;

/// Dumps the structure of a Java `.class` file.
#[derive(Parser)]
struct Args {
    /// Path to the `.class` file to decode.
    file: std::path::PathBuf,

    /// Increase logging verbosity (-v, -vv); RUST_LOG still takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let bytes = match std::fs::read(&args.file) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("could not read {}: {err}", args.file.display());
            return ExitCode::FAILURE;
        }
    };

    let class = match parse_class_file(&bytes) {
        Ok(class) => class,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let stdout = std::io::stdout();
    if let Err(err) = ui::display_class(stdout.lock(), &class) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
