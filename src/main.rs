//! Eightpiece UCI engine main entry point.

use clap::Parser;
use eightpiece::config::EngineConfig;
use eightpiece::uci::UciOptions;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with option values applied at start-up
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write `Info` level log lines to this file
    #[arg(short, long)]
    log_file: Option<PathBuf>,

    /// Debug output on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match args.config.as_deref().map(EngineConfig::load).transpose() {
        Ok(c) => c.unwrap_or_default(),
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let verbose = args.verbose || config.verbose.unwrap_or(false);
    let log_file = args.log_file.or_else(|| config.log_file.clone());
    eightpiece::logging::init(verbose, log_file.as_deref());

    let mut options = UciOptions::default();
    if let Err(e) = config.apply(&mut options) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }
    options.verbose = verbose;

    if let Err(e) = eightpiece::try_init() {
        log::error!("{}", e);
        return ExitCode::FAILURE;
    }

    // Run UCI main loop
    if let Err(e) = eightpiece::uci::run_uci_loop(options) {
        log::error!("UCI loop failed: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
