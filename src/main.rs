use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

mod cleanup;
mod cli;
mod config;
mod engine;
mod error;
mod inputs;
mod logging;
mod manifest;
mod materialize;
mod paths;
mod staging;
mod templates;
mod workflow;

use cli::{Command, RootArgs};

fn main() -> ExitCode {
    let args = RootArgs::parse();
    let (verbose, log_file) = match &args.command {
        Command::Run(run) => (run.verbose, run_log_file(run.inputs.workdir.clone())),
        Command::Check(_) | Command::InstallResources(_) => (false, None),
    };
    let logging = match logging::init(verbose, log_file.as_deref()) {
        Ok(logging) => logging,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let argv: Vec<String> = std::env::args().collect();
    tracing::debug!(log_file = ?logging.log_file(), "logging initialized");
    if matches!(args.command, Command::Run(_)) {
        tracing::info!("starting AMR detection using {}", argv.join(" "));
    }

    match dispatch(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<error::SetupError>() {
                Some(setup) => tracing::error!(kind = ?setup.kind(), "{err:#}"),
                None => tracing::error!("{err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Run(args) => workflow::run_pipeline(&args),
        Command::Check(args) => workflow::run_check(&args),
        Command::InstallResources(args) => workflow::run_install_resources(&args),
    }
}

/// The run log lives in the working directory when it exists.
fn run_log_file(workdir: Option<PathBuf>) -> Option<PathBuf> {
    let workdir = workdir.or_else(|| std::env::current_dir().ok())?;
    workdir
        .is_dir()
        .then(|| paths::WorkdirPaths::new(workdir).run_log_path())
}
