//! Workflow engine invocation.
//!
//! The engine is run as a structured subprocess (no shell) in the working
//! directory. Its combined output is streamed into `job.log` while it runs
//! and also returned to the caller. Exit status is the only thing interpreted.
use crate::error::SetupError;
use crate::paths::{WorkdirPaths, SNAKEFILE_NAME};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output, Stdio};

pub const DEFAULT_ENGINE: &str = "snakemake";
/// Environment override for the engine command line.
pub const ENGINE_ENV: &str = "ABRITAMR_ENGINE";

const CLEANUP_ENVS_FLAG: &str = "--cleanup-conda";

/// Engine command as configured: a program plus any leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCommand {
    pub program: String,
    pub leading_args: Vec<String>,
}

/// Engine command whose program has been found on disk.
#[derive(Debug, Clone)]
pub struct ResolvedEngine {
    pub program: PathBuf,
    pub leading_args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Succeeded,
    Failed { exit_code: Option<i32> },
    /// The process could not be spawned at all.
    NotStarted { reason: String },
}

/// Result of one engine run. Not persisted.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub output: String,
}

impl RunOutcome {
    pub fn succeeded(&self) -> bool {
        self.status == RunStatus::Succeeded
    }
}

impl EngineCommand {
    /// Split a command line with shell quoting rules.
    pub fn parse(raw: &str) -> Result<Self, SetupError> {
        let mut words = shell_words::split(raw)
            .map_err(|err| SetupError::EngineCommand(format!("{raw:?}: {err}")))?
            .into_iter();
        let program = words
            .next()
            .ok_or_else(|| SetupError::EngineCommand("engine command is empty".to_string()))?;
        Ok(Self {
            program,
            leading_args: words.collect(),
        })
    }

    /// Locate the program on PATH (or as given, if it contains a separator).
    pub fn resolve(&self) -> Result<ResolvedEngine, SetupError> {
        let program = which::which(&self.program).map_err(|_| SetupError::EngineNotFound {
            program: self.program.clone(),
        })?;
        Ok(ResolvedEngine {
            program,
            leading_args: self.leading_args.clone(),
        })
    }
}

impl ResolvedEngine {
    /// Arguments for a pipeline run with bounded parallelism.
    pub fn run_args(&self, jobs: u32) -> Vec<String> {
        let mut args = self.leading_args.clone();
        args.extend([
            "-s".to_string(),
            SNAKEFILE_NAME.to_string(),
            "-j".to_string(),
            jobs.to_string(),
        ]);
        args
    }

    /// Arguments asking the engine to drop unused isolated environments.
    pub fn cleanup_env_args(&self) -> Vec<String> {
        let mut args = self.leading_args.clone();
        args.push(CLEANUP_ENVS_FLAG.to_string());
        args
    }

    pub fn command_line(&self, args: &[String]) -> String {
        let program = self.program.to_string_lossy();
        shell_words::join(std::iter::once(program.as_ref()).chain(args.iter().map(String::as_str)))
    }

    fn command(&self, cwd: &Path, args: &[String]) -> Command {
        let mut command = Command::new(&self.program);
        command.args(args).current_dir(cwd).stdin(Stdio::null());
        command
    }

    pub(crate) fn output(&self, cwd: &Path, args: &[String]) -> io::Result<Output> {
        self.command(cwd, args).output()
    }
}

/// Run the pipeline and wait for it to finish.
///
/// The header goes into `job.log` before the engine starts, and the engine's
/// stdout and stderr write straight into the log as they are produced. The
/// returned output is read back from the log afterwards. If the log cannot be
/// opened the output is captured in memory only. No timeout is applied.
pub fn launch(engine: &ResolvedEngine, paths: &WorkdirPaths, jobs: u32) -> RunOutcome {
    let args = engine.run_args(jobs);
    let command_line = engine.command_line(&args);
    tracing::info!(command = %command_line, "running pipeline, this may take some time");

    let log_path = paths.job_log_path();
    match open_job_log(&log_path, &command_line) {
        Ok((log, start)) => run_logged(engine, paths.root(), &args, &log_path, log, start),
        Err(err) => {
            tracing::warn!(path = %log_path.display(), "failed to write job log: {err}");
            run_captured(engine, paths.root(), &args)
        }
    }
}

fn open_job_log(path: &Path, command_line: &str) -> io::Result<(File, u64)> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "# abritamr: {command_line}")?;
    let start = file.seek(SeekFrom::End(0))?;
    Ok((file, start))
}

fn run_logged(
    engine: &ResolvedEngine,
    cwd: &Path,
    args: &[String],
    log_path: &Path,
    mut log: File,
    start: u64,
) -> RunOutcome {
    let status = match run_into(engine, cwd, args, &log) {
        Ok(status) => run_status(status),
        Err(err) => RunStatus::NotStarted {
            reason: err.to_string(),
        },
    };
    let output = read_log_tail(log_path, start).unwrap_or_else(|err| {
        tracing::warn!(path = %log_path.display(), "failed to read back job log: {err}");
        String::new()
    });
    let outcome = RunOutcome { status, output };
    if let Err(err) = write_footer(&mut log, &outcome) {
        tracing::warn!(path = %log_path.display(), "failed to write job log: {err}");
    }
    outcome
}

/// Both streams write through clones of the same append-mode handle.
fn run_into(
    engine: &ResolvedEngine,
    cwd: &Path,
    args: &[String],
    log: &File,
) -> io::Result<ExitStatus> {
    let stdout = log.try_clone()?;
    let stderr = log.try_clone()?;
    engine
        .command(cwd, args)
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr))
        .status()
}

fn run_captured(engine: &ResolvedEngine, cwd: &Path, args: &[String]) -> RunOutcome {
    match engine.output(cwd, args) {
        Ok(output) => RunOutcome {
            status: run_status(output.status),
            output: combined_output(&output),
        },
        Err(err) => RunOutcome {
            status: RunStatus::NotStarted {
                reason: err.to_string(),
            },
            output: String::new(),
        },
    }
}

fn run_status(status: ExitStatus) -> RunStatus {
    if status.success() {
        RunStatus::Succeeded
    } else {
        RunStatus::Failed {
            exit_code: status.code(),
        }
    }
}

fn read_log_tail(path: &Path, start: u64) -> io::Result<String> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(start))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    if !text.is_empty() && !text.ends_with('\n') && !output.stderr.is_empty() {
        text.push('\n');
    }
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

fn write_footer(file: &mut File, outcome: &RunOutcome) -> io::Result<()> {
    if !outcome.output.is_empty() && !outcome.output.ends_with('\n') {
        writeln!(file)?;
    }
    match &outcome.status {
        RunStatus::Succeeded => writeln!(file, "# exit status: 0")?,
        RunStatus::Failed {
            exit_code: Some(code),
        } => writeln!(file, "# exit status: {code}")?,
        RunStatus::Failed { exit_code: None } => writeln!(file, "# terminated by signal")?,
        RunStatus::NotStarted { reason } => writeln!(file, "# failed to start: {reason}")?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
