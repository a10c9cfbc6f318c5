//! Best-effort removal of transient engine state after a successful run.
//!
//! Both steps always run and each reports its own status. Nothing here
//! returns an error.
use crate::engine::ResolvedEngine;
use crate::paths::WorkdirPaths;
use std::fs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Done,
    /// Nothing to clean.
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupStep {
    pub name: &'static str,
    pub status: StepStatus,
}

/// Run every cleanup step and log each result.
pub fn clean_workdir(paths: &WorkdirPaths, engine: &ResolvedEngine) -> Vec<CleanupStep> {
    let steps = vec![remove_engine_logs(paths), clean_engine_envs(paths, engine)];
    for step in &steps {
        match &step.status {
            StepStatus::Done => tracing::info!(step = step.name, "cleanup step done"),
            StepStatus::Skipped => tracing::debug!(step = step.name, "nothing to clean"),
            StepStatus::Failed(reason) => {
                tracing::warn!(step = step.name, "cleanup step failed: {reason}")
            }
        }
    }
    steps
}

pub(crate) fn remove_engine_logs(paths: &WorkdirPaths) -> CleanupStep {
    let log_dir = paths.engine_log_dir();
    let status = if !log_dir.exists() {
        StepStatus::Skipped
    } else {
        match fs::remove_dir_all(&log_dir) {
            Ok(()) => StepStatus::Done,
            Err(err) => StepStatus::Failed(format!("remove {}: {err}", log_dir.display())),
        }
    };
    CleanupStep {
        name: "engine-logs",
        status,
    }
}

pub(crate) fn clean_engine_envs(paths: &WorkdirPaths, engine: &ResolvedEngine) -> CleanupStep {
    let status = if !paths.engine_env_dir().is_dir() {
        StepStatus::Skipped
    } else {
        let args = engine.cleanup_env_args();
        match engine.output(paths.root(), &args) {
            Ok(output) if output.status.success() => StepStatus::Done,
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let detail = stderr.trim().lines().next().unwrap_or_default();
                StepStatus::Failed(format!(
                    "`{}` exited with {}: {detail}",
                    engine.command_line(&args),
                    output.status
                ))
            }
            Err(err) => StepStatus::Failed(format!("run {}: {err}", engine.command_line(&args))),
        }
    };
    CleanupStep {
        name: "engine-envs",
        status,
    }
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod tests;
