//! Input validation and input-mode resolution.
//!
//! Mode resolution is a pure decision over the configured inputs and the
//! filesystem; it runs once per invocation, before anything is created.
use crate::error::SetupError;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Which kind of per-sample file the manifest points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Genome assemblies; the workflow runs amrfinder itself.
    Assemblies,
    /// Precomputed amrfinder outputs; the workflow only post-processes.
    Results,
}

/// Candidate inputs as configured, before any existence checks.
#[derive(Debug, Clone)]
pub struct InputSources<'a> {
    pub assemblies: Option<&'a Path>,
    pub results: Option<&'a Path>,
    pub mduqc: bool,
    pub qc_checklist: &'a Path,
}

/// The single manifest that drives this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInput {
    pub mode: InputMode,
    pub manifest: PathBuf,
}

/// Report whether `path` names something on disk.
///
/// An empty path is an unset option and never exists. I/O errors while
/// probing count as absence.
pub fn file_present(path: &Path) -> bool {
    if path.as_os_str().is_empty() {
        return false;
    }
    path.try_exists().unwrap_or(false)
}

fn present(path: Option<&Path>) -> Option<&Path> {
    path.filter(|path| file_present(path))
}

/// The QC checklist must be a regular file; a directory does not count.
fn checklist_present(path: &Path) -> bool {
    file_present(path) && path.is_file()
}

/// Decide the input mode for a run, or abort with a configuration error.
pub fn resolve_input_mode(sources: &InputSources<'_>) -> Result<ResolvedInput, SetupError> {
    if sources.mduqc && !checklist_present(sources.qc_checklist) {
        return Err(SetupError::MissingQcChecklist(
            sources.qc_checklist.to_path_buf(),
        ));
    }

    match (present(sources.assemblies), present(sources.results)) {
        (Some(assemblies), Some(results)) => Err(SetupError::AmbiguousInput {
            assemblies: assemblies.to_path_buf(),
            results: results.to_path_buf(),
        }),
        (Some(assemblies), None) => Ok(ResolvedInput {
            mode: InputMode::Assemblies,
            manifest: assemblies.to_path_buf(),
        }),
        (None, Some(results)) => Ok(ResolvedInput {
            mode: InputMode::Results,
            manifest: results.to_path_buf(),
        }),
        // In mduqc mode the checklist alone is not something we can stage.
        (None, None) => Err(SetupError::NoInput),
    }
}

#[cfg(test)]
#[path = "inputs_tests.rs"]
mod tests;
