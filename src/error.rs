//! Typed failures for the setup path.
//!
//! Everything here aborts the run before the workflow engine is launched.
//! Engine and cleanup failures are reported through their own outcome types
//! and never become a `SetupError`.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Broad class of a setup failure, used for reporting and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    ManifestFormat,
    Staging,
    Template,
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error(
        "missing QC prerequisite: running in mduqc mode requires {} but it is not present",
        .0.display()
    )]
    MissingQcChecklist(PathBuf),

    #[error(
        "no usable input provided: supply a manifest of assemblies (--contigs) or of amrfinder outputs (--amrfinder-output)"
    )]
    NoInput,

    #[error(
        "ambiguous input: both assemblies ({}) and amrfinder results ({}) were provided, exactly one source is required",
        .assemblies.display(),
        .results.display()
    )]
    AmbiguousInput {
        assemblies: PathBuf,
        results: PathBuf,
    },

    #[error("none of the {total} samples in {} has a usable source file", .manifest.display())]
    NoUsableSamples { manifest: PathBuf, total: usize },

    #[error("workflow engine `{program}` not found on PATH")]
    EngineNotFound { program: String },

    #[error("invalid engine command: {0}")]
    EngineCommand(String),

    #[error(
        "{}:{line}: expected 2 tab-delimited columns (sample id, path), found {found}",
        .path.display()
    )]
    ManifestShape {
        path: PathBuf,
        line: u64,
        found: usize,
    },

    #[error("{}:{line}: sample id and path must both be non-empty", .path.display())]
    ManifestEmptyField { path: PathBuf, line: u64 },

    #[error(
        "{}:{line}: duplicate sample id `{sample_id}` (first seen on line {first_line})",
        .path.display()
    )]
    DuplicateSample {
        path: PathBuf,
        sample_id: String,
        line: u64,
        first_line: u64,
    },

    #[error(
        "{}:{line}: sample id `{sample_id}` must be a single path component (no `/`, `\\`, `.` or `..`)",
        .path.display()
    )]
    BadSampleId {
        path: PathBuf,
        sample_id: String,
        line: u64,
    },

    #[error("read manifest {}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("stage sample `{sample_id}` at {}", .path.display())]
    Staging {
        sample_id: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read template {}", .path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("template {}: unknown variable `{name}`", .path.display())]
    TemplateVariable { path: PathBuf, name: String },

    #[error("template {}: unterminated placeholder", .path.display())]
    TemplateSyntax { path: PathBuf },

    #[error("write {}", .path.display())]
    TemplateWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SetupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SetupError::MissingQcChecklist(_)
            | SetupError::NoInput
            | SetupError::AmbiguousInput { .. }
            | SetupError::NoUsableSamples { .. }
            | SetupError::EngineNotFound { .. }
            | SetupError::EngineCommand(_) => ErrorKind::Configuration,
            SetupError::ManifestShape { .. }
            | SetupError::ManifestEmptyField { .. }
            | SetupError::DuplicateSample { .. }
            | SetupError::BadSampleId { .. }
            | SetupError::ManifestRead { .. } => ErrorKind::ManifestFormat,
            SetupError::Staging { .. } => ErrorKind::Staging,
            SetupError::TemplateRead { .. }
            | SetupError::TemplateVariable { .. }
            | SetupError::TemplateSyntax { .. }
            | SetupError::TemplateWrite { .. } => ErrorKind::Template,
        }
    }
}
