//! Typed paths into a working directory layout.
//!
//! Every file the pipeline reads or writes under the working directory is
//! derived here so the stager, materializer and cleanup agree on names.
use crate::inputs::InputMode;
use std::path::{Path, PathBuf};

/// Rendered pipeline definition consumed by the engine.
pub const SNAKEFILE_NAME: &str = "Snakefile";
/// Rendered parameter file consumed by the pipeline definition.
pub const CONFIG_NAME: &str = "config.yaml";
/// Append-only log of engine output.
pub const JOB_LOG_NAME: &str = "job.log";
/// Log written by the orchestrator itself.
pub const RUN_LOG_NAME: &str = "abritamr.log";
/// Link name used for every sample in assembly mode.
pub const CONTIGS_LINK_NAME: &str = "contigs.fa";

const ENGINE_STATE_DIR: &str = ".snakemake";

#[derive(Debug, Clone)]
pub struct WorkdirPaths {
    root: PathBuf,
}

impl WorkdirPaths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Return the working directory root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the per-sample workspace directory.
    pub fn sample_dir(&self, sample_id: &str) -> PathBuf {
        self.root.join(sample_id)
    }

    /// Return the staged link for a sample, named by input mode.
    pub fn sample_link(&self, sample_id: &str, mode: InputMode) -> PathBuf {
        self.sample_dir(sample_id).join(link_name(sample_id, mode))
    }

    pub fn snakefile_path(&self) -> PathBuf {
        self.root.join(SNAKEFILE_NAME)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_NAME)
    }

    pub fn job_log_path(&self) -> PathBuf {
        self.root.join(JOB_LOG_NAME)
    }

    pub fn run_log_path(&self) -> PathBuf {
        self.root.join(RUN_LOG_NAME)
    }

    /// Return the engine's transient log directory (`.snakemake/log`).
    pub fn engine_log_dir(&self) -> PathBuf {
        self.root.join(ENGINE_STATE_DIR).join("log")
    }

    /// Return the engine's isolated environment cache (`.snakemake/conda`).
    pub fn engine_env_dir(&self) -> PathBuf {
        self.root.join(ENGINE_STATE_DIR).join("conda")
    }
}

/// Name of the staged link inside a sample workspace.
pub fn link_name(sample_id: &str, mode: InputMode) -> String {
    match mode {
        InputMode::Assemblies => CONTIGS_LINK_NAME.to_string(),
        InputMode::Results => format!("{sample_id}.out"),
    }
}

/// Layout of a resources directory holding templates and helper scripts.
#[derive(Debug, Clone)]
pub struct ResourcePaths {
    root: PathBuf,
}

impl ResourcePaths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join("templates")
    }

    /// Return the pipeline-definition template path.
    pub fn snakefile_template(&self) -> PathBuf {
        self.templates_dir().join(SNAKEFILE_NAME)
    }

    /// Return the parameter-file template path.
    pub fn config_template(&self) -> PathBuf {
        self.templates_dir().join(CONFIG_NAME)
    }

    /// Return the helper script directory passed to the workflow.
    pub fn utils_dir(&self) -> PathBuf {
        self.root.join("utils")
    }
}
