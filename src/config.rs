//! Run configuration.
//!
//! `RunConfig` is built once per invocation from CLI arguments and the
//! environment, then passed by reference to every step.
use crate::cli::{InputArgs, Species};
use crate::engine::{EngineCommand, DEFAULT_ENGINE, ENGINE_ENV};
use crate::inputs::InputSources;
use crate::paths::{ResourcePaths, WorkdirPaths};
use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Environment override for the resources directory.
pub const RESOURCES_ENV: &str = "ABRITAMR_RESOURCES";

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub workdir: WorkdirPaths,
    pub resources: ResourcePaths,
    pub jobs: u32,
    pub mduqc: bool,
    pub qc_checklist: PathBuf,
    pub assemblies: Option<PathBuf>,
    pub results: Option<PathBuf>,
    pub prefix: String,
    pub species: Option<Species>,
    pub keep: bool,
    pub engine: EngineCommand,
}

impl RunConfig {
    /// Build a config from parsed arguments and the process environment.
    pub fn from_args(args: &InputArgs, keep: bool) -> Result<Self> {
        let workdir = match &args.workdir {
            Some(dir) => dir.clone(),
            None => env::current_dir().context("resolve current directory")?,
        };
        let workdir = workdir
            .canonicalize()
            .with_context(|| format!("resolve working directory {}", workdir.display()))?;
        let resources = resolve_resources_dir(args.resources.as_deref())?;
        let engine_raw = args
            .engine
            .clone()
            .or_else(|| env::var(ENGINE_ENV).ok().filter(|raw| !raw.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_ENGINE.to_string());
        let engine = EngineCommand::parse(&engine_raw)?;

        Ok(Self {
            qc_checklist: non_empty(Some(args.qc.as_path()))
                .map(|qc| workdir.join(qc))
                .unwrap_or_default(),
            workdir: WorkdirPaths::new(workdir),
            resources: ResourcePaths::new(resources),
            jobs: args.jobs,
            mduqc: args.mduqc,
            assemblies: non_empty(args.contigs.as_deref()),
            results: non_empty(args.amrfinder_output.as_deref()),
            prefix: args.prefix.clone(),
            species: args.species,
            keep,
            engine,
        })
    }

    /// Inputs for mode resolution.
    pub fn input_sources(&self) -> InputSources<'_> {
        InputSources {
            assemblies: self.assemblies.as_deref(),
            results: self.results.as_deref(),
            mduqc: self.mduqc,
            qc_checklist: &self.qc_checklist,
        }
    }
}

fn non_empty(path: Option<&Path>) -> Option<PathBuf> {
    path.filter(|path| !path.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

/// Resolve the resources directory: explicit flag, then environment, then
/// the per-user data directory.
pub fn resolve_resources_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = non_empty(explicit) {
        return Ok(path);
    }
    if let Some(path) = env::var_os(RESOURCES_ENV).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let data_dir = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow!("cannot determine a resources directory; pass --resources"))?;
    Ok(data_dir.join("abritamr"))
}
