//! Pipeline orchestration.
//!
//! Steps run strictly in order: resolve the input mode, locate the engine,
//! load the manifest, stage workspaces, render control files, run the engine
//! and, after a successful run, clean up. Everything up to rendering fails
//! fast; the engine run and cleanup only report.
use crate::cleanup::{clean_workdir, CleanupStep};
use crate::cli::{CheckArgs, InstallResourcesArgs, RunArgs};
use crate::config::RunConfig;
use crate::engine::{launch, ResolvedEngine, RunOutcome, RunStatus};
use crate::error::SetupError;
use crate::inputs::{file_present, resolve_input_mode, InputMode, ResolvedInput};
use crate::manifest::{load_assembly_inputs, load_manifest, ManifestEntry};
use crate::materialize::{write_workflow_files, WorkflowFiles};
use crate::paths::ResourcePaths;
use crate::staging::stage_samples;
use crate::templates;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything validated before the working directory is touched.
#[derive(Debug)]
pub struct Preflight {
    pub input: ResolvedInput,
    pub engine: ResolvedEngine,
    pub entries: Vec<ManifestEntry>,
}

/// What a pipeline run did.
#[derive(Debug)]
pub struct PipelineReport {
    pub mode: InputMode,
    pub samples: Vec<String>,
    pub files: WorkflowFiles,
    pub outcome: RunOutcome,
    /// `None` when cleanup did not run.
    pub cleanup: Option<Vec<CleanupStep>>,
}

/// Validate inputs and load the manifest without mutating anything.
///
/// Mode resolution comes first so a missing QC checklist aborts before the
/// manifest is read.
pub fn preflight(config: &RunConfig) -> Result<Preflight, SetupError> {
    let input = resolve_input_mode(&config.input_sources())?;
    let engine = config.engine.resolve()?;
    let entries = match input.mode {
        InputMode::Assemblies => load_assembly_inputs(&input.manifest, &config.prefix)?,
        InputMode::Results => load_manifest(&input.manifest)?,
    };
    tracing::info!(
        mode = ?input.mode,
        manifest = %input.manifest.display(),
        samples = entries.len(),
        "inputs validated"
    );
    Ok(Preflight {
        input,
        engine,
        entries,
    })
}

/// Run the whole pipeline for one configuration.
pub fn execute(config: &RunConfig) -> Result<PipelineReport> {
    let Preflight {
        input,
        engine,
        entries,
    } = preflight(config)?;

    let samples = stage_samples(&config.workdir, input.mode, &entries)?;
    if samples.is_empty() {
        return Err(SetupError::NoUsableSamples {
            manifest: input.manifest,
            total: entries.len(),
        }
        .into());
    }

    let files = write_workflow_files(config, input.mode)?;
    let outcome = launch(&engine, &config.workdir, config.jobs);

    let cleanup = if outcome.succeeded() && !config.keep {
        tracing::info!("cleaning up the working directory");
        Some(clean_workdir(&config.workdir, &engine))
    } else {
        None
    };

    Ok(PipelineReport {
        mode: input.mode,
        samples,
        files,
        outcome,
        cleanup,
    })
}

/// `abritamr run`: execute and report. Engine failure is logged, not raised.
pub fn run_pipeline(args: &RunArgs) -> Result<()> {
    let config = RunConfig::from_args(&args.inputs, args.keep)?;
    let span = tracing::info_span!("run", workdir = %config.workdir.root().display());
    let _guard = span.enter();

    let report = execute(&config)?;
    match &report.outcome.status {
        RunStatus::Succeeded => {
            tracing::info!(
                mode = ?report.mode,
                samples = report.samples.len(),
                snakefile = %report.files.snakefile.display(),
                config = %report.files.config.display(),
                "pipeline completed"
            );
            match &report.cleanup {
                Some(steps) => tracing::debug!(steps = steps.len(), "cleanup finished"),
                None => tracing::info!("keeping intermediate files and engine logs"),
            }
        }
        RunStatus::Failed { exit_code } => {
            let exit = exit_code.map_or_else(|| "signal".to_string(), |code| code.to_string());
            tracing::error!(
                exit = %exit,
                job_log = %config.workdir.job_log_path().display(),
                "pipeline failed; see the job log for engine output"
            );
        }
        RunStatus::NotStarted { reason } => {
            tracing::error!("workflow engine could not be started: {reason}");
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct CheckSummary {
    mode: InputMode,
    manifest: PathBuf,
    workdir: PathBuf,
    resources: PathBuf,
    templates_present: bool,
    engine: PathBuf,
    jobs: u32,
    samples: Vec<SampleCheck>,
}

#[derive(Serialize)]
struct SampleCheck {
    sample_id: String,
    source: PathBuf,
    source_present: bool,
    link: PathBuf,
}

/// `abritamr check`: report what a run would stage, without staging it.
pub fn run_check(args: &CheckArgs) -> Result<()> {
    let config = RunConfig::from_args(&args.inputs, true)?;
    let preflight = preflight(&config)?;
    let mode = preflight.input.mode;
    let samples: Vec<SampleCheck> = preflight
        .entries
        .iter()
        .map(|entry| SampleCheck {
            sample_id: entry.sample_id.clone(),
            source: entry.source.clone(),
            source_present: file_present(&entry.source),
            link: config.workdir.sample_link(&entry.sample_id, mode),
        })
        .collect();
    let summary = CheckSummary {
        mode,
        manifest: preflight.input.manifest.clone(),
        workdir: config.workdir.root().to_path_buf(),
        resources: config.resources.root().to_path_buf(),
        templates_present: config.resources.snakefile_template().is_file()
            && config.resources.config_template().is_file(),
        engine: preflight.engine.program.clone(),
        jobs: config.jobs,
        samples,
    };

    if args.json {
        let text = serde_json::to_string_pretty(&summary).context("serialize check summary")?;
        println!("{text}");
        return Ok(());
    }

    let usable = summary.samples.iter().filter(|s| s.source_present).count();
    println!("mode: {:?}", summary.mode);
    println!("manifest: {}", summary.manifest.display());
    println!("workdir: {}", summary.workdir.display());
    println!(
        "resources: {}{}",
        summary.resources.display(),
        if summary.templates_present {
            ""
        } else {
            " (templates missing)"
        }
    );
    println!("engine: {}", summary.engine.display());
    println!("samples: {usable} of {} usable", summary.samples.len());
    for sample in summary.samples.iter().filter(|s| !s.source_present) {
        println!(
            "  missing: {} ({})",
            sample.sample_id,
            sample.source.display()
        );
    }
    Ok(())
}

/// `abritamr install-resources`: write the bundled templates.
pub fn run_install_resources(args: &InstallResourcesArgs) -> Result<()> {
    let written = install_resources(&ResourcePaths::new(args.out.clone()), args.force)?;
    for path in written {
        println!("wrote {}", path.display());
    }
    Ok(())
}

pub(crate) fn install_resources(resources: &ResourcePaths, force: bool) -> Result<Vec<PathBuf>> {
    let targets = [
        (resources.snakefile_template(), templates::SNAKEFILE_TEMPLATE),
        (resources.config_template(), templates::CONFIG_TEMPLATE),
    ];
    if !force {
        if let Some((existing, _)) = targets.iter().find(|(path, _)| path.exists()) {
            return Err(anyhow!(
                "{} already exists (use --force to overwrite)",
                existing.display()
            ));
        }
    }
    let utils_dir = resources.utils_dir();
    fs::create_dir_all(&utils_dir).with_context(|| format!("create {}", utils_dir.display()))?;
    let mut written = Vec::new();
    for (path, contents) in targets {
        write_file(&path, contents)?;
        written.push(path);
    }
    Ok(written)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
