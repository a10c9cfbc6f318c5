//! Workflow control files.
//!
//! Derives the template variables from the run configuration and input mode,
//! then renders the pipeline definition and parameter file into the working
//! directory.
use crate::cli::Species;
use crate::config::RunConfig;
use crate::error::SetupError;
use crate::inputs::InputMode;
use crate::templates::{render, TemplateVars};
use std::fs;
use std::path::{Path, PathBuf};

/// Step enabled when starting from precomputed amrfinder results.
pub const RESULTS_STEP: &str = "collate_amrfinder";
/// Step enabled when running inside MDU QC.
pub const QC_STEP: &str = "mduqc";
/// Final target of an MDU QC run.
pub const QC_FINAL_OUTPUT: &str = "\"MMS118.xlsx\"";
/// Final targets of a standalone run.
pub const SUMMARY_FINAL_OUTPUTS: &str = "\"summary_matches.csv\", \"summary_partials.csv\"";

/// Paths of the rendered control files.
#[derive(Debug, Clone)]
pub struct WorkflowFiles {
    pub snakefile: PathBuf,
    pub config: PathBuf,
}

/// Compute the variables shared by both templates.
pub fn template_vars(config: &RunConfig, mode: InputMode) -> TemplateVars {
    let amr_step = match mode {
        InputMode::Assemblies => "",
        InputMode::Results => RESULTS_STEP,
    };
    let (qc_step, final_outputs) = if config.mduqc {
        (QC_STEP, QC_FINAL_OUTPUT)
    } else {
        ("", SUMMARY_FINAL_OUTPUTS)
    };
    let species = config
        .species
        .map(Species::as_str)
        .unwrap_or_default();

    TemplateVars::from([
        (
            "script_path",
            yaml_quote(&config.resources.utils_dir().display().to_string()),
        ),
        ("amr_step", yaml_quote(amr_step)),
        ("qc_step", yaml_quote(qc_step)),
        (
            "qc_file",
            yaml_quote(&config.qc_checklist.display().to_string()),
        ),
        ("final_outputs", final_outputs.to_string()),
        ("workdir", python_quote(config.workdir.root())),
        ("species", yaml_quote(species)),
    ])
}

/// Render both templates into the working directory.
pub fn write_workflow_files(
    config: &RunConfig,
    mode: InputMode,
) -> Result<WorkflowFiles, SetupError> {
    let vars = template_vars(config, mode);
    let files = WorkflowFiles {
        snakefile: config.workdir.snakefile_path(),
        config: config.workdir.config_path(),
    };
    render_file(&config.resources.config_template(), &files.config, &vars)?;
    render_file(&config.resources.snakefile_template(), &files.snakefile, &vars)?;
    tracing::info!(
        workdir = %config.workdir.root().display(),
        "wrote Snakefile and config.yaml"
    );
    Ok(files)
}

fn render_file(template_path: &Path, target: &Path, vars: &TemplateVars) -> Result<(), SetupError> {
    let template = fs::read_to_string(template_path).map_err(|source| SetupError::TemplateRead {
        path: template_path.to_path_buf(),
        source,
    })?;
    let rendered = render(template_path, &template, vars)?;
    fs::write(target, rendered).map_err(|source| SetupError::TemplateWrite {
        path: target.to_path_buf(),
        source,
    })
}

/// Double-quoted YAML scalar.
fn yaml_quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Single-quoted Python string literal for a path.
fn python_quote(path: &Path) -> String {
    let raw = path.display().to_string();
    let escaped = raw.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

#[cfg(test)]
#[path = "materialize_tests.rs"]
mod tests;
