//! Per-sample workspace staging.
//!
//! Each sample gets `{workdir}/{sample_id}/` holding one symlink to its
//! source file. Staging is idempotent so an interrupted run can be restarted
//! over the same working directory.
use crate::error::SetupError;
use crate::inputs::{file_present, InputMode};
use crate::manifest::ManifestEntry;
use crate::paths::WorkdirPaths;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Stage workspaces for every entry whose source exists.
///
/// Returns the sample ids that were staged (or already staged), in manifest
/// order. Entries with a missing source are skipped with a warning.
pub fn stage_samples(
    paths: &WorkdirPaths,
    mode: InputMode,
    entries: &[ManifestEntry],
) -> Result<Vec<String>, SetupError> {
    let mut staged = Vec::with_capacity(entries.len());
    for entry in entries {
        if !file_present(&entry.source) {
            tracing::warn!(
                sample_id = %entry.sample_id,
                source = %entry.source.display(),
                "source not found, sample skipped"
            );
            continue;
        }
        stage_sample(paths, mode, entry)?;
        staged.push(entry.sample_id.clone());
    }
    tracing::info!(
        staged = staged.len(),
        skipped = entries.len() - staged.len(),
        "staged sample workspaces"
    );
    Ok(staged)
}

fn stage_sample(
    paths: &WorkdirPaths,
    mode: InputMode,
    entry: &ManifestEntry,
) -> Result<(), SetupError> {
    let staging_err = |path: &Path, source: io::Error| SetupError::Staging {
        sample_id: entry.sample_id.clone(),
        path: path.to_path_buf(),
        source,
    };

    let sample_dir = paths.sample_dir(&entry.sample_id);
    fs::create_dir_all(&sample_dir).map_err(|err| staging_err(&sample_dir, err))?;

    let link = paths.sample_link(&entry.sample_id, mode);
    // symlink_metadata so a dangling link from an earlier run still counts.
    if fs::symlink_metadata(&link).is_ok() {
        tracing::debug!(link = %link.display(), "link already present");
        return Ok(());
    }
    let target = absolute_source(&entry.source).map_err(|err| staging_err(&entry.source, err))?;
    create_link(&target, &link).map_err(|err| staging_err(&link, err))?;
    tracing::debug!(
        link = %link.display(),
        target = %target.display(),
        "linked sample source"
    );
    Ok(())
}

fn absolute_source(source: &Path) -> io::Result<PathBuf> {
    if source.is_absolute() {
        Ok(source.to_path_buf())
    } else {
        std::path::absolute(source)
    }
}

#[cfg(unix)]
fn create_link(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_link(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(test)]
#[path = "staging_tests.rs"]
mod tests;
