use super::{clean_workdir, StepStatus};
use crate::engine::ResolvedEngine;
use crate::paths::WorkdirPaths;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn engine_at(program: PathBuf) -> ResolvedEngine {
    ResolvedEngine {
        program,
        leading_args: Vec::new(),
    }
}

#[cfg(unix)]
fn write_script(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join("engine.sh");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
    path
}

#[test]
fn nothing_to_clean_skips_both_steps() {
    let dir = TempDir::new().expect("tempdir");
    let paths = WorkdirPaths::new(dir.path().to_path_buf());
    let steps = clean_workdir(&paths, &engine_at(dir.path().join("unused")));
    assert_eq!(steps.len(), 2);
    assert!(steps.iter().all(|step| step.status == StepStatus::Skipped));
}

#[cfg(unix)]
#[test]
fn removes_logs_and_cleans_envs() {
    let dir = TempDir::new().expect("tempdir");
    let work = dir.path().join("work");
    let paths = WorkdirPaths::new(work.clone());
    fs::create_dir_all(paths.engine_log_dir()).expect("create log dir");
    fs::write(paths.engine_log_dir().join("run.log"), "log").expect("write log");
    fs::create_dir_all(paths.engine_env_dir()).expect("create env dir");
    let script = write_script(dir.path(), "echo \"$*\" > cleanup-args.txt");

    let steps = clean_workdir(&paths, &engine_at(script));

    assert_eq!(steps[0].name, "engine-logs");
    assert_eq!(steps[0].status, StepStatus::Done);
    assert!(!paths.engine_log_dir().exists());
    assert_eq!(steps[1].name, "engine-envs");
    assert_eq!(steps[1].status, StepStatus::Done);
    let args = fs::read_to_string(work.join("cleanup-args.txt")).expect("read args");
    assert_eq!(args.trim(), "--cleanup-conda");
}

#[test]
fn failed_env_cleanup_does_not_block_log_removal() {
    let dir = TempDir::new().expect("tempdir");
    let paths = WorkdirPaths::new(dir.path().to_path_buf());
    fs::create_dir_all(paths.engine_log_dir()).expect("create log dir");
    fs::create_dir_all(paths.engine_env_dir()).expect("create env dir");

    let steps = clean_workdir(&paths, &engine_at(dir.path().join("missing-engine")));

    assert_eq!(steps[0].status, StepStatus::Done);
    assert!(matches!(steps[1].status, StepStatus::Failed(_)));
}
