//! Shared test infrastructure for integration tests.
//!
//! Each `Workspace` is an isolated temp tree holding input data, a resources
//! directory populated by `abritamr install-resources`, a working directory,
//! and a fake workflow engine script.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub struct Workspace {
    _dir: TempDir,
    pub data: PathBuf,
    pub resources: PathBuf,
    pub workdir: PathBuf,
    pub engine: PathBuf,
}

fn bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_abritamr"));
    cmd.env_remove("ABRITAMR_ENGINE")
        .env_remove("ABRITAMR_RESOURCES")
        .env_remove("RUST_LOG");
    cmd
}

impl Workspace {
    /// Create a workspace whose fake engine exits with `engine_exit`.
    pub fn new(engine_exit: i32) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = dir.path().canonicalize().expect("canonicalize tempdir");
        let data = root.join("data");
        let resources = root.join("resources");
        let workdir = root.join("work");
        fs::create_dir_all(&data).expect("create data dir");
        fs::create_dir_all(&workdir).expect("create workdir");

        let engine = root.join("fake-snakemake");
        let script = format!(
            "#!/bin/sh\n\
             echo \"$*\" >> engine-args.txt\n\
             if [ \"$1\" = \"--cleanup-conda\" ]; then exit 0; fi\n\
             mkdir -p .snakemake/log .snakemake/conda\n\
             echo 'Building DAG of jobs...'\n\
             echo 'fake engine stderr' >&2\n\
             exit {engine_exit}\n"
        );
        fs::write(&engine, script).expect("write fake engine");
        fs::set_permissions(&engine, fs::Permissions::from_mode(0o755)).expect("chmod engine");

        let ws = Self {
            _dir: dir,
            data,
            resources,
            workdir,
            engine,
        };
        let output = bin()
            .args(["install-resources", "--out"])
            .arg(&ws.resources)
            .output()
            .expect("run install-resources");
        assert!(
            output.status.success(),
            "install-resources failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        ws
    }

    /// Write a file under the data directory and return its path.
    pub fn write_data(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.data.join(name);
        fs::write(&path, contents).expect("write data file");
        path
    }

    /// Write an assembly FASTA for each sample and a manifest pointing at them.
    pub fn assembly_manifest(&self, samples: &[&str]) -> PathBuf {
        let mut manifest = String::new();
        for sample in samples {
            let fasta = self.write_data(&format!("{sample}.fasta"), ">contig_1\nACGTACGT\n");
            manifest.push_str(&format!("{sample}\t{}\n", fasta.display()));
        }
        self.write_data("assemblies.tab", &manifest)
    }

    /// Run `abritamr <subcommand>` with the workspace's workdir, resources and engine.
    pub fn run(&self, subcommand: &str, args: &[&str]) -> Output {
        bin()
            .arg(subcommand)
            .arg("--workdir")
            .arg(&self.workdir)
            .arg("--resources")
            .arg(&self.resources)
            .arg("--engine")
            .arg(&self.engine)
            .args(args)
            .output()
            .expect("run abritamr")
    }

    pub fn path_arg(path: &Path) -> String {
        path.display().to_string()
    }

    pub fn workdir_file(&self, rel: &str) -> PathBuf {
        self.workdir.join(rel)
    }

    #[allow(dead_code)]
    pub fn read_workdir(&self, rel: &str) -> String {
        fs::read_to_string(self.workdir_file(rel))
            .unwrap_or_else(|err| panic!("read {rel}: {err}"))
    }
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
