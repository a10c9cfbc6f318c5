//! Sample manifest loading.
//!
//! A manifest is headerless tab-delimited text with exactly two columns per
//! row: sample id, then a path to the sample's assembly or amrfinder output.
//! Any malformed row aborts the whole run.
use crate::error::SetupError;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

const FASTA_SNIFF_BYTES: usize = 4096;

/// One manifest row. Source existence is not checked here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub sample_id: String,
    pub source: PathBuf,
}

/// Parse a two-column manifest, preserving row order.
pub fn load_manifest(path: &Path) -> Result<Vec<ManifestEntry>, SetupError> {
    let read_err = |source| SetupError::ManifestRead {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(read_err)?;

    let mut entries = Vec::new();
    let mut first_seen: HashMap<String, u64> = HashMap::new();
    for record in reader.records() {
        let record = record.map_err(read_err)?;
        let line = record.position().map(|pos| pos.line()).unwrap_or(0);
        if record.len() != 2 {
            return Err(SetupError::ManifestShape {
                path: path.to_path_buf(),
                line,
                found: record.len(),
            });
        }
        let (sample_id, source) = (&record[0], &record[1]);
        if sample_id.is_empty() || source.is_empty() {
            return Err(SetupError::ManifestEmptyField {
                path: path.to_path_buf(),
                line,
            });
        }
        check_sample_id(path, sample_id, line)?;
        if let Some(&first_line) = first_seen.get(sample_id) {
            return Err(SetupError::DuplicateSample {
                path: path.to_path_buf(),
                sample_id: sample_id.to_string(),
                line,
                first_line,
            });
        }
        first_seen.insert(sample_id.to_string(), line);
        entries.push(ManifestEntry {
            sample_id: sample_id.to_string(),
            source: PathBuf::from(source),
        });
    }
    Ok(entries)
}

/// Sample ids name directories directly under the working directory.
fn check_sample_id(path: &Path, sample_id: &str, line: u64) -> Result<(), SetupError> {
    let nested = sample_id.contains(['/', '\\']);
    if nested || sample_id == "." || sample_id == ".." {
        return Err(SetupError::BadSampleId {
            path: path.to_path_buf(),
            sample_id: sample_id.to_string(),
            line,
        });
    }
    Ok(())
}

/// Load assembly inputs, accepting either a manifest or a single FASTA file.
///
/// A lone FASTA is staged as one sample named `prefix`.
pub fn load_assembly_inputs(path: &Path, prefix: &str) -> Result<Vec<ManifestEntry>, SetupError> {
    if looks_like_fasta(path) {
        check_sample_id(path, prefix, 1)?;
        tracing::info!(
            path = %path.display(),
            sample_id = prefix,
            "assembly input is a single FASTA file"
        );
        return Ok(vec![ManifestEntry {
            sample_id: prefix.to_string(),
            source: path.to_path_buf(),
        }]);
    }
    load_manifest(path)
}

fn looks_like_fasta(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut head = Vec::with_capacity(FASTA_SNIFF_BYTES);
    if file
        .take(FASTA_SNIFF_BYTES as u64)
        .read_to_end(&mut head)
        .is_err()
    {
        return false;
    }
    head.iter()
        .find(|byte| !byte.is_ascii_whitespace())
        .is_some_and(|&byte| byte == b'>')
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
