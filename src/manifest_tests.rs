use super::{load_assembly_inputs, load_manifest, ManifestEntry};
use crate::error::{ErrorKind, SetupError};
use std::path::PathBuf;
use tempfile::TempDir;

fn write_manifest(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("input.tab");
    std::fs::write(&path, contents).expect("write manifest");
    path
}

#[test]
fn loads_rows_in_order() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_manifest(&dir, "S1\t/data/s1.fasta\nS2\t/data/s2.fasta\n");
    let entries = load_manifest(&path).expect("load");
    assert_eq!(
        entries,
        vec![
            ManifestEntry {
                sample_id: "S1".to_string(),
                source: PathBuf::from("/data/s1.fasta"),
            },
            ManifestEntry {
                sample_id: "S2".to_string(),
                source: PathBuf::from("/data/s2.fasta"),
            },
        ]
    );
}

#[test]
fn blank_lines_are_ignored() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_manifest(&dir, "S1\t/data/s1.fasta\n\nS2\t/data/s2.fasta\n");
    let entries = load_manifest(&path).expect("load");
    assert_eq!(entries.len(), 2);
}

#[test]
fn three_columns_is_a_shape_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_manifest(&dir, "S1\tcol2\tcol3\n");
    let err = load_manifest(&path).expect_err("shape");
    match &err {
        SetupError::ManifestShape { line, found, .. } => {
            assert_eq!(*line, 1);
            assert_eq!(*found, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.kind(), ErrorKind::ManifestFormat);
}

#[test]
fn single_column_row_fails_even_after_good_rows() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_manifest(&dir, "S1\t/data/s1.fasta\nS2\n");
    let err = load_manifest(&path).expect_err("shape");
    assert!(matches!(
        err,
        SetupError::ManifestShape {
            line: 2,
            found: 1,
            ..
        }
    ));
}

#[test]
fn empty_source_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_manifest(&dir, "S1\t\n");
    let err = load_manifest(&path).expect_err("empty field");
    assert!(matches!(err, SetupError::ManifestEmptyField { line: 1, .. }));
}

#[test]
fn duplicate_sample_ids_are_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_manifest(&dir, "S1\t/data/a.fasta\nS2\t/data/b.fasta\nS1\t/data/c.fasta\n");
    let err = load_manifest(&path).expect_err("duplicate");
    match err {
        SetupError::DuplicateSample {
            sample_id,
            line,
            first_line,
            ..
        } => {
            assert_eq!(sample_id, "S1");
            assert_eq!(line, 3);
            assert_eq!(first_line, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn single_fasta_becomes_one_sample_named_by_prefix() {
    let dir = TempDir::new().expect("tempdir");
    let fasta = dir.path().join("genome.fa");
    std::fs::write(&fasta, ">contig_1\nACGT\n").expect("write fasta");
    let entries = load_assembly_inputs(&fasta, "isolate7").expect("load");
    assert_eq!(
        entries,
        vec![ManifestEntry {
            sample_id: "isolate7".to_string(),
            source: fasta,
        }]
    );
}

#[test]
fn assembly_manifest_is_parsed_as_manifest() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_manifest(&dir, "S1\t/data/s1.fasta\n");
    let entries = load_assembly_inputs(&path, "abritamr").expect("load");
    assert_eq!(entries[0].sample_id, "S1");
}

#[test]
fn sample_ids_that_leave_the_workdir_are_rejected() {
    let dir = TempDir::new().expect("tempdir");
    for (bad_id, contents) in [
        ("../escaped", "S1\t/data/s1.fasta\n../escaped\t/data/s2.fasta\n"),
        ("a/b", "S1\t/data/s1.fasta\na/b\t/data/s2.fasta\n"),
        ("/abs", "S1\t/data/s1.fasta\n/abs\t/data/s2.fasta\n"),
        ("..", "S1\t/data/s1.fasta\n..\t/data/s2.fasta\n"),
        (".", "S1\t/data/s1.fasta\n.\t/data/s2.fasta\n"),
        ("win\\dir", "S1\t/data/s1.fasta\nwin\\dir\t/data/s2.fasta\n"),
    ] {
        let path = write_manifest(&dir, contents);
        let err = load_manifest(&path).expect_err(bad_id);
        assert_eq!(err.kind(), ErrorKind::ManifestFormat);
        match err {
            SetupError::BadSampleId {
                sample_id, line, ..
            } => {
                assert_eq!(sample_id, bad_id);
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error for {bad_id:?}: {other}"),
        }
    }
}

#[test]
fn dotted_but_plain_sample_ids_are_accepted() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_manifest(&dir, "S1.v2\t/data/s1.fasta\n..S2\t/data/s2.fasta\n");
    let entries = load_manifest(&path).expect("load");
    assert_eq!(entries[0].sample_id, "S1.v2");
    assert_eq!(entries[1].sample_id, "..S2");
}

#[test]
fn single_fasta_prefix_must_be_a_plain_name() {
    let dir = TempDir::new().expect("tempdir");
    let fasta = dir.path().join("genome.fa");
    std::fs::write(&fasta, ">contig_1\nACGT\n").expect("write fasta");
    let err = load_assembly_inputs(&fasta, "../outside").expect_err("bad prefix");
    assert!(matches!(err, SetupError::BadSampleId { .. }));
}
