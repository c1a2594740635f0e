//! End-to-end tests for Scout
//!
//! Discovery over real directory trees with nested archives, followed by
//! packaging and extraction back out of the output archive.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use sunat_scout::pipeline::deletion_targets;
use sunat_scout::{
    discover, package, DocumentKind, DocumentStatus, PackageOutcome, ProcessRequest, Scanner,
    WarningKind,
};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Create a test environment with temp directories
struct TestEnv {
    /// Temp directory (cleaned up on drop)
    _temp: TempDir,
    /// Search root
    pub source_dir: PathBuf,
    /// Where packages are written
    pub output_dir: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let source_dir = temp.path().join("source");
        let output_dir = temp.path().join("output");
        fs::create_dir_all(&source_dir).expect("Failed to create source dir");
        fs::create_dir_all(&output_dir).expect("Failed to create output dir");
        Self {
            _temp: temp,
            source_dir,
            output_dir,
        }
    }

    fn write_file(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.source_dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok();
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }
}

fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start entry");
        writer.write_all(data).expect("write entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// Wrap `(name, bytes)` in `depth` levels of archives named `level<N>.zip`.
fn nest(name: &str, content: &[u8], depth: usize) -> (String, Vec<u8>) {
    let mut current = (name.to_string(), content.to_vec());
    for level in (1..=depth).rev() {
        let bytes = zip_bytes(&[(&current.0, &current.1)]);
        current = (format!("level{}.zip", level), bytes);
    }
    current
}

fn read_archive(path: &Path) -> Vec<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let mut buf = Vec::new();
        entry.read_to_end(&mut buf).unwrap();
        entries.push((entry.name().to_string(), buf));
    }
    entries
}

// ============================================================================
// Discovery Tests
// ============================================================================

#[test]
fn test_every_matching_file_is_classified() {
    let env = TestEnv::new();
    let names = [
        "ridetrac_20123456789_1234567890123_20240105120000_000000001.pdf",
        "ridetrac_20123456789_1234567890123_20240105120000_000000002.pdf",
        "sub/ridetrac_20123456789_1234567890123_20240105120000_000000003.pdf",
        "sub/deeper/ridetrac_20123456789_1234567890123_20240105120000_000000004.pdf",
    ];
    for name in names {
        env.write_file(name, b"pdf");
    }

    let discovery = discover(&env.source_dir).unwrap();
    assert_eq!(discovery.records.len(), names.len());
    for record in &discovery.records {
        assert_eq!(record.kind(), DocumentKind::IngresoRecaudacion);
        assert_eq!(record.status, DocumentStatus::Unique);
        let value = serde_json::to_value(record).unwrap();
        assert_eq!(value["ruc"], "20123456789");
        assert_eq!(value["num_operacion"], "1234567890123");
        assert_eq!(value["timestamp"], "20240105120000");
        assert_eq!(value["ext"], "pdf");
    }
    assert!(discovery.warnings.is_empty());
}

#[test]
fn test_same_name_on_disk_and_in_zip_is_one_unique_one_duplicate() {
    let env = TestEnv::new();
    let name = "20123456789-09-T001-00000001.pdf";
    env.write_file(name, b"on disk");
    env.write_file("reports.zip", &zip_bytes(&[(name, b"in zip")]));

    let discovery = discover(&env.source_dir).unwrap();
    assert_eq!(discovery.records.len(), 2);
    assert!(discovery
        .records
        .iter()
        .all(|r| r.kind() == DocumentKind::GuiaRemision && r.filename == name));
    let unique = discovery.records.iter().filter(|r| r.is_unique()).count();
    assert_eq!(unique, 1);
    assert_eq!(discovery.stats.duplicates, 1);
}

#[test]
fn test_duplicates_across_nesting_levels() {
    let env = TestEnv::new();
    let name = "01-F001-99.xml";
    env.write_file("a/01-F001-99.xml", b"a");
    env.write_file("b/01-F001-99.xml", b"b");
    let (outer, bytes) = nest(name, b"c", 2);
    env.write_file(&outer, &bytes);

    let discovery = discover(&env.source_dir).unwrap();
    assert_eq!(discovery.records.len(), 3);
    assert_eq!(discovery.unique_records().count(), 1);
}

#[test]
fn test_corrupt_nested_zip_keeps_sibling_and_ancestor_records() {
    let env = TestEnv::new();
    env.write_file("03-B001-1.pdf", b"ancestor scope");
    let outer = zip_bytes(&[
        ("broken.zip", b"this is not a zip archive"),
        ("07-FC01-2.xml", b"sibling"),
        ("ok.zip", &zip_bytes(&[("08-FD01-3.pdf", b"nested")])),
    ]);
    env.write_file("bundle.zip", &outer);

    let discovery = discover(&env.source_dir).unwrap();
    let mut kinds: Vec<DocumentKind> = discovery.records.iter().map(|r| r.kind()).collect();
    kinds.sort();
    assert_eq!(
        kinds,
        vec![DocumentKind::Boleta, DocumentKind::NotaCredito, DocumentKind::NotaDebito]
    );
    assert_eq!(discovery.warnings.len(), 1);
    assert_eq!(discovery.warnings[0].kind, WarningKind::ArchiveCorrupt);
    assert!(discovery.warnings[0].address.ends_with("bundle.zip:broken.zip"));
}

#[test]
fn test_discovery_is_idempotent() {
    let env = TestEnv::new();
    env.write_file("01-F001-1.pdf", b"1");
    env.write_file("x/01-F001-1.pdf", b"2");
    env.write_file("pack.zip", &zip_bytes(&[("03-B001-1.pdf", b"3"), ("01-F001-1.pdf", b"4")]));

    let scanner = Scanner::default();
    let first = scanner.discover(&env.source_dir).unwrap();
    let second = scanner.discover(&env.source_dir).unwrap();
    assert_eq!(first.records, second.records);
}

#[test]
fn test_missing_root_is_invalid_root_kind() {
    let env = TestEnv::new();
    let err = discover(&env.source_dir.join("nope")).unwrap_err();
    assert!(matches!(err, sunat_scout::ScoutError::InvalidRootKind(_)));
}

// ============================================================================
// Packaging Tests
// ============================================================================

#[test]
fn test_round_trip_from_depth_zero_to_three() {
    for depth in 0..=3 {
        let env = TestEnv::new();
        let name = "rvalores_20123456789_ABC123DEF4567_20240105120000_123456789.pdf";
        let content = format!("valores document at depth {}", depth).into_bytes();
        let (top, bytes) = nest(name, &content, depth);
        env.write_file(&top, &bytes);

        let discovery = discover(&env.source_dir).unwrap();
        assert_eq!(discovery.records.len(), 1, "depth {}", depth);
        assert_eq!(discovery.records[0].address.depth(), depth);

        let output = env.output_dir.join("out.zip");
        let outcome = package(&discovery.records, &BTreeSet::new(), &output, None).unwrap();
        assert!(matches!(outcome, PackageOutcome::Packaged(_)));
        assert_eq!(
            read_archive(&output),
            vec![(name.to_string(), content)],
            "depth {}",
            depth
        );
    }
}

#[test]
fn test_zero_unique_records_creates_no_archive() {
    let env = TestEnv::new();
    let output = env.output_dir.join("out.zip");
    let outcome = package(&[], &BTreeSet::new(), &output, None).unwrap();
    assert!(matches!(outcome, PackageOutcome::NothingToPackage));
    assert!(!output.exists());
}

#[test]
fn test_delete_originals_removes_only_packaged_bases() {
    let env = TestEnv::new();
    let disk_doc = env.write_file("01-F001-1.pdf", b"factura");
    let container = env.write_file("bundle.zip", &zip_bytes(&[("03-B001-1.pdf", b"boleta")]));
    let bystander = env.write_file("notes.txt", b"keep me");

    let request = ProcessRequest {
        search_path: env.source_dir.clone(),
        output_dir: env.output_dir.clone(),
        delete_originals: true,
        log_dir: env.output_dir.join("logs"),
    };
    let summary = sunat_scout::process(&Scanner::default(), &request).unwrap();

    let output_zip = summary.output_zip_file.clone().unwrap();
    assert!(output_zip.exists());
    assert!(!disk_doc.exists());
    assert!(!container.exists());
    assert!(bystander.exists());
    assert_eq!(summary.deleted.len(), 2);
    assert!(!summary.deleted.contains(&output_zip));

    let mut names: Vec<String> = read_archive(&output_zip).into_iter().map(|(n, _)| n).collect();
    names.sort();
    assert_eq!(names, vec!["01-F001-1.pdf", "03-B001-1.pdf"]);

    let log = fs::read_to_string(summary.process_log_file.unwrap()).unwrap();
    assert!(log.contains("[DELETED]"));
}

#[test]
fn test_deletion_targets_strip_nesting() {
    let env = TestEnv::new();
    let (top, bytes) = nest("01-F001-5.pdf", b"x", 2);
    let container = env.write_file(&top, &bytes);

    let discovery = discover(&env.source_dir).unwrap();
    let targets = deletion_targets(&discovery.records);
    assert_eq!(targets.into_iter().collect::<Vec<_>>(), vec![container]);
}
