//! Flat output archive builder
//!
//! Streams every selected record into one Deflate-compressed ZIP, named by
//! bare filename. Disk files are copied straight from disk; nested records go
//! through the [`extractor`](crate::extractor).
//!
//! ## Ordering
//! 1. Create the output directory (if missing) and the archive.
//! 2. Write each record. Missing or unreadable sources are logged and skipped;
//!    for a repeated name the latest readable record wins.
//! 3. Finish and sync the archive.
//! 4. Only then delete the requested physical originals, one by one. A file
//!    backing any skipped record is kept.
//! 5. Write the action report.
//!
//! Errors that reach the caller are limited to the output archive itself;
//! if one occurs the partial archive is removed and no original is deleted.

use crate::action_log::{ActionEntry, ActionLog};
use crate::error::{Result, ScoutError};
use crate::extractor;
use crate::types::DocumentRecord;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A record that did not make it into the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub address: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageReport {
    pub output_archive: PathBuf,
    /// Set only when the report file was written.
    pub log_path: Option<PathBuf>,
    /// Entry names written, in archive order.
    pub packaged: Vec<String>,
    pub skipped: Vec<SkippedRecord>,
    /// Records dropped because a later record has the same name.
    pub superseded: Vec<String>,
    pub deleted: Vec<PathBuf>,
    /// Deletion targets kept because a record they back was skipped.
    pub retained: Vec<PathBuf>,
    pub deletion_failures: Vec<DeletionFailure>,
    pub actions: Vec<ActionEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PackageOutcome {
    /// Nothing was selected; no archive was created.
    NothingToPackage,
    Packaged(PackageReport),
}

/// Package `records` into `output_archive` with a fresh action log.
pub fn package(
    records: &[DocumentRecord],
    deletion_targets: &BTreeSet<PathBuf>,
    output_archive: &Path,
    log_path: Option<&Path>,
) -> Result<PackageOutcome> {
    let mut log = ActionLog::new();
    package_with_log(records, deletion_targets, output_archive, log_path, &mut log)
}

/// Package into `output_archive`, appending every action to `log`.
pub fn package_with_log(
    records: &[DocumentRecord],
    deletion_targets: &BTreeSet<PathBuf>,
    output_archive: &Path,
    log_path: Option<&Path>,
    log: &mut ActionLog,
) -> Result<PackageOutcome> {
    if records.is_empty() {
        info!("No records selected; nothing to package");
        return Ok(PackageOutcome::NothingToPackage);
    }

    let mut report = PackageReport {
        output_archive: output_archive.to_path_buf(),
        log_path: None,
        packaged: Vec::new(),
        skipped: Vec::new(),
        superseded: Vec::new(),
        deleted: Vec::new(),
        retained: Vec::new(),
        deletion_failures: Vec::new(),
        actions: Vec::new(),
    };

    if let Some(dir) = output_archive.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
            log.info(format!("Created directory: {}", dir.display()));
        }
    }

    let unpackaged = write_archive(records, output_archive, log, &mut report)?;
    log.info(format!(
        "\nZIP package created successfully at: {}",
        output_archive.display()
    ));

    delete_originals(deletion_targets, &unpackaged, output_archive, log, &mut report);

    if let Some(path) = log_path {
        match log.write_report(path, output_archive) {
            Ok(()) => {
                info!(path = %path.display(), "Process log written");
                report.log_path = Some(path.to_path_buf());
            }
            Err(err) => error!(path = %path.display(), error = %err, "Failed to write process log"),
        }
    }

    report.actions = log.entries().to_vec();
    Ok(PackageOutcome::Packaged(report))
}

fn write_archive(
    records: &[DocumentRecord],
    output_archive: &Path,
    log: &mut ActionLog,
    report: &mut PackageReport,
) -> Result<BTreeSet<PathBuf>> {
    let file = File::create(output_archive)?;
    let result = write_entries(ZipWriter::new(file), records, log, report);
    if result.is_err() {
        if let Err(err) = fs::remove_file(output_archive) {
            error!(path = %output_archive.display(), error = %err, "Failed to remove partial archive");
        }
    }
    result
}

/// Write one entry per distinct name; returns the physical files backing
/// skipped records.
fn write_entries(
    mut zip: ZipWriter<File>,
    records: &[DocumentRecord],
    log: &mut ActionLog,
    report: &mut PackageReport,
) -> Result<BTreeSet<PathBuf>> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut unpackaged = BTreeSet::new();

    for (name, candidates) in group_by_name(records) {
        // Latest readable record wins.
        let mut winner = None;
        for (pos, record) in candidates.iter().enumerate().rev() {
            log.info(format!("Processing {}...", record.address));
            match load(record) {
                Ok(bytes) => {
                    winner = Some((pos, bytes));
                    break;
                }
                Err(err) => {
                    log_skip(record, &err, log);
                    unpackaged.insert(record.address.physical().to_path_buf());
                    report.skipped.push(SkippedRecord {
                        address: record.address.to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        let Some((pos, bytes)) = winner else {
            continue;
        };

        zip.start_file(name, options)?;
        zip.write_all(&bytes)?;
        if candidates[pos].address.is_nested() {
            log.info(format!("  -> [EXTRACTED AND ADDED] {} to the package.", name));
        } else {
            log.info(format!("  -> [ADDED] {} to the package.", name));
        }
        report.packaged.push(name.to_string());

        for earlier in &candidates[..pos] {
            log.info(format!(
                "  -> [SUPERSEDED] {}: a later record named {} is packaged instead",
                earlier.address, name
            ));
            report.superseded.push(earlier.address.to_string());
        }
    }

    let file = zip.finish()?;
    file.sync_all()?;
    Ok(unpackaged)
}

/// Records sharing an entry name, grouped in order of first appearance.
fn group_by_name(records: &[DocumentRecord]) -> Vec<(&str, Vec<&DocumentRecord>)> {
    let mut groups: Vec<(&str, Vec<&DocumentRecord>)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();
    for record in records {
        let name = record.filename.as_str();
        let slot = *slots.entry(name).or_insert_with(|| {
            groups.push((name, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(record);
    }
    groups
}

/// Full bytes of a record's source. Read errors stay local to the record.
fn load(record: &DocumentRecord) -> Result<Vec<u8>> {
    if record.address.is_nested() {
        return extractor::extract_address(&record.address);
    }
    let physical = record.address.physical();
    fs::read(physical).map_err(|err| match err.kind() {
        ErrorKind::NotFound => ScoutError::SourceMissing(physical.to_path_buf()),
        _ => ScoutError::Io(err),
    })
}

fn log_skip(record: &DocumentRecord, err: &ScoutError, log: &mut ActionLog) {
    match err {
        ScoutError::SourceMissing(path) if record.address.is_nested() => log.warn(format!(
            "  -> [WARNING] Containing ZIP not found on disk: {}",
            path.display()
        )),
        ScoutError::SourceMissing(path) => log.warn(format!(
            "  -> [WARNING] File not found on disk: {}",
            path.display()
        )),
        other => log.error(format!(
            "  -> [ERROR] processing {}: {}",
            record.address, other
        )),
    }
}

fn delete_originals(
    targets: &BTreeSet<PathBuf>,
    unpackaged: &BTreeSet<PathBuf>,
    output_archive: &Path,
    log: &mut ActionLog,
    report: &mut PackageReport,
) {
    if targets.is_empty() {
        return;
    }
    log.info("\nDeleting original physical files...");
    for path in targets {
        if is_same_file(path, output_archive) {
            log.warn(format!(
                "  -> [SKIPPED] {} is the output archive",
                path.display()
            ));
            continue;
        }
        if unpackaged.contains(path) {
            log.warn(format!(
                "  -> [SKIPPED] {} backs documents that were not packaged",
                path.display()
            ));
            report.retained.push(path.clone());
            continue;
        }
        match fs::remove_file(path) {
            Ok(()) => {
                log.info(format!("  -> [DELETED] {}", path.display()));
                report.deleted.push(path.clone());
            }
            Err(err) => {
                let failure = ScoutError::DeletionFailed {
                    path: path.clone(),
                    reason: err.to_string(),
                };
                log.error(format!("  -> [ERROR] {}", failure));
                report.deletion_failures.push(DeletionFailure {
                    path: path.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
