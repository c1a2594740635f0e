//! Discover-select-package pipeline used by the CLI and HTTP collaborators.

use crate::action_log::ActionLog;
use crate::error::Result;
use crate::packager::{self, DeletionFailure, PackageOutcome};
use crate::scan_path::{validate_output_dir, validate_search_path};
use crate::scanner::{count_by_kind, ScanWarning, Scanner};
use crate::types::{DocumentKind, DocumentRecord};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const NO_FILES_FOUND: &str = "No files found in scan.";
pub const NO_UNIQUE_FILES: &str = "No unique files found to package.";
pub const PROCESSING_COMPLETE: &str = "Processing complete.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub search_path: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub delete_originals: bool,
    /// Directory for the `process_<ts>.txt` report
    pub log_dir: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessSummary {
    pub message: String,
    pub files_found_in_scan: usize,
    pub unique_files_packaged: usize,
    pub classification_stats: BTreeMap<DocumentKind, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_zip_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_log_file: Option<PathBuf>,
    pub skipped: usize,
    pub deleted: Vec<PathBuf>,
    pub deletion_failures: Vec<DeletionFailure>,
    pub warnings: Vec<ScanWarning>,
}

/// Output names derived from one run timestamp.
pub fn output_names(now: DateTime<Local>) -> (String, String) {
    let stamp = now.format("%Y%m%d_%H%M%S");
    (
        format!("consolidado_{}.zip", stamp),
        format!("process_{}.txt", stamp),
    )
}

/// Physical files backing the selected records, nesting stripped.
pub fn deletion_targets(records: &[DocumentRecord]) -> BTreeSet<PathBuf> {
    records
        .iter()
        .map(|r| r.address.physical().to_path_buf())
        .collect()
}

/// Run one full process invocation.
pub fn process(scanner: &Scanner, request: &ProcessRequest) -> Result<ProcessSummary> {
    validate_search_path(&request.search_path)?;
    validate_output_dir(&request.output_dir)?;

    let discovery = scanner.discover(&request.search_path)?;
    let mut summary = ProcessSummary {
        files_found_in_scan: discovery.records.len(),
        warnings: discovery.warnings.clone(),
        ..ProcessSummary::default()
    };
    if discovery.records.is_empty() {
        summary.message = NO_FILES_FOUND.to_string();
        return Ok(summary);
    }

    let selected = discovery.into_unique();
    if selected.is_empty() {
        summary.message = NO_UNIQUE_FILES.to_string();
        return Ok(summary);
    }
    summary.unique_files_packaged = selected.len();
    summary.classification_stats = count_by_kind(&selected);

    let targets = if request.delete_originals {
        deletion_targets(&selected)
    } else {
        BTreeSet::new()
    };

    fs::create_dir_all(&request.log_dir)?;
    let (zip_name, log_name) = output_names(Local::now());
    let output_zip = request.output_dir.join(zip_name);
    let log_path = request.log_dir.join(log_name);

    info!(
        search_path = %request.search_path.display(),
        output = %output_zip.display(),
        unique = selected.len(),
        delete_originals = request.delete_originals,
        "Packaging unique records"
    );

    let mut log = ActionLog::new();
    match packager::package_with_log(
        &selected,
        &targets,
        &output_zip,
        Some(log_path.as_path()),
        &mut log,
    )? {
        PackageOutcome::NothingToPackage => {
            summary.message = NO_UNIQUE_FILES.to_string();
        }
        PackageOutcome::Packaged(report) => {
            summary.message = PROCESSING_COMPLETE.to_string();
            summary.output_zip_file = Some(report.output_archive);
            summary.process_log_file = report.log_path;
            summary.skipped = report.skipped.len();
            summary.deleted = report.deleted;
            summary.deletion_failures = report.deletion_failures;
        }
    }
    Ok(summary)
}

/// Convenience wrapper using default scan settings.
pub fn process_default(request: &ProcessRequest) -> Result<ProcessSummary> {
    process(&Scanner::default(), request)
}

impl ProcessSummary {
    pub fn output_zip(&self) -> Option<&Path> {
        self.output_zip_file.as_deref()
    }
}
