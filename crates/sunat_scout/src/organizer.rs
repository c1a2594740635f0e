//! Copy discovered documents into per-classification folders.
//!
//! Non-destructive: originals are never touched. Nested records are
//! extracted in memory and written out.

use crate::action_log::ActionLog;
use crate::error::Result;
use crate::extractor;
use crate::types::DocumentRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizeReport {
    pub copied: usize,
    pub failed: usize,
    /// Files written per destination folder
    pub per_folder: BTreeMap<String, usize>,
}

/// Copy each record to `<destination>/<folder>/<filename>`.
///
/// Only failure to create `destination` itself is returned as an error.
pub fn organize(
    records: &[DocumentRecord],
    destination: &Path,
    log: &mut ActionLog,
) -> Result<OrganizeReport> {
    fs::create_dir_all(destination)?;
    log.info(format!("Organizing into {}", destination.display()));

    let mut report = OrganizeReport::default();
    for record in records {
        let folder = record.kind().folder_name();
        match copy_record(record, &destination.join(folder)) {
            Ok(()) => {
                log.info(format!("  -> [COPIED] {} to {}", record.address, folder));
                report.copied += 1;
                *report.per_folder.entry(folder.to_string()).or_insert(0) += 1;
            }
            Err(err) => {
                log.error(format!("  -> [ERROR] copying {}: {}", record.address, err));
                report.failed += 1;
            }
        }
    }
    log.info(format!(
        "Organized {} file(s), {} failed",
        report.copied, report.failed
    ));
    Ok(report)
}

fn copy_record(record: &DocumentRecord, folder: &Path) -> Result<()> {
    fs::create_dir_all(folder)?;
    let target = folder.join(&record.filename);
    if record.address.is_nested() {
        let bytes = extractor::extract_address(&record.address)?;
        fs::write(&target, bytes)?;
    } else {
        let source = record.address.physical();
        if !source.exists() {
            return Err(crate::ScoutError::SourceMissing(source.to_path_buf()));
        }
        fs::copy(source, &target)?;
    }
    Ok(())
}
