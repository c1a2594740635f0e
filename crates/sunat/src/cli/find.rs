//! Find command - classify SUNAT documents under a directory

use super::output::{color_for_status, print_table_colored, print_warnings};
use super::{existing_dir, AppContext};
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use sunat_scout::{DocumentRecord, ScanStats, ScanWarning};

#[derive(Debug)]
pub struct FindArgs {
    pub path: PathBuf,
    /// Only list UNIQUE records
    pub unique_only: bool,
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct FindOutput {
    pub search_path: PathBuf,
    pub files_found: usize,
    pub files: Vec<DocumentRecord>,
    pub warnings: Vec<ScanWarning>,
    pub stats: ScanStats,
}

pub fn run(args: FindArgs, ctx: &AppContext) -> Result<()> {
    let root = existing_dir(&args.path)?;
    let discovery = ctx.scanner().discover(&root)?;

    let files: Vec<DocumentRecord> = if args.unique_only {
        discovery.unique_records().cloned().collect()
    } else {
        discovery.records.clone()
    };

    if args.json {
        let output = FindOutput {
            search_path: root,
            files_found: files.len(),
            files,
            warnings: discovery.warnings,
            stats: discovery.stats,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if !files.is_empty() {
        let rows = files
            .iter()
            .map(|r| {
                vec![
                    (r.kind().to_string(), None),
                    (r.status.to_string(), Some(color_for_status(r.status))),
                    (r.filename.clone(), None),
                    (r.address.to_string(), None),
                ]
            })
            .collect();
        print_table_colored(&["Classification", "Status", "Filename", "Address"], rows);
    }
    print_warnings(&discovery.warnings);

    println!(
        "Found {} file(s): {} unique, {} duplicate(s), {} warning(s)",
        discovery.stats.records,
        discovery.stats.unique,
        discovery.stats.duplicates,
        discovery.warnings.len()
    );
    Ok(())
}
