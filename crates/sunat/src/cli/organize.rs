//! Organize command - copy documents into per-classification folders

use super::output::{print_table, print_warnings};
use super::{existing_dir, AppContext};
use anyhow::{Context, Result};
use std::path::PathBuf;
use sunat_scout::{organize, ActionLevel, ActionLog};

#[derive(Debug)]
pub struct OrganizeArgs {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Include DUPLICATE records (later copies overwrite earlier ones)
    pub include_duplicates: bool,
    pub json: bool,
}

pub fn run(args: OrganizeArgs, ctx: &AppContext) -> Result<()> {
    let source = existing_dir(&args.source)?;
    let discovery = ctx.scanner().discover(&source)?;
    let records: Vec<_> = if args.include_duplicates {
        discovery.records.clone()
    } else {
        discovery.unique_records().cloned().collect()
    };

    let mut log = ActionLog::new();
    let report = organize(&records, &args.destination, &mut log)
        .with_context(|| format!("Failed to organize into {}", args.destination.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if !report.per_folder.is_empty() {
        let rows = report
            .per_folder
            .iter()
            .map(|(folder, count)| vec![folder.clone(), count.to_string()])
            .collect();
        print_table(&["Folder", "Files"], rows);
    }
    print_warnings(&discovery.warnings);
    for entry in log.entries().iter().filter(|e| e.level == ActionLevel::Error) {
        eprintln!("warning: {}", entry.message.trim_start());
    }
    println!(
        "Organized {} file(s) into {}, {} failed",
        report.copied,
        args.destination.display(),
        report.failed
    );
    Ok(())
}
