//! Process command - package unique documents into one archive

use super::error::HelpfulError;
use super::output::{format_size, kind_rows, print_table, print_warnings};
use super::{existing_dir, AppContext};
use anyhow::Result;
use std::path::PathBuf;
use sunat_scout::ProcessRequest;

#[derive(Debug)]
pub struct ProcessArgs {
    pub search_path: PathBuf,
    pub output_dir: PathBuf,
    pub delete_originals: bool,
    pub log_dir: Option<PathBuf>,
    pub json: bool,
}

pub fn run(args: ProcessArgs, ctx: &AppContext) -> Result<()> {
    let search_path = existing_dir(&args.search_path)?;
    if !args.output_dir.is_dir() {
        return Err(HelpfulError::output_dir_missing(&args.output_dir).into());
    }
    let output_dir = existing_dir(&args.output_dir)?;

    let request = ProcessRequest {
        search_path,
        output_dir,
        delete_originals: args.delete_originals,
        log_dir: args.log_dir.unwrap_or_else(|| ctx.log_dir()),
    };
    let summary = sunat_scout::process(&ctx.scanner(), &request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if !summary.classification_stats.is_empty() {
        print_table(&["Classification", "Packaged"], kind_rows(&summary.classification_stats));
    }
    print_warnings(&summary.warnings);
    for failure in &summary.deletion_failures {
        eprintln!("warning: could not delete {}: {}", failure.path.display(), failure.reason);
    }

    println!("{}", summary.message);
    if let Some(zip) = summary.output_zip() {
        let size = std::fs::metadata(zip).map(|m| m.len()).unwrap_or(0);
        println!("Archive: {} ({})", zip.display(), format_size(size));
    }
    if let Some(log) = &summary.process_log_file {
        println!("Log: {}", log.display());
    }
    println!(
        "{} found, {} packaged, {} skipped, {} deleted",
        summary.files_found_in_scan,
        summary.unique_files_packaged,
        summary.skipped,
        summary.deleted.len()
    );
    Ok(())
}
