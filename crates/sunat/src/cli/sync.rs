//! Sync command - mirror an organized tree into a cloud drive folder

use super::{existing_dir, AppContext};
use anyhow::{Context, Result};
use std::path::PathBuf;
use sunat::{sync_tree, MirrorStore};

#[derive(Debug)]
pub struct SyncArgs {
    /// Organized tree (one folder per classification)
    pub local: PathBuf,
    /// Root of the mounted or synced cloud drive
    pub remote_root: PathBuf,
    /// Remote folder name (defaults to config `sync.remote_folder`)
    pub folder: Option<String>,
    pub json: bool,
}

pub fn run(args: SyncArgs, ctx: &AppContext) -> Result<()> {
    let local = existing_dir(&args.local)?;
    let remote_root = existing_dir(&args.remote_root)?;
    let folder = args
        .folder
        .unwrap_or_else(|| ctx.config.sync.remote_folder.clone());

    let store = MirrorStore::new(remote_root);
    let report = sync_tree(&store, &local, &folder)
        .with_context(|| format!("Sync of {} failed", local.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    for failure in &report.failures {
        eprintln!("warning: {}", failure);
    }
    println!(
        "Uploaded {} file(s) to /{}, {} folder(s) created, {} failed",
        report.uploaded, folder, report.folders_created, report.failed
    );
    Ok(())
}
