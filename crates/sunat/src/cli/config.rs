//! Config command - show resolved paths and settings

use super::AppContext;
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use sunat_scout::SunatConfig;

#[derive(Debug, Serialize)]
struct ConfigOutput<'a> {
    home: PathBuf,
    config_path: &'a PathBuf,
    config_exists: bool,
    logs_dir: PathBuf,
    process_log_dir: PathBuf,
    settings: &'a SunatConfig,
}

pub fn run(json: bool, ctx: &AppContext) -> Result<()> {
    let output = ConfigOutput {
        home: sunat_logging::sunat_home(),
        config_path: &ctx.config_path,
        config_exists: ctx.config_path.exists(),
        logs_dir: sunat_logging::logs_dir(),
        process_log_dir: ctx.log_dir(),
        settings: &ctx.config,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Home:            {}", output.home.display());
    println!(
        "Config:          {}{}",
        output.config_path.display(),
        if output.config_exists { "" } else { " (not found, using defaults)" }
    );
    println!("Logs:            {}", output.logs_dir.display());
    println!("Process reports: {}", output.process_log_dir.display());
    println!("Follow symlinks: {}", ctx.config.scan.follow_symlinks);
    println!(
        "Nesting limit:   {}",
        ctx.config
            .scan
            .max_nesting_depth
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unbounded".to_string())
    );
    println!("API address:     {}", ctx.config.api_addr());
    println!("Remote folder:   {}", ctx.config.sync.remote_folder);
    Ok(())
}
