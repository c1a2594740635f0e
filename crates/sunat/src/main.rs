//! SUNAT document organizer
//!
//! Finds SUNAT tax documents by filename, including inside nested ZIP
//! archives, and packages or organizes the unique ones.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use sunat_logging::{init_logging, LogConfig};

mod cli;

use cli::AppContext;

#[derive(Parser, Debug)]
#[command(name = "sunat", version, about = "Find, package and organize SUNAT tax documents")]
struct Cli {
    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Config file (defaults to ~/.sunat/config.toml)
    #[arg(long, global = true, env = "SUNAT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List classified documents under a directory, including inside ZIPs
    Find {
        /// Directory to search
        path: PathBuf,

        /// Only list unique documents
        #[arg(long)]
        unique: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Package unique documents into consolidado_<timestamp>.zip
    Process {
        /// Directory to search
        search_path: PathBuf,

        /// Existing directory for the output archive
        #[arg(short, long)]
        output: PathBuf,

        /// Delete the files backing packaged documents afterwards
        #[arg(long)]
        delete_originals: bool,

        /// Directory for the process report (defaults to config or ~/.sunat/logs)
        #[arg(long)]
        log_dir: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Copy documents into one folder per classification
    Organize {
        /// Directory to search
        source: PathBuf,

        /// Destination root
        #[arg(short, long)]
        dest: PathBuf,

        /// Also copy duplicates (later copies overwrite earlier ones)
        #[arg(long)]
        include_duplicates: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mirror an organized tree into a cloud drive folder
    Sync {
        /// Organized tree to upload
        local: PathBuf,

        /// Root of the mounted cloud drive
        #[arg(long)]
        remote: PathBuf,

        /// Remote folder name
        #[arg(long)]
        folder: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the HTTP API
    Serve {
        /// Bind host (defaults to config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (defaults to config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show resolved paths and settings
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn command_wants_json(command: &Commands) -> bool {
    match command {
        Commands::Find { json, .. } => *json,
        Commands::Process { json, .. } => *json,
        Commands::Organize { json, .. } => *json,
        Commands::Sync { json, .. } => *json,
        Commands::Config { json } => *json,
        Commands::Serve { .. } => false,
    }
}

fn run_command(command: Commands, ctx: &AppContext) -> Result<()> {
    match command {
        Commands::Find { path, unique, json } => cli::find::run(
            cli::find::FindArgs {
                path,
                unique_only: unique,
                json,
            },
            ctx,
        ),
        Commands::Process {
            search_path,
            output,
            delete_originals,
            log_dir,
            json,
        } => cli::process::run(
            cli::process::ProcessArgs {
                search_path,
                output_dir: output,
                delete_originals,
                log_dir,
                json,
            },
            ctx,
        ),
        Commands::Organize {
            source,
            dest,
            include_duplicates,
            json,
        } => cli::organize::run(
            cli::organize::OrganizeArgs {
                source,
                destination: dest,
                include_duplicates,
                json,
            },
            ctx,
        ),
        Commands::Sync {
            local,
            remote,
            folder,
            json,
        } => cli::sync::run(
            cli::sync::SyncArgs {
                local,
                remote_root: remote,
                folder,
                json,
            },
            ctx,
        ),
        Commands::Serve { host, port } => cli::serve::run(cli::serve::ServeArgs { host, port }, ctx),
        Commands::Config { json } => cli::config::run(json, ctx),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_mode = command_wants_json(&cli.command);

    if let Err(err) = init_logging(LogConfig {
        app_name: "sunat",
        verbose: cli.verbose,
        quiet_console: json_mode,
    }) {
        eprintln!("warning: file logging disabled: {}", err);
    }

    let result = AppContext::load(cli.config).and_then(|ctx| run_command(cli.command, &ctx));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json_mode {
                cli::error::print_json_error(&err);
            } else {
                eprintln!("{:?}", err);
            }
            ExitCode::from(1)
        }
    }
}
