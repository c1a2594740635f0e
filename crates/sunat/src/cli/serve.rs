//! Serve command - run the HTTP API

use super::AppContext;
use anyhow::{Context, Result};
use sunat::api::{self, AppState};

#[derive(Debug)]
pub struct ServeArgs {
    pub host: Option<String>,
    pub port: Option<u16>,
}

pub fn run(args: ServeArgs, ctx: &AppContext) -> Result<()> {
    let host = args.host.unwrap_or_else(|| ctx.config.api.host.clone());
    let port = args.port.unwrap_or(ctx.config.api.port);
    let addr = format!("{}:{}", host, port);

    let state = AppState {
        scanner: ctx.scanner(),
        log_dir: ctx.log_dir(),
    };
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;
    runtime.block_on(api::serve(&addr, state))
}
