use std::sync::Arc;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli_args;
mod config;
mod host;
mod session;

use crate::cli_args::Cli;
use crate::config::{ensure_secure_addr, load_config, resolve_config_path, token_state_path};
use crate::host::ClipboardHost;
use crate::session::run_session;
use unseat_client::{DeviceClient, FileTokenStore, LogSink, DEFAULT_ADDR};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config_path = resolve_config_path(cli.config.as_deref())?;
    let config = load_config(&config_path)?;
    let addr = cli
        .addr
        .clone()
        .or_else(|| config.addr.clone())
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());
    ensure_secure_addr(&addr, cli.insecure)?;
    debug!(config = %config_path.display(), addr = %addr, "resolved configuration");

    let store = Arc::new(FileTokenStore::new(
        token_state_path(&config_path),
        config.access_token_default.clone(),
        config.refresh_token_default.clone(),
    ));
    let log: LogSink = Arc::new(|line: &str| println!("{line}"));
    let client = DeviceClient::new(&addr, store, log)?;

    let mut host = ClipboardHost;
    run_session(&client, &mut host, &config.secret_to_copy).await?;
    Ok(())
}

fn init_logging(verbosity: u8) -> anyhow::Result<()> {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter)?)
        .with_target(false)
        .init();
    Ok(())
}
