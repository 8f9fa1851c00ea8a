use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{Controller, HttpRemoteStore};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod events;
mod render;
mod session;

use commands::HELP;
use config::load_settings;
use events::{UiError, UiErrorContext};
use render::TerminalRenderer;
use session::run_session;

#[derive(Parser, Debug)]
#[command(about = "Terminal shopping cart backed by a remote inventory/cart store")]
struct Args {
    /// Config file; defaults to ./storefront.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    store_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(url) = args.store_url {
        settings.store_url = url;
    }
    if let Some(secs) = args.timeout_secs {
        settings.request_timeout_secs = secs;
    }

    let filter =
        EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let store = HttpRemoteStore::with_timeout(&settings.store_url, settings.request_timeout())
        .with_context(|| format!("cannot use store url '{}'", settings.store_url))?;
    info!(store_url = store.base_url(), "storefront starting");
    let controller = Arc::new(Controller::new(Arc::new(store)));

    if let Err(err) = controller.init(Arc::new(TerminalRenderer)).await {
        eprintln!(
            "{}",
            UiError::from_controller(UiErrorContext::Startup, &err).status_line()
        );
    }
    println!("{HELP}");

    let stdin = BufReader::new(tokio::io::stdin());
    run_session(controller, stdin).await?;

    info!("storefront exiting");
    Ok(())
}
