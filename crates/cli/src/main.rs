//! `invoicer` binary entry point.

use std::io::Write;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;

use invoicer_cli::{Cli, Config, commands};
use invoicer_infra::{FileStore, InvoicerSession};

fn main() -> anyhow::Result<()> {
    invoicer_observability::init();

    let cli = Cli::parse();
    let config = Config::resolve(cli.data_dir.clone())?;
    tracing::debug!(data_dir = %config.data_dir.display(), "resolved configuration");

    let store = FileStore::open(&config.data_dir)
        .with_context(|| format!("failed to open data directory {}", config.data_dir.display()))?;
    let mut session = InvoicerSession::open(store);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(&mut session, cli.command, Utc::now(), &mut out)?;
    out.flush()?;
    Ok(())
}
