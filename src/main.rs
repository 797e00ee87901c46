use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use tracing::info;

use gitscrub::cli::CliArgs;
use gitscrub::runner::ProcessRunner;

fn main() -> Result<()> {
    // Initialize tracing with env filter; stdout is reserved for status lines
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli_args = CliArgs::parse();
    info!("Starting gitscrub");

    let workdir = std::env::current_dir().context("Failed to determine current directory")?;
    let path_var = std::env::var_os("PATH");
    let runner = ProcessRunner::new(&workdir);

    let code = gitscrub::app::run(
        &workdir,
        cli_args,
        path_var.as_deref(),
        &runner,
        &mut io::stdout().lock(),
    );

    info!(code, "gitscrub finished");
    std::process::exit(code);
}
