//! css-audit: design-system audit for stylesheets and templates.

mod cli;
mod config;
mod orchestrator;
mod output;
mod showcase;

use clap::Parser;
use cli::Args;
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "CSS_AUDIT_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let outcome = orchestrator::run(args).await.into_diagnostic()?;
    if outcome.is_failure() {
        std::process::exit(1);
    }
    Ok(())
}
