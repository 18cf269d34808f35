//! weekver - stamp week-based build versions into AssemblyInfo files

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use weekver_cli::{Cli, Output};
use weekver_core::Reporter;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries workflow commands.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let dry_run = cli.dry_run;
    let output = Output::new();

    match weekver_cli::run(cli, &output).await {
        Ok(report) => {
            output.info(&weekver_cli::summary(&report, dry_run));
            ExitCode::SUCCESS
        }
        Err(err) => {
            output.error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
