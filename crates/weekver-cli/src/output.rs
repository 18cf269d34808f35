//! Console output as GitHub Actions workflow commands
//!
//! Informational lines go to stdout as-is. Warnings and failures use the
//! `::warning::` / `::error::` commands so the runner turns them into
//! annotations on the job.

use weekver_core::Reporter;

/// [`Reporter`] writing workflow commands to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct Output;

impl Output {
    /// Create a new output handle.
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for Output {
    fn info(&self, msg: &str) {
        tracing::info!("{msg}");
        println!("{msg}");
    }

    fn warning(&self, msg: &str) {
        tracing::warn!("{msg}");
        println!("::warning::{}", escape_data(msg));
    }

    fn error(&self, msg: &str) {
        tracing::error!("{msg}");
        println!("::error::{}", escape_data(msg));
    }
}

/// Escape a message for use as workflow command data.
pub fn escape_data(msg: &str) -> String {
    msg.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
