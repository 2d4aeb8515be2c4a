// Command-line surface shared by `translations-upload` and
// `translations-download`.

use crate::auth::Credentials;
use crate::config::Config;
use crate::sync::{SyncContext, SyncReport};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// OneSky API key
    #[arg(long, env = "ONESKY_API_KEY")]
    pub api_key: String,

    /// OneSky API secret, only used to sign requests
    #[arg(long, env = "ONESKY_API_SECRET", hide_env_values = true)]
    pub api_secret: String,

    /// Project root containing `sources/` (defaults to the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Configuration file (defaults to `<root>/onesky.toml`)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Exit with status 1 if any project or locale failed
    #[arg(long)]
    pub strict: bool,
}

impl SyncArgs {
    pub fn root(&self) -> Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir().context("Cannot determine current directory"),
        }
    }

    /// Load configuration and build the client for this invocation.
    pub fn context(&self) -> Result<SyncContext> {
        let root = self.root()?;
        let config = Config::load(&root, self.config.as_deref())
            .context("Failed to load configuration")?;
        let credentials = Credentials::new(&self.api_key, &self.api_secret);
        SyncContext::new(config, credentials, root)
    }
}

const DEFAULT_LOG_FILTER: &str = "onesky_sync=info";

/// `RUST_LOG` when it is set and parses, `onesky_sync=info` otherwise.
pub fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Log to stderr; stdout carries the per-item report.
pub fn init_logging() {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(rust_log.as_deref()))
        .init();
}

/// Per-item failures only affect the exit status with `--strict`.
pub fn should_fail(report: &SyncReport, strict: bool) -> bool {
    strict && report.failures() > 0
}

pub fn exit_code(report: &SyncReport, strict: bool) -> ExitCode {
    if should_fail(report, strict) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
