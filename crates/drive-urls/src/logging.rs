//! Logging init for binaries and tests that embed this crate.
//!
//! The library only emits `tracing` events; it never installs a subscriber on its own.

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Default filter: quiet dependencies, verbose probe.
pub const DEFAULT_DIRECTIVE: &str = "info,drive_urls=debug";

/// Install a plain fmt subscriber on stderr filtered by `directive`
/// (e.g. [`DEFAULT_DIRECTIVE`]). Fails if the directive is invalid or a
/// global subscriber is already set.
pub fn init_logging_stderr(directive: &str) -> Result<()> {
    let env_filter = EnvFilter::try_new(directive)
        .with_context(|| format!("invalid log filter: {}", directive))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("install tracing subscriber: {}", e))?;

    tracing::debug!("drive_urls logging initialized ({})", directive);
    Ok(())
}
