//! Diagnostic logging setup.
//!
//! Reports go to stdout, so diagnostics are written to stderr. Verbosity comes
//! from the `SYSMON_LOG` environment variable using `EnvFilter` syntax.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "SYSMON_LOG";
const DEFAULT_FILTER: &str = "warn";

fn filter_from(value: Option<&str>) -> Result<EnvFilter> {
    let directives = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_FILTER);
    EnvFilter::try_new(directives)
        .map_err(|e| anyhow!("invalid {} value '{}': {}", LOG_ENV_VAR, directives, e))
}

/// Install the global subscriber. Call once, before any sampling.
pub fn init() -> Result<()> {
    let value = std::env::var(LOG_ENV_VAR).ok();
    let filter = filter_from(value.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to set tracing subscriber: {e}"))
}
