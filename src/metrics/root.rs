//! Location of the /proc tree the readers observe.
//!
//! Inside a container the host's /proc is commonly bind-mounted at
//! `/host/proc`. The prefix is probed once at startup and carried by value.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory under which the host's `proc` mount is visible when running in a
/// container.
pub const CONTAINER_PREFIX: &str = "/host";

/// File whose presence under a prefix decides whether the prefix is used.
const PROBE_FILE: &str = "/proc/stat";

/// Resolved path prefix for all /proc reads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcRoot {
    prefix: PathBuf,
}

impl ProcRoot {
    /// Read the process's own /proc with no prefix.
    pub fn host() -> Self {
        Self::default()
    }

    /// Read every resource through `prefix`.
    pub fn with_prefix(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Probe the real filesystem for a container-mounted host /proc.
    pub fn detect() -> Self {
        Self::detect_under(Path::new("/"))
    }

    /// Probe for `<base>/host/proc/stat`. When present, resources are read
    /// from `<base>/host`; otherwise from `<base>`.
    pub fn detect_under(base: &Path) -> Self {
        let container = join_logical(base, CONTAINER_PREFIX);
        let root = if join_logical(&container, PROBE_FILE).exists() {
            Self::with_prefix(container)
        } else if base == Path::new("/") {
            Self::host()
        } else {
            Self::with_prefix(base)
        };
        debug!(prefix = %root.prefix().display(), "resolved proc root");
        root
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// Map an absolute logical path such as `/proc/stat` onto the prefix.
    pub fn resolve(&self, logical: &str) -> PathBuf {
        if self.prefix.as_os_str().is_empty() {
            PathBuf::from(logical)
        } else {
            join_logical(&self.prefix, logical)
        }
    }
}

fn join_logical(base: &Path, logical: &str) -> PathBuf {
    base.join(logical.trim_start_matches('/'))
}
