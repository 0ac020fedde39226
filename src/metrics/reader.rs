//! Best-effort reads of host state.
//!
//! None of these methods fail: unreadable or malformed resources degrade to
//! empty strings and zero values so a partial snapshot can still be reported.

use super::cpu::{parse_aggregate_line, CpuCounters};
use super::memory::{parse_meminfo, MemoryCounters};
use super::root::ProcRoot;
use std::fs;
use tracing::debug;

pub const UPTIME_PATH: &str = "/proc/uptime";
pub const STAT_PATH: &str = "/proc/stat";
pub const MEMINFO_PATH: &str = "/proc/meminfo";

/// Returned by [`MetricsReader::read_hostname`] when the name is unavailable.
pub const UNKNOWN_HOSTNAME: &str = "unknown";

#[derive(Debug, Clone)]
pub struct MetricsReader {
    root: ProcRoot,
}

impl MetricsReader {
    pub fn new(root: ProcRoot) -> Self {
        Self { root }
    }

    /// Full contents of a logical resource, or an empty string.
    pub fn read_text(&self, logical: &str) -> String {
        let path = self.root.resolve(logical);
        match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "resource unavailable");
                String::new()
            }
        }
    }

    pub fn read_hostname(&self) -> String {
        hostname().unwrap_or_else(|| UNKNOWN_HOSTNAME.to_string())
    }

    /// Hours since boot, from the first field of /proc/uptime.
    pub fn read_uptime_hours(&self) -> f64 {
        parse_uptime_hours(&self.read_text(UPTIME_PATH))
    }

    pub fn read_cpu_counters(&self) -> CpuCounters {
        match parse_aggregate_line(&self.read_text(STAT_PATH)) {
            Some(times) => times.counters(),
            None => {
                debug!("no usable aggregate cpu line");
                CpuCounters::default()
            }
        }
    }

    pub fn read_memory_counters(&self) -> MemoryCounters {
        parse_meminfo(&self.read_text(MEMINFO_PATH))
    }
}

fn parse_uptime_hours(uptime: &str) -> f64 {
    uptime
        .split_whitespace()
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(|secs| secs / 3600.0)
        .unwrap_or(0.0)
}

fn hostname() -> Option<String> {
    let mut buf = [0u8; 256];
    // SAFETY: buf is valid for writes of buf.len() bytes.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) };
    if rc != 0 {
        debug!(error = %std::io::Error::last_os_error(), "gethostname failed");
        return None;
    }

    let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    let name = String::from_utf8_lossy(&buf[..len]).into_owned();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
