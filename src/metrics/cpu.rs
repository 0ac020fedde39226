//! CPU utilization from the aggregate line of /proc/stat.

use std::time::Instant;
use tracing::{debug, warn};

/// Marker token of the all-cores line in /proc/stat.
const AGGREGATE_MARKER: &str = "cpu";

/// Raw CPU time values from the aggregate /proc/stat line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuTimes {
    pub fn total(&self) -> u64 {
        [
            self.user,
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
            self.steal,
        ]
        .iter()
        .fold(0u64, |acc, v| acc.saturating_add(*v))
    }

    /// Idle time including time spent waiting on I/O.
    pub fn idle_all(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }

    pub fn counters(&self) -> CpuCounters {
        CpuCounters {
            total: self.total(),
            idle: self.idle_all(),
        }
    }
}

/// Cumulative tick counters from one read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuCounters {
    pub total: u64,
    pub idle: u64,
}

/// Parse the first line of /proc/stat.
///
/// Returns `None` unless the first token is exactly `cpu` and it is followed
/// by at least eight unsigned integers. Trailing guest columns are ignored.
pub fn parse_aggregate_line(stat: &str) -> Option<CpuTimes> {
    let line = stat.lines().next()?;
    let mut fields = line.split_whitespace();

    if fields.next()? != AGGREGATE_MARKER {
        return None;
    }

    let mut values = [0u64; 8];
    for slot in values.iter_mut() {
        *slot = fields.next()?.parse().ok()?;
    }

    Some(CpuTimes {
        user: values[0],
        nice: values[1],
        system: values[2],
        idle: values[3],
        iowait: values[4],
        irq: values[5],
        softirq: values[6],
        steal: values[7],
    })
}

/// Baseline retained between estimates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuCounterState {
    /// Zero means no prior reading.
    pub last_idle_ticks: u64,
    /// Zero means no prior reading.
    pub last_total_ticks: u64,
    pub last_read_time: Option<Instant>,
}

impl CpuCounterState {
    fn is_baselined(&self) -> bool {
        self.last_total_ticks != 0 && self.last_idle_ticks != 0
    }
}

/// Converts successive cumulative counter reads into a utilization percentage
/// over the window between them.
#[derive(Debug, Default)]
pub struct CpuUsageEstimator {
    state: CpuCounterState,
}

impl CpuUsageEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CpuCounterState {
        &self.state
    }

    /// Feed a new reading and return utilization since the previous one.
    ///
    /// The first reading only establishes a baseline and yields 0.0. Counter
    /// regressions (reboot, wrap) also yield 0.0; the baseline is replaced
    /// either way so the following call measures a clean window.
    pub fn estimate(&mut self, counters: CpuCounters) -> f64 {
        if !self.state.is_baselined() {
            self.store(counters);
            debug!(total = counters.total, idle = counters.idle, "cpu baseline established");
            return 0.0;
        }

        let total_delta = counters.total.checked_sub(self.state.last_total_ticks);
        let idle_delta = counters.idle.checked_sub(self.state.last_idle_ticks);
        let previous = (self.state.last_total_ticks, self.state.last_idle_ticks);
        self.store(counters);

        let (total_delta, idle_delta) = match (total_delta, idle_delta) {
            (Some(t), Some(i)) => (t, i),
            _ => {
                warn!(
                    last_total = previous.0,
                    last_idle = previous.1,
                    total = counters.total,
                    idle = counters.idle,
                    "cpu counters went backwards, resynchronizing"
                );
                return 0.0;
            }
        };

        if total_delta == 0 {
            return 0.0;
        }

        let busy = total_delta.saturating_sub(idle_delta);
        (100.0 * busy as f64 / total_delta as f64).clamp(0.0, 100.0)
    }

    fn store(&mut self, counters: CpuCounters) {
        self.state.last_total_ticks = counters.total;
        self.state.last_idle_ticks = counters.idle;
        self.state.last_read_time = Some(Instant::now());
    }
}
