//! One-shot system sampling.

use crate::metrics::{CpuUsageEstimator, MetricsReader};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Host metrics captured at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub hostname: String,
    /// Hours since boot
    pub uptime_hours: f64,
    /// CPU utilization since the previous sample (0.0 without a baseline)
    pub cpu_usage_percent: f64,
    /// Share of memory not available, 0.0 when total is unknown
    pub memory_usage_percent: f64,
    pub total_memory_kb: u64,
    pub free_memory_kb: u64,
    pub available_memory_kb: u64,
}

impl SystemSnapshot {
    pub fn used_memory_kb(&self) -> u64 {
        self.total_memory_kb.saturating_sub(self.available_memory_kb)
    }
}

/// Produces snapshots from a reader and the CPU baseline it owns.
///
/// Sampling needs `&mut self` because each CPU estimate replaces the
/// baseline; share a sampler across threads only behind a `Mutex`.
#[derive(Debug)]
pub struct SystemSampler {
    reader: MetricsReader,
    cpu: CpuUsageEstimator,
}

impl SystemSampler {
    /// Sampler whose CPU baseline is taken immediately, so the first
    /// `sample()` reports usage over the time since construction.
    pub fn new(reader: MetricsReader) -> Self {
        let mut sampler = Self::unprimed(reader);
        let counters = sampler.reader.read_cpu_counters();
        sampler.cpu.estimate(counters);
        sampler
    }

    /// Sampler with no CPU baseline; the first `sample()` reports 0.0 CPU.
    pub fn unprimed(reader: MetricsReader) -> Self {
        Self {
            reader,
            cpu: CpuUsageEstimator::new(),
        }
    }

    pub fn sample(&mut self) -> SystemSnapshot {
        let hostname = self.reader.read_hostname();
        let uptime_hours = self.reader.read_uptime_hours();
        let cpu_usage_percent = self.cpu.estimate(self.reader.read_cpu_counters());
        let memory = self.reader.read_memory_counters();

        let snapshot = SystemSnapshot {
            hostname,
            uptime_hours,
            cpu_usage_percent,
            memory_usage_percent: memory.usage_percent(),
            total_memory_kb: memory.total_kb,
            free_memory_kb: memory.free_kb,
            available_memory_kb: memory.available_kb,
        };
        debug!(
            cpu = snapshot.cpu_usage_percent,
            memory = snapshot.memory_usage_percent,
            "sampled system"
        );
        snapshot
    }
}
