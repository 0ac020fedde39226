//! Memory counters from /proc/meminfo.

use crate::parse::parse_u64_strict;

/// Memory counters in kilobytes, as reported by the kernel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryCounters {
    pub total_kb: u64,
    pub free_kb: u64,
    pub available_kb: u64,
}

impl MemoryCounters {
    /// Share of memory not available to new workloads.
    pub fn usage_percent(&self) -> f64 {
        if self.total_kb == 0 {
            return 0.0;
        }
        let used = self.total_kb.saturating_sub(self.available_kb);
        100.0 * used as f64 / self.total_kb as f64
    }
}

/// Parse `KEY: VALUE [unit]` records. Unrecognized keys are skipped and keys
/// that never appear stay at zero.
pub fn parse_meminfo(meminfo: &str) -> MemoryCounters {
    let mut counters = MemoryCounters::default();

    for line in meminfo.lines() {
        let mut parts = line.split_whitespace();
        let Some(key) = parts.next() else {
            continue;
        };
        let key = key.strip_suffix(':').unwrap_or(key);

        let slot = match key {
            "MemTotal" => &mut counters.total_kb,
            "MemFree" => &mut counters.free_kb,
            "MemAvailable" => &mut counters.available_kb,
            _ => continue,
        };

        if let Some(value) = parts.find_map(parse_u64_strict) {
            *slot = value;
        }
    }

    counters
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MEMINFO: &str = "\
MemTotal:        8000000 kB
MemFree:         1500000 kB
MemAvailable:    4000000 kB
Buffers:          200000 kB
Cached:          2100000 kB
HugePages_Total:       0
";

    #[test]
    fn extracts_named_keys() {
        let mem = parse_meminfo(MEMINFO);
        assert_eq!(
            mem,
            MemoryCounters {
                total_kb: 8_000_000,
                free_kb: 1_500_000,
                available_kb: 4_000_000,
            }
        );
        assert_eq!(mem.usage_percent(), 50.0);
    }

    #[test]
    fn missing_keys_yield_zero() {
        let mem = parse_meminfo("MemTotal: 2048 kB\nSwapTotal: 10 kB\n");
        assert_eq!(mem.total_kb, 2048);
        assert_eq!(mem.free_kb, 0);
        assert_eq!(mem.available_kb, 0);
        assert_eq!(mem.usage_percent(), 100.0);
    }

    #[test]
    fn malformed_values_leave_field_at_zero() {
        let mem = parse_meminfo("MemTotal: lots kB\nMemFree: -5 kB\nMemAvailable: 12 kB\n");
        assert_eq!(mem.total_kb, 0);
        assert_eq!(mem.free_kb, 0);
        assert_eq!(mem.available_kb, 12);
    }

    #[test]
    fn empty_input_reports_zero_usage() {
        let mem = parse_meminfo("");
        assert_eq!(mem, MemoryCounters::default());
        assert_eq!(mem.usage_percent(), 0.0);
    }

    proptest! {
        #[test]
        fn usage_matches_formula(total in 0u64..1 << 50, available in 0u64..1 << 50) {
            let available = available.min(total);
            let mem = MemoryCounters { total_kb: total, free_kb: 0, available_kb: available };
            let expected = if total > 0 {
                100.0 * (total - available) as f64 / total as f64
            } else {
                0.0
            };
            prop_assert_eq!(mem.usage_percent(), expected);
        }
    }
}
