//! Rendering of snapshots for the terminal.

use crate::sampler::SystemSnapshot;
use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::fmt::Write;

const HEADER: &str = "=== System Information ===";
const FOOTER: &str = "==========================";

/// Format fractional hours as `Xd Yh Zm`, omitting the day segment when zero.
pub fn format_uptime(hours: f64) -> String {
    let hours = if hours.is_finite() { hours.max(0.0) } else { 0.0 };
    let whole_hours = hours.trunc() as u64;
    let days = whole_hours / 24;
    let remaining_hours = whole_hours % 24;
    let minutes = (hours.fract() * 60.0).trunc() as u64;

    if days > 0 {
        format!("{}d {}h {}m", days, remaining_hours, minutes)
    } else {
        format!("{}h {}m", remaining_hours, minutes)
    }
}

pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Multi-line human readable report.
pub fn render_report(snapshot: &SystemSnapshot, generated_at: &DateTime<Local>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}", HEADER);
    let _ = writeln!(out, "Timestamp: {}", format_timestamp(generated_at));
    let _ = writeln!(out, "Hostname: {}", snapshot.hostname);
    let _ = writeln!(out, "Uptime: {}", format_uptime(snapshot.uptime_hours));
    let _ = writeln!(out, "CPU Usage: {:.1}%", snapshot.cpu_usage_percent);
    let _ = writeln!(
        out,
        "Memory Usage: {:.1}% ({}MB / {}MB)",
        snapshot.memory_usage_percent,
        snapshot.used_memory_kb() / 1024,
        snapshot.total_memory_kb / 1024
    );
    out.push_str(FOOTER);
    out
}

/// A snapshot with the time it was rendered, for JSON output
#[derive(Debug, Serialize)]
pub struct SnapshotRecord<'a> {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub snapshot: &'a SystemSnapshot,
}

/// Single-line JSON object, suitable for JSON Lines streams.
pub fn render_json(snapshot: &SystemSnapshot, timestamp: DateTime<Utc>) -> Result<String> {
    let record = SnapshotRecord { timestamp, snapshot };
    Ok(serde_json::to_string(&record)?)
}
