//! Metrics collection from the kernel's /proc interface.

pub mod cpu;
pub mod memory;
pub mod reader;
pub mod root;

pub use cpu::CpuUsageEstimator;
pub use reader::MetricsReader;
pub use root::ProcRoot;
