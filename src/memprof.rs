//! Memory and timing checkpoints, logged at debug level
//!
//! - Memory: Reads RSS (Resident Set Size) from /proc/self/status (0 elsewhere)
//! - Timing: Uses std::time::Instant

use std::fs;
use std::time::Instant;
use tracing::debug;

/// Get current RSS (Resident Set Size) in bytes from /proc/self/status
pub fn get_rss_bytes() -> u64 {
    let Ok(status) = fs::read_to_string("/proc/self/status") else {
        return 0;
    };
    status
        .lines()
        .find(|line| line.starts_with("VmRSS:"))
        .and_then(parse_vm_rss_kb)
        .map(|kb| kb * 1024)
        .unwrap_or(0)
}

/// Parse "VmRSS:    123456 kB" into kilobytes
fn parse_vm_rss_kb(line: &str) -> Option<u64> {
    line.split_whitespace().nth(1)?.parse().ok()
}

pub fn get_rss_mb() -> f64 {
    get_rss_bytes() as f64 / (1024.0 * 1024.0)
}

/// Log RSS with a label and return it for a later [`delta`]
pub fn checkpoint(label: &str) -> f64 {
    let rss = get_rss_mb();
    debug!("MEMPROF [{:.2} MB]: {}", rss, label);
    rss
}

/// Log RSS and its change since a previous checkpoint
pub fn delta(label: &str, previous: f64) -> f64 {
    let current = get_rss_mb();
    debug!(
        "MEMPROF [{:.2} MB] (delta: {:+.2} MB): {}",
        current,
        current - previous,
        label
    );
    current
}

/// Start a new timing checkpoint
pub fn time_start(label: &str) -> Instant {
    debug!("TIMEPROF: {} ...", label);
    Instant::now()
}

/// Log elapsed time since `start`
pub fn time_elapsed(label: &str, start: Instant) -> f64 {
    let secs = start.elapsed().as_secs_f64();
    debug!("TIMEPROF: {} [{:.3}s]", label, secs);
    secs
}
