//! Numeric parsing helpers shared by the /proc readers and the CLI.

use thiserror::Error;

/// Parse an unsigned integer with a deliberately narrow acceptance set.
///
/// Accepts an optional run of leading whitespace, one or more ASCII digits and
/// an optional run of trailing whitespace. Signs (including `+`) and any other
/// characters are rejected, as are values that overflow `u64`.
pub fn parse_u64_strict(s: &str) -> Option<u64> {
    let digits = s.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let digits = digits.trim_end_matches(|c: char| c.is_ascii_whitespace());

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse().ok()
}

/// Rejected value for the `--continuous` interval.
#[derive(Debug, Error, PartialEq)]
pub enum IntervalError {
    #[error("invalid interval value '{0}'")]
    NotANumber(String),
    #[error("interval must be positive, got {0}")]
    NotPositive(f64),
}

/// Parse a sampling interval in seconds. Any finite float greater than zero is
/// accepted; truncation to whole seconds happens in the runner.
pub fn parse_interval(s: &str) -> Result<f64, IntervalError> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| IntervalError::NotANumber(s.to_string()))?;

    if !value.is_finite() {
        return Err(IntervalError::NotANumber(s.to_string()));
    }
    if value <= 0.0 {
        return Err(IntervalError::NotPositive(value));
    }

    Ok(value)
}
