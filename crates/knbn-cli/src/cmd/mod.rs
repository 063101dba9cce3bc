use anyhow::{anyhow, bail};

pub mod board;
pub mod column;
pub mod label;
pub mod migrate;
pub mod serve;
pub mod sprint;
pub mod task;

// ---------------------------------------------------------------------------
// Numeric argument validation
// ---------------------------------------------------------------------------

/// Task IDs are parsed signed so that `-1` reports "not found" rather than
/// "not a number".
pub fn parse_task_id(raw: &str) -> anyhow::Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| anyhow!("Task ID must be a number"))
}

pub fn parse_priority(raw: &str) -> anyhow::Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| anyhow!("Priority must be a number"))
}

pub fn parse_position(raw: &str) -> anyhow::Result<usize> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 0 => Ok(usize::try_from(n)?),
        _ => bail!("Position must be a non-negative number"),
    }
}

pub fn parse_capacity(raw: &str) -> anyhow::Result<u32> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 0 => Ok(u32::try_from(n)?),
        _ => bail!("Capacity must be a non-negative number"),
    }
}

pub(crate) const NO_UPDATES: &str = "No updates specified. Use --help to see available options.";
