#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! Memory usage readings from `/proc/meminfo`

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{MemlogError, Result};

const MEMINFO_PATH: &str = "/proc/meminfo";

/// Meminfo fields relevant to the used-memory computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MeminfoField {
    MemTotal,
    MemFree,
}

/// Read current memory usage in megabytes as (total − free)
///
/// Both sides are truncated to integer megabytes before the subtraction,
/// matching the unit discipline of the harnesses consuming the log.
///
/// # Errors
///
/// Returns error if `/proc/meminfo` cannot be read or either field is
/// missing or malformed.
pub fn used_memory_mb() -> Result<f64> {
    read_from_path(Path::new(MEMINFO_PATH))
}

/// Read used memory from a meminfo-format file (testable)
pub(crate) fn read_from_path(path: &Path) -> Result<f64> {
    let file = File::open(path).map_err(|e| {
        MemlogError::MemoryReadFailed(format!("failed to open {}: {e}", path.display()))
    })?;

    let reader = BufReader::new(file);

    let mut total_kb: Option<u64> = None;
    let mut free_kb: Option<u64> = None;

    for line_result in reader.lines() {
        let line = line_result
            .map_err(|e| MemlogError::MemoryReadFailed(format!("failed to read line: {e}")))?;

        match parse_meminfo_line(&line)? {
            Some((MeminfoField::MemTotal, value)) => total_kb = Some(value),
            Some((MeminfoField::MemFree, value)) => free_kb = Some(value),
            None => {}
        }

        if total_kb.is_some() && free_kb.is_some() {
            break;
        }
    }

    let total_kb =
        total_kb.ok_or_else(|| MemlogError::MemoryParseFailed("MemTotal not found".to_string()))?;
    let free_kb =
        free_kb.ok_or_else(|| MemlogError::MemoryParseFailed("MemFree not found".to_string()))?;

    // Integer-MB precision on each side before the subtraction
    let total_mb = total_kb / 1024;
    let free_mb = free_kb / 1024;

    #[allow(clippy::cast_precision_loss)] // physical memory sizes fit f64 exactly
    let used_mb = total_mb.saturating_sub(free_mb) as f64;
    Ok(used_mb)
}

/// Parse a single meminfo line into a field and its kB value
/// Format: "`FieldName`:    12345 kB"
///
/// Returns None if the line is not a recognized field
/// Returns error if parsing fails
fn parse_meminfo_line(line: &str) -> Result<Option<(MeminfoField, u64)>> {
    let Some(field) = (if line.starts_with("MemTotal:") {
        Some(MeminfoField::MemTotal)
    } else if line.starts_with("MemFree:") {
        Some(MeminfoField::MemFree)
    } else {
        None
    }) else {
        return Ok(None);
    };

    let value = line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| MemlogError::MemoryParseFailed(format!("missing value in line: {line}")))?
        .parse::<u64>()
        .map_err(|e| {
            MemlogError::MemoryParseFailed(format!("failed to parse value in '{line}': {e}"))
        })?;

    Ok(Some((field, value)))
}
