//! Random contiguous window sampling

use super::loader::load_table;
use crate::error::{OutlierError, Result};
use crate::types::{SampledWindow, Table, WindowRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use tracing::debug;

/// Source of uniformly distributed indices
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource {
    /// Pick an index in `0..upper`. Callers never pass zero.
    fn pick_index(&mut self, upper: usize) -> usize;
}

/// `StdRng`-backed random source
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic sequence for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StdRandom {
    fn pick_index(&mut self, upper: usize) -> usize {
        self.rng.random_range(0..upper)
    }
}

/// Load `path` and draw a window of `size` consecutive rows
pub fn sample_window(
    path: impl AsRef<Path>,
    size: usize,
    rng: &mut dyn RandomSource,
) -> Result<SampledWindow> {
    let table = load_table(path)?;
    sample_table(table, size, rng)
}

/// Draw a window of `size` consecutive rows from an already loaded table.
///
/// The last `size - 1` rows are never start candidates. The chosen start is
/// then shifted back by `size - 1` (floored at zero), so the realised window
/// ends at the chosen row rather than starting there.
pub fn sample_table(
    table: Table,
    size: usize,
    rng: &mut dyn RandomSource,
) -> Result<SampledWindow> {
    let rows = coerce_timestamps(table);

    if rows.iter().all(|row| row.timestamp.is_none()) {
        return Err(OutlierError::InvalidTimestamps);
    }

    let insufficient = OutlierError::InsufficientData {
        required: size,
        available: rows.len(),
    };
    if size == 0 {
        return Err(insufficient);
    }

    let candidates = rows.len().saturating_sub(size - 1);
    if candidates == 0 {
        return Err(insufficient);
    }

    let chosen = rng.pick_index(candidates);
    let start = chosen.saturating_sub(size - 1);
    debug!(chosen, start, candidates, "Sampling window");

    let window: Vec<WindowRecord> = rows.into_iter().skip(start).take(size).collect();
    if window.len() < size {
        return Err(insufficient);
    }

    Ok(SampledWindow { start, rows: window })
}

/// Parse every timestamp, leaving unparsable values as `None`
pub fn coerce_timestamps(table: Table) -> Vec<WindowRecord> {
    table
        .records
        .into_iter()
        .map(|record| WindowRecord {
            timestamp: record.timestamp.as_deref().and_then(parse_timestamp),
            name: record.name,
            price: record.price,
        })
        .collect()
}

/// Parse a timestamp in any of the common date/datetime layouts.
///
/// Ambiguous numeric dates are read month-first, falling back to day-first
/// only when the month-first reading is impossible. Values carrying an
/// offset are converted to UTC before the offset is dropped.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
        "%m-%d-%Y %H:%M:%S",
        "%m-%d-%Y %H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
        "%d-%m-%Y %H:%M:%S",
        "%d-%m-%Y %H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    const DATE_FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%m-%d-%Y",
        "%d/%m/%Y",
        "%d-%m-%Y",
        "%Y%m%d",
        "%d-%b-%Y",
        "%d %b %Y",
        "%b %d, %Y",
    ];
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
