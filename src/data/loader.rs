//! CSV record loading
//!
//! Input files carry three columns (Name, Timestamp, Price). The header row is
//! optional: when the first row is exactly the canonical header it is
//! consumed, otherwise every row is data and columns are assigned by position.

use crate::error::{OutlierError, Result};
use crate::types::{Record, Table, CANONICAL_HEADER};
use csv::{ReaderBuilder, StringRecord};
use std::path::Path;
use tracing::debug;

/// Cell values read as missing
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// How the first row of a file is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStrategy {
    /// First row is the canonical header and is skipped
    HeaderPresent,
    /// Every row is data; columns are positional
    HeaderAbsent,
}

impl HeaderStrategy {
    /// Exact, order-sensitive comparison against the canonical header
    pub fn detect<'a, I>(first_row: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fields: Vec<&str> = first_row.into_iter().collect();
        if fields == CANONICAL_HEADER {
            HeaderStrategy::HeaderPresent
        } else {
            HeaderStrategy::HeaderAbsent
        }
    }
}

/// Load a price table, auto-detecting the header row
pub fn load_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(OutlierError::FileNotFound(path.to_path_buf()));
    }

    let strategy = match read_first_row(path)? {
        Some(row) => HeaderStrategy::detect(row.iter()),
        None => {
            debug!("{} has no rows", path.display());
            return Ok(Table::default());
        }
    };
    debug!("Reading {} with {:?}", path.display(), strategy);

    read_table(path, strategy)
}

fn read_first_row(path: &Path) -> Result<Option<StringRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(read_failure)?;

    reader.records().next().transpose().map_err(read_failure)
}

/// Read every record of `path` using the given header strategy
pub fn read_table(path: &Path, strategy: HeaderStrategy) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(strategy == HeaderStrategy::HeaderPresent)
        .flexible(true)
        .from_path(path)
        .map_err(read_failure)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(read_failure)?;
        records.push(to_record(&row)?);
    }

    Ok(Table::new(records))
}

fn to_record(row: &StringRecord) -> Result<Record> {
    if row.len() > CANONICAL_HEADER.len() {
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        return Err(OutlierError::ReadFailure(format!(
            "Expected {} fields in line {}, saw {}",
            CANONICAL_HEADER.len(),
            line,
            row.len()
        )));
    }

    Ok(Record {
        name: cell(row.get(0)),
        timestamp: cell(row.get(1)),
        price: cell(row.get(2)),
    })
}

fn cell(field: Option<&str>) -> Option<String> {
    field
        .filter(|value| !NA_TOKENS.contains(value))
        .map(str::to_string)
}

fn read_failure(err: csv::Error) -> OutlierError {
    OutlierError::ReadFailure(err.to_string())
}
