//! Core data types

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::path::PathBuf;

/// Canonical column names of an input file, in positional order
pub const CANONICAL_HEADER: [&str; 3] = ["Name", "Timestamp", "Price"];

/// A raw price record as read from disk.
///
/// `None` marks a missing cell (absent, empty, or an NA token).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    pub name: Option<String>,
    pub timestamp: Option<String>,
    pub price: Option<String>,
}

/// Records of one file in file order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub records: Vec<Record>,
}

impl Table {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A record whose timestamp has been coerced to a datetime
#[derive(Debug, Clone, PartialEq)]
pub struct WindowRecord {
    pub name: Option<String>,
    pub timestamp: Option<NaiveDateTime>,
    pub price: Option<String>,
}

/// Contiguous run of records drawn from a table
#[derive(Debug, Clone, PartialEq)]
pub struct SampledWindow {
    /// Index of the first row in the source table
    pub start: usize,
    pub rows: Vec<WindowRecord>,
}

impl SampledWindow {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Summary statistics of a window's prices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub std_dev: f64,
    pub threshold: f64,
}

/// A row flagged by the scorer
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredOutlier {
    pub name: String,
    pub timestamp: NaiveDateTime,
    pub price: f64,
    pub price_minus_mean: f64,
    /// Deviation as a percentage of the threshold
    pub deviation_pct: f64,
    pub window_mean: f64,
}

/// Scorer output for one window
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub stats: WindowStats,
    pub outliers: Vec<ScoredOutlier>,
}

/// One line of the outlier report file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierReportRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Timestamp", serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "Actual Price")]
    pub actual_price: f64,
    #[serde(rename = "Mean of 30 Selected Datapoints")]
    pub window_mean: f64,
    #[serde(rename = "Price-Mean")]
    pub price_minus_mean: f64,
    /// Deviation as a percentage of the window mean
    #[serde(rename = "% Deviation")]
    pub deviation_pct: f64,
}

fn serialize_timestamp<S: Serializer>(
    ts: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&ts.format("%Y-%m-%d %H:%M:%S%.f"))
}

/// Result of processing a single file
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Report written to `report`
    Outliers { report: PathBuf, count: usize },
    NoOutliers,
    /// Processing failed; the error has already been logged
    Failed { reason: String },
}

/// Aggregate of a directory run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub with_outliers: usize,
    pub clean: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &FileOutcome) {
        self.processed += 1;
        match outcome {
            FileOutcome::Outliers { .. } => self.with_outliers += 1,
            FileOutcome::NoOutliers => self.clean += 1,
            FileOutcome::Failed { .. } => self.failed += 1,
        }
    }
}
