//! Error types for the outlier pipeline

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutlierError {
    #[error("File '{}' not found.", .0.display())]
    FileNotFound(PathBuf),

    #[error("Error reading CSV file: {0}")]
    ReadFailure(String),

    #[error("All Timestamp values are invalid dates.")]
    InvalidTimestamps,

    #[error("Insufficient data points in the file: need {required}, found {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Data contains missing or invalid values.")]
    MissingValues,

    #[error("Unable to parse price '{value}' as a number")]
    NonNumericPrice { value: String },

    #[error("Infinite or undefined mean or standard deviation (mean: {mean}, std dev: {std_dev})")]
    DegenerateStatistics { mean: f64, std_dev: f64 },

    #[error("File '{}' is empty.", .0.display())]
    EmptyFile(PathBuf),

    #[error(
        "Invalid number of files in the directory: {count}. Expected {} files.",
        expected_files(.min, .max)
    )]
    InvalidFileCount { count: usize, min: usize, max: usize },

    #[error("Directory '{}' not found.", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for OutlierError {
    fn from(err: config::ConfigError) -> Self {
        OutlierError::Config(err.to_string())
    }
}

fn expected_files(min: &usize, max: &usize) -> String {
    if min == max {
        format!("exactly {}", min)
    } else if *max == min + 1 {
        format!("{} or {}", min, max)
    } else {
        format!("between {} and {}", min, max)
    }
}

pub type Result<T> = std::result::Result<T, OutlierError>;
