//! Price Outlier Sampler
//!
//! Draws a random 30-row window from each CSV price file in a directory and
//! reports prices sitting more than two standard deviations above the
//! window mean.

pub mod config;
pub mod data;
pub mod detection;
pub mod error;
pub mod pipeline;
pub mod types;


pub use error::{OutlierError, Result};
pub use pipeline::{process_directory, process_directory_default, process_file};
