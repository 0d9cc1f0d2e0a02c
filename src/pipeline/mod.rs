//! File and directory orchestration
//!
//! Each file runs load -> sample -> score independently. A failure in one
//! file is logged and recorded in the batch summary; it never stops the rest
//! of the directory.


use crate::config::DetectionConfig;
use crate::data::{load_table, sample_window, RandomSource, StdRandom};
use crate::detection::{detect_outliers, mean, window_prices};
use crate::error::{OutlierError, Result};
use crate::types::{BatchSummary, FileOutcome, OutlierReportRow, SampledWindow, ScoredOutlier};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Process one file, logging and absorbing any failure
pub fn process_file(
    path: &Path,
    config: &DetectionConfig,
    rng: &mut dyn RandomSource,
) -> FileOutcome {
    match try_process_file(path, config, rng) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Error processing {}: {}", path.display(), e);
            FileOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

/// Process one file, returning the first error encountered
pub fn try_process_file(
    path: &Path,
    config: &DetectionConfig,
    rng: &mut dyn RandomSource,
) -> Result<FileOutcome> {
    debug!("Processing {}", path.display());

    if load_table(path)?.is_empty() {
        return Err(OutlierError::EmptyFile(path.to_path_buf()));
    }

    let window = sample_window(path, config.sample_size, rng)?;
    let scored = detect_outliers(&window, config.std_dev_multiplier)?;
    debug!(
        start = window.start,
        mean = scored.stats.mean,
        std_dev = scored.stats.std_dev,
        "Scored window of {}",
        path.display()
    );

    if scored.outliers.is_empty() {
        info!("No outliers found in {}", path.display());
        return Ok(FileOutcome::NoOutliers);
    }

    let rows = build_report(&window, &scored.outliers)?;
    let report = outlier_report_path(path, &config.output_suffix);
    write_report(&report, &rows)?;

    info!(
        count = rows.len(),
        report = %report.display(),
        "Outliers found in {}",
        path.display()
    );
    Ok(FileOutcome::Outliers {
        report,
        count: rows.len(),
    })
}

/// Turn scored outliers into report rows.
///
/// The mean is recomputed from the window, and `% Deviation` here is
/// relative to that mean rather than to the threshold.
pub fn build_report(
    window: &SampledWindow,
    outliers: &[ScoredOutlier],
) -> Result<Vec<OutlierReportRow>> {
    let window_mean = mean(&window_prices(window)?);

    Ok(outliers
        .iter()
        .map(|outlier| {
            let price_minus_mean = outlier.price - window_mean;
            OutlierReportRow {
                name: outlier.name.clone(),
                timestamp: outlier.timestamp,
                actual_price: outlier.price,
                window_mean,
                price_minus_mean,
                deviation_pct: price_minus_mean / window_mean * 100.0,
            }
        })
        .collect())
}

/// Write report rows as CSV, header included
pub fn write_report(path: &Path, rows: &[OutlierReportRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// `dir/prices.csv` -> `dir/prices<suffix>.csv`
pub fn outlier_report_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };
    path.with_file_name(file_name)
}

/// Files in `dir` ending with `.{extension}`, in listing order
pub fn eligible_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let suffix = format!(".{}", extension);
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(&suffix) {
            files.push(entry.path());
        }
    }

    Ok(files)
}

/// Process every eligible file of `dir`.
///
/// Fails before touching any file when the directory is missing or holds
/// the wrong number of eligible files. Per-file failures only show up in the
/// returned summary.
pub fn process_directory(
    dir: &Path,
    config: &DetectionConfig,
    rng: &mut dyn RandomSource,
) -> Result<BatchSummary> {
    if !dir.is_dir() {
        return Err(OutlierError::DirectoryNotFound(dir.to_path_buf()));
    }

    let files = eligible_files(dir, config.extension())?;
    let count = files.len();
    if count < config.min_files || count > config.max_files {
        return Err(OutlierError::InvalidFileCount {
            count,
            min: config.min_files,
            max: config.max_files,
        });
    }

    let summary = files
        .iter()
        .map(|file| process_file(file, config, rng))
        .fold(BatchSummary::default(), |mut summary, outcome| {
            summary.record(&outcome);
            summary
        });

    info!(
        processed = summary.processed,
        with_outliers = summary.with_outliers,
        clean = summary.clean,
        failed = summary.failed,
        "Finished {}",
        dir.display()
    );
    Ok(summary)
}

/// Run a directory with default settings and an entropy-seeded source
pub fn process_directory_default(dir: impl AsRef<Path>) -> Result<BatchSummary> {
    let mut rng = StdRandom::from_entropy();
    process_directory(dir.as_ref(), &DetectionConfig::default(), &mut rng)
}
