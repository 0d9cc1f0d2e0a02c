//! Mean/standard-deviation outlier scoring

use crate::error::{OutlierError, Result};
use crate::types::{SampledWindow, ScoreResult, ScoredOutlier, WindowStats};

/// Default threshold multiple of the standard deviation
pub const DEFAULT_STD_DEV_MULTIPLIER: f64 = 2.0;

/// Flag rows of `window` whose price sits more than `multiplier` sample
/// standard deviations above the window mean.
///
/// Only the high side is tested. The reported deviation is relative to the
/// threshold, not the mean.
pub fn detect_outliers(window: &SampledWindow, multiplier: f64) -> Result<ScoreResult> {
    let has_missing = window
        .rows
        .iter()
        .any(|row| row.name.is_none() || row.timestamp.is_none() || row.price.is_none());
    if has_missing {
        return Err(OutlierError::MissingValues);
    }

    let prices = window_prices(window)?;
    let stats = window_stats(&prices, multiplier)?;

    let mut outliers = Vec::new();
    for (row, price) in window.rows.iter().zip(&prices) {
        let price_minus_mean = price - stats.mean;
        if price_minus_mean <= stats.threshold {
            continue;
        }
        // Both are present, checked above
        if let (Some(name), Some(timestamp)) = (&row.name, row.timestamp) {
            outliers.push(ScoredOutlier {
                name: name.clone(),
                timestamp,
                price: *price,
                price_minus_mean,
                deviation_pct: price_minus_mean / stats.threshold * 100.0,
                window_mean: stats.mean,
            });
        }
    }

    Ok(ScoreResult { stats, outliers })
}

/// Parse the price column of a window
pub fn window_prices(window: &SampledWindow) -> Result<Vec<f64>> {
    window
        .rows
        .iter()
        .map(|row| match &row.price {
            Some(raw) => parse_price(raw),
            None => Err(OutlierError::MissingValues),
        })
        .collect()
}

fn parse_price(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| OutlierError::NonNumericPrice {
            value: raw.to_string(),
        })
}

/// Mean, sample standard deviation and threshold of `prices`
pub fn window_stats(prices: &[f64], multiplier: f64) -> Result<WindowStats> {
    let mean = mean(prices);
    let std_dev = sample_std_dev(prices, mean);

    if !mean.is_finite() || !std_dev.is_finite() {
        return Err(OutlierError::DegenerateStatistics { mean, std_dev });
    }

    Ok(WindowStats {
        mean,
        std_dev,
        threshold: multiplier * std_dev,
    })
}

/// Arithmetic mean; NaN for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with an `n - 1` denominator; NaN below two values
pub fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}
