//! Tests for outlier scoring

use super::*;
use crate::error::OutlierError;
use crate::types::{SampledWindow, WindowRecord};
use chrono::NaiveDate;

fn window_of(prices: &[f64]) -> SampledWindow {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    SampledWindow {
        start: 0,
        rows: prices
            .iter()
            .enumerate()
            .map(|(i, p)| WindowRecord {
                name: Some(format!("row{}", i)),
                timestamp: Some(base + chrono::Duration::minutes(i as i64)),
                price: Some(p.to_string()),
            })
            .collect(),
    }
}

fn spike_window() -> SampledWindow {
    let mut prices = vec![100.0; 30];
    prices[12] = 1000.0;
    window_of(&prices)
}

#[test]
fn test_mean_and_sample_std_dev() {
    let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    let m = mean(&values);
    assert_eq!(m, 5.0);
    // Sample (n - 1) deviation, not population
    let sd = sample_std_dev(&values, m);
    assert!((sd - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
}

#[test]
fn test_single_spike_is_flagged() {
    let result = detect_outliers(&spike_window(), DEFAULT_STD_DEV_MULTIPLIER).unwrap();

    assert_eq!(result.stats.mean, 130.0);
    assert!((result.stats.std_dev - 27000f64.sqrt()).abs() < 1e-9);
    assert_eq!(result.outliers.len(), 1);

    let outlier = &result.outliers[0];
    assert_eq!(outlier.name, "row12");
    assert_eq!(outlier.price, 1000.0);
    assert_eq!(outlier.price_minus_mean, 870.0);
    assert_eq!(outlier.window_mean, 130.0);
    let expected_pct = 870.0 / result.stats.threshold * 100.0;
    assert!((outlier.deviation_pct - expected_pct).abs() < 1e-9);
}

#[test]
fn test_low_side_is_never_flagged() {
    let mut prices = vec![100.0; 30];
    prices[3] = -10000.0;
    let result = detect_outliers(&window_of(&prices), 2.0).unwrap();
    assert!(result.outliers.is_empty());
}

#[test]
fn test_zero_variance_has_no_outliers() {
    let result = detect_outliers(&window_of(&[42.5; 30]), 2.0).unwrap();
    assert_eq!(result.stats.std_dev, 0.0);
    assert_eq!(result.stats.threshold, 0.0);
    assert!(result.outliers.is_empty());
}

#[test]
fn test_flagging_matches_threshold() {
    let prices: Vec<f64> = (0..30)
        .map(|i| match i {
            5 => 180.0,
            17 => 400.0,
            _ => 100.0 + (i % 7) as f64,
        })
        .collect();
    let result = detect_outliers(&window_of(&prices), 2.0).unwrap();
    let limit = result.stats.mean + result.stats.threshold;

    let flagged: Vec<f64> = result.outliers.iter().map(|o| o.price).collect();
    for price in &prices {
        assert_eq!(flagged.contains(price), *price - result.stats.mean > result.stats.threshold);
        if *price <= limit {
            assert!(!flagged.contains(price));
        }
    }
    assert!(flagged.contains(&400.0));
}

#[test]
fn test_missing_field_rejected() {
    let mut window = spike_window();
    window.rows[4].timestamp = None;
    assert!(matches!(
        detect_outliers(&window, 2.0),
        Err(OutlierError::MissingValues)
    ));

    let mut window = spike_window();
    window.rows[0].name = None;
    assert!(matches!(
        detect_outliers(&window, 2.0),
        Err(OutlierError::MissingValues)
    ));
}

#[test]
fn test_non_numeric_price_rejected() {
    let mut window = spike_window();
    window.rows[7].price = Some("12.3.4".to_string());

    match detect_outliers(&window, 2.0) {
        Err(OutlierError::NonNumericPrice { value }) => assert_eq!(value, "12.3.4"),
        other => panic!("expected NonNumericPrice, got {:?}", other),
    }
}

#[test]
fn test_infinite_price_is_degenerate() {
    let mut prices = vec![1.0; 30];
    prices[0] = f64::INFINITY;
    assert!(matches!(
        detect_outliers(&window_of(&prices), 2.0),
        Err(OutlierError::DegenerateStatistics { .. })
    ));
}

#[test]
fn test_overflowing_sum_is_degenerate() {
    let prices = vec![f64::MAX; 30];
    assert!(matches!(
        detect_outliers(&window_of(&prices), 2.0),
        Err(OutlierError::DegenerateStatistics { .. })
    ));
}

#[test]
fn test_single_row_is_degenerate() {
    assert!(matches!(
        detect_outliers(&window_of(&[5.0]), 2.0),
        Err(OutlierError::DegenerateStatistics { .. })
    ));
}

#[test]
fn test_window_prices_tolerates_whitespace() {
    let mut window = window_of(&[1.0, 2.0]);
    window.rows[1].price = Some(" 2.5 ".to_string());
    assert_eq!(window_prices(&window).unwrap(), vec![1.0, 2.5]);
}
