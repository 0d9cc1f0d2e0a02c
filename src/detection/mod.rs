//! Outlier detection over sampled price windows

mod scorer;

#[cfg(test)]
mod tests;

pub use scorer::{
    detect_outliers, mean, sample_std_dev, window_prices, window_stats,
    DEFAULT_STD_DEV_MULTIPLIER,
};
