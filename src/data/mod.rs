//! Price data ingestion
//!
//! - CSV loading with header auto-detection
//! - Timestamp coercion
//! - Random contiguous window sampling

pub mod loader;
pub mod sampler;

pub use loader::{load_table, HeaderStrategy};
pub use sampler::{sample_table, sample_window, RandomSource, StdRandom};
