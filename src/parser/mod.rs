//! Decoding of tast's on-disk results.

pub mod tast;
pub mod types;

pub use types::{ChartEntry, ResultsChart, TastRecord};
