//! Mathematical utilities for the placement search and its metrics

/// Box filtering used by windowed similarity scores
pub mod filter;
/// Order statistics for candidate thresholds
pub mod percentile;
