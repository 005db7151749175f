//! Analysis of target and canvas rasters: scoring and candidate selection

/// Stamp center candidates derived from the darkening deficit
pub mod candidates;
/// Error metrics between rasters
pub mod metrics;
