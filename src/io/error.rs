//! Error types for stencil placement and its surrounding file operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all stencil operations
#[derive(Debug)]
pub enum StencilError {
    /// Failed to load a target image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Two rasters that must share extents do not
    ///
    /// Raised by the error metrics and when a search is built over a canvas
    /// that does not match its target. Not recoverable.
    DimensionMismatch {
        /// Operation that required equal extents
        operation: &'static str,
        /// Expected (rows, cols)
        expected: (usize, usize),
        /// Provided (rows, cols)
        actual: (usize, usize),
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// A placement history file could not be parsed
    HistoryParse {
        /// 1-based line number of the offending row
        line: usize,
        /// Description of what was wrong with the row
        reason: String,
    },

    /// Failed to save an image or animation to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for StencilError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::DimensionMismatch {
                operation,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Dimension mismatch in {operation}: expected {}x{}, got {}x{}",
                    expected.0, expected.1, actual.0, actual.1
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::HistoryParse { line, reason } => {
                write!(f, "Malformed placement history at line {line}: {reason}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for StencilError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for stencil results
pub type Result<T> = std::result::Result<T, StencilError>;

impl From<std::io::Error> for StencilError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> StencilError {
    StencilError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a dimension mismatch error from two (rows, cols) shapes
pub const fn dimension_mismatch(
    operation: &'static str,
    expected: (usize, usize),
    actual: (usize, usize),
) -> StencilError {
    StencilError::DimensionMismatch {
        operation,
        expected,
        actual,
    }
}

/// Fail with [`StencilError::DimensionMismatch`] unless both shapes agree
///
/// # Errors
///
/// Returns an error if `expected` and `actual` differ
pub fn ensure_same_shape(
    operation: &'static str,
    expected: (usize, usize),
    actual: (usize, usize),
) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(dimension_mismatch(operation, expected, actual))
    }
}
