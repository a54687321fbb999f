//! Error types for B-spline construction, interpolation and exchange.

use thiserror::Error;

/// Errors that can occur while building, fitting or (de)serializing a surface.
#[derive(Error, Debug)]
pub enum NurbsError {
    /// Degree is zero or not below the number of points in that direction.
    #[error("invalid degree {degree} in {direction}: needs 1 <= degree < {size}")]
    InvalidDegree {
        /// `"u"` or `"v"`.
        direction: &'static str,
        /// Requested degree.
        degree: usize,
        /// Number of points in that direction.
        size: usize,
    },

    /// Point or control point count does not match the declared sizes.
    #[error("expected {expected} points, found {actual}")]
    InvalidSize {
        /// `size_u * size_v`.
        expected: usize,
        /// Points provided.
        actual: usize,
    },

    /// Knot vector has the wrong length or decreases.
    #[error("invalid {direction} knot vector: {reason}")]
    InvalidKnots {
        /// `"u"` or `"v"`.
        direction: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Every row (or column) has coincident consecutive points, so no
    /// chord-length parameters exist.
    #[error("cannot parametrize {direction}: all point rows have zero length")]
    DegenerateParameters {
        /// `"u"` or `"v"`.
        direction: &'static str,
    },

    /// The interpolation system has no unique solution.
    #[error("interpolation system in {direction} is singular")]
    SingularSystem {
        /// `"u"` or `"v"`.
        direction: &'static str,
    },

    /// Evaluation delta outside `[MIN_DELTA, 1)`.
    ///
    /// [`MIN_DELTA`]: crate::MIN_DELTA
    #[error("evaluation delta must be in [{min}, 1), got {0}", min = crate::MIN_DELTA)]
    InvalidDelta(f64),

    /// Exchange document is well-formed JSON but not a usable surface.
    #[error("invalid exchange document: {0}")]
    InvalidExchange(String),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for B-spline operations.
pub type Result<T> = std::result::Result<T, NurbsError>;
