//! Error types for mesh reading and grid construction.

use thiserror::Error;

/// Errors that can occur while reading a mesh or building a point grid.
#[derive(Error, Debug)]
pub enum MeshError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is neither a well-formed binary nor ASCII STL.
    #[error("invalid STL: {0}")]
    InvalidStl(String),

    /// Mesh has no triangles.
    #[error("mesh is empty")]
    EmptyMesh,

    /// The point cloud does not hold exactly `u_size * v_size` points.
    #[error("grid of {u_size}x{v_size} needs {expected} points, found {actual}")]
    GridSizeMismatch {
        /// Number of rows requested.
        u_size: usize,
        /// Number of columns requested.
        v_size: usize,
        /// `u_size * v_size`.
        expected: usize,
        /// Points actually available.
        actual: usize,
    },
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
