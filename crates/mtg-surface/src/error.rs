//! Error types for surface fitting.

use mtg_mesh::MeshError;
use mtg_nurbs::NurbsError;
use thiserror::Error;

/// Errors that can occur while fitting a surface to a mesh.
#[derive(Error, Debug)]
pub enum FitError {
    /// Bad input file or fitting options.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Reading the mesh or building the point grid failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Interpolation or surface export failed.
    #[error(transparent)]
    Nurbs(#[from] NurbsError),

    /// Writing a preview image failed.
    #[error("render failed: {0}")]
    Render(#[from] image::ImageError),
}

/// Result type for surface fitting.
pub type Result<T> = std::result::Result<T, FitError>;
