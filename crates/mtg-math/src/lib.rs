#![warn(missing_docs)]

//! Math helpers for the multinozzle toolpath generator.
//!
//! Thin wrappers around nalgebra providing the closed-form vector and
//! frame operations the toolpath driver needs: unit vectors, point
//! distances, projections, rotation matrices between nozzle triads and
//! circumradii of sampled arcs.
//!
//! Degenerate inputs are reported rather than propagated as NaN:
//! [`unit_vector`] and [`distance`] return `None` for a zero-length
//! direction, everything else returns a [`MathError`].

use nalgebra::{Matrix3, Vector3};
use thiserror::Error;

pub mod frame;
pub mod triangle;
pub mod vector;

pub use frame::{rotate_around_normal, rotation_matrix, rx, ry, rz};
pub use triangle::circumradius;
pub use vector::{distance, project_vector, unit_vector};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A 3x3 matrix: a triad (frame axes as columns) or a rotation.
pub type Mat3 = Matrix3<f64>;

/// Errors raised for inputs whose result is mathematically undefined.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// The vector has zero length.
    #[error("vector has zero length")]
    ZeroVector,

    /// The three points are collinear (or coincident) and span no area.
    #[error("triangle is degenerate (zero area)")]
    DegenerateTriangle,

    /// The frame or rotation matrix cannot be inverted.
    #[error("frame matrix is singular")]
    SingularFrame,
}

/// Result type for math operations.
pub type Result<T> = std::result::Result<T, MathError>;

/// Relative area below which three points count as collinear.
///
/// Only exact degeneracy is rejected; scanned surfaces routinely carry
/// features well below a micron.
pub const COLLINEAR_EPSILON: f64 = 1e-12;
