//! Vector helpers: normalization, point-to-point distance, projection.

use crate::{MathError, Point3, Result, Vec3};

/// Unit vector along `v`, or `None` when `v` has zero length.
pub fn unit_vector(v: &Vec3) -> Option<Vec3> {
    let norm = v.norm();
    if norm == 0.0 {
        None
    } else {
        Some(v / norm)
    }
}

/// Euclidean distance from `p1` to `p2` and the direction vector `p2 - p1`.
///
/// With `normalize` set the direction is replaced by its unit form, which
/// is `None` when the two points coincide. Without it the direction is
/// always `Some`.
pub fn distance(p1: &Point3, p2: &Point3, normalize: bool) -> (f64, Option<Vec3>) {
    let dir = p2 - p1;
    let dist = dir.norm();
    if normalize {
        (dist, unit_vector(&dir))
    } else {
        (dist, Some(dir))
    }
}

/// Projection of `u` onto `v`: `(u·v / ‖v‖²) v`.
///
/// Fails with [`MathError::ZeroVector`] when `v` has zero length.
pub fn project_vector(u: &Vec3, v: &Vec3) -> Result<Vec3> {
    let norm_sq = v.norm_squared();
    if norm_sq == 0.0 {
        return Err(MathError::ZeroVector);
    }
    Ok(v * (u.dot(v) / norm_sq))
}
