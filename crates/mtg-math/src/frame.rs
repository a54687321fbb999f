//! Triads and rotation matrices.
//!
//! A triad is a 3x3 matrix whose columns are the axes of a local frame
//! (e.g. a nozzle's tangent, bitangent and normal). Rotation matrices
//! relate a triad to a reference frame, by default the world frame.

use crate::{Mat3, MathError, Result};

/// Rotation matrix giving the orientation of `triad` with respect to
/// `ref_frame` (world axes when `None`): `triadᵀ · (ref_frameᵀ)⁻¹`.
///
/// Fails with [`MathError::SingularFrame`] when the reference frame is not
/// invertible.
pub fn rotation_matrix(triad: &Mat3, ref_frame: Option<&Mat3>) -> Result<Mat3> {
    let reference = ref_frame.copied().unwrap_or_else(Mat3::identity);
    let inv = reference
        .transpose()
        .try_inverse()
        .ok_or(MathError::SingularFrame)?;
    Ok(triad.transpose() * inv)
}

/// Rotate `triad` about its normal by `angle_deg` degrees.
///
/// `rot_mat` is the rotation associated with the triad (usually from
/// [`rotation_matrix`]). The triad is first brought back to its
/// zero-rotation frame, rotated about Z by `-angle_deg` there, then put
/// back through `rot_mat`. Returns the transposed result, i.e. a triad with
/// axes as columns.
pub fn rotate_around_normal(triad: &Mat3, rot_mat: &Mat3, angle_deg: f64) -> Result<Mat3> {
    let rot_inv = rot_mat.try_inverse().ok_or(MathError::SingularFrame)?;
    let zero_frame = triad.transpose() * rot_inv;
    let rotated = rz((-angle_deg).to_radians()) * zero_frame;
    Ok((rot_mat * rotated).transpose())
}

/// Rotation about the X axis by `angle` radians.
pub fn rx(angle: f64) -> Mat3 {
    let (s, c) = angle.sin_cos();
    Mat3::new(
        1.0, 0.0, 0.0, //
        0.0, c, -s, //
        0.0, s, c,
    )
}

/// Rotation about the Y axis by `angle` radians.
pub fn ry(angle: f64) -> Mat3 {
    let (s, c) = angle.sin_cos();
    Mat3::new(
        c, 0.0, s, //
        0.0, 1.0, 0.0, //
        -s, 0.0, c,
    )
}

/// Rotation about the Z axis by `angle` radians.
pub fn rz(angle: f64) -> Mat3 {
    let (s, c) = angle.sin_cos();
    Mat3::new(
        c, -s, 0.0, //
        s, c, 0.0, //
        0.0, 0.0, 1.0,
    )
}
