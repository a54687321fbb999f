//! Triangle measures.

use crate::{MathError, Point3, Result, COLLINEAR_EPSILON};

/// Radius of the circle through the three points of `t`.
///
/// Computes the side lengths, the area by Heron's formula and returns
/// `abc / 4s`. Collinear or coincident points give
/// [`MathError::DegenerateTriangle`].
pub fn circumradius(t: &[Point3; 3]) -> Result<f64> {
    let mut sides = [
        (t[1] - t[0]).norm(),
        (t[2] - t[1]).norm(),
        (t[2] - t[0]).norm(),
    ];
    // Flatness is judged on the cross product relative to the longest side
    let twice_area = (t[1] - t[0]).cross(&(t[2] - t[0])).norm();
    sides.sort_by(|x, y| y.total_cmp(x));
    let [a, b, c] = sides;
    if twice_area <= COLLINEAR_EPSILON * a * a {
        return Err(MathError::DegenerateTriangle);
    }

    // Heron with the sides ordered a >= b >= c, parenthesized as given
    let heron = 0.25
        * ((a + (b + c)) * (c - (a - b)) * (c + (a - b)) * (a + (b - c)))
            .max(0.0)
            .sqrt();
    // Slivers round their sides so that Heron cancels to zero
    let area = if heron > 0.0 { heron } else { twice_area / 2.0 };
    Ok((a * b * c) / (4.0 * area))
}
