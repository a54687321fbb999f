//! Global B-spline interpolation.
//!
//! Surfaces pass exactly through their data points at
//! chord-length parameters, with knots placed by averaging (Piegl & Tiller,
//! *The NURBS Book*, §9.2). A surface is fitted by interpolating every
//! column of the grid along u, then every row of the resulting net along v.

use mtg_math::Point3;
use nalgebra::DMatrix;
use tracing::debug;

use crate::error::{NurbsError, Result};
use crate::{check_degree, check_size, Basis, BSplineSurface};

/// Chord-length parameters of a polyline, normalized to `[0, 1]`.
///
/// Returns `None` when the polyline has zero total length.
pub fn chord_length_params(points: &[Point3]) -> Option<Vec<f64>> {
    let chords: Vec<f64> = points.windows(2).map(|w| (w[1] - w[0]).norm()).collect();
    let total: f64 = chords.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return None;
    }

    let mut params = Vec::with_capacity(points.len());
    let mut acc = 0.0;
    params.push(0.0);
    for c in &chords {
        acc += c;
        params.push(acc / total);
    }
    if let Some(last) = params.last_mut() {
        *last = 1.0;
    }
    Some(params)
}

/// Clamped knot vector for `params` by the averaging technique.
pub fn averaged_knots(degree: usize, params: &[f64]) -> Vec<f64> {
    let n = params.len();
    let mut knots = vec![0.0; degree + 1];
    for i in 0..n.saturating_sub(degree + 1) {
        let sum: f64 = params[i + 1..=i + degree].iter().sum();
        knots.push(sum / degree as f64);
    }
    knots.extend(std::iter::repeat(1.0).take(degree + 1));
    knots
}

/// Average the chord-length parameters of several polylines.
///
/// Polylines of zero length carry no information and are skipped.
fn averaged_params(
    lines: impl Iterator<Item = Vec<Point3>>,
    len: usize,
    direction: &'static str,
) -> Result<Vec<f64>> {
    let mut sum = vec![0.0; len];
    let mut used = 0usize;
    for line in lines {
        if let Some(params) = chord_length_params(&line) {
            for (s, p) in sum.iter_mut().zip(&params) {
                *s += p;
            }
            used += 1;
        }
    }
    if used == 0 {
        return Err(NurbsError::DegenerateParameters { direction });
    }
    Ok(sum.into_iter().map(|s| s / used as f64).collect())
}

/// Solve for the control points of the curve of `degree` over `knots`
/// that passes through `points` at `params`.
fn solve_control_points(
    degree: usize,
    knots: &[f64],
    params: &[f64],
    points: &[Point3],
    direction: &'static str,
) -> Result<Vec<Point3>> {
    let n = points.len();
    let mut a = DMatrix::<f64>::zeros(n, n);
    for (row, &t) in params.iter().enumerate() {
        let basis = Basis::at(knots, n, degree, t);
        for (j, b) in basis.weights.into_iter().enumerate() {
            a[(row, basis.first + j)] = b;
        }
    }

    let rhs = DMatrix::from_fn(n, 3, |r, c| points[r][c]);
    let solution = a
        .lu()
        .solve(&rhs)
        .ok_or(NurbsError::SingularSystem { direction })?;
    if solution.iter().any(|x| !x.is_finite()) {
        return Err(NurbsError::SingularSystem { direction });
    }

    Ok((0..n)
        .map(|r| Point3::new(solution[(r, 0)], solution[(r, 1)], solution[(r, 2)]))
        .collect())
}

/// Interpolate a B-spline surface through a u-major grid of points
/// (`points[u * size_v + v]`).
///
/// Parameters in each direction are the chord-length parameters averaged
/// over all rows (or columns); knots are placed by averaging.
pub fn interpolate_surface(
    points: &[Point3],
    size_u: usize,
    size_v: usize,
    degree_u: usize,
    degree_v: usize,
) -> Result<BSplineSurface> {
    check_size(points.len(), size_u, size_v)?;
    check_degree("u", degree_u, size_u)?;
    check_degree("v", degree_v, size_v)?;
    debug!(size_u, size_v, degree_u, degree_v, "interpolating surface");

    let column = |v: usize| -> Vec<Point3> { (0..size_u).map(|u| points[u * size_v + v]).collect() };
    let row = |u: usize| -> Vec<Point3> { points[u * size_v..(u + 1) * size_v].to_vec() };

    let params_u = averaged_params((0..size_v).map(column), size_u, "u")?;
    let params_v = averaged_params((0..size_u).map(row), size_v, "v")?;
    let knots_u = averaged_knots(degree_u, &params_u);
    let knots_v = averaged_knots(degree_v, &params_v);

    // Pass 1: along u, one column at a time
    let mut net = vec![Point3::origin(); points.len()];
    for v in 0..size_v {
        let ctrl = solve_control_points(degree_u, &knots_u, &params_u, &column(v), "u")?;
        for (u, p) in ctrl.into_iter().enumerate() {
            net[u * size_v + v] = p;
        }
    }

    // Pass 2: along v, one row of the intermediate net at a time
    let mut control_points = Vec::with_capacity(points.len());
    for u in 0..size_u {
        let row = &net[u * size_v..(u + 1) * size_v];
        control_points.extend(solve_control_points(
            degree_v, &knots_v, &params_v, row, "v",
        )?);
    }

    BSplineSurface::new(
        control_points,
        size_u,
        size_v,
        knots_u,
        knots_v,
        degree_u,
        degree_v,
    )
}
