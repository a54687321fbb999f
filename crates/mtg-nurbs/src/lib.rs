#![warn(missing_docs)]

//! B-spline fitting for scanned surfaces.
//!
//! Provides non-rational tensor-product B-spline surfaces, global
//! interpolation of a point grid, and a JSON exchange format for fitted
//! surfaces.
//!
//! # Key types
//!
//! - [`BSplineSurface`]: non-rational tensor-product B-spline surface
//! - [`FittedSurface`]: an interpolated surface with its evaluation delta
//!
//! # Algorithms
//!
//! - **Cox–de Boor recurrence** for the non-zero basis functions of a span
//! - **Global interpolation** with chord-length parameters and averaged knots

pub mod error;
pub mod exchange;
pub mod interpolate;

pub use error::{NurbsError, Result};
pub use exchange::{export_json, from_json_str, import_json, to_json_string};
pub use interpolate::interpolate_surface;

use mtg_math::{Point3, Vec3};

// =============================================================================
// Knot vector utilities
// =============================================================================

/// Check that `knots` suits `count` control points of `degree`: length
/// `count + degree + 1`, never decreasing.
fn validate_knots(
    knots: &[f64],
    count: usize,
    degree: usize,
    direction: &'static str,
) -> Result<()> {
    let expected = count + degree + 1;
    let reason = if knots.len() != expected {
        format!("{} knots for {count} points of degree {degree}, expected {expected}", knots.len())
    } else if let Some(i) = knots.windows(2).position(|w| w[1] < w[0]) {
        format!("knot {} decreases ({} after {})", i + 1, knots[i + 1], knots[i])
    } else {
        return Ok(());
    };
    Err(NurbsError::InvalidKnots { direction, reason })
}

/// The `degree + 1` basis functions that are non-zero at one parameter.
///
/// `weights[k]` belongs to control point `first + k`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Basis {
    pub(crate) first: usize,
    pub(crate) weights: Vec<f64>,
}

impl Basis {
    /// Basis at `t` over a clamped knot vector for `count` control points.
    ///
    /// `t` is clamped to the domain `[knots[degree], knots[count]]`; the
    /// domain end falls in the last non-empty span.
    pub(crate) fn at(knots: &[f64], count: usize, degree: usize, t: f64) -> Self {
        let t = t.clamp(knots[degree], knots[count]);
        let span = knots[..count]
            .partition_point(|&k| k <= t)
            .saturating_sub(1)
            .max(degree);

        // Cox–de Boor, raising the degree one step at a time
        let mut weights = vec![1.0];
        for p in 1..=degree {
            let mut raised = vec![0.0; p + 1];
            for (r, slot) in raised.iter_mut().enumerate() {
                let i = span + r - p;
                if r > 0 {
                    let width = knots[i + p] - knots[i];
                    if width > 0.0 {
                        *slot += (t - knots[i]) / width * weights[r - 1];
                    }
                }
                if r < p {
                    let width = knots[i + p + 1] - knots[i + 1];
                    if width > 0.0 {
                        *slot += (knots[i + p + 1] - t) / width * weights[r];
                    }
                }
            }
            weights = raised;
        }

        Self {
            first: span - degree,
            weights,
        }
    }
}

// =============================================================================
// B-spline surface
// =============================================================================

/// A non-rational tensor-product B-spline surface.
///
/// Control points are stored u-major, like the point grids they are
/// fitted to: `points[u_idx * n_v + v_idx]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BSplineSurface {
    /// Control points, u-major.
    pub control_points: Vec<Point3>,
    /// Number of control points in the u direction.
    pub n_u: usize,
    /// Number of control points in the v direction.
    pub n_v: usize,
    /// Knot vector in u. Length = n_u + degree_u + 1.
    pub knots_u: Vec<f64>,
    /// Knot vector in v. Length = n_v + degree_v + 1.
    pub knots_v: Vec<f64>,
    /// Polynomial degree in u.
    pub degree_u: usize,
    /// Polynomial degree in v.
    pub degree_v: usize,
}

impl BSplineSurface {
    /// Create a B-spline surface, checking sizes, degrees and knots.
    pub fn new(
        control_points: Vec<Point3>,
        n_u: usize,
        n_v: usize,
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
        degree_u: usize,
        degree_v: usize,
    ) -> Result<Self> {
        check_size(control_points.len(), n_u, n_v)?;
        check_degree("u", degree_u, n_u)?;
        check_degree("v", degree_v, n_v)?;
        validate_knots(&knots_u, n_u, degree_u, "u")?;
        validate_knots(&knots_v, n_v, degree_v, "v")?;
        Ok(Self {
            control_points,
            n_u,
            n_v,
            knots_u,
            knots_v,
            degree_u,
            degree_v,
        })
    }

    /// Evaluate the surface at `(u, v)`. Parameters outside the domain are
    /// clamped to it.
    ///
    /// Blends the affected rows of the control net along v first, then
    /// blends those partial points along u.
    pub fn eval(&self, u: f64, v: f64) -> Point3 {
        let bu = Basis::at(&self.knots_u, self.n_u, self.degree_u, u);
        let bv = Basis::at(&self.knots_v, self.n_v, self.degree_v, v);

        let mut point = Point3::origin();
        for (k, wu) in bu.weights.iter().enumerate() {
            let row = &self.control_points[(bu.first + k) * self.n_v..][..self.n_v];
            let partial = bv
                .weights
                .iter()
                .zip(&row[bv.first..])
                .fold(Vec3::zeros(), |acc, (wv, p)| acc + *wv * p.coords);
            point.coords += *wu * partial;
        }
        point
    }

    /// Parameter domain.
    pub fn parameter_domain(&self) -> ((f64, f64), (f64, f64)) {
        (
            (self.knots_u[self.degree_u], self.knots_u[self.n_u]),
            (self.knots_v[self.degree_v], self.knots_v[self.n_v]),
        )
    }
}

/// `actual` must equal `n_u * n_v`; an overflowing product never does.
pub(crate) fn check_size(actual: usize, n_u: usize, n_v: usize) -> Result<()> {
    if n_u.checked_mul(n_v) != Some(actual) {
        return Err(NurbsError::InvalidSize {
            expected: n_u.saturating_mul(n_v),
            actual,
        });
    }
    Ok(())
}

fn check_degree(direction: &'static str, degree: usize, size: usize) -> Result<()> {
    if degree == 0 || degree >= size {
        return Err(NurbsError::InvalidDegree {
            direction,
            degree,
            size,
        });
    }
    Ok(())
}

// =============================================================================
// Fitted surface
// =============================================================================

/// Smallest evaluation step accepted, about a million samples per surface.
pub const MIN_DELTA: f64 = 1e-3;

fn check_delta(delta: f64) -> Result<()> {
    if !(MIN_DELTA..1.0).contains(&delta) {
        return Err(NurbsError::InvalidDelta(delta));
    }
    Ok(())
}

/// A surface produced by interpolation, with the parametric step used to
/// sample it.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedSurface {
    /// The interpolating B-spline surface.
    pub surface: BSplineSurface,
    /// Evaluation step in normalized parameter space, in `[MIN_DELTA, 1)`.
    pub delta: f64,
}

impl FittedSurface {
    /// Attach an evaluation delta to `surface`.
    pub fn new(surface: BSplineSurface, delta: f64) -> Result<Self> {
        check_delta(delta)?;
        Ok(Self { surface, delta })
    }

    /// Samples per direction: `1/delta + 1`, with `delta` taken no finer
    /// than [`MIN_DELTA`].
    pub fn sample_size(&self) -> usize {
        (1.0 / self.delta.max(MIN_DELTA)).round() as usize + 1
    }

    /// Evaluate the surface on a regular `sample_size × sample_size`
    /// parameter grid, u-major.
    ///
    /// Fails with [`NurbsError::InvalidDelta`] if `delta` was set outside
    /// `[MIN_DELTA, 1)` after construction.
    pub fn evaluate_points(&self) -> Result<Vec<Point3>> {
        check_delta(self.delta)?;
        let n = self.sample_size();
        let ((u0, u1), (v0, v1)) = self.surface.parameter_domain();
        let step = |a: f64, b: f64, i: usize| a + (b - a) * i as f64 / (n - 1) as f64;

        let mut points = Vec::with_capacity(n * n);
        for i in 0..n {
            let u = step(u0, u1, i);
            for j in 0..n {
                points.push(self.surface.eval(u, step(v0, v1, j)));
            }
        }
        Ok(points)
    }
}
