//! Restoring u×v grid order in an unordered vertex cloud.
//!
//! A scanned patch exported as STL loses the topology of its vertex grid.
//! As long as the grid rows run roughly along the Y axis and are spread
//! along X, row-major order is recovered by two sorts: by x over the whole
//! cloud, which groups rows, then by y within each row.

use std::cmp::Ordering;

use mtg_math::Point3;

use crate::error::{MeshError, Result};

/// Sort `points` into row-major `u × v` grid order.
///
/// 1. stable sort of the whole cloud by ascending x;
/// 2. split into `u` consecutive chunks of `v` points;
/// 3. stable sort of each chunk by ascending y;
/// 4. concatenate the chunks.
///
/// Points sharing an x value keep their input order, so two rows that
/// overlap in x can trade points. The length is not checked: a short
/// cloud yields short trailing rows and points past `u * v` are dropped.
/// Use [`PointGrid::from_cloud`] for a checked grid.
pub fn sort_grid(points: &[Point3], u: usize, v: usize) -> Vec<Point3> {
    let mut by_x = points.to_vec();
    by_x.sort_by(|a, b| a.x.total_cmp(&b.x));
    if v == 0 {
        return Vec::new();
    }
    by_x.truncate(u.saturating_mul(v));

    let mut grid = Vec::with_capacity(by_x.len());
    for chunk in by_x.chunks(v) {
        let mut row = chunk.to_vec();
        row.sort_by(by_y);
        grid.extend(row);
    }
    grid
}

fn by_y(a: &Point3, b: &Point3) -> Ordering {
    a.y.total_cmp(&b.y)
}

/// A row-major grid of points: `points[u * v_size + v]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PointGrid {
    /// Points in row-major order.
    pub points: Vec<Point3>,
    /// Number of rows (u direction).
    pub u_size: usize,
    /// Number of points per row (v direction).
    pub v_size: usize,
}

impl PointGrid {
    /// Sort an unordered cloud into a `u_size × v_size` grid.
    ///
    /// Fails with [`MeshError::GridSizeMismatch`] unless the cloud holds
    /// exactly `u_size * v_size` points. A product past `usize::MAX` is
    /// reported saturated.
    pub fn from_cloud(points: Vec<Point3>, u_size: usize, v_size: usize) -> Result<Self> {
        let expected = u_size.checked_mul(v_size);
        if expected.map_or(true, |n| n == 0 || n != points.len()) {
            return Err(MeshError::GridSizeMismatch {
                u_size,
                v_size,
                expected: u_size.saturating_mul(v_size),
                actual: points.len(),
            });
        }
        Ok(Self {
            points: sort_grid(&points, u_size, v_size),
            u_size,
            v_size,
        })
    }

    /// Point at row `u`, column `v`.
    pub fn get(&self, u: usize, v: usize) -> Option<&Point3> {
        if u >= self.u_size || v >= self.v_size {
            return None;
        }
        self.points.get(u.checked_mul(self.v_size)?.checked_add(v)?)
    }

    /// Row `u` (constant u, varying v), or `None` past the last row.
    pub fn row(&self, u: usize) -> Option<&[Point3]> {
        if u >= self.u_size || self.v_size == 0 {
            return None;
        }
        self.points.chunks(self.v_size).nth(u)
    }

    /// Column `v` (constant v, varying u), or `None` past the last column.
    pub fn column(&self, v: usize) -> Option<Vec<Point3>> {
        if v >= self.v_size {
            return None;
        }
        self.points
            .chunks(self.v_size)
            .map(|row| row.get(v).copied())
            .collect()
    }
}
