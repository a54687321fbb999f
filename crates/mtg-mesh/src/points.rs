//! Vertex extraction from triangle soups.

use mtg_math::Point3;
use tracing::debug;

use crate::TriangleSoup;

/// Decimal places kept when merging vertices shared by adjacent facets.
///
/// STL stores `f32` coordinates, so the same grid vertex written by two
/// facets can differ in its last bits once widened to `f64`.
pub const DEDUP_DECIMALS: u32 = 2;

/// Round `x` to `decimals` decimal places.
///
/// Negative zero is folded into zero so it cannot survive deduplication
/// as a distinct vertex.
pub fn round_to(x: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (x * scale).round() / scale + 0.0
}

/// Unique vertices of `mesh` after rounding each coordinate to `decimals`
/// decimal places.
///
/// The result is sorted lexicographically by (x, y, z) and carries no
/// grid order; see [`crate::sort_grid`].
pub fn unique_vertices(mesh: &TriangleSoup, decimals: u32) -> Vec<Point3> {
    let mut points: Vec<Point3> = mesh
        .vertices()
        .map(|p| {
            Point3::new(
                round_to(p.x, decimals),
                round_to(p.y, decimals),
                round_to(p.z, decimals),
            )
        })
        .collect();
    let total = points.len();

    points.sort_by(|a, b| {
        a.x.total_cmp(&b.x)
            .then(a.y.total_cmp(&b.y))
            .then(a.z.total_cmp(&b.z))
    });
    points.dedup();

    debug!(
        corners = total,
        unique = points.len(),
        decimals,
        "extracted unique vertices"
    );
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Triangle;

    fn soup(tris: &[[[f64; 3]; 3]]) -> TriangleSoup {
        TriangleSoup {
            name: None,
            triangles: tris
                .iter()
                .map(|t| {
                    Triangle::from_vertices(
                        Point3::from(t[0]),
                        Point3::from(t[1]),
                        Point3::from(t[2]),
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(-0.005001, 2), -0.01);
        assert_eq!(round_to(7.0, 0), 7.0);
        assert!(round_to(-0.004, 2).is_sign_positive());
    }

    #[test]
    fn test_shared_corners_merge() {
        let mesh = soup(&[
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]],
            [[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
        ]);
        let pts = unique_vertices(&mesh, DEDUP_DECIMALS);
        assert_eq!(pts.len(), 4);
        // Lexicographic order
        assert_eq!(pts[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(pts[1], Point3::new(0.0, 1.0, 0.0));
        assert_eq!(pts[2], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(pts[3], Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_near_duplicates_merge_after_rounding() {
        let mesh = soup(&[
            [[0.0, 0.0, 0.1], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]],
            [[0.000_04, 0.0, 0.100_03], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
        ]);
        let pts = unique_vertices(&mesh, DEDUP_DECIMALS);
        assert_eq!(pts.len(), 4);
        assert_eq!(pts[0], Point3::new(0.0, 0.0, 0.1));
    }

    #[test]
    fn test_f32_widening_is_absorbed() {
        // 0.1 stored as f32 widens to 0.10000000149011612
        let z = 0.1f32 as f64;
        let mesh = soup(&[[[0.0, 0.0, z], [1.0, 0.0, 0.1], [1.0, 1.0, z]]]);
        let pts = unique_vertices(&mesh, DEDUP_DECIMALS);
        assert!(pts.iter().all(|p| p.z == 0.1));
    }
}
