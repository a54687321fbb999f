#![warn(missing_docs)]

//! Mesh input for the multinozzle toolpath generator.
//!
//! Scanned surfaces reach the toolpath generator as STL files whose
//! vertices form a regular u×v grid (typically a plane shrink-wrapped over
//! the scan). This crate reads such files, extracts the unique vertex
//! cloud and restores its grid order.
//!
//! # Example
//!
//! ```ignore
//! use mtg_mesh::{read_stl, unique_vertices, PointGrid, DEDUP_DECIMALS};
//!
//! let mesh = read_stl("scan.stl")?;
//! let cloud = unique_vertices(&mesh, DEDUP_DECIMALS);
//! let grid = PointGrid::from_cloud(cloud, 20, 30)?;
//! println!("first row: {:?}", grid.row(0));
//! ```

pub mod error;
pub mod grid;
pub mod points;
pub mod stl;

pub use error::{MeshError, Result};
pub use grid::{sort_grid, PointGrid};
pub use points::{unique_vertices, DEDUP_DECIMALS};
pub use stl::{parse_stl, read_stl, to_binary_stl, write_stl};

use mtg_math::{Point3, Vec3};

/// A single facet of a triangle soup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Facet normal as stored in the file (may be zero).
    pub normal: Vec3,
    /// The three corners, in file order.
    pub vertices: [Point3; 3],
}

impl Triangle {
    /// Build a triangle and compute its normal from the winding.
    pub fn from_vertices(v0: Point3, v1: Point3, v2: Point3) -> Self {
        let n = (v1 - v0).cross(&(v2 - v0));
        let len = n.norm();
        let normal = if len > 1e-12 { n / len } else { Vec3::z() };
        Self {
            normal,
            vertices: [v0, v1, v2],
        }
    }
}

/// An unindexed triangle mesh, as stored in an STL file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleSoup {
    /// Title written into the binary STL header. Not recovered on read.
    pub name: Option<String>,
    /// Facets in file order.
    pub triangles: Vec<Triangle>,
}

impl TriangleSoup {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of facets.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the mesh has no facets.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// All triangle corners in file order, shared corners repeated.
    pub fn vertices(&self) -> impl Iterator<Item = &Point3> + '_ {
        self.triangles.iter().flat_map(|t| t.vertices.iter())
    }

    /// Axis-aligned bounds `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Point3, Point3)> {
        let mut iter = self.vertices();
        let first = *iter.next()?;
        let (mut min, mut max) = (first, first);
        for p in iter {
            min = min.inf(p);
            max = max.sup(p);
        }
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_quad() -> TriangleSoup {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(10.0, 0.0, 1.0);
        let c = Point3::new(10.0, 5.0, 2.0);
        let d = Point3::new(0.0, 5.0, 0.5);
        TriangleSoup {
            name: Some("quad".into()),
            triangles: vec![Triangle::from_vertices(a, b, c), Triangle::from_vertices(a, c, d)],
        }
    }

    #[test]
    fn test_vertices_repeat_shared_corners() {
        let mesh = make_quad();
        assert_eq!(mesh.len(), 2);
        assert_eq!(mesh.vertices().count(), 6);
    }

    #[test]
    fn test_bounds() {
        let (min, max) = make_quad().bounds().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(10.0, 5.0, 2.0));
        assert!(TriangleSoup::new().bounds().is_none());
    }

    #[test]
    fn test_normal_from_winding() {
        let t = Triangle::from_vertices(
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert!((t.normal - Vec3::z()).norm() < 1e-12);
    }
}
