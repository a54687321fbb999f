//! STL reading and writing.
//!
//! Reading goes through `stl_io`, which handles both the binary and the
//! ASCII flavour. Facets keep their file order and stored normals.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use mtg_math::{Point3, Vec3};
use tracing::debug;

use crate::error::{MeshError, Result};
use crate::{Triangle, TriangleSoup};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Read an STL file from disk.
pub fn read_stl(path: impl AsRef<Path>) -> Result<TriangleSoup> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let mesh = parse_stl(&bytes)?;
    debug!(
        path = %path.display(),
        triangles = mesh.len(),
        "read STL"
    );
    Ok(mesh)
}

/// Parse STL bytes in either flavour.
pub fn parse_stl(bytes: &[u8]) -> Result<TriangleSoup> {
    let mut cursor = Cursor::new(bytes);
    let reader = stl_io::create_stl_reader(&mut cursor).map_err(invalid)?;

    let mut triangles = Vec::new();
    for facet in reader {
        let facet = facet.map_err(invalid)?;
        let normal = Vec3::new(
            facet.normal[0] as f64,
            facet.normal[1] as f64,
            facet.normal[2] as f64,
        );
        let vertices = facet
            .vertices
            .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64));
        triangles.push(Triangle { normal, vertices });
    }

    Ok(TriangleSoup {
        name: None,
        triangles,
    })
}

// Everything read from memory is a format problem, never an I/O one
fn invalid(e: std::io::Error) -> MeshError {
    MeshError::InvalidStl(e.to_string())
}

/// Encode a mesh as binary STL bytes.
pub fn to_binary_stl(mesh: &TriangleSoup) -> Vec<u8> {
    let mut data = Vec::with_capacity(HEADER_LEN + 4 + mesh.len() * FACET_LEN);

    let mut header = [b' '; HEADER_LEN];
    let title = mesh.name.as_deref().unwrap_or("mtg STL export");
    let n = title.len().min(HEADER_LEN);
    header[..n].copy_from_slice(&title.as_bytes()[..n]);
    data.extend_from_slice(&header);
    data.extend_from_slice(&(mesh.len() as u32).to_le_bytes());

    for tri in &mesh.triangles {
        for c in tri.normal.iter() {
            data.extend_from_slice(&(*c as f32).to_le_bytes());
        }
        for v in &tri.vertices {
            for c in v.coords.iter() {
                data.extend_from_slice(&(*c as f32).to_le_bytes());
            }
        }
        // Attribute byte count
        data.extend_from_slice(&0u16.to_le_bytes());
    }

    data
}

/// Write a mesh to disk as binary STL.
pub fn write_stl(mesh: &TriangleSoup, path: impl AsRef<Path>) -> Result<()> {
    fs::write(path, to_binary_stl(mesh))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASCII_QUAD: &str = "solid scan patch
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1.5 0 0.25
      vertex 1.5 2 0.5
    endloop
  endfacet
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1.5 2 0.5
      vertex 0 2 0.25
    endloop
  endfacet
endsolid scan patch
";

    #[test]
    fn test_parse_ascii() {
        let mesh = parse_stl(ASCII_QUAD.as_bytes()).unwrap();
        assert_eq!(mesh.len(), 2);
        assert_eq!(mesh.triangles[0].normal, Vec3::z());
        assert_eq!(mesh.triangles[0].vertices[1], Point3::new(1.5, 0.0, 0.25));
        assert_eq!(mesh.triangles[1].vertices[2], Point3::new(0.0, 2.0, 0.25));
    }

    #[test]
    fn test_binary_matches_ascii() {
        let ascii = parse_stl(ASCII_QUAD.as_bytes()).unwrap();
        let bytes = to_binary_stl(&ascii);
        assert_eq!(bytes.len(), 84 + 2 * 50);

        let binary = parse_stl(&bytes).unwrap();
        assert_eq!(binary.triangles, ascii.triangles);
    }

    #[test]
    fn test_binary_header_starting_with_solid() {
        let mut mesh = parse_stl(ASCII_QUAD.as_bytes()).unwrap();
        mesh.name = Some("solid exported by a careless tool".into());
        let bytes = to_binary_stl(&mesh);
        assert!(bytes.starts_with(b"solid "));
        let back = parse_stl(&bytes).unwrap();
        assert_eq!(back.triangles, mesh.triangles);
    }

    #[test]
    fn test_truncated_facet_is_rejected() {
        let text = "solid t\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nendloop\nendfacet\nendsolid t\n";
        assert!(matches!(
            parse_stl(text.as_bytes()),
            Err(MeshError::InvalidStl(_))
        ));
    }

    #[test]
    fn test_bad_number_is_rejected() {
        let text = "solid t\nfacet normal 0 0 1\nouter loop\nvertex 0 zero 0\nvertex 1 0 0\nvertex 1 1 0\nendloop\nendfacet\nendsolid t\n";
        assert!(matches!(
            parse_stl(text.as_bytes()),
            Err(MeshError::InvalidStl(_))
        ));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            parse_stl(b"not a mesh at all"),
            Err(MeshError::InvalidStl(_))
        ));
        assert!(matches!(parse_stl(b""), Err(MeshError::InvalidStl(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_stl(dir.path().join("absent.stl")).unwrap_err();
        assert!(matches!(err, MeshError::Io(_)), "{err}");
    }

    #[test]
    fn test_read_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patch.stl");
        let mesh = parse_stl(ASCII_QUAD.as_bytes()).unwrap();
        write_stl(&mesh, &path).unwrap();
        let back = read_stl(&path).unwrap();
        assert_eq!(back.triangles, mesh.triangles);
    }
}
