//! JSON exchange format for fitted surfaces.
//!
//! The layout follows the common NURBS exchange schema used by the fitting
//! tools the toolpath generator grew up with, so existing surface files
//! can be read back and new ones opened by those tools:
//!
//! ```json
//! {"shape": {"type": "surface", "count": 1, "data": [{
//!     "type": "spline", "rational": false,
//!     "degree_u": 3, "degree_v": 3,
//!     "knotvector_u": [...], "knotvector_v": [...],
//!     "size_u": 20, "size_v": 30,
//!     "control_points": {"points": [[x, y, z], ...]},
//!     "delta": [0.01, 0.01]
//! }]}}
//! ```

use std::fs;
use std::path::Path;

use mtg_math::Point3;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{NurbsError, Result};
use crate::{BSplineSurface, FittedSurface};

#[derive(Debug, Serialize, Deserialize)]
struct ExchangeDocument {
    shape: Shape,
}

#[derive(Debug, Serialize, Deserialize)]
struct Shape {
    #[serde(rename = "type")]
    kind: String,
    count: usize,
    data: Vec<SurfaceData>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SurfaceData {
    #[serde(rename = "type", default = "spline_kind")]
    kind: String,
    #[serde(default)]
    rational: bool,
    degree_u: usize,
    degree_v: usize,
    knotvector_u: Vec<f64>,
    knotvector_v: Vec<f64>,
    size_u: usize,
    size_v: usize,
    control_points: ControlPoints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delta: Option<[f64; 2]>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ControlPoints {
    points: Vec<[f64; 3]>,
}

fn spline_kind() -> String {
    "spline".to_string()
}

/// Serialize a fitted surface to an exchange document string.
pub fn to_json_string(fitted: &FittedSurface) -> Result<String> {
    let s = &fitted.surface;
    let doc = ExchangeDocument {
        shape: Shape {
            kind: "surface".into(),
            count: 1,
            data: vec![SurfaceData {
                kind: spline_kind(),
                rational: false,
                degree_u: s.degree_u,
                degree_v: s.degree_v,
                knotvector_u: s.knots_u.clone(),
                knotvector_v: s.knots_v.clone(),
                size_u: s.n_u,
                size_v: s.n_v,
                control_points: ControlPoints {
                    points: s.control_points.iter().map(|p| [p.x, p.y, p.z]).collect(),
                },
                delta: Some([fitted.delta, fitted.delta]),
            }],
        },
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Parse the first surface of an exchange document.
///
/// Documents without a `delta` get the usual default step of `0.01`.
pub fn from_json_str(json: &str) -> Result<FittedSurface> {
    let doc: ExchangeDocument = serde_json::from_str(json)?;
    if doc.shape.kind != "surface" {
        return Err(NurbsError::InvalidExchange(format!(
            "expected a surface, found '{}'",
            doc.shape.kind
        )));
    }
    let data = doc
        .shape
        .data
        .into_iter()
        .next()
        .ok_or_else(|| NurbsError::InvalidExchange("document holds no surface data".into()))?;
    if data.rational {
        return Err(NurbsError::InvalidExchange(
            "rational surfaces are not supported".into(),
        ));
    }

    let control_points = data
        .control_points
        .points
        .iter()
        .map(|p| Point3::new(p[0], p[1], p[2]))
        .collect();
    let surface = BSplineSurface::new(
        control_points,
        data.size_u,
        data.size_v,
        data.knotvector_u,
        data.knotvector_v,
        data.degree_u,
        data.degree_v,
    )?;
    let delta = data.delta.map(|d| d[0]).unwrap_or(0.01);
    FittedSurface::new(surface, delta)
}

/// Write `fitted` to `path` as an exchange document.
pub fn export_json(fitted: &FittedSurface, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, to_json_string(fitted)?)?;
    info!(path = %path.display(), "exported surface");
    Ok(())
}

/// Read a fitted surface from an exchange document on disk.
pub fn import_json(path: impl AsRef<Path>) -> Result<FittedSurface> {
    from_json_str(&fs::read_to_string(path)?)
}
