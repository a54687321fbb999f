//! Mesh → grid → surface pipeline.

use std::path::{Path, PathBuf};

use mtg_mesh::{read_stl, unique_vertices, MeshError, PointGrid, DEDUP_DECIMALS};
use mtg_nurbs::{export_json, interpolate_surface, FittedSurface, MIN_DELTA};
use tracing::{debug, info};

use crate::error::{FitError, Result};
use crate::render::{PngRenderer, SurfaceRenderer};

/// Surface fitting parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    /// Grid size (and control point count) along u.
    pub u_size: usize,
    /// Grid size (and control point count) along v.
    pub v_size: usize,
    /// Spline degree along u.
    pub u_degree: usize,
    /// Spline degree along v.
    pub v_degree: usize,
    /// Parametric step used to evaluate the surface, in `(0, 1)`.
    pub eval_delta: f64,
    /// Write `<mesh>.json` next to the mesh.
    pub export_json: bool,
    /// Render the fitted surface and its control net.
    pub render_surface: bool,
    /// Render evaluated points over the data points.
    pub render_eval: bool,
}

impl FitOptions {
    /// Cubic fit of a `u_size × v_size` grid with the default step and
    /// JSON export on.
    pub fn new(u_size: usize, v_size: usize) -> Self {
        Self {
            u_size,
            v_size,
            u_degree: 3,
            v_degree: 3,
            eval_delta: 0.01,
            export_json: true,
            render_surface: false,
            render_eval: false,
        }
    }

    /// Validate options.
    pub fn validate(&self) -> Result<()> {
        for (dir, size, degree) in [
            ("u", self.u_size, self.u_degree),
            ("v", self.v_size, self.v_degree),
        ] {
            if degree == 0 || degree >= size {
                return Err(FitError::InvalidInput(format!(
                    "{dir} degree {degree} needs a grid with more than {degree} points, got {size}"
                )));
            }
        }
        if !(MIN_DELTA..1.0).contains(&self.eval_delta) {
            return Err(FitError::InvalidInput(format!(
                "eval_delta must be in [{MIN_DELTA}, 1), got {}",
                self.eval_delta
            )));
        }
        Ok(())
    }
}

/// Result of a fit: the surface and the grid it interpolates.
#[derive(Debug, Clone)]
pub struct SurfaceFit {
    /// The interpolating surface.
    pub surface: FittedSurface,
    /// The grid-ordered mesh vertices.
    pub grid: PointGrid,
    /// Where the surface was exported, if it was.
    pub json_path: Option<PathBuf>,
}

/// Fit a surface to the vertex grid of an STL file.
///
/// Previews requested through `render_surface` / `render_eval` are written
/// as PNG files next to the mesh (see [`PngRenderer::beside`]).
pub fn fit_surface_from_mesh(path: impl AsRef<Path>, options: &FitOptions) -> Result<SurfaceFit> {
    let path = path.as_ref();
    let mut renderer = PngRenderer::beside(path);
    fit_surface_from_mesh_with(path, options, &mut renderer)
}

/// Fit a surface to the vertex grid of an STL file, sending previews to
/// `renderer`.
///
/// 1. Checks the `.stl` extension and the options
/// 2. Reads the mesh and extracts its unique vertices (rounded to
///    [`DEDUP_DECIMALS`] places)
/// 3. Sorts them into a u×v grid
/// 4. Interpolates the grid and attaches the evaluation delta
/// 5. Optionally exports `<mesh>.json` and renders previews
///
/// Rendering never alters the returned fit.
pub fn fit_surface_from_mesh_with(
    path: impl AsRef<Path>,
    options: &FitOptions,
    renderer: &mut dyn SurfaceRenderer,
) -> Result<SurfaceFit> {
    let path = path.as_ref();
    check_extension(path)?;
    options.validate()?;

    let mesh = read_stl(path)?;
    if mesh.is_empty() {
        return Err(MeshError::EmptyMesh.into());
    }
    let cloud = unique_vertices(&mesh, DEDUP_DECIMALS);
    let grid = PointGrid::from_cloud(cloud, options.u_size, options.v_size)?;
    debug!(
        u_size = grid.u_size,
        v_size = grid.v_size,
        "sorted mesh vertices into grid"
    );

    let surface = interpolate_surface(
        &grid.points,
        options.u_size,
        options.v_size,
        options.u_degree,
        options.v_degree,
    )?;
    let surface = FittedSurface::new(surface, options.eval_delta)?;

    let json_path = if options.export_json {
        let out = path.with_extension("json");
        export_json(&surface, &out)?;
        Some(out)
    } else {
        None
    };

    if options.render_surface {
        renderer.render_surface(&surface)?;
    }
    if options.render_eval {
        renderer.render_evaluation(&surface, &grid.points)?;
    }

    info!(
        mesh = %path.display(),
        u_size = options.u_size,
        v_size = options.v_size,
        "fitted surface"
    );
    Ok(SurfaceFit {
        surface,
        grid,
        json_path,
    })
}

fn check_extension(path: &Path) -> Result<()> {
    let is_stl = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("stl"));
    if is_stl {
        Ok(())
    } else {
        Err(FitError::InvalidInput(format!(
            "the file to import must be in STL format: {}",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let o = FitOptions::new(10, 12);
        assert_eq!((o.u_degree, o.v_degree), (3, 3));
        assert!(o.export_json);
        assert!(!o.render_surface && !o.render_eval);
        assert!(o.validate().is_ok());
    }

    #[test]
    fn test_invalid_options() {
        let o = FitOptions {
            u_degree: 4,
            ..FitOptions::new(4, 10)
        };
        assert!(matches!(o.validate(), Err(FitError::InvalidInput(_))));

        let o = FitOptions {
            eval_delta: 1.5,
            ..FitOptions::new(10, 10)
        };
        assert!(o.validate().is_err());

        let o = FitOptions {
            eval_delta: 1e-12,
            ..FitOptions::new(10, 10)
        };
        assert!(matches!(o.validate(), Err(FitError::InvalidInput(_))));
    }

    #[test]
    fn test_extension_check() {
        assert!(check_extension(Path::new("scan.stl")).is_ok());
        assert!(check_extension(Path::new("dir.v2/SCAN.STL")).is_ok());
        assert!(check_extension(Path::new("scan.obj")).is_err());
        assert!(check_extension(Path::new("scan")).is_err());
        assert!(check_extension(Path::new("scan.stl.bak")).is_err());
    }

    #[test]
    fn test_wrong_extension_fails_before_reading() {
        // The file does not exist; the extension check must fire first
        let err = fit_surface_from_mesh("/nonexistent/scan.ply", &FitOptions::new(4, 4)).unwrap_err();
        assert!(matches!(err, FitError::InvalidInput(_)), "{err}");
    }
}
