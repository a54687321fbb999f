//! End-to-end fits of gridded STL meshes.

use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use mtg_math::Point3;
use mtg_mesh::{write_stl, MeshError, Triangle, TriangleSoup};
use mtg_nurbs::{import_json, FittedSurface};
use mtg_surface::{
    fit_surface_from_mesh, fit_surface_from_mesh_with, FitError, FitOptions, SurfaceRenderer,
};

const U: usize = 5;
const V: usize = 4;

fn height(x: f64, y: f64) -> f64 {
    ((x / 12.0).sin() * (y / 9.0).cos() * 250.0).round() / 100.0
}

fn grid_point(i: usize, j: usize) -> Point3 {
    let (x, y) = (10.0 * i as f64, 8.0 * j as f64);
    Point3::new(x, y, height(x, y))
}

/// Triangulated `U × V` height field written as a binary STL.
fn write_grid_stl(dir: &Path, name: &str) -> PathBuf {
    let mut mesh = TriangleSoup::new();
    for i in 0..U - 1 {
        for j in 0..V - 1 {
            let (a, b) = (grid_point(i, j), grid_point(i + 1, j));
            let (c, d) = (grid_point(i + 1, j + 1), grid_point(i, j + 1));
            mesh.triangles.push(Triangle::from_vertices(a, b, c));
            mesh.triangles.push(Triangle::from_vertices(a, c, d));
        }
    }
    let path = dir.join(name);
    write_stl(&mesh, &path).unwrap();
    path
}

#[derive(Default)]
struct CountingRenderer {
    surfaces: usize,
    evaluations: usize,
    data_points: usize,
}

impl SurfaceRenderer for CountingRenderer {
    fn render_surface(&mut self, _surface: &FittedSurface) -> mtg_surface::Result<()> {
        self.surfaces += 1;
        Ok(())
    }

    fn render_evaluation(
        &mut self,
        _surface: &FittedSurface,
        data_points: &[Point3],
    ) -> mtg_surface::Result<()> {
        self.evaluations += 1;
        self.data_points = data_points.len();
        Ok(())
    }
}

#[test]
fn test_fit_sorts_grid_and_exports_json() {
    let dir = tempfile::tempdir().unwrap();
    let stl = write_grid_stl(dir.path(), "scan.stl");

    let options = FitOptions {
        v_degree: 2,
        eval_delta: 0.05,
        ..FitOptions::new(U, V)
    };
    let fit = fit_surface_from_mesh(&stl, &options).unwrap();

    assert_eq!(fit.grid.points.len(), U * V);
    for i in 0..U {
        for j in 0..V {
            let p = fit.grid.get(i, j).unwrap();
            let expected = grid_point(i, j);
            assert_relative_eq!(p.x, expected.x, epsilon = 1e-9);
            assert_relative_eq!(p.y, expected.y, epsilon = 1e-9);
            assert_relative_eq!(p.z, expected.z, epsilon = 1e-9);
        }
    }

    let s = &fit.surface.surface;
    assert_eq!((s.n_u, s.n_v), (U, V));
    assert_eq!((s.degree_u, s.degree_v), (3, 2));
    assert_eq!(fit.surface.delta, 0.05);

    // Clamped interpolation reproduces the grid corners
    let corner = s.eval(0.0, 0.0);
    assert_relative_eq!((corner - grid_point(0, 0)).norm(), 0.0, epsilon = 1e-8);
    let corner = s.eval(1.0, 1.0);
    assert_relative_eq!((corner - grid_point(U - 1, V - 1)).norm(), 0.0, epsilon = 1e-8);

    let json = dir.path().join("scan.json");
    assert_eq!(fit.json_path.as_deref(), Some(json.as_path()));
    let back = import_json(&json).unwrap();
    assert_eq!(back.surface.n_u, U);
    assert_relative_eq!(back.delta, 0.05);

    assert_eq!(fit.surface.evaluate_points().unwrap().len(), 21 * 21);
}

#[test]
fn test_fit_without_export() {
    let dir = tempfile::tempdir().unwrap();
    let stl = write_grid_stl(dir.path(), "scan.stl");
    let options = FitOptions {
        export_json: false,
        ..FitOptions::new(U, V)
    };
    let fit = fit_surface_from_mesh(&stl, &options).unwrap();
    assert!(fit.json_path.is_none());
    assert!(!dir.path().join("scan.json").exists());
}

#[test]
fn test_render_flags_leave_surface_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let stl = write_grid_stl(dir.path(), "scan.stl");
    let plain = FitOptions {
        export_json: false,
        ..FitOptions::new(U, V)
    };
    let rendered = FitOptions {
        render_surface: true,
        render_eval: true,
        ..plain.clone()
    };

    let base = fit_surface_from_mesh(&stl, &plain).unwrap();
    let with_pngs = fit_surface_from_mesh(&stl, &rendered).unwrap();
    let mut counting = CountingRenderer::default();
    let with_counter = fit_surface_from_mesh_with(&stl, &rendered, &mut counting).unwrap();
    assert_eq!(counting.surfaces, 1);

    for fit in [&with_pngs, &with_counter] {
        let (a, b) = (&base.surface.surface, &fit.surface.surface);
        assert_eq!(a.control_points, b.control_points);
        assert_eq!(a.knots_u, b.knots_u);
        assert_eq!(a.knots_v, b.knots_v);
        assert_eq!(base.surface.delta, fit.surface.delta);
        assert_eq!(base.grid, fit.grid);
        assert!(fit.json_path.is_none());
    }
}

#[test]
fn test_render_flags_reach_renderer() {
    let dir = tempfile::tempdir().unwrap();
    let stl = write_grid_stl(dir.path(), "scan.stl");

    let mut renderer = CountingRenderer::default();
    let options = FitOptions {
        render_surface: true,
        render_eval: true,
        export_json: false,
        ..FitOptions::new(U, V)
    };
    fit_surface_from_mesh_with(&stl, &options, &mut renderer).unwrap();
    assert_eq!(renderer.surfaces, 1);
    assert_eq!(renderer.evaluations, 1);
    assert_eq!(renderer.data_points, U * V);

    let mut quiet = CountingRenderer::default();
    fit_surface_from_mesh_with(&stl, &FitOptions::new(U, V), &mut quiet).unwrap();
    assert_eq!((quiet.surfaces, quiet.evaluations), (0, 0));
}

#[test]
fn test_png_previews_written_beside_mesh() {
    let dir = tempfile::tempdir().unwrap();
    let stl = write_grid_stl(dir.path(), "wing.stl");
    let options = FitOptions {
        render_surface: true,
        render_eval: true,
        eval_delta: 0.1,
        ..FitOptions::new(U, V)
    };
    fit_surface_from_mesh(&stl, &options).unwrap();
    assert!(dir.path().join("wing_surface.png").exists());
    assert!(dir.path().join("wing_eval.png").exists());
}

#[test]
fn test_wrong_grid_size() {
    let dir = tempfile::tempdir().unwrap();
    let stl = write_grid_stl(dir.path(), "scan.stl");
    let err = fit_surface_from_mesh(&stl, &FitOptions::new(6, 4)).unwrap_err();
    assert!(matches!(
        err,
        FitError::Mesh(MeshError::GridSizeMismatch {
            expected: 24,
            actual: 20,
            ..
        })
    ));
}

#[test]
fn test_wrong_extension() {
    let dir = tempfile::tempdir().unwrap();
    let stl = write_grid_stl(dir.path(), "scan.stl");
    let obj = dir.path().join("scan.obj");
    std::fs::copy(&stl, &obj).unwrap();
    let err = fit_surface_from_mesh(&obj, &FitOptions::new(U, V)).unwrap_err();
    assert!(matches!(err, FitError::InvalidInput(_)));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = fit_surface_from_mesh(dir.path().join("absent.stl"), &FitOptions::new(U, V))
        .unwrap_err();
    assert!(matches!(err, FitError::Mesh(MeshError::Io(_))));
}
