//! Preview rendering of fitted surfaces.
//!
//! Previews are isometric projections rasterized into PNG images: the
//! sampled surface with its control net, and the evaluated points laid
//! over the mesh data points.

use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb, RgbImage};
use mtg_math::Point3;
use mtg_nurbs::FittedSurface;
use tracing::info;

use crate::error::Result;

/// Destination for surface previews.
pub trait SurfaceRenderer {
    /// Render the surface together with its control net.
    fn render_surface(&mut self, surface: &FittedSurface) -> Result<()>;

    /// Render the evaluated points of `surface` over `data_points`.
    fn render_evaluation(&mut self, surface: &FittedSurface, data_points: &[Point3]) -> Result<()>;
}

const SURFACE_COLOR: Rgb<u8> = Rgb([40, 90, 200]);
const NET_COLOR: Rgb<u8> = Rgb([220, 60, 40]);
const EVAL_COLOR: Rgb<u8> = Rgb([40, 90, 200]);
const DATA_COLOR: Rgb<u8> = Rgb([220, 60, 40]);

/// Writes previews as PNG files.
#[derive(Debug, Clone)]
pub struct PngRenderer {
    /// Output of [`SurfaceRenderer::render_surface`].
    pub surface_path: PathBuf,
    /// Output of [`SurfaceRenderer::render_evaluation`].
    pub eval_path: PathBuf,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Blank border in pixels.
    pub margin: f64,
    /// Background color.
    pub background: Rgb<u8>,
}

impl PngRenderer {
    /// Previews named after `mesh`: `scan.stl` renders to
    /// `scan_surface.png` and `scan_eval.png` in the same directory.
    pub fn beside(mesh: impl AsRef<Path>) -> Self {
        let mesh = mesh.as_ref();
        let stem = mesh
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "surface".into());
        Self {
            surface_path: mesh.with_file_name(format!("{stem}_surface.png")),
            eval_path: mesh.with_file_name(format!("{stem}_eval.png")),
            width: 800,
            height: 600,
            margin: 20.0,
            background: Rgb([255, 255, 255]),
        }
    }

    /// Set the image size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Draw the sampled surface as a wireframe and the control net over it.
    pub fn draw_surface(&self, fitted: &FittedSurface) -> Result<RgbImage> {
        let samples = fitted.evaluate_points()?;
        let n = fitted.sample_size();
        let s = &fitted.surface;
        let projection = Projection::fit(
            samples.iter().chain(&s.control_points),
            self.width,
            self.height,
            self.margin,
        );

        let mut image = ImageBuffer::from_pixel(self.width, self.height, self.background);
        draw_grid_lines(&mut image, &projection, &samples, n, n, SURFACE_COLOR);
        draw_grid_lines(&mut image, &projection, &s.control_points, s.n_u, s.n_v, NET_COLOR);
        for p in &s.control_points {
            draw_dot(&mut image, projection.apply(p), 2, NET_COLOR);
        }
        Ok(image)
    }

    /// Draw the evaluated points over the data points.
    pub fn draw_evaluation(&self, fitted: &FittedSurface, data_points: &[Point3]) -> Result<RgbImage> {
        let samples = fitted.evaluate_points()?;
        let projection = Projection::fit(
            samples.iter().chain(data_points),
            self.width,
            self.height,
            self.margin,
        );

        let mut image = ImageBuffer::from_pixel(self.width, self.height, self.background);
        for p in &samples {
            draw_dot(&mut image, projection.apply(p), 0, EVAL_COLOR);
        }
        for p in data_points {
            draw_dot(&mut image, projection.apply(p), 2, DATA_COLOR);
        }
        Ok(image)
    }
}

impl SurfaceRenderer for PngRenderer {
    fn render_surface(&mut self, surface: &FittedSurface) -> Result<()> {
        self.draw_surface(surface)?.save(&self.surface_path)?;
        info!(path = %self.surface_path.display(), "rendered surface preview");
        Ok(())
    }

    fn render_evaluation(&mut self, surface: &FittedSurface, data_points: &[Point3]) -> Result<()> {
        self.draw_evaluation(surface, data_points)?.save(&self.eval_path)?;
        info!(path = %self.eval_path.display(), "rendered evaluation preview");
        Ok(())
    }
}

// =============================================================================
// Projection and rasterization
// =============================================================================

/// Isometric world → pixel mapping with a uniform scale.
struct Projection {
    scale: f64,
    offset: (f64, f64),
    /// Left edge and top edge of the projected bounds.
    left: f64,
    top: f64,
}

impl Projection {
    /// Screen coordinates with y pointing up.
    fn iso(p: &Point3) -> (f64, f64) {
        let (c, s) = (30f64.to_radians().cos(), 30f64.to_radians().sin());
        ((p.x - p.y) * c, p.z + (p.x + p.y) * s)
    }

    fn fit<'a>(points: impl Iterator<Item = &'a Point3>, width: u32, height: u32, margin: f64) -> Self {
        let mut min = (f64::INFINITY, f64::INFINITY);
        let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            let (x, y) = Self::iso(p);
            min = (min.0.min(x), min.1.min(y));
            max = (max.0.max(x), max.1.max(y));
        }
        if !(min.0.is_finite() && max.0.is_finite()) {
            min = (0.0, 0.0);
            max = (1.0, 1.0);
        }

        let avail_w = (width as f64 - 2.0 * margin).max(1.0);
        let avail_h = (height as f64 - 2.0 * margin).max(1.0);
        let span_w = (max.0 - min.0).max(1e-12);
        let span_h = (max.1 - min.1).max(1e-12);
        let scale = (avail_w / span_w).min(avail_h / span_h);

        let offset = (
            margin + (avail_w - span_w * scale) / 2.0,
            margin + (avail_h - span_h * scale) / 2.0,
        );
        Self {
            scale,
            offset,
            left: min.0,
            top: max.1,
        }
    }

    fn apply(&self, p: &Point3) -> (i64, i64) {
        let (x, y) = Self::iso(p);
        (
            ((x - self.left) * self.scale + self.offset.0).round() as i64,
            ((self.top - y) * self.scale + self.offset.1).round() as i64,
        )
    }
}

fn put(image: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.put_pixel(x as u32, y as u32, color);
    }
}

fn draw_dot(image: &mut RgbImage, (cx, cy): (i64, i64), radius: i64, color: Rgb<u8>) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                put(image, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Bresenham line.
fn draw_line(image: &mut RgbImage, (x0, y0): (i64, i64), (x1, y1): (i64, i64), color: Rgb<u8>) {
    let (dx, dy) = ((x1 - x0).abs(), -(y1 - y0).abs());
    let (sx, sy) = (if x0 < x1 { 1 } else { -1 }, if y0 < y1 { 1 } else { -1 });
    let (mut x, mut y, mut err) = (x0, y0, dx + dy);
    loop {
        put(image, x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Connect a u-major `n_u × n_v` grid along both directions.
fn draw_grid_lines(
    image: &mut RgbImage,
    projection: &Projection,
    points: &[Point3],
    n_u: usize,
    n_v: usize,
    color: Rgb<u8>,
) {
    if points.len() != n_u * n_v {
        return;
    }
    let at = |u: usize, v: usize| projection.apply(&points[u * n_v + v]);
    for u in 0..n_u {
        for v in 0..n_v {
            if v + 1 < n_v {
                draw_line(image, at(u, v), at(u, v + 1), color);
            }
            if u + 1 < n_u {
                draw_line(image, at(u, v), at(u + 1, v), color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtg_nurbs::interpolate_surface;

    fn fitted() -> FittedSurface {
        let mut pts = Vec::new();
        for i in 0..4 {
            for j in 0..4 {
                let (x, y) = (i as f64 * 10.0, j as f64 * 10.0);
                pts.push(Point3::new(x, y, (x * 0.1).sin()));
            }
        }
        FittedSurface::new(interpolate_surface(&pts, 4, 4, 3, 3).unwrap(), 0.1).unwrap()
    }

    #[test]
    fn test_beside_names() {
        let r = PngRenderer::beside("/data/scans/wing.stl");
        assert_eq!(r.surface_path, Path::new("/data/scans/wing_surface.png"));
        assert_eq!(r.eval_path, Path::new("/data/scans/wing_eval.png"));
    }

    #[test]
    fn test_projection_stays_in_frame() {
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(50.0, 0.0, 5.0),
            Point3::new(0.0, 80.0, -3.0),
            Point3::new(50.0, 80.0, 1.0),
        ];
        let proj = Projection::fit(pts.iter(), 200, 100, 10.0);
        for p in &pts {
            let (x, y) = proj.apply(p);
            assert!((10..=190).contains(&x), "x = {x}");
            assert!((10..=90).contains(&y), "y = {y}");
        }
    }

    #[test]
    fn test_draw_surface_marks_pixels() {
        let r = PngRenderer::beside("patch.stl").with_size(120, 90);
        let image = r.draw_surface(&fitted()).unwrap();
        assert_eq!(image.dimensions(), (120, 90));
        assert!(image.pixels().any(|p| *p == SURFACE_COLOR));
        assert!(image.pixels().any(|p| *p == NET_COLOR));
    }

    #[test]
    fn test_render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let mut r = PngRenderer::beside(dir.path().join("patch.stl")).with_size(64, 48);
        let f = fitted();
        r.render_surface(&f).unwrap();
        r.render_evaluation(&f, &f.surface.control_points).unwrap();
        assert!(r.surface_path.exists());
        assert!(r.eval_path.exists());
        let back = image::open(&r.eval_path).unwrap();
        assert_eq!((back.width(), back.height()), (64, 48));
    }
}
