#![warn(missing_docs)]

//! Surface fitting for the multinozzle toolpath generator.
//!
//! Turns a scanned surface, exported as an STL whose vertices form a
//! regular u×v grid, into an interpolating B-spline surface the toolpath
//! generator can follow.
//!
//! # Example
//!
//! ```ignore
//! use mtg_surface::{fit_surface_from_mesh, FitOptions};
//!
//! let options = FitOptions {
//!     eval_delta: 0.02,
//!     ..FitOptions::new(20, 30)
//! };
//! let fit = fit_surface_from_mesh("scan.stl", &options)?;
//! // scan.json now holds the surface
//! println!("{} evaluated points", fit.surface.evaluate_points()?.len());
//! ```

pub mod error;
pub mod fit;
pub mod render;

pub use error::{FitError, Result};
pub use fit::{fit_surface_from_mesh, fit_surface_from_mesh_with, FitOptions, SurfaceFit};
pub use render::{PngRenderer, SurfaceRenderer};
