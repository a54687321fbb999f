//! mtg - multinozzle toolpath generator driver
//!
//! Fits B-spline surfaces to scanned STL grids and collects operator
//! parameters through terminal forms.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mtg_form::{export_json, FormDriver, FormHandle, Outcome, ParameterSet};
use mtg_surface::fit_surface_from_mesh;
use tracing::info;

mod config;
mod logging;
mod tui;

use config::{FormFile, JobConfig};

#[derive(Parser)]
#[command(name = "mtg")]
#[command(about = "Multinozzle toolpath generator tools", long_about = None)]
struct Cli {
    /// Log debug details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a B-spline surface to the vertex grid of an STL file
    Fit(FitArgs),
    /// Show a parameter form and export the values as JSON
    Params {
        /// Form description (.toml)
        form: PathBuf,
        /// Output file (default: the form file with a .json extension)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Previous export used to pre-fill the form
        #[arg(short, long)]
        defaults: Option<PathBuf>,
    },
    /// Display information about an exported surface
    Info {
        /// Surface file (.json)
        file: PathBuf,
    },
}

#[derive(Args)]
struct FitArgs {
    /// Job file (.toml); flags override its values
    job: Option<PathBuf>,
    /// Mesh to fit
    #[arg(long)]
    stl: Option<PathBuf>,
    /// Grid points along u
    #[arg(long)]
    u_size: Option<usize>,
    /// Grid points along v
    #[arg(long)]
    v_size: Option<usize>,
    /// Degree along u
    #[arg(long)]
    u_degree: Option<usize>,
    /// Degree along v
    #[arg(long)]
    v_degree: Option<usize>,
    /// Parametric evaluation step
    #[arg(long)]
    eval_delta: Option<f64>,
    /// Skip writing the surface JSON
    #[arg(long)]
    no_json: bool,
    /// Render the surface and control net
    #[arg(long)]
    render_surface: bool,
    /// Render evaluated points over the data points
    #[arg(long)]
    render_eval: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let logging = logging::init_logging(cli.verbose)?;

    match cli.command {
        Commands::Fit(args) => {
            let job = resolve_job(args)?;
            run_fit(&job)?;
        }
        Commands::Params {
            form,
            out,
            defaults,
        } => {
            let out = out.unwrap_or_else(|| form.with_extension("json"));
            run_params(&form, &out, defaults.as_deref(), &logging)?;
        }
        Commands::Info { file } => {
            show_info(&file)?;
        }
    }

    Ok(())
}

/// Merge a job file with command-line overrides.
fn resolve_job(args: FitArgs) -> Result<JobConfig> {
    let mut job = match args.job {
        Some(path) => JobConfig::load(&path)?,
        None => {
            let (Some(stl), Some(u), Some(v)) = (args.stl.clone(), args.u_size, args.v_size) else {
                anyhow::bail!("without a job file, --stl, --u-size and --v-size are required");
            };
            JobConfig::new(stl, u, v)
        }
    };

    if let Some(stl) = args.stl {
        job.stl = stl;
    }
    if let Some(u) = args.u_size {
        job.u_size = u;
    }
    if let Some(v) = args.v_size {
        job.v_size = v;
    }
    if let Some(d) = args.u_degree {
        job.u_degree = d;
    }
    if let Some(d) = args.v_degree {
        job.v_degree = d;
    }
    if let Some(delta) = args.eval_delta {
        job.eval_delta = delta;
    }
    if args.no_json {
        job.export_json = false;
    }
    job.render_surface |= args.render_surface;
    job.render_eval |= args.render_eval;
    Ok(job)
}

fn run_fit(job: &JobConfig) -> Result<()> {
    let fit = fit_surface_from_mesh(&job.stl, &job.fit_options())
        .with_context(|| format!("failed to fit {}", job.stl.display()))?;

    let s = &fit.surface.surface;
    println!("Fitted {}", job.stl.display());
    println!("  Grid: {} x {}", fit.grid.u_size, fit.grid.v_size);
    println!("  Degree: {} x {}", s.degree_u, s.degree_v);
    println!("  Evaluation delta: {}", fit.surface.delta);
    if let Some(path) = &fit.json_path {
        println!("  Surface: {}", path.display());
    }
    Ok(())
}

fn run_params(
    form_path: &Path,
    out: &Path,
    defaults: Option<&Path>,
    logging: &logging::Logging,
) -> Result<()> {
    let mut spec = FormFile::load(form_path)?.into_spec();
    if let Some(path) = defaults {
        let stored = ParameterSet::load(path)
            .with_context(|| format!("failed to read defaults {}", path.display()))?;
        let replaced = stored.apply_defaults(&mut spec);
        info!(path = %path.display(), replaced, "loaded previous values");
    }
    let fields = spec.flat_fields();

    let form = FormHandle::build(spec)?;
    let outcome = {
        let _quiet = logging.quiet();
        tui::TerminalDriver.run(form)?
    };

    match outcome {
        Outcome::Submitted(values) => {
            export_json(out, &fields, &values)
                .with_context(|| format!("failed to export {}", out.display()))?;
            println!("Exported parameters to {}", out.display());
        }
        Outcome::Cancelled => {
            println!("Cancelled; nothing exported");
        }
    }
    Ok(())
}

fn show_info(file: &Path) -> Result<()> {
    let fitted = mtg_nurbs::import_json(file)
        .with_context(|| format!("failed to read surface {}", file.display()))?;
    let s = &fitted.surface;

    println!("Surface: {}", file.display());
    println!("  Control points: {} x {}", s.n_u, s.n_v);
    println!("  Degree: {} x {}", s.degree_u, s.degree_v);
    println!("  Knots: {} (u), {} (v)", s.knots_u.len(), s.knots_v.len());
    println!("  Evaluation delta: {}", fitted.delta);
    println!("  Evaluated points: {}", fitted.sample_size().pow(2));

    let points = fitted.evaluate_points()?;
    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];
    for p in &points {
        for k in 0..3 {
            min[k] = min[k].min(p[k]);
            max[k] = max[k].max(p[k]);
        }
    }
    if !points.is_empty() {
        println!(
            "  Bounds: ({:.3}, {:.3}, {:.3}) - ({:.3}, {:.3}, {:.3})",
            min[0], min[1], min[2], max[0], max[1], max[2]
        );
    }
    Ok(())
}
