//! TOML job and form files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mtg_form::{FieldColumn, FieldValue, FormSpec, ImageInfo, ParameterField};
use mtg_surface::FitOptions;
use serde::Deserialize;

/// A surface fitting job.
///
/// ```toml
/// stl = "scans/wing.stl"
/// u_size = 20
/// v_size = 30
/// eval_delta = 0.02
/// render_surface = true
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    pub stl: PathBuf,
    pub u_size: usize,
    pub v_size: usize,
    #[serde(default = "default_degree")]
    pub u_degree: usize,
    #[serde(default = "default_degree")]
    pub v_degree: usize,
    #[serde(default = "default_eval_delta")]
    pub eval_delta: f64,
    #[serde(default = "default_true")]
    pub export_json: bool,
    #[serde(default)]
    pub render_surface: bool,
    #[serde(default)]
    pub render_eval: bool,
}

fn default_degree() -> usize {
    3
}

fn default_eval_delta() -> f64 {
    0.01
}

fn default_true() -> bool {
    true
}

impl JobConfig {
    /// Job for `stl` with every option at its default.
    pub fn new(stl: PathBuf, u_size: usize, v_size: usize) -> Self {
        Self {
            stl,
            u_size,
            v_size,
            u_degree: default_degree(),
            v_degree: default_degree(),
            eval_delta: default_eval_delta(),
            export_json: true,
            render_surface: false,
            render_eval: false,
        }
    }

    /// Read a job file. A relative `stl` path is taken relative to the
    /// job file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read job file {}", path.display()))?;
        let mut job: JobConfig = toml::from_str(&text)
            .with_context(|| format!("invalid job file {}", path.display()))?;
        job.stl = relative_to(path, &job.stl);
        Ok(job)
    }

    pub fn fit_options(&self) -> FitOptions {
        FitOptions {
            u_size: self.u_size,
            v_size: self.v_size,
            u_degree: self.u_degree,
            v_degree: self.v_degree,
            eval_delta: self.eval_delta,
            export_json: self.export_json,
            render_surface: self.render_surface,
            render_eval: self.render_eval,
        }
    }
}

/// A parameter form.
///
/// ```toml
/// title = "Project parameters"
/// instructions = "Provide the parameters of your program."
///
/// [[columns]]
/// fields = [
///     { name = "Name", default = "abc" },
///     { name = "Nozzle", default = ["x", "y", "z", 1] },
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormFile {
    pub title: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub compact_fields: bool,
    #[serde(default)]
    pub image: Option<ImageInfo>,
    pub columns: Vec<ColumnFile>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnFile {
    #[serde(default)]
    pub header: Option<String>,
    pub fields: Vec<FieldFile>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldFile {
    pub name: String,
    pub default: FieldValue,
}

fn default_width() -> u32 {
    mtg_form::spec::DEFAULT_WIDTH
}

fn default_height() -> u32 {
    mtg_form::spec::DEFAULT_HEIGHT
}

impl FormFile {
    /// Read a form file. A relative image path is taken relative to the
    /// form file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read form file {}", path.display()))?;
        let mut form: FormFile = toml::from_str(&text)
            .with_context(|| format!("invalid form file {}", path.display()))?;
        if let Some(image) = &mut form.image {
            image.path = relative_to(path, &image.path);
        }
        Ok(form)
    }

    pub fn into_spec(self) -> FormSpec {
        let mut spec = FormSpec::new(self.title, self.instructions, Vec::new())
            .with_size(self.width, self.height)
            .compact(self.compact_fields);
        spec.image = self.image;
        spec.columns = self
            .columns
            .into_iter()
            .map(|c| FieldColumn {
                header: c.header,
                fields: c
                    .fields
                    .into_iter()
                    .map(|f| ParameterField::new(f.name, f.default))
                    .collect(),
            })
            .collect();
        spec
    }
}

fn relative_to(file: &Path, target: &Path) -> PathBuf {
    match file.parent() {
        Some(dir) if target.is_relative() => dir.join(target),
        _ => target.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_defaults() {
        let job: JobConfig = toml::from_str(
            r#"
            stl = "wing.stl"
            u_size = 20
            v_size = 30
            "#,
        )
        .unwrap();
        assert_eq!(job, JobConfig::new("wing.stl".into(), 20, 30));
        let options = job.fit_options();
        assert_eq!((options.u_degree, options.v_degree), (3, 3));
        assert_eq!(options.eval_delta, 0.01);
        assert!(options.export_json);
    }

    #[test]
    fn test_job_rejects_unknown_keys() {
        let err = toml::from_str::<JobConfig>("stl = 'a.stl'\nu_size = 4\nv_size = 4\nusize = 3");
        assert!(err.is_err());
    }

    #[test]
    fn test_job_load_resolves_stl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.toml");
        fs::write(&path, "stl = 'scan.stl'\nu_size = 5\nv_size = 4\nrender_eval = true\n").unwrap();
        let job = JobConfig::load(&path).unwrap();
        assert_eq!(job.stl, dir.path().join("scan.stl"));
        assert!(job.render_eval);
    }

    #[test]
    fn test_form_file_into_spec() {
        let form: FormFile = toml::from_str(
            r#"
            title = "Printhead"
            compact_fields = true

            [[columns]]
            header = "Left"
            fields = [
                { name = "Temp L", default = 210 },
                { name = "Flow L", default = 1.0 },
            ]

            [[columns]]
            header = "Right"
            fields = [
                { name = "Nozzle", default = ["x", "y", "z", 1] },
                { name = "Purge", default = false },
            ]
            "#,
        )
        .unwrap();
        assert_eq!(form.width, 375);
        let spec = form.into_spec();
        assert!(spec.has_columns());
        assert!(spec.compact_fields);
        let defaults: Vec<_> = spec.fields().map(|f| f.default.clone()).collect();
        assert_eq!(
            defaults,
            [
                FieldValue::Integer(210),
                FieldValue::Float(1.0),
                FieldValue::choice(["x", "y", "z"], 1),
                FieldValue::Boolean(false),
            ]
        );
    }

    #[test]
    fn test_form_file_rejects_bad_default() {
        let err = toml::from_str::<FormFile>(
            r#"
            title = "t"
            [[columns]]
            fields = [{ name = "C", default = ["x", "y"] }]
            "#,
        );
        assert!(err.is_err());
    }
}
