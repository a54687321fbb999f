//! Form declarations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{FormError, Result};
use crate::field::{FieldValue, ParameterField};

/// Default window width in pixels.
pub const DEFAULT_WIDTH: u32 = 375;
/// Default window height in pixels.
pub const DEFAULT_HEIGHT: u32 = 300;

/// Picture shown in the top-left corner of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Image file.
    pub path: PathBuf,
    /// Display width in pixels.
    pub width: u32,
    /// Display height in pixels.
    pub height: u32,
}

/// A group of fields laid out side by side with other columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldColumn {
    /// Heading shown above the column.
    pub header: Option<String>,
    /// Fields, top to bottom.
    pub fields: Vec<ParameterField>,
}

/// Everything needed to build a form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSpec {
    /// Window title.
    pub title: String,
    /// Text shown above the fields.
    pub instructions: String,
    /// Window width in pixels.
    pub width: u32,
    /// Window height in pixels.
    pub height: u32,
    /// Field columns, left to right.
    pub columns: Vec<FieldColumn>,
    /// Optional picture next to the instructions.
    pub image: Option<ImageInfo>,
    /// Narrow entries and wide labels.
    pub compact_fields: bool,
}

impl FormSpec {
    /// Single-column form over `fields`.
    pub fn new(
        title: impl Into<String>,
        instructions: impl Into<String>,
        fields: Vec<ParameterField>,
    ) -> Self {
        Self {
            title: title.into(),
            instructions: instructions.into(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            columns: vec![FieldColumn {
                header: None,
                fields,
            }],
            image: None,
            compact_fields: false,
        }
    }

    /// Multi-column form.
    ///
    /// `names` is the flat list of field names, `grouped_defaults` holds
    /// one list of defaults per column. Names are dealt to the columns in
    /// order, each column taking as many as it has defaults.
    pub fn with_columns(
        title: impl Into<String>,
        instructions: impl Into<String>,
        headers: Vec<String>,
        names: Vec<String>,
        grouped_defaults: Vec<Vec<FieldValue>>,
    ) -> Result<Self> {
        let total: usize = grouped_defaults.iter().map(Vec::len).sum();
        if names.len() != total {
            return Err(FormError::FieldCountMismatch {
                fields: names.len(),
                defaults: total,
            });
        }
        if headers.len() != grouped_defaults.len() {
            return Err(FormError::FieldCountMismatch {
                fields: headers.len(),
                defaults: grouped_defaults.len(),
            });
        }

        let mut names = names.into_iter();
        let columns = headers
            .into_iter()
            .zip(grouped_defaults)
            .map(|(header, defaults)| FieldColumn {
                header: Some(header),
                fields: defaults
                    .into_iter()
                    .zip(names.by_ref())
                    .map(|(default, name)| ParameterField { name, default })
                    .collect(),
            })
            .collect();

        let mut spec = Self::new(title, instructions, Vec::new());
        spec.columns = columns;
        Ok(spec)
    }

    /// Set the window size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Show a picture next to the instructions.
    pub fn with_image(mut self, image: ImageInfo) -> Self {
        self.image = Some(image);
        self
    }

    /// Use narrow entries.
    pub fn compact(mut self, compact: bool) -> Self {
        self.compact_fields = compact;
        self
    }

    /// Whether the form shows column headings.
    pub fn has_columns(&self) -> bool {
        self.columns.iter().any(|c| c.header.is_some())
    }

    /// All fields in declaration order, column by column.
    pub fn fields(&self) -> impl Iterator<Item = &ParameterField> + '_ {
        self.columns.iter().flat_map(|c| c.fields.iter())
    }

    /// Mutable access to all fields in declaration order.
    pub fn fields_mut(&mut self) -> impl Iterator<Item = &mut ParameterField> + '_ {
        self.columns.iter_mut().flat_map(|c| c.fields.iter_mut())
    }

    /// Number of fields across all columns.
    pub fn field_count(&self) -> usize {
        self.columns.iter().map(|c| c.fields.len()).sum()
    }

    /// Owned copy of all fields in declaration order.
    pub fn flat_fields(&self) -> Vec<ParameterField> {
        self.fields().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_column() {
        let spec = FormSpec::new(
            "Project",
            "Fill in",
            vec![ParameterField::new("Name", "abc"), ParameterField::new("Count", 5)],
        );
        assert!(!spec.has_columns());
        assert_eq!(spec.field_count(), 2);
        assert_eq!((spec.width, spec.height), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        let names: Vec<_> = spec.fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Name", "Count"]);
    }

    #[test]
    fn test_with_columns_regroups() {
        let spec = FormSpec::with_columns(
            "Nozzles",
            "",
            vec!["Left".into(), "Right".into()],
            vec!["A".into(), "B".into(), "C".into()],
            vec![
                vec![FieldValue::Integer(1), FieldValue::Integer(2)],
                vec![FieldValue::from("c")],
            ],
        )
        .unwrap();
        assert!(spec.has_columns());
        assert_eq!(spec.columns.len(), 2);
        assert_eq!(spec.columns[0].fields.len(), 2);
        assert_eq!(spec.columns[1].fields[0].name, "C");
        assert_eq!(spec.columns[1].header.as_deref(), Some("Right"));
        let names: Vec<_> = spec.fields().map(|f| f.name.clone()).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn test_with_columns_mismatch() {
        let err = FormSpec::with_columns(
            "t",
            "i",
            vec!["Only".into()],
            vec!["A".into()],
            vec![vec![FieldValue::Integer(1), FieldValue::Integer(2)]],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FormError::FieldCountMismatch {
                fields: 1,
                defaults: 2
            }
        ));
    }
}
