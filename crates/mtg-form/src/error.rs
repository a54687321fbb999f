//! Error types for parameter forms.

use thiserror::Error;

/// Errors that can occur while building, driving or exporting a form.
#[derive(Error, Debug)]
pub enum FormError {
    /// Field names and default values are not aligned.
    #[error("{fields} fields but {defaults} default values")]
    FieldCountMismatch {
        /// Number of field names.
        fields: usize,
        /// Number of default values.
        defaults: usize,
    },

    /// A choice default or selection points past its options.
    #[error("field '{field}': choice index {index} out of range for {options} options")]
    InvalidChoiceIndex {
        /// Field name.
        field: String,
        /// Offending index.
        index: usize,
        /// Number of options.
        options: usize,
    },

    /// A submitted choice is not among the field's options.
    #[error("field '{field}': '{value}' is not one of the declared choices")]
    ChoiceNotFound {
        /// Field name.
        field: String,
        /// Submitted value.
        value: String,
    },

    /// A submitted value cannot be converted to the field's declared kind.
    #[error("field '{field}': cannot convert '{value}' to {kind}")]
    Conversion {
        /// Field name.
        field: String,
        /// Submitted value.
        value: String,
        /// Declared kind.
        kind: &'static str,
    },

    /// No field with this name.
    #[error("no field named '{0}'")]
    UnknownField(String),

    /// No field at this position.
    #[error("no field at index {0}")]
    NoSuchField(usize),

    /// The operation does not apply to this field's control.
    #[error("field '{field}' is not a {expected} control")]
    WrongControl {
        /// Field name.
        field: String,
        /// Control the operation needs.
        expected: &'static str,
    },

    /// A default value has no field representation.
    #[error("unsupported default value: {0}")]
    UnsupportedValue(String),

    /// The form was already submitted or cancelled.
    #[error("form is closed")]
    Closed,

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed parameter document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for form operations.
pub type Result<T> = std::result::Result<T, FormError>;
