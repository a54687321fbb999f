//! Typed form fields.
//!
//! Every field declares its kind through its default value. Submitted
//! strings are converted back to that kind on export, and choices are
//! stored as their option list followed by the selected index:
//!
//! ```json
//! {"Name": "abc", "Count": 5, "Nozzle": ["x", "y", "z", 1]}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FormError, Result};

/// One entry of a choice field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceOption {
    /// Whole-number option.
    Integer(i64),
    /// Text option.
    Text(String),
}

impl ChoiceOption {
    /// Parse a submitted value the way choices are matched on export:
    /// as an integer when it parses as one, as text otherwise.
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<i64>() {
            Ok(n) => ChoiceOption::Integer(n),
            Err(_) => ChoiceOption::Text(value.to_string()),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            ChoiceOption::Integer(n) => Value::from(*n),
            ChoiceOption::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for ChoiceOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceOption::Integer(n) => write!(f, "{n}"),
            ChoiceOption::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ChoiceOption {
    fn from(n: i64) -> Self {
        ChoiceOption::Integer(n)
    }
}

impl From<i32> for ChoiceOption {
    fn from(n: i32) -> Self {
        ChoiceOption::Integer(n.into())
    }
}

impl From<&str> for ChoiceOption {
    fn from(s: &str) -> Self {
        ChoiceOption::Text(s.to_string())
    }
}

/// Default (and exported) value of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum FieldValue {
    /// Free text.
    Text(String),
    /// Whole number.
    Integer(i64),
    /// Real number.
    Float(f64),
    /// Flag, entered as `True` / `False`.
    Boolean(bool),
    /// Single selection among `options`.
    Choice {
        /// Selectable options, in display order.
        options: Vec<ChoiceOption>,
        /// Zero-based index of the selected option.
        selected: usize,
    },
}

impl FieldValue {
    /// Choice among `options` with `selected` preselected.
    pub fn choice<T: Into<ChoiceOption>>(options: impl IntoIterator<Item = T>, selected: usize) -> Self {
        FieldValue::Choice {
            options: options.into_iter().map(Into::into).collect(),
            selected,
        }
    }

    /// Name of the value's kind, as used in conversion errors.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Choice { .. } => "choice",
        }
    }

    /// Whether `other` can stand in for this value without changing the
    /// field's control.
    pub fn same_kind(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (
                FieldValue::Choice { options: a, .. },
                FieldValue::Choice { options: b, .. },
            ) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }

    /// The value as an operator sees it in the form.
    ///
    /// Floats keep a decimal point (`5.0`), booleans read `True` / `False`
    /// and a choice shows its selected option.
    pub fn display_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Float(x) => format_float(*x),
            FieldValue::Boolean(true) => "True".into(),
            FieldValue::Boolean(false) => "False".into(),
            FieldValue::Choice { options, selected } => options
                .get(*selected)
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }

    /// Convert a JSON value.
    ///
    /// Strings, integers, floats and booleans map to their scalar kinds.
    /// An array whose last element is a non-negative integer is a choice:
    /// the preceding elements are the options, the last one the selection.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(FieldValue::Text(s.clone())),
            Value::Bool(b) => Ok(FieldValue::Boolean(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(FieldValue::Integer(i))
                } else if n.is_f64() {
                    n.as_f64()
                        .map(FieldValue::Float)
                        .ok_or_else(|| FormError::UnsupportedValue(n.to_string()))
                } else {
                    Err(FormError::UnsupportedValue(format!("{n} is out of range")))
                }
            }
            Value::Array(items) => {
                let (last, rest) = items
                    .split_last()
                    .ok_or_else(|| FormError::UnsupportedValue("empty choice list".into()))?;
                let selected = last
                    .as_u64()
                    .and_then(|i| usize::try_from(i).ok())
                    .ok_or_else(|| {
                        FormError::UnsupportedValue(format!(
                            "choice list must end with the selected index, found {last}"
                        ))
                    })?;
                let options = rest
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(ChoiceOption::Text(s.clone())),
                        Value::Number(n) => n.as_i64().map(ChoiceOption::Integer).ok_or_else(|| {
                            FormError::UnsupportedValue(format!("choice option {n}"))
                        }),
                        other => Err(FormError::UnsupportedValue(format!("choice option {other}"))),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(FieldValue::Choice { options, selected })
            }
            other => Err(FormError::UnsupportedValue(other.to_string())),
        }
    }

    /// The value in its exported JSON form.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::from(s.as_str()),
            FieldValue::Integer(n) => Value::from(*n),
            FieldValue::Float(x) => Value::from(*x),
            FieldValue::Boolean(b) => Value::from(*b),
            FieldValue::Choice { options, selected } => Value::Array(
                options
                    .iter()
                    .map(ChoiceOption::to_json)
                    .chain(std::iter::once(Value::from(*selected)))
                    .collect(),
            ),
        }
    }
}

fn format_float(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 {
        format!("{x:.1}")
    } else {
        x.to_string()
    }
}

impl TryFrom<Value> for FieldValue {
    type Error = FormError;

    fn try_from(value: Value) -> Result<Self> {
        FieldValue::from_json(&value)
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        value.to_json()
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Integer(n.into())
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        FieldValue::Float(x)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

/// A named input of a form.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterField {
    /// Label shown to the operator and key of the exported document.
    pub name: String,
    /// Initial value; also fixes the field's kind.
    pub default: FieldValue,
}

impl ParameterField {
    /// Create a field.
    pub fn new(name: impl Into<String>, default: impl Into<FieldValue>) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_kinds() {
        assert_eq!(FieldValue::from_json(&json!("abc")).unwrap(), FieldValue::from("abc"));
        assert_eq!(FieldValue::from_json(&json!(5)).unwrap(), FieldValue::Integer(5));
        assert_eq!(FieldValue::from_json(&json!(-2)).unwrap(), FieldValue::Integer(-2));
        assert_eq!(FieldValue::from_json(&json!(0.5)).unwrap(), FieldValue::Float(0.5));
        assert_eq!(FieldValue::from_json(&json!(true)).unwrap(), FieldValue::Boolean(true));
        assert_eq!(
            FieldValue::from_json(&json!(["x", "y", "z", 1])).unwrap(),
            FieldValue::choice(["x", "y", "z"], 1)
        );
        assert_eq!(
            FieldValue::from_json(&json!([8, 16, "auto", 2])).unwrap(),
            FieldValue::Choice {
                options: vec![
                    ChoiceOption::Integer(8),
                    ChoiceOption::Integer(16),
                    ChoiceOption::Text("auto".into()),
                ],
                selected: 2,
            }
        );
    }

    #[test]
    fn test_from_json_rejects() {
        for bad in [
            json!(null),
            json!({"a": 1}),
            json!([]),
            json!(["x", "y"]),
            json!(["x", -1]),
            json!([[1], 0]),
        ] {
            assert!(
                matches!(FieldValue::from_json(&bad), Err(FormError::UnsupportedValue(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_to_json_choice_layout() {
        let v = FieldValue::choice(["a", "b"], 1);
        assert_eq!(v.to_json(), json!(["a", "b", 1]));
        assert_eq!(FieldValue::Float(2.5).to_json(), json!(2.5));
    }

    #[test]
    fn test_display_text() {
        assert_eq!(FieldValue::Integer(5).display_text(), "5");
        assert_eq!(FieldValue::Float(5.0).display_text(), "5.0");
        assert_eq!(FieldValue::Float(0.25).display_text(), "0.25");
        assert_eq!(FieldValue::Boolean(false).display_text(), "False");
        assert_eq!(FieldValue::choice([10, 20], 1).display_text(), "20");
        assert_eq!(FieldValue::choice(["a"], 3).display_text(), "");
    }

    #[test]
    fn test_choice_option_parse() {
        assert_eq!(ChoiceOption::parse("12"), ChoiceOption::Integer(12));
        assert_eq!(ChoiceOption::parse("z"), ChoiceOption::Text("z".into()));
        assert_eq!(ChoiceOption::parse("1.5"), ChoiceOption::Text("1.5".into()));
    }

    #[test]
    fn test_same_kind() {
        let a = FieldValue::choice(["a", "b"], 0);
        assert!(a.same_kind(&FieldValue::choice(["a", "b"], 1)));
        assert!(!a.same_kind(&FieldValue::choice(["a", "c"], 1)));
        assert!(FieldValue::Integer(1).same_kind(&FieldValue::Integer(9)));
        assert!(!FieldValue::Integer(1).same_kind(&FieldValue::Float(1.0)));
    }

    #[test]
    fn test_serde_through_json() {
        let v: Vec<FieldValue> = serde_json::from_str(r#"["a", 3, ["p", "q", 0]]"#).unwrap();
        assert_eq!(v[2], FieldValue::choice(["p", "q"], 0));
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"["a",3,["p","q",0]]"#);
    }
}
