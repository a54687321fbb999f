//! Typed export of submitted form values.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{FormError, Result};
use crate::field::{ChoiceOption, FieldValue, ParameterField};
use crate::spec::FormSpec;

/// Field values in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    entries: Vec<(String, FieldValue)>,
}

impl ParameterSet {
    /// The defaults of `fields`.
    pub fn from_defaults(fields: &[ParameterField]) -> Self {
        Self {
            entries: fields
                .iter()
                .map(|f| (f.name.clone(), f.default.clone()))
                .collect(),
        }
    }

    /// Value of field `name`.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Set `name` to `value`, appending the field if it is new.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Fields and values in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> + '_ {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The set as a JSON object, keys in field order.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(n, v)| (n.clone(), v.to_json()))
            .collect();
        Value::Object(map)
    }

    /// Parse a JSON object of field values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(map) = value else {
            return Err(FormError::UnsupportedValue(
                "parameter document must be a JSON object".into(),
            ));
        };
        let entries = map
            .iter()
            .map(|(name, v)| Ok((name.clone(), FieldValue::from_json(v)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// Write the set to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, serde_json::to_string(&self.to_json())?)?;
        info!(path = %path.display(), fields = self.len(), "exported parameters");
        Ok(())
    }

    /// Read a set written by [`ParameterSet::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Use these values as the defaults of `spec`.
    ///
    /// Only fields of the same name and kind are replaced; a choice keeps
    /// its default unless the stored options are identical and the stored
    /// index is valid. Returns the number of fields replaced.
    pub fn apply_defaults(&self, spec: &mut FormSpec) -> usize {
        let mut replaced = 0;
        for field in spec.fields_mut() {
            let Some(stored) = self.get(&field.name) else {
                continue;
            };
            let valid = match stored {
                FieldValue::Choice { options, selected } => *selected < options.len(),
                _ => true,
            };
            if valid && field.default.same_kind(stored) {
                field.default = stored.clone();
                replaced += 1;
            }
        }
        debug!(replaced, "applied stored defaults");
        replaced
    }
}

/// Convert submitted strings back to the kinds of `fields`.
///
/// `values[i]` belongs to `fields[i]`. Fields past the end of `values` keep
/// their defaults, so converting the empty values of a cancelled form
/// yields the defaults.
///
/// Choices accept `"True"` / `"False"` as indices `0` / `1`. Other values
/// are matched against the options, as an integer when they parse as one
/// and as text otherwise.
pub fn retype(fields: &[ParameterField], values: &[String]) -> Result<ParameterSet> {
    let mut set = ParameterSet::from_defaults(fields);
    for ((field, value), (_, slot)) in fields.iter().zip(values).zip(set.entries.iter_mut()) {
        *slot = retype_value(field, value)?;
    }
    Ok(set)
}

/// Convert `fields` and `values` with [`retype`] and write the result to
/// `path`.
pub fn export_json(
    path: impl AsRef<Path>,
    fields: &[ParameterField],
    values: &[String],
) -> Result<ParameterSet> {
    let set = retype(fields, values)?;
    set.save(path)?;
    Ok(set)
}

fn retype_value(field: &ParameterField, value: &str) -> Result<FieldValue> {
    let conversion = |kind| FormError::Conversion {
        field: field.name.clone(),
        value: value.to_string(),
        kind,
    };
    match &field.default {
        FieldValue::Text(_) => Ok(FieldValue::Text(value.to_string())),
        FieldValue::Integer(_) => value
            .trim()
            .parse()
            .map(FieldValue::Integer)
            .map_err(|_| conversion("integer")),
        FieldValue::Float(_) => value
            .trim()
            .parse()
            .map(FieldValue::Float)
            .map_err(|_| conversion("float")),
        FieldValue::Boolean(_) => match value.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(FieldValue::Boolean(true)),
            "false" => Ok(FieldValue::Boolean(false)),
            _ => Err(conversion("boolean")),
        },
        FieldValue::Choice { options, .. } => {
            let selected = match value {
                "True" => 0,
                "False" => 1,
                _ => find_choice(options, value).ok_or_else(|| FormError::ChoiceNotFound {
                    field: field.name.clone(),
                    value: value.to_string(),
                })?,
            };
            if selected >= options.len() {
                return Err(FormError::InvalidChoiceIndex {
                    field: field.name.clone(),
                    index: selected,
                    options: options.len(),
                });
            }
            Ok(FieldValue::Choice {
                options: options.clone(),
                selected,
            })
        }
    }
}

/// Typed match first, then by label so `"07"` still finds option `"07"`.
fn find_choice(options: &[ChoiceOption], value: &str) -> Option<usize> {
    let parsed = ChoiceOption::parse(value);
    options
        .iter()
        .position(|o| *o == parsed)
        .or_else(|| options.iter().position(|o| o.to_string() == value))
}
