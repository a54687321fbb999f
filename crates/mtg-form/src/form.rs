//! Modal form state machine.
//!
//! A [`FormHandle`] starts out [`FormState::Built`] and ends either
//! [`FormState::Submitted`] with one string per field, or
//! [`FormState::Cancelled`] with no values. Both end states are final:
//! any further operation fails with [`FormError::Closed`].
//!
//! A [`FormDriver`] owns the interaction and blocks until the form
//! reaches an end state.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::error::{FormError, Result};
use crate::field::FieldValue;
use crate::spec::FormSpec;

/// Input control of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Editable text.
    Entry {
        /// Current content.
        text: String,
    },
    /// Read-only selection list.
    Choice {
        /// Option labels.
        options: Vec<String>,
        /// Selected option.
        selected: usize,
    },
}

impl Control {
    fn for_default(name: &str, default: &FieldValue) -> Result<Self> {
        match default {
            FieldValue::Choice { options, selected } => {
                if *selected >= options.len() {
                    return Err(FormError::InvalidChoiceIndex {
                        field: name.to_string(),
                        index: *selected,
                        options: options.len(),
                    });
                }
                Ok(Control::Choice {
                    options: options.iter().map(ToString::to_string).collect(),
                    selected: *selected,
                })
            }
            scalar => Ok(Control::Entry {
                text: scalar.display_text(),
            }),
        }
    }

    /// Current value as a string.
    pub fn value(&self) -> String {
        match self {
            Control::Entry { text } => text.clone(),
            Control::Choice { options, selected } => {
                options.get(*selected).cloned().unwrap_or_default()
            }
        }
    }
}

/// Lifecycle of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    /// Accepting input.
    Built,
    /// Closed with OK or Enter.
    Submitted,
    /// Closed with Cancel.
    Cancelled,
}

/// How a form was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// One value per field, in declaration order.
    Submitted(Vec<String>),
    /// The operator cancelled.
    Cancelled,
}

impl Outcome {
    /// Submitted values; empty when cancelled.
    pub fn values(&self) -> &[String] {
        match self {
            Outcome::Submitted(values) => values,
            Outcome::Cancelled => &[],
        }
    }

    /// Whether the form was submitted.
    pub fn is_submitted(&self) -> bool {
        matches!(self, Outcome::Submitted(_))
    }
}

/// A built form and its live controls.
#[derive(Debug, Clone)]
pub struct FormHandle {
    spec: FormSpec,
    controls: Vec<(String, Control)>,
    focus: usize,
    state: FormState,
    values: Vec<String>,
}

impl FormHandle {
    /// Create one control per field, in declaration order, with focus on
    /// the first field.
    pub fn build(spec: FormSpec) -> Result<Self> {
        let controls = spec
            .fields()
            .map(|f| Ok((f.name.clone(), Control::for_default(&f.name, &f.default)?)))
            .collect::<Result<Vec<_>>>()?;
        debug!(title = %spec.title, fields = controls.len(), "built form");
        Ok(Self {
            spec,
            controls,
            focus: 0,
            state: FormState::Built,
            values: Vec::new(),
        })
    }

    /// The form declaration.
    pub fn spec(&self) -> &FormSpec {
        &self.spec
    }

    /// Field names and controls, in declaration order.
    pub fn controls(&self) -> &[(String, Control)] {
        &self.controls
    }

    /// Control of field `index`.
    pub fn control(&self, index: usize) -> Option<&Control> {
        self.controls.get(index).map(|(_, c)| c)
    }

    /// Position of the field named `name`.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.controls.iter().position(|(n, _)| n == name)
    }

    /// Field holding the input focus.
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Current lifecycle state.
    pub fn state(&self) -> FormState {
        self.state
    }

    /// Values read on submission; empty otherwise.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// How the form was closed, once it is.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            FormState::Built => None,
            FormState::Submitted => Some(Outcome::Submitted(self.values.clone())),
            FormState::Cancelled => Some(Outcome::Cancelled),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            FormState::Built => Ok(()),
            _ => Err(FormError::Closed),
        }
    }

    fn control_mut(&mut self, index: usize) -> Result<(&str, &mut Control)> {
        self.controls
            .get_mut(index)
            .map(|(name, control)| (name.as_str(), control))
            .ok_or(FormError::NoSuchField(index))
    }

    /// Replace the text of entry `index`.
    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        self.ensure_open()?;
        match self.control_mut(index)? {
            (_, Control::Entry { text: current }) => {
                *current = text.into();
                Ok(())
            }
            (name, Control::Choice { .. }) => Err(FormError::WrongControl {
                field: name.to_string(),
                expected: "text",
            }),
        }
    }

    /// Select option `option` of choice `index`.
    pub fn select(&mut self, index: usize, option: usize) -> Result<()> {
        self.ensure_open()?;
        match self.control_mut(index)? {
            (name, Control::Choice { options, selected }) => {
                if option >= options.len() {
                    return Err(FormError::InvalidChoiceIndex {
                        field: name.to_string(),
                        index: option,
                        options: options.len(),
                    });
                }
                *selected = option;
                Ok(())
            }
            (name, Control::Entry { .. }) => Err(FormError::WrongControl {
                field: name.to_string(),
                expected: "choice",
            }),
        }
    }

    /// Select the option labelled `label` in choice `index`.
    pub fn select_label(&mut self, index: usize, label: &str) -> Result<()> {
        let option = match self.control(index) {
            Some(Control::Choice { options, .. }) => options.iter().position(|o| o == label),
            Some(Control::Entry { .. }) => None,
            None => return Err(FormError::NoSuchField(index)),
        };
        match option {
            Some(option) => self.select(index, option),
            None => {
                self.ensure_open()?;
                let field = self.controls[index].0.clone();
                match self.controls[index].1 {
                    Control::Choice { .. } => Err(FormError::ChoiceNotFound {
                        field,
                        value: label.to_string(),
                    }),
                    Control::Entry { .. } => Err(FormError::WrongControl {
                        field,
                        expected: "choice",
                    }),
                }
            }
        }
    }

    /// Move the focus to the next field, wrapping around.
    pub fn focus_next(&mut self) -> Result<()> {
        self.ensure_open()?;
        if !self.controls.is_empty() {
            self.focus = (self.focus + 1) % self.controls.len();
        }
        Ok(())
    }

    /// Move the focus to the previous field, wrapping around.
    pub fn focus_prev(&mut self) -> Result<()> {
        self.ensure_open()?;
        if !self.controls.is_empty() {
            self.focus = (self.focus + self.controls.len() - 1) % self.controls.len();
        }
        Ok(())
    }

    /// Read every control, in declaration order, and close the form.
    pub fn submit(&mut self) -> Result<Vec<String>> {
        self.ensure_open()?;
        self.values = self.controls.iter().map(|(_, c)| c.value()).collect();
        self.state = FormState::Submitted;
        debug!(title = %self.spec.title, "form submitted");
        Ok(self.values.clone())
    }

    /// Clear every entry, return the focus to the first field and close
    /// the form without values.
    pub fn cancel(&mut self) -> Result<()> {
        self.ensure_open()?;
        for (_, control) in &mut self.controls {
            if let Control::Entry { text } = control {
                text.clear();
            }
        }
        self.focus = 0;
        self.values.clear();
        self.state = FormState::Cancelled;
        debug!(title = %self.spec.title, "form cancelled");
        Ok(())
    }
}

/// Runs a form until it is submitted or cancelled.
pub trait FormDriver {
    /// Block until the operator closes `form`.
    fn run(&mut self, form: FormHandle) -> Result<Outcome>;
}

/// One scripted operator action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// Replace the text of a field, by name.
    SetText(String, String),
    /// Select an option of a choice field by its label.
    Select(String, String),
    /// Tab.
    FocusNext,
    /// Shift-Tab.
    FocusPrev,
    /// OK or Enter.
    Submit,
    /// Cancel.
    Cancel,
}

/// Headless driver replaying a fixed list of actions.
///
/// A script that ends with the form still open closes it like the window
/// manager would: without values.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDriver {
    actions: VecDeque<FormAction>,
}

impl ScriptedDriver {
    /// Driver replaying `actions` in order.
    pub fn new(actions: impl IntoIterator<Item = FormAction>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    fn field(form: &FormHandle, name: &str) -> Result<usize> {
        form.field_index(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }
}

impl FormDriver for ScriptedDriver {
    fn run(&mut self, mut form: FormHandle) -> Result<Outcome> {
        while let Some(action) = self.actions.pop_front() {
            match action {
                FormAction::SetText(name, text) => {
                    let i = Self::field(&form, &name)?;
                    form.set_text(i, text)?;
                }
                FormAction::Select(name, label) => {
                    let i = Self::field(&form, &name)?;
                    form.select_label(i, &label)?;
                }
                FormAction::FocusNext => form.focus_next()?,
                FormAction::FocusPrev => form.focus_prev()?,
                FormAction::Submit => {
                    return Ok(Outcome::Submitted(form.submit()?));
                }
                FormAction::Cancel => {
                    form.cancel()?;
                    return Ok(Outcome::Cancelled);
                }
            }
        }
        warn!(title = %form.spec().title, "script ended with the form open");
        form.cancel()?;
        Ok(Outcome::Cancelled)
    }
}
