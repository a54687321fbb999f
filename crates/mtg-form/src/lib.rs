#![warn(missing_docs)]

//! Operator parameter forms for the multinozzle toolpath generator.
//!
//! A form is declared with a [`FormSpec`], built into a [`FormHandle`] and
//! run to completion by a [`FormDriver`]. The submitted strings are then
//! converted back to each field's declared kind and exported as JSON.
//!
//! ```
//! use mtg_form::{
//!     export::retype, FieldValue, FormAction, FormDriver, FormHandle, FormSpec,
//!     ParameterField, ScriptedDriver,
//! };
//!
//! let spec = FormSpec::new(
//!     "Project parameters",
//!     "Provide the parameters of your program.",
//!     vec![
//!         ParameterField::new("Name", "abc"),
//!         ParameterField::new("Count", 5),
//!     ],
//! );
//! let fields = spec.flat_fields();
//!
//! let mut driver = ScriptedDriver::new([
//!     FormAction::SetText("Count".into(), "7".into()),
//!     FormAction::Submit,
//! ]);
//! let outcome = driver.run(FormHandle::build(spec)?)?;
//!
//! let params = retype(&fields, outcome.values())?;
//! assert_eq!(params.get("Count"), Some(&FieldValue::Integer(7)));
//! # Ok::<(), mtg_form::FormError>(())
//! ```

pub mod error;
pub mod export;
pub mod field;
pub mod form;
pub mod layout;
pub mod spec;

pub use error::{FormError, Result};
pub use export::{export_json, retype, ParameterSet};
pub use field::{ChoiceOption, FieldValue, ParameterField};
pub use form::{Control, FormAction, FormDriver, FormHandle, FormState, Outcome, ScriptedDriver};
pub use layout::{FormLayout, Placement, Widget};
pub use spec::{FieldColumn, FormSpec, ImageInfo};
