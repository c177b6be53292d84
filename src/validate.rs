use crate::parse::ParseError;
use crate::types::{ComparatorDef, ControlType};

/// Check every control against the comparator's expected type.
///
/// Only [`ControlType::Number`] constrains the control text. The other
/// types compare structurally at evaluation time.
///
/// # Errors
///
/// Returns [`ParseError::NotNumeric`] naming the first non-numeric control.
pub fn validate_controls(def: &ComparatorDef, controls: &[String]) -> Result<(), ParseError> {
    if def.expected != ControlType::Number {
        return Ok(());
    }
    match controls.iter().find(|control| !is_numeric(control)) {
        Some(control) => Err(ParseError::NotNumeric {
            comparator: def.to_string(),
            control: control.clone(),
        }),
        None => Ok(()),
    }
}

/// Whether `text` is an integer or decimal literal with an optional sign.
#[must_use]
pub fn is_numeric(text: &str) -> bool {
    crate::parse::grammar::is_numeric(text)
}
