mod controls;
mod error;
pub(crate) mod grammar;
mod parser;

pub use controls::format_controls;
pub use error::ParseError;
pub use parser::{ConditionParser, Normalize, Split, Trim};

use crate::catalog::Catalog;
use crate::types::{ComparatorDef, ParsedCondition};

/// Parse condition text such as `age >= 21` or `role in (admin,owner)`.
///
/// Uses the default [`ConditionParser`]: trimming normalizer, type checks on.
///
/// # Errors
///
/// Returns [`ParseError`] if no comparator is recognized, the control count
/// does not fit the comparator, or a control has the wrong type.
pub fn parse_condition(text: &str) -> Result<ParsedCondition, ParseError> {
    ConditionParser::new().parse(text)
}

/// Look up a comparator by its exact token, e.g. `" is not empty"` or `">="`.
///
/// # Errors
///
/// Returns [`ParseError::UnknownComparator`] if the token is not registered.
pub fn resolve_comparator(token: &str) -> Result<&'static ComparatorDef, ParseError> {
    Catalog::global()
        .find(Some(token))
        .ok_or_else(|| ParseError::UnknownComparator {
            token: token.to_owned(),
        })
}

/// Like [`resolve_comparator`], but `None` yields the `Any` catch-all and an
/// unknown token yields `None`.
#[must_use]
pub fn find_comparator(token: Option<&str>) -> Option<&'static ComparatorDef> {
    Catalog::global().find(token)
}
