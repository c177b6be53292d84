use thiserror::Error;

use crate::types::Arity;

/// Errors produced when parsing condition text.
///
/// Every variant names the comparator (as written) and the offending text so
/// callers can report it against the original condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no recognizable comparator found in '{condition}'")]
    Unrecognized { condition: String },

    #[error("unknown comparator '{token}'")]
    UnknownComparator { token: String },

    #[error("invalid '{comparator}' on '{controls}': controls not expected")]
    UnexpectedControls { comparator: String, controls: String },

    #[error("invalid '{comparator}': empty/blank controls not expected")]
    MissingControls { comparator: String },

    #[error("invalid '{comparator}' on '{controls}': expects {expected} control(s), found {actual}")]
    ControlCount {
        comparator: String,
        controls: String,
        expected: Arity,
        actual: usize,
    },

    #[error("invalid '{comparator}' on '{control}': expects numeric")]
    NotNumeric { comparator: String, control: String },
}
