//! A condition mini-language.
//!
//! Free-text predicates such as `age >= 21`, `status is not empty` or
//! `role in (admin,owner)` parse into a [`ParsedCondition`]: a subject, one
//! comparator from a fixed catalog, and an ordered list of control values.
//!
//! ```
//! use condlang::{parse_condition, Comparator};
//!
//! let cond = parse_condition("status in (Open,Closed,\"\")").unwrap();
//! assert_eq!(cond.subject(), "status");
//! assert_eq!(cond.comparator().comparator, Comparator::In);
//! assert_eq!(cond.controls(), ["Open", "Closed", ""]);
//! assert_eq!(cond.to_string(), "status in (Open,Closed,\"\")");
//! ```

pub mod catalog;
mod error;
pub mod evaluate;
pub mod parse;
#[cfg(feature = "binary-cache")]
pub mod serial;
mod types;
pub mod validate;

pub use catalog::Catalog;
pub use error::CondlangError;
pub use evaluate::{evaluate, FileProbe, NoFiles};
pub use parse::{
    find_comparator, format_controls, parse_condition, resolve_comparator, ConditionParser,
    Normalize, ParseError, Split, Trim,
};
#[cfg(feature = "binary-cache")]
pub use serial::{DeserializeError, SerializeError};
pub use types::{
    Arity, CatalogError, Comparator, ComparatorDef, ControlType, EvaluateError, ParsedCondition,
};
pub use validate::validate_controls;
