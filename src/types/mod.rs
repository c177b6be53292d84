mod comparator;
mod condition;
mod error;

pub use comparator::{Arity, Comparator, ComparatorDef, ControlType};
pub use condition::ParsedCondition;
pub use error::{CatalogError, EvaluateError};
