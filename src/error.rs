use thiserror::Error;

use crate::parse::ParseError;
use crate::types::{CatalogError, EvaluateError};

/// Unified error type covering catalog construction, parsing, evaluation,
/// and binary caching.
#[derive(Debug, Error)]
pub enum CondlangError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Evaluate(#[from] EvaluateError),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Serialize(#[from] crate::serial::SerializeError),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Deserialize(#[from] crate::serial::DeserializeError),
}
