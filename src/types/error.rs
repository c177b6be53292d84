use thiserror::Error;

use super::Comparator;

/// Errors raised while building the comparator catalog. These indicate a
/// corrupt comparator table, never bad user input.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate comparator token '{token}'")]
    DuplicateToken { token: String },

    #[error("comparator table has no literal tokens; recognizer would be empty")]
    EmptyRecognizer,

    #[error("token '{longer}' must precede its prefix '{shorter}' in the recognizer")]
    Ordering { longer: String, shorter: String },

    #[error("comparator table is missing the {comparator:?} catch-all")]
    MissingCatchAll { comparator: Comparator },

    #[error("invalid recognizer pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Errors raised while evaluating a parsed condition against a subject value.
#[derive(Debug, Error)]
pub enum EvaluateError {
    #[error("'{comparator}' expects a numeric value, got '{value}'")]
    NotNumeric { comparator: String, value: String },

    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
