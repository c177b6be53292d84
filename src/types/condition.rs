use std::fmt;

use super::comparator::{Comparator, ComparatorDef};

/// A condition split into subject, comparator, and normalized controls.
///
/// The control count always satisfies the comparator's [`Arity`](super::Arity).
/// Equality compares the comparator family rather than the table row, so a
/// padded and an unpadded spelling of the same operator compare equal.
#[derive(Debug, Clone)]
pub struct ParsedCondition {
    pub(crate) subject: String,
    pub(crate) comparator: &'static ComparatorDef,
    pub(crate) controls: Vec<String>,
}

impl ParsedCondition {
    pub(crate) fn new(
        subject: String,
        comparator: &'static ComparatorDef,
        controls: Vec<String>,
    ) -> Self {
        Self {
            subject,
            comparator,
            controls,
        }
    }

    /// An always-true condition on `subject`, for callers that need a no-op filter.
    #[must_use]
    pub fn untyped(subject: &str) -> Self {
        Self::new(subject.trim().to_owned(), crate::catalog::any(), Vec::new())
    }

    /// A condition that treats `subject` as a boolean literal.
    #[must_use]
    pub fn truthy(subject: &str) -> Self {
        Self::new(
            subject.trim().to_owned(),
            crate::catalog::true_or_false(),
            Vec::new(),
        )
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn comparator(&self) -> &'static ComparatorDef {
        self.comparator
    }

    #[must_use]
    pub fn controls(&self) -> &[String] {
        &self.controls
    }

    /// Canonical text of the controls alone, e.g. `(Open,Closed,"")`.
    #[must_use]
    pub fn controls_text(&self) -> String {
        crate::parse::format_controls(self.comparator, &self.controls)
    }
}

#[cfg(feature = "binary-cache")]
impl ParsedCondition {
    /// Encode this condition for a caller-side cache.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, crate::serial::SerializeError> {
        crate::serial::encode(self)
    }

    /// Decode a condition previously produced by [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// format, integrity, or validation failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::serial::DeserializeError> {
        crate::serial::decode(bytes)
    }
}

impl PartialEq for ParsedCondition {
    fn eq(&self, other: &Self) -> bool {
        self.subject == other.subject
            && self.comparator.comparator == other.comparator.comparator
            && self.controls == other.controls
    }
}

impl Eq for ParsedCondition {}

impl fmt::Display for ParsedCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.comparator.comparator {
            // No literal form; the subject is the whole condition.
            Comparator::Any | Comparator::TrueOrFalse => write!(f, "{}", self.subject),
            _ => write!(
                f,
                "{}{}{}",
                self.subject,
                self.comparator.symbol(),
                self.controls_text()
            ),
        }
    }
}
