use crate::catalog::Catalog;
use crate::types::{ComparatorDef, ParsedCondition};

use super::controls::parse_controls;
use super::error::ParseError;

/// Text normalization applied to the subject and to every control before it
/// is stored: trimming, and whatever reference or escape resolution the host
/// engine still has pending.
///
/// Any `Fn(&str) -> String` is a normalizer.
pub trait Normalize {
    fn normalize(&self, raw: &str) -> String;
}

impl<F> Normalize for F
where
    F: Fn(&str) -> String,
{
    fn normalize(&self, raw: &str) -> String {
        self(raw)
    }
}

/// The default normalizer: trims surrounding whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trim;

impl Normalize for Trim {
    fn normalize(&self, raw: &str) -> String {
        raw.trim().to_owned()
    }
}

/// A condition split into its three zones, before control parsing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Split<'t> {
    pub subject: &'t str,
    pub comparator: &'static ComparatorDef,
    pub controls: &'t str,
}

/// Parses condition text against the global comparator catalog.
///
/// # Example
///
/// ```
/// use condlang::{Comparator, ConditionParser};
///
/// let parser = ConditionParser::new();
/// let cond = parser.parse("role in (admin,owner)").unwrap();
/// assert_eq!(cond.comparator().comparator, Comparator::In);
/// assert_eq!(cond.controls(), ["admin", "owner"]);
/// ```
#[derive(Debug, Clone)]
pub struct ConditionParser<N = Trim> {
    catalog: &'static Catalog,
    normalizer: N,
    check_types: bool,
}

impl ConditionParser<Trim> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            catalog: Catalog::global(),
            normalizer: Trim,
            check_types: true,
        }
    }
}

impl Default for ConditionParser<Trim> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Normalize> ConditionParser<N> {
    /// Replace the normalizer applied to the subject and each control.
    #[must_use]
    pub fn with_normalizer<M: Normalize>(self, normalizer: M) -> ConditionParser<M> {
        ConditionParser {
            catalog: self.catalog,
            normalizer,
            check_types: self.check_types,
        }
    }

    /// Skip control type validation in [`parse`](Self::parse). Useful while
    /// controls may still hold unresolved references.
    #[must_use]
    pub fn defer_type_check(mut self, defer: bool) -> Self {
        self.check_types = !defer;
        self
    }

    /// Split `text` into subject, comparator, and raw controls.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Unrecognized`] if no comparator token matches.
    pub fn split<'t>(&self, text: &'t str) -> Result<Split<'t>, ParseError> {
        let text = text.trim();
        let unrecognized = || {
            tracing::debug!(condition = text, "no comparator recognized");
            ParseError::Unrecognized {
                condition: text.to_owned(),
            }
        };

        let caps = self.catalog.recognizer().captures(text).ok_or_else(unrecognized)?;
        let operator = caps.name("operator").ok_or_else(unrecognized)?.as_str();
        let comparator =
            self.catalog
                .find(Some(operator))
                .ok_or_else(|| ParseError::UnknownComparator {
                    token: operator.to_owned(),
                })?;

        let subject = caps.name("subject").map_or("", |m| m.as_str());
        let controls = caps.name("controls").map_or("", |m| m.as_str());

        tracing::trace!(subject, operator, controls, "split condition");

        Ok(Split {
            subject,
            comparator,
            controls,
        })
    }

    /// Parse `text` into a [`ParsedCondition`], validating control types
    /// unless [`defer_type_check`](Self::defer_type_check) was set.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if no comparator is recognized, the control
    /// count does not fit the comparator, or a control has the wrong type.
    pub fn parse(&self, text: &str) -> Result<ParsedCondition, ParseError> {
        let parsed = self.parse_deferred(text)?;
        if self.check_types {
            crate::validate::validate_controls(parsed.comparator, &parsed.controls)
                .inspect_err(|err| tracing::debug!(condition = text, %err, "condition rejected"))?;
        }
        Ok(parsed)
    }

    /// Parse `text` without validating control types.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if no comparator is recognized or the control
    /// count does not fit the comparator.
    pub fn parse_deferred(&self, text: &str) -> Result<ParsedCondition, ParseError> {
        let split = self.split(text)?;
        let controls = parse_controls(split.comparator, split.controls, &self.normalizer)
            .inspect_err(|err| tracing::debug!(condition = text, %err, "condition rejected"))?;
        Ok(ParsedCondition::new(
            self.normalizer.normalize(split.subject),
            split.comparator,
            controls,
        ))
    }
}
