//! The fixed comparator table and the composite recognizer built from it.
//!
//! The catalog is built once, on first use, and is immutable afterwards.
//! Every lookup and every parse reads it without synchronization.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::types::Arity::{None as Nullary, One, Two, Variable};
use crate::types::Comparator as C;
use crate::types::ControlType::{Any as AnyType, Boolean, Number, Text};
use crate::types::{CatalogError, Comparator, ComparatorDef};

/// Every comparator, in declaration order. Declaration order breaks rank ties.
pub static COMPARATORS: &[ComparatorDef] = &[
    ComparatorDef::new(C::GreaterOrEqual, Some(" >= "), One, Number, 1.0),
    ComparatorDef::new(C::GreaterOrEqual, Some(">="), One, Number, 1.1),
    ComparatorDef::new(C::Greater, Some(" > "), One, Number, 1.2),
    ComparatorDef::new(C::Greater, Some(">"), One, Number, 1.3),
    ComparatorDef::new(C::LesserOrEqual, Some(" <= "), One, Number, 1.4),
    ComparatorDef::new(C::LesserOrEqual, Some("<="), One, Number, 1.5),
    ComparatorDef::new(C::Lesser, Some(" < "), One, Number, 1.6),
    ComparatorDef::new(C::Lesser, Some("<"), One, Number, 1.7),
    ComparatorDef::new(C::NotEqual, Some(" != "), One, Text, 1.8),
    ComparatorDef::new(C::NotEqual, Some("!="), One, Text, 1.9),
    ComparatorDef::new(C::Equal, Some(" = "), One, Text, 1.91),
    ComparatorDef::new(C::Equal, Some("="), One, Text, 1.92),
    ComparatorDef::new(C::NotIn, Some(" not in "), Variable, Text, 2.0),
    ComparatorDef::new(C::In, Some(" in "), Variable, Text, 2.1),
    // "is not …" family; see `hoist_negated_is`
    ComparatorDef::new(C::NotReadableFile, Some(" is not readable-file"), Nullary, Boolean, 2.2),
    ComparatorDef::new(C::NotReadablePath, Some(" is not readable-path"), Nullary, Boolean, 2.21),
    ComparatorDef::new(C::NotEmptyPath, Some(" is not empty-path"), Nullary, Boolean, 2.22),
    ComparatorDef::new(C::IsNotEmpty, Some(" is not empty"), Nullary, AnyType, 2.23),
    ComparatorDef::new(C::IsNot, Some(" is not "), Variable, Text, 2.24),
    // "is …" family; the bare " is " must stay last
    ComparatorDef::new(C::IsDefined, Some(" is defined"), Nullary, AnyType, 2.3),
    ComparatorDef::new(C::IsUndefined, Some(" is undefined"), Nullary, AnyType, 2.31),
    ComparatorDef::new(C::ReadableFile, Some(" is readable-file"), Nullary, Boolean, 2.32),
    ComparatorDef::new(C::ReadablePath, Some(" is readable-path"), Nullary, Boolean, 2.33),
    ComparatorDef::new(C::EmptyPath, Some(" is empty-path"), Nullary, Boolean, 2.34),
    ComparatorDef::new(C::IsEmpty, Some(" is empty"), Nullary, AnyType, 2.35),
    ComparatorDef::new(C::Is, Some(" is "), Variable, Text, 2.36),
    ComparatorDef::new(C::NotContain, Some(" not contain "), Variable, Text, 3.1),
    ComparatorDef::new(C::NotStartsWith, Some(" not start with "), One, Text, 3.2),
    ComparatorDef::new(C::NotEndsWith, Some(" not end with "), One, Text, 3.3),
    ComparatorDef::new(C::ContainFilePattern, Some(" contain file pattern "), One, Text, 3.34),
    ComparatorDef::new(C::ContainFile, Some(" contain file "), One, Text, 3.35),
    ComparatorDef::new(C::Between, Some(" between "), Two, Number, 3.4),
    ComparatorDef::new(C::Contain, Some(" contain "), One, Text, 3.5),
    ComparatorDef::new(C::StartsWith, Some(" start with "), One, Text, 3.6),
    ComparatorDef::new(C::EndsWith, Some(" end with "), One, Text, 3.7),
    ComparatorDef::new(C::Match, Some(" match "), One, Text, 3.8),
    ComparatorDef::new(C::HasLengthOf, Some(" has length of "), One, Number, 3.9),
    ComparatorDef::new(C::FileSize, Some(" has file-size "), One, Number, 4.0),
    ComparatorDef::new(C::HasFileContentPattern, Some(" has file content pattern "), One, Text, 4.1),
    ComparatorDef::new(C::HasFileContent, Some(" has file content "), One, Text, 4.2),
    ComparatorDef::new(C::LastModifiedGreater, Some(" has lastmod > "), One, Number, 4.3),
    ComparatorDef::new(C::LastModifiedLesser, Some(" has lastmod < "), One, Number, 4.4),
    ComparatorDef::new(C::LastModifiedEqual, Some(" has lastmod = "), One, Number, 4.5),
    ComparatorDef::new(C::TrueOrFalse, None, Nullary, Boolean, 5.0),
    ComparatorDef::new(C::Any, None, Nullary, AnyType, 10.0),
];

/// Subject and controls zones: a single quoted token, or a lazy run of anything.
/// The recognizer sets `s`, so either zone may span line breaks.
const ZONE: &str = r#"".+?"|.+?"#;

const IS_PREFIX: &str = " is ";
const IS_NOT_PREFIX: &str = " is not";

static CATALOG: OnceLock<Catalog> = OnceLock::new();

/// Lookup tables and the composite recognizer derived from a comparator table.
#[derive(Debug)]
pub struct Catalog {
    by_token: HashMap<&'static str, &'static ComparatorDef>,
    order: Vec<&'static ComparatorDef>,
    recognizer: Regex,
    any: &'static ComparatorDef,
    true_or_false: &'static ComparatorDef,
}

impl Catalog {
    /// The process-wide catalog built from [`COMPARATORS`].
    ///
    /// # Panics
    ///
    /// Panics on first use if the built-in table is corrupt (duplicate token,
    /// missing catch-all, unorderable tokens). That is a defect in the table,
    /// not a recoverable condition.
    #[allow(clippy::expect_used)] // built-in table is fixed at compile time
    pub fn global() -> &'static Catalog {
        CATALOG.get_or_init(|| Catalog::build(COMPARATORS).expect("built-in comparator table is valid"))
    }

    /// Build a catalog from a comparator table.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if two rows share a token, no row has a token,
    /// a catch-all row is missing, or the recognizer cannot be ordered so that
    /// longer tokens precede their prefixes.
    pub fn build(table: &'static [ComparatorDef]) -> Result<Self, CatalogError> {
        let mut by_token = HashMap::new();
        let mut order = Vec::new();

        for def in table {
            let Some(token) = def.token else { continue };
            if by_token.insert(token, def).is_some() {
                return Err(CatalogError::DuplicateToken {
                    token: token.to_owned(),
                });
            }
            order.push(def);
        }

        if order.is_empty() {
            return Err(CatalogError::EmptyRecognizer);
        }

        // Stable: equal ranks keep declaration order.
        order.sort_by(|a, b| a.rank.total_cmp(&b.rank));
        hoist_negated_is(&mut order);
        check_prefix_order(&order)?;

        let any = find_catch_all(table, Comparator::Any)?;
        let true_or_false = find_catch_all(table, Comparator::TrueOrFalse)?;

        let recognizer = Regex::new(&recognizer_pattern(&order))?;

        tracing::debug!(
            tokens = order.len(),
            pattern_len = recognizer.as_str().len(),
            "built comparator recognizer"
        );

        Ok(Self {
            by_token,
            order,
            recognizer,
            any,
            true_or_false,
        })
    }

    /// Look up a comparator by literal token. `None` yields the `Any`
    /// catch-all; an unregistered token yields `None`.
    #[must_use]
    pub fn find(&self, token: Option<&str>) -> Option<&'static ComparatorDef> {
        match token {
            None => Some(self.any),
            Some(token) => self.by_token.get(token).copied(),
        }
    }

    /// The composite recognizer. Capture groups: `subject`, `operator`, `controls`.
    #[must_use]
    pub fn recognizer(&self) -> &Regex {
        &self.recognizer
    }

    /// Tokens in the order the recognizer tries them.
    pub fn tokens(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().filter_map(|def| def.token)
    }

    /// Every comparator with a literal token, in recognizer order.
    pub fn definitions(&self) -> impl Iterator<Item = &'static ComparatorDef> + '_ {
        self.order.iter().copied()
    }

    #[must_use]
    pub fn any(&self) -> &'static ComparatorDef {
        self.any
    }

    #[must_use]
    pub fn true_or_false(&self) -> &'static ComparatorDef {
        self.true_or_false
    }
}

pub(crate) fn any() -> &'static ComparatorDef {
    Catalog::global().any()
}

pub(crate) fn true_or_false() -> &'static ComparatorDef {
    Catalog::global().true_or_false()
}

fn find_catch_all(
    table: &'static [ComparatorDef],
    comparator: Comparator,
) -> Result<&'static ComparatorDef, CatalogError> {
    table
        .iter()
        .find(|def| def.comparator == comparator && def.token.is_none())
        .ok_or(CatalogError::MissingCatchAll { comparator })
}

fn is_negated_is(def: &ComparatorDef) -> bool {
    def.token.is_some_and(|t| t.starts_with(IS_NOT_PREFIX))
}

fn is_plain_is(def: &ComparatorDef) -> bool {
    def.token
        .is_some_and(|t| t.starts_with(IS_PREFIX) && !t.starts_with(IS_NOT_PREFIX))
}

/// Move every `" is not …"` token ahead of the first plain `" is …"` token.
///
/// `" is "` is a prefix of `" is not …"`; if the plain form were tried first
/// the operator would be cut short and `not …` would leak into the controls.
/// Ranks happen to order the built-in table correctly, but this step does not
/// rely on them.
fn hoist_negated_is(order: &mut Vec<&'static ComparatorDef>) {
    let Some(first_plain) = order.iter().position(|def| is_plain_is(def)) else {
        return;
    };

    let tail = order.split_off(first_plain);
    let (negated, rest): (Vec<&'static ComparatorDef>, Vec<&'static ComparatorDef>) =
        tail.into_iter().partition(|def| is_negated_is(def));
    order.extend(negated);
    order.extend(rest);
}

/// Every token must be tried before any shorter token that is its prefix.
fn check_prefix_order(order: &[&'static ComparatorDef]) -> Result<(), CatalogError> {
    let tokens: Vec<&str> = order.iter().filter_map(|def| def.token).collect();
    for (i, shorter) in tokens.iter().enumerate() {
        if let Some(longer) = tokens[i + 1..]
            .iter()
            .find(|later| later.len() > shorter.len() && later.starts_with(shorter))
        {
            return Err(CatalogError::Ordering {
                longer: longer.to_string(),
                shorter: shorter.to_string(),
            });
        }
    }
    Ok(())
}

/// `regex::escape` covers exactly the characters that are structural in this
/// regex grammar. `!`, `=`, `<` and `>` are literals here, and `\<`/`\>`
/// would mean word boundaries, so they are left as they are.
fn recognizer_pattern(order: &[&'static ComparatorDef]) -> String {
    let alternation = order
        .iter()
        .filter_map(|def| def.token)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|");

    format!(
        r"(?s)^\s*(?P<subject>{ZONE})?\s*(?P<operator>{alternation})\s*(?P<controls>{ZONE})?\s*$"
    )
}
