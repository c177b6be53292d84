use winnow::ascii::digit1;
use winnow::combinator::{opt, separated};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::{one_of, take_till};

pub(crate) const GROUP_OPEN: char = '(';
pub(crate) const GROUP_CLOSE: char = ')';
pub(crate) const ITEM_SEP: char = ',';
/// An explicitly empty control.
pub(crate) const EMPTY_QUOTES: &str = "\"\"";

// -- Numbers ----------------------------------------------------------------

fn numeric_literal(input: &mut &str) -> ModalResult<()> {
    (
        opt(one_of(['+', '-'])),
        digit1,
        opt(('.', digit1)),
    )
        .void()
        .parse_next(input)
}

/// Integer or decimal literal with an optional sign: `5`, `-3`, `+2.75`.
pub(crate) fn is_numeric(text: &str) -> bool {
    numeric_literal.parse(text.trim()).is_ok()
}

// -- Groups -----------------------------------------------------------------

fn group_items<'i>(input: &mut &'i str) -> ModalResult<Vec<&'i str>> {
    separated(0.., take_till(0.., ITEM_SEP), ITEM_SEP).parse_next(input)
}

/// The text strictly between the outer grouping markers, if `text` is grouped.
pub(crate) fn group_body(text: &str) -> Option<&str> {
    text.strip_prefix(GROUP_OPEN)?.strip_suffix(GROUP_CLOSE)
}

/// Split a group body on the item separator. Zero-length items are dropped;
/// whitespace-only items are kept and normalize to empty controls.
pub(crate) fn split_items(body: &str) -> Vec<&str> {
    group_items
        .parse(body)
        .unwrap_or_default()
        .into_iter()
        .filter(|item| !item.is_empty())
        .collect()
}
