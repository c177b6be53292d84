use crate::types::{Arity, ComparatorDef};

use super::error::ParseError;
use super::grammar::{self, EMPTY_QUOTES, GROUP_CLOSE, GROUP_OPEN, ITEM_SEP};
use super::parser::Normalize;

/// Turn the raw controls zone into the ordered control list for `def`.
///
/// Two and Variable comparators take a `( … )` group; a bare value is
/// wrapped into a one-item group before the count is checked, so
/// `role in admin` reads as `role in (admin)`.
pub(crate) fn parse_controls<N: Normalize + ?Sized>(
    def: &ComparatorDef,
    raw: &str,
    normalizer: &N,
) -> Result<Vec<String>, ParseError> {
    let raw = raw.trim();

    if raw.is_empty() {
        return match def.arity {
            Arity::None => Ok(Vec::new()),
            _ => Err(ParseError::MissingControls {
                comparator: def.to_string(),
            }),
        };
    }

    match def.arity {
        Arity::None => Err(ParseError::UnexpectedControls {
            comparator: def.to_string(),
            controls: raw.to_owned(),
        }),
        arity if arity.is_grouped() => parse_group(def, raw, normalizer),
        _ => Ok(vec![normalize_item(raw, normalizer)]),
    }
}

fn parse_group<N: Normalize + ?Sized>(
    def: &ComparatorDef,
    raw: &str,
    normalizer: &N,
) -> Result<Vec<String>, ParseError> {
    let body = match grammar::group_body(raw) {
        Some(body) => body.to_owned(),
        None => normalizer.normalize(raw),
    };

    let items = grammar::split_items(&body);
    if !def.arity.accepts(items.len()) {
        return Err(ParseError::ControlCount {
            comparator: def.to_string(),
            controls: raw.to_owned(),
            expected: def.arity,
            actual: items.len(),
        });
    }

    Ok(items
        .into_iter()
        .map(|item| normalize_item(item, normalizer))
        .collect())
}

fn normalize_item<N: Normalize + ?Sized>(item: &str, normalizer: &N) -> String {
    if item.trim() == EMPTY_QUOTES {
        String::new()
    } else {
        normalizer.normalize(item)
    }
}

/// Render controls in canonical form: bare for One, `(a,b,c)` for Two and
/// Variable, nothing for None. Empty controls render as `""`.
#[must_use]
pub fn format_controls(def: &ComparatorDef, controls: &[String]) -> String {
    match def.arity {
        Arity::None => String::new(),
        arity if arity.is_grouped() => {
            let items: Vec<&str> = controls.iter().map(|c| render(c)).collect();
            let sep = ITEM_SEP.to_string();
            format!("{GROUP_OPEN}{}{GROUP_CLOSE}", items.join(sep.as_str()))
        }
        _ => controls.first().map(|c| render(c)).unwrap_or_default().to_owned(),
    }
}

fn render(control: &str) -> &str {
    if control.is_empty() {
        EMPTY_QUOTES
    } else {
        control
    }
}
