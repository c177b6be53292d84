//! Reference evaluation of parsed conditions.
//!
//! Evaluation is a pure function of the condition and the subject value.
//! Comparators that inspect the filesystem ask a [`FileProbe`] supplied by
//! the caller; nothing here touches the disk.

use regex::Regex;

use crate::types::{Comparator, ComparatorDef, EvaluateError, ParsedCondition};
use crate::validate::is_numeric;

/// Filesystem facts about the subject, interpreted as a path.
pub trait FileProbe {
    fn is_readable_file(&self, path: &str) -> bool;
    fn is_readable_dir(&self, path: &str) -> bool;
    /// A readable directory with no entries.
    fn is_empty_dir(&self, path: &str) -> bool;
    /// Size in bytes of a readable file.
    fn file_size(&self, path: &str) -> Option<u64>;
    fn file_content(&self, path: &str) -> Option<String>;
    /// Last modification time in epoch milliseconds.
    fn last_modified(&self, path: &str) -> Option<i64>;
    /// Names (not paths) of the files directly inside `dir`.
    fn list_files(&self, dir: &str) -> Vec<String>;
}

/// A probe for hosts without a filesystem: no path exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFiles;

impl FileProbe for NoFiles {
    fn is_readable_file(&self, _path: &str) -> bool {
        false
    }

    fn is_readable_dir(&self, _path: &str) -> bool {
        false
    }

    fn is_empty_dir(&self, _path: &str) -> bool {
        false
    }

    fn file_size(&self, _path: &str) -> Option<u64> {
        None
    }

    fn file_content(&self, _path: &str) -> Option<String> {
        None
    }

    fn last_modified(&self, _path: &str) -> Option<i64> {
        None
    }

    fn list_files(&self, _dir: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Evaluate `condition` against a subject value.
///
/// `subject` is `None` when the subject reference does not resolve. Only
/// `is defined` / `is undefined` tell that apart from an empty value.
///
/// # Errors
///
/// Returns [`EvaluateError::NotNumeric`] when a numeric comparator meets a
/// non-numeric subject or control, and [`EvaluateError::Pattern`] when a
/// `match` or pattern control is not a valid regex.
#[allow(clippy::cast_precision_loss)]
pub fn evaluate(
    condition: &ParsedCondition,
    subject: Option<&str>,
    probe: &dyn FileProbe,
) -> Result<bool, EvaluateError> {
    let def = condition.comparator();
    let controls = condition.controls();
    let text = subject.unwrap_or("");
    let first = controls.first().map_or("", String::as_str);

    let result = match def.comparator {
        Comparator::GreaterOrEqual => number(def, text)? >= number(def, first)?,
        Comparator::Greater => number(def, text)? > number(def, first)?,
        Comparator::LesserOrEqual => number(def, text)? <= number(def, first)?,
        Comparator::Lesser => number(def, text)? < number(def, first)?,
        Comparator::Equal => text == first,
        Comparator::NotEqual => text != first,
        Comparator::In | Comparator::Is => controls.iter().any(|c| c == text),
        Comparator::NotIn | Comparator::IsNot => !controls.iter().any(|c| c == text),
        Comparator::IsDefined => subject.is_some(),
        Comparator::IsUndefined => subject.is_none(),
        Comparator::IsEmpty => text.is_empty(),
        Comparator::IsNotEmpty => !text.is_empty(),
        Comparator::ReadableFile => probe.is_readable_file(text),
        Comparator::NotReadableFile => !probe.is_readable_file(text),
        Comparator::ReadablePath => probe.is_readable_dir(text),
        Comparator::NotReadablePath => !probe.is_readable_dir(text),
        Comparator::EmptyPath => probe.is_empty_dir(text),
        Comparator::NotEmptyPath => !probe.is_empty_dir(text),
        Comparator::Contain => text.contains(first),
        Comparator::NotContain => !controls.iter().any(|c| text.contains(c.as_str())),
        Comparator::StartsWith => text.starts_with(first),
        Comparator::NotStartsWith => !text.starts_with(first),
        Comparator::EndsWith => text.ends_with(first),
        Comparator::NotEndsWith => !text.ends_with(first),
        Comparator::Match => full_match(first)?.is_match(text),
        Comparator::Between => {
            let value = number(def, text)?;
            let (a, b) = (number(def, first)?, number(def, control(controls, 1))?);
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            (low..=high).contains(&value)
        }
        Comparator::HasLengthOf => text.chars().count() as f64 == number(def, first)?,
        Comparator::FileSize => {
            let min = number(def, first)?;
            probe.file_size(text).is_some_and(|size| size as f64 >= min)
        }
        Comparator::HasFileContent => probe
            .file_content(text)
            .is_some_and(|content| content.contains(first)),
        Comparator::HasFileContentPattern => {
            let re = compile(first)?;
            probe
                .file_content(text)
                .is_some_and(|content| re.is_match(&content))
        }
        Comparator::ContainFile => probe.list_files(text).iter().any(|name| name == first),
        Comparator::ContainFilePattern => {
            let re = full_match(first)?;
            probe.list_files(text).iter().any(|name| re.is_match(name))
        }
        Comparator::LastModifiedGreater => {
            let at = number(def, first)?;
            probe.last_modified(text).is_some_and(|m| m as f64 > at)
        }
        Comparator::LastModifiedLesser => {
            let at = number(def, first)?;
            probe.last_modified(text).is_some_and(|m| (m as f64) < at)
        }
        Comparator::LastModifiedEqual => {
            let at = number(def, first)?;
            probe.last_modified(text).is_some_and(|m| m as f64 == at)
        }
        Comparator::TrueOrFalse => is_truthy(text),
        Comparator::Any => true,
    };

    tracing::trace!(condition = %condition, subject = text, result, "evaluated condition");
    Ok(result)
}

fn control(controls: &[String], index: usize) -> &str {
    controls.get(index).map_or("", String::as_str)
}

fn number(def: &ComparatorDef, value: &str) -> Result<f64, EvaluateError> {
    let not_numeric = || EvaluateError::NotNumeric {
        comparator: def.to_string(),
        value: value.to_owned(),
    };
    if !is_numeric(value) {
        return Err(not_numeric());
    }
    value.trim().parse().map_err(|_| not_numeric())
}

fn compile(pattern: &str) -> Result<Regex, EvaluateError> {
    Regex::new(pattern).map_err(|source| EvaluateError::Pattern {
        pattern: pattern.to_owned(),
        source,
    })
}

fn full_match(pattern: &str) -> Result<Regex, EvaluateError> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|source| EvaluateError::Pattern {
        pattern: pattern.to_owned(),
        source,
    })
}

fn is_truthy(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "on"
    )
}
