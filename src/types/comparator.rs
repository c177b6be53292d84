use std::fmt;

/// Comparator families. Padded and unpadded spellings of the same operator
/// (e.g. `" >= "` and `">="`) share one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Comparator {
    GreaterOrEqual,
    Greater,
    LesserOrEqual,
    Lesser,
    NotEqual,
    Equal,
    NotIn,
    In,
    NotReadableFile,
    NotReadablePath,
    NotEmptyPath,
    IsNotEmpty,
    IsNot,
    IsDefined,
    IsUndefined,
    ReadableFile,
    ReadablePath,
    EmptyPath,
    IsEmpty,
    Is,
    NotContain,
    NotStartsWith,
    NotEndsWith,
    ContainFilePattern,
    ContainFile,
    Between,
    Contain,
    StartsWith,
    EndsWith,
    Match,
    HasLengthOf,
    FileSize,
    HasFileContentPattern,
    HasFileContent,
    LastModifiedGreater,
    LastModifiedLesser,
    LastModifiedEqual,
    TrueOrFalse,
    Any,
}

/// How many control values a comparator takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Arity {
    /// No controls: `x is empty`.
    None,
    /// Exactly one control: `x > 5`.
    One,
    /// Exactly two controls, grouped: `x between (1,10)`.
    Two,
    /// One or more controls, grouped or a single bare value: `x in (a,b)`.
    Variable,
}

impl Arity {
    /// Whether `count` controls satisfy this arity.
    #[must_use]
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::None => count == 0,
            Arity::One => count == 1,
            Arity::Two => count == 2,
            Arity::Variable => count >= 1,
        }
    }

    /// Whether controls for this arity are written inside `( … )`.
    #[must_use]
    pub fn is_grouped(self) -> bool {
        matches!(self, Arity::Two | Arity::Variable)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::None => write!(f, "0"),
            Arity::One => write!(f, "1"),
            Arity::Two => write!(f, "2"),
            Arity::Variable => write!(f, "1 or more"),
        }
    }
}

/// The shape a control value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControlType {
    Number,
    Text,
    Boolean,
    Any,
}

/// One row of the comparator table.
///
/// `token` is the literal operator text as it appears between subject and
/// controls, including its surrounding spaces. The two catch-all rows
/// ([`Comparator::TrueOrFalse`] and [`Comparator::Any`]) have no token and are
/// never reached by the recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparatorDef {
    pub comparator: Comparator,
    pub token: Option<&'static str>,
    pub arity: Arity,
    pub expected: ControlType,
    /// Recognizer ordering key. Lower is tried first.
    pub rank: f64,
}

/// Symbolic operators written without padding in the table; rendered with a
/// single space on each side.
const WRAP_WITH_SPACE: &[&str] = &[">", ">=", "<", "<=", "=", "!="];

impl ComparatorDef {
    pub(crate) const fn new(
        comparator: Comparator,
        token: Option<&'static str>,
        arity: Arity,
        expected: ControlType,
        rank: f64,
    ) -> Self {
        Self {
            comparator,
            token,
            arity,
            expected,
            rank,
        }
    }

    /// The operator as written in canonical condition text.
    #[must_use]
    pub fn symbol(&self) -> String {
        match self.token {
            Some(token) if WRAP_WITH_SPACE.contains(&token) => format!(" {token} "),
            Some(token) => token.to_owned(),
            None => String::new(),
        }
    }
}

impl fmt::Display for ComparatorDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.token {
            Some(_) => write!(f, "{}", self.symbol().trim()),
            None => write!(f, "{:?}", self.comparator),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouped_arities() {
        assert!(!Arity::None.is_grouped());
        assert!(!Arity::One.is_grouped());
        assert!(Arity::Two.is_grouped());
        assert!(Arity::Variable.is_grouped());
    }

    #[test]
    fn arity_accepts() {
        assert!(Arity::None.accepts(0));
        assert!(!Arity::None.accepts(1));
        assert!(Arity::One.accepts(1));
        assert!(!Arity::One.accepts(2));
        assert!(Arity::Two.accepts(2));
        assert!(!Arity::Two.accepts(1));
        assert!(!Arity::Two.accepts(3));
        assert!(Arity::Variable.accepts(1));
        assert!(Arity::Variable.accepts(7));
        assert!(!Arity::Variable.accepts(0));
    }

    #[test]
    fn symbol_pads_bare_operators() {
        let def = ComparatorDef::new(
            Comparator::GreaterOrEqual,
            Some(">="),
            Arity::One,
            ControlType::Number,
            1.1,
        );
        assert_eq!(def.symbol(), " >= ");
        assert_eq!(def.to_string(), ">=");
    }

    #[test]
    fn symbol_keeps_worded_tokens() {
        let def = ComparatorDef::new(
            Comparator::IsNotEmpty,
            Some(" is not empty"),
            Arity::None,
            ControlType::Any,
            2.23,
        );
        assert_eq!(def.symbol(), " is not empty");
        assert_eq!(def.to_string(), "is not empty");
    }

    #[test]
    fn catch_all_displays_family() {
        let def = ComparatorDef::new(Comparator::Any, None, Arity::None, ControlType::Any, 10.0);
        assert_eq!(def.symbol(), "");
        assert_eq!(def.to_string(), "Any");
    }
}
