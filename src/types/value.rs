use std::fmt;

/// A raw right-hand-side value classified for FEEL rendering.
///
/// Rule text stores values verbatim. At render time a value is either already
/// a FEEL literal (quoted string, list or range, number, boolean) and is
/// emitted as-is, or it is bare text that must be wrapped in double quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeelValue<'a> {
    /// Emitted verbatim.
    Literal(&'a str),
    /// Emitted inside double quotes.
    Text(&'a str),
}

impl<'a> FeelValue<'a> {
    #[must_use]
    pub fn classify(raw: &'a str) -> Self {
        if raw.starts_with('"') || raw.starts_with('[') || is_numeric(raw) || is_boolean(raw) {
            FeelValue::Literal(raw)
        } else {
            FeelValue::Text(raw)
        }
    }

    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, FeelValue::Literal(_))
    }
}

impl fmt::Display for FeelValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeelValue::Literal(v) => f.write_str(v),
            FeelValue::Text(v) => write!(f, "\"{v}\""),
        }
    }
}

/// True when `text` reads as a decimal number (`12`, `-3.5`, `.5`, `1e3`).
///
/// Words that `f64::from_str` would accept, such as `inf` or `NaN`, are not
/// numbers in rule text.
#[must_use]
pub fn is_numeric(text: &str) -> bool {
    let Some(first) = text.chars().next() else {
        return false;
    };
    (first.is_ascii_digit() || matches!(first, '+' | '-' | '.')) && text.parse::<f64>().is_ok()
}

/// True for `true` / `false` in any letter case.
#[must_use]
pub fn is_boolean(text: &str) -> bool {
    text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false")
}
