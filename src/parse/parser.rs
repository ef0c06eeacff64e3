use tracing::warn;

use crate::Rule;

use super::error::ParseError;
use super::grammar;

/// A source line that was dropped because it failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number within the parsed text.
    pub line_number: usize,
    pub text: String,
    pub error: ParseError,
}

/// The result of parsing a block of rule text line by line.
///
/// `rules` keeps source order. Lines that failed to parse are listed in
/// `skipped` instead of aborting the whole block.
#[derive(Debug, Clone, Default)]
pub struct ParsedRules {
    pub rules: Vec<Rule>,
    pub skipped: Vec<SkippedLine>,
}

impl ParsedRules {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[must_use]
    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
    }
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("//")
}

pub(crate) fn parse_lines(text: &str) -> ParsedRules {
    let mut parsed = ParsedRules::default();

    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_comment(trimmed) {
            continue;
        }
        match grammar::rule(trimmed) {
            Ok(rule) => parsed.rules.push(rule),
            Err(error) => {
                warn!(line = idx + 1, %error, "skipping rule line");
                parsed.skipped.push(SkippedLine {
                    line_number: idx + 1,
                    text: trimmed.to_owned(),
                    error,
                });
            }
        }
    }

    parsed
}
