mod error;
mod grammar;
mod lexer;
mod parser;

pub use error::{ClauseKind, ParseError};
pub use parser::{ParsedRules, SkippedLine};

use crate::Rule;

/// Parse one line of rule text into a [`Rule`].
///
/// Accepts `If <conditions>, <actions>.` and `Otherwise, <actions>.`.
/// Each call assigns the rule a fresh random id.
///
/// # Errors
///
/// Returns [`ParseError`] if the line is blank, does not start with `If` or
/// `Otherwise`, has no separating comma, or contains a clause that matches
/// none of the supported shapes.
pub fn parse_rule(line: &str) -> Result<Rule, ParseError> {
    grammar::rule(line)
}

/// Parse every rule line in `text`, best effort.
///
/// Blank lines and lines starting with `#` or `//` are ignored. Lines that
/// fail to parse are dropped, logged at `warn` level and recorded in
/// [`ParsedRules::skipped`]. An input with no parseable line yields an empty
/// [`ParsedRules::rules`]; deciding whether that is an error is up to the
/// caller.
#[must_use]
pub fn parse_many(text: &str) -> ParsedRules {
    parser::parse_lines(text)
}
