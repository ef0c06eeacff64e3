use std::fmt;

use thiserror::Error;

/// Which half of a rule a clause came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    Condition,
    Action,
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClauseKind::Condition => f.write_str("condition"),
            ClauseKind::Action => f.write_str("action"),
        }
    }
}

/// Why a single line of rule text could not be parsed.
///
/// Every variant is local to one line; [`parse_many`](super::parse_many)
/// skips the line and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("rule text is empty")]
    EmptyRule,

    #[error("rule must start with 'If' or 'Otherwise': {line}")]
    MissingKeyword { line: String },

    #[error("rule needs a comma separating conditions from actions: {line}")]
    MissingSeparator { line: String },

    #[error("could not parse {kind} '{clause}'")]
    UnparseableClause { kind: ClauseKind, clause: String },
}
