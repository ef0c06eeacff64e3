use uuid::Uuid;
use winnow::combinator::{alt, delimited, opt, preceded};
use winnow::error::{ContextError, ErrMode, ModalResult};
use winnow::prelude::*;
use winnow::token::take_while;

use crate::{Action, Condition, ModelError, Operator, Rule};

use super::error::{ClauseKind, ParseError};
use super::lexer::{find_separator, keyword_splits, split_actions, split_conditions};

// -- Whitespace & words -----------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

fn ws1(input: &mut &str) -> ModalResult<()> {
    take_while(1.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

fn word<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)
}

/// A whole word equal to `kw`, ignoring ASCII case.
fn keyword<'i>(kw: &'static str) -> impl Parser<&'i str, &'i str, ErrMode<ContextError>> {
    word.verify(move |w: &str| w.eq_ignore_ascii_case(kw))
}

/// A variable as written: a letter or `_`, then letters, digits, `_` or blanks.
fn variable<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1, |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || c == '_' || c.is_ascii_whitespace()
        }),
    )
        .take()
        .parse_next(input)
}

/// Everything that is left, which must be something.
fn value<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |_c: char| true).parse_next(input)
}

// -- Rule head --------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    If,
    Otherwise,
}

fn rule_head(input: &mut &str) -> ModalResult<Keyword> {
    ws.parse_next(input)?;
    alt((
        keyword("if").value(Keyword::If),
        keyword("otherwise").value(Keyword::Otherwise),
    ))
    .parse_next(input)
}

// -- Condition operands -----------------------------------------------------

fn number<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_ascii_digit() || c == '.').parse_next(input)
}

/// `X and Y` after `between`.
fn range_bounds<'i>(input: &mut &'i str) -> ModalResult<(&'i str, &'i str)> {
    let (low, _, _, _, high) = (number, ws1, keyword("and"), ws1, number).parse_next(input)?;
    Ok((low, high))
}

/// `(a, b, c)` after `in`; yields the raw text between the parentheses.
fn list_items<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    delimited('(', take_while(1.., |c: char| c != ')'), ')').parse_next(input)
}

/// `[any] value` after `contains`.
fn contains_operand<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    preceded(opt((keyword("any"), ws1)), value).parse_next(input)
}

fn compare_op(input: &mut &str) -> ModalResult<Operator> {
    alt((">=", "<=", "!=", ">", "<", "="))
        .verify_map(Operator::from_symbol)
        .parse_next(input)
}

/// `op value`, starting at the comparator.
fn comparison<'i>(input: &mut &'i str) -> ModalResult<(Operator, &'i str)> {
    let op = compare_op.parse_next(input)?;
    ws.parse_next(input)?;
    let rhs = value.parse_next(input)?;
    Ok((op, rhs))
}

// -- Clauses ----------------------------------------------------------------

fn valid_variable(text: &str) -> Option<&str> {
    variable.parse(text).ok()
}

fn range_condition(clause: &str) -> Option<Condition> {
    keyword_splits(clause, "between").find_map(|(left, right)| {
        let var = valid_variable(left)?;
        let (low, high) = range_bounds.parse(right).ok()?;
        Some(Condition::new(var, Operator::In, format!("[{low}..{high}]")))
    })
}

fn list_condition(clause: &str) -> Option<Condition> {
    keyword_splits(clause, "in").find_map(|(left, right)| {
        let var = valid_variable(left)?;
        let items = list_items.parse(right).ok()?;
        let literal = items
            .split(',')
            .map(|item| format!("\"{}\"", item.trim()))
            .collect::<Vec<_>>()
            .join(", ");
        Some(Condition::new(var, Operator::In, format!("[{literal}]")))
    })
}

fn contains_condition(clause: &str) -> Option<Condition> {
    keyword_splits(clause, "contains").find_map(|(left, right)| {
        let var = valid_variable(left)?;
        let operand = contains_operand.parse(right).ok()?;
        Some(Condition::new(var, Operator::Contains, operand))
    })
}

fn equality_condition(clause: &str) -> Option<Condition> {
    keyword_splits(clause, "is").find_map(|(left, right)| {
        let var = valid_variable(left)?;
        let rhs = value.parse(right).ok()?;
        Some(Condition::new(var, Operator::Equals, rhs))
    })
}

fn comparison_condition(clause: &str) -> Option<Condition> {
    let at = clause.find(['<', '>', '=', '!'])?;
    let var = valid_variable(clause[..at].trim_end())?;
    let (op, rhs) = comparison.parse(&clause[at..]).ok()?;
    Some(Condition::new(var, op, rhs))
}

/// Parse one condition clause, trying the clause shapes in a fixed order:
/// range, list, contains, `is`, comparator.
pub(crate) fn condition(clause: &str) -> Result<Condition, ParseError> {
    range_condition(clause)
        .or_else(|| list_condition(clause))
        .or_else(|| contains_condition(clause))
        .or_else(|| equality_condition(clause))
        .or_else(|| comparison_condition(clause))
        .ok_or_else(|| ParseError::UnparseableClause {
            kind: ClauseKind::Condition,
            clause: clause.to_owned(),
        })
}

/// Parse one `variable is value` action clause. A trailing period is dropped.
pub(crate) fn action(clause: &str) -> Result<Action, ParseError> {
    let clause = clause.strip_suffix('.').unwrap_or(clause).trim_end();
    keyword_splits(clause, "is")
        .find_map(|(left, right)| {
            let var = valid_variable(left)?;
            let rhs = value.parse(right).ok()?;
            Some(Action::new(var, rhs))
        })
        .ok_or_else(|| ParseError::UnparseableClause {
            kind: ClauseKind::Action,
            clause: clause.to_owned(),
        })
}

fn actions(text: &str) -> Result<Vec<Action>, ParseError> {
    split_actions(text)
        .into_iter()
        .filter(|part| *part != ".")
        .map(action)
        .collect()
}

fn conditions(text: &str) -> Result<Vec<Condition>, ParseError> {
    split_conditions(text).into_iter().map(condition).collect()
}

// -- Rules ------------------------------------------------------------------

/// `<prefix><first 8 hex digits of a v4 UUID>`.
fn fresh_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}{}", &hex[..8])
}

fn missing_half(err: ModelError, conditions: &str, actions: &str) -> ParseError {
    match err {
        ModelError::NoConditions { .. } => ParseError::UnparseableClause {
            kind: ClauseKind::Condition,
            clause: conditions.to_owned(),
        },
        ModelError::NoActions { .. } => ParseError::UnparseableClause {
            kind: ClauseKind::Action,
            clause: actions.to_owned(),
        },
    }
}

pub(crate) fn rule(line: &str) -> Result<Rule, ParseError> {
    let text = line.trim();
    if text.is_empty() {
        return Err(ParseError::EmptyRule);
    }

    let mut body = text;
    let head = rule_head
        .parse_next(&mut body)
        .map_err(|_| ParseError::MissingKeyword {
            line: text.to_owned(),
        })?;

    let missing_separator = || ParseError::MissingSeparator {
        line: text.to_owned(),
    };

    match head {
        Keyword::Otherwise => {
            let actions_text = body
                .trim_start()
                .strip_prefix(',')
                .ok_or_else(missing_separator)?
                .trim();
            let actions = actions(actions_text)?;
            Rule::otherwise(fresh_id("rule_otherwise_"), actions, line)
                .map_err(|e| missing_half(e, "", actions_text))
        }
        Keyword::If => {
            let comma = find_separator(body).ok_or_else(missing_separator)?;
            let conditions_text = body[..comma].trim();
            let actions_text = body[comma + 1..].trim();
            let conditions = conditions(conditions_text)?;
            let actions = actions(actions_text)?;
            Rule::new(fresh_id("rule_"), conditions, actions, line)
                .map_err(|e| missing_half(e, conditions_text, actions_text))
        }
    }
}
