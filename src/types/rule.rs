use std::fmt;

use super::error::ModelError;
use super::operator::Operator;

/// Normalize a variable name as written in rule text into a column name.
///
/// Trims, lower-cases, collapses each whitespace run into `_`, then drops
/// every character outside `[a-z0-9_]`.
#[must_use]
pub fn normalize_variable(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.trim().chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        for lower in c.to_lowercase() {
            if lower.is_ascii_lowercase() || lower.is_ascii_digit() || lower == '_' {
                out.push(lower);
            }
        }
    }
    out
}

/// One test against an input column: `variable operator value`.
///
/// `value` is kept as written (or as the FEEL list/range literal the parser
/// produced for `in` and `between`); quoting happens when the table is built.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Condition {
    variable: String,
    operator: Operator,
    value: String,
}

impl Condition {
    /// The variable name is normalized with [`normalize_variable`].
    pub fn new(variable: &str, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            variable: normalize_variable(variable),
            operator,
            value: value.into(),
        }
    }

    /// The `"1" = "1"` condition carried by `Otherwise` rules.
    pub fn always_true() -> Self {
        Self::new("1", Operator::Equals, "1")
    }

    #[must_use]
    pub fn variable(&self) -> &str {
        &self.variable
    }

    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.variable, self.operator, self.value)
    }
}

/// An output assignment: `output_variable is output_value`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Action {
    output_variable: String,
    output_value: String,
}

impl Action {
    /// The variable name is normalized with [`normalize_variable`].
    pub fn new(output_variable: &str, output_value: impl Into<String>) -> Self {
        Self {
            output_variable: normalize_variable(output_variable),
            output_value: output_value.into(),
        }
    }

    #[must_use]
    pub fn output_variable(&self) -> &str {
        &self.output_variable
    }

    #[must_use]
    pub fn output_value(&self) -> &str {
        &self.output_value
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.output_variable, self.output_value)
    }
}

/// One decision row: every condition must hold for the actions to apply.
///
/// Rules are immutable. Conditions and actions keep the order they had in
/// the source text, which fixes column order and element ids in the
/// generated table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Rule {
    id: String,
    conditions: Vec<Condition>,
    actions: Vec<Action>,
    raw_text: String,
}

impl Rule {
    /// # Errors
    ///
    /// Returns [`ModelError`] if `conditions` or `actions` is empty.
    pub fn new(
        id: impl Into<String>,
        conditions: Vec<Condition>,
        actions: Vec<Action>,
        raw_text: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let id = id.into();
        if conditions.is_empty() {
            return Err(ModelError::NoConditions { rule: id });
        }
        if actions.is_empty() {
            return Err(ModelError::NoActions { rule: id });
        }
        Ok(Self {
            id,
            conditions,
            actions,
            raw_text: raw_text.into(),
        })
    }

    /// A fallback rule whose only condition is [`Condition::always_true`].
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NoActions`] if `actions` is empty.
    pub fn otherwise(
        id: impl Into<String>,
        actions: Vec<Action>,
        raw_text: impl Into<String>,
    ) -> Result<Self, ModelError> {
        Self::new(id, vec![Condition::always_true()], actions, raw_text)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    #[must_use]
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// The first condition on `variable`, if any.
    #[must_use]
    pub fn condition_on(&self, variable: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.variable == variable)
    }

    /// The first action assigning `variable`, if any.
    #[must_use]
    pub fn action_for(&self, variable: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.output_variable == variable)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rule({}, {} conditions, {} actions)",
            self.id,
            self.conditions.len(),
            self.actions.len(),
        )
    }
}
