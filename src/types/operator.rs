use std::fmt;

/// Comparison operators a condition can apply to its input column.
///
/// Each operator carries its FEEL token. [`Operator::In`] covers both list
/// membership and `between` ranges; the parser renders the operand into a
/// FEEL list or range literal before storing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Contains,
    In,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 8] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThanOrEqual,
        Operator::Contains,
        Operator::In,
    ];

    /// The FEEL token for this operator.
    #[must_use]
    pub fn feel(self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::NotEquals => "!=",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThanOrEqual => "<=",
            Operator::Contains => "contains",
            Operator::In => "in",
        }
    }

    /// Map a comparator symbol as written in rule text.
    ///
    /// Only the symbolic comparators are accepted; `contains` and `in` are
    /// keywords with their own clause shapes.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        match symbol {
            "=" => Some(Operator::Equals),
            "!=" => Some(Operator::NotEquals),
            ">" => Some(Operator::GreaterThan),
            "<" => Some(Operator::LessThan),
            ">=" => Some(Operator::GreaterThanOrEqual),
            "<=" => Some(Operator::LessThanOrEqual),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.feel())
    }
}
