mod error;
mod operator;
mod rule;
mod value;

pub use error::ModelError;
pub use operator::Operator;
pub use rule::{Action, Condition, Rule, normalize_variable};
pub use value::{FeelValue, is_boolean, is_numeric};
