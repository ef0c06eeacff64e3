use thiserror::Error;

use crate::parse::ParseError;
use crate::ModelError;

/// Unified error type covering parsing, conversion and I/O.
///
/// Returned by [`convert()`](crate::convert()) and the [`batch`](crate::batch)
/// driver.
#[derive(Debug, Error)]
pub enum DmnifyError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The input held no line that parsed into a rule.
    #[error("no valid rules found ({skipped} lines skipped)")]
    NoValidRules { skipped: usize },

    /// A generated document failed validation.
    #[error("generated DMN failed validation: {}", errors.join("; "))]
    InvalidOutput { errors: Vec<String> },
}
