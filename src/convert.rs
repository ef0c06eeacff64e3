//! Rule text in, DMN documents out.

use tracing::debug;

use crate::build::build_with;
use crate::config::{ConvertConfig, TableConfig};
use crate::error::DmnifyError;
use crate::parse::{SkippedLine, parse_many};
use crate::partition::partition;
use crate::validate::validate;

/// Everything produced from one source text.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// One XML document per partition, in rule order.
    pub documents: Vec<String>,
    /// Number of rules parsed across all documents.
    pub rules: usize,
    /// Lines that were dropped while parsing.
    pub skipped: Vec<SkippedLine>,
}

impl Conversion {
    /// True when the rule set was split over more than one table.
    #[must_use]
    pub fn is_partitioned(&self) -> bool {
        self.documents.len() > 1
    }
}

/// Parse `text`, split the rules into tables and render each one.
///
/// Every document shares the decision name and id in `table`. When
/// [`ConvertConfig::validate_output`] is set, each document is checked with
/// [`validate`] before anything is returned.
///
/// # Errors
///
/// - [`DmnifyError::NoValidRules`] if no line of `text` parses into a rule.
/// - [`DmnifyError::InvalidOutput`] if validation is on and a document has
///   errors.
pub fn convert(
    text: &str,
    table: &TableConfig,
    config: &ConvertConfig,
) -> Result<Conversion, DmnifyError> {
    let parsed = parse_many(text);
    if parsed.is_empty() {
        return Err(DmnifyError::NoValidRules {
            skipped: parsed.skipped.len(),
        });
    }

    let chunks = partition(&parsed.rules, config.max_rules_per_table);
    debug!(
        rules = parsed.rules.len(),
        skipped = parsed.skipped.len(),
        tables = chunks.len(),
        "partitioned rules"
    );

    let mut documents = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let xml = build_with(chunk, table);
        if config.validate_output {
            let report = validate(&xml);
            if !report.is_valid() {
                return Err(DmnifyError::InvalidOutput {
                    errors: report.into_errors(),
                });
            }
        }
        documents.push(xml);
    }

    Ok(Conversion {
        documents,
        rules: parsed.rules.len(),
        skipped: parsed.skipped,
    })
}
