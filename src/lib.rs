//! Convert plain-language business rules into DMN 1.3 decision tables.
//!
//! Rules are written one per line:
//!
//! ```text
//! If age >= 18 and country = US, eligible is true.
//! If income between 30000 and 60000, tier is silver and rate is 4.5.
//! Otherwise, eligible is false.
//! ```
//!
//! [`parse_rule`] and [`parse_many`] turn that text into [`Rule`]s,
//! [`partition`] splits large sets, and [`build`] renders one decision table
//! with hit policy `FIRST`. [`convert()`] chains those steps for one text and
//! the [`batch`] module runs it over a directory of files.
//!
//! ```
//! use dmnify::{build, parse_rule};
//!
//! let rule = parse_rule("If age >= 18, eligible is true.").unwrap();
//! let xml = build(&[rule], "Eligibility", "eligibility");
//! assert!(xml.contains(r#"hitPolicy="FIRST""#));
//! assert!(xml.contains("<text>&gt;= 18</text>"));
//! ```

pub mod batch;
mod build;
mod config;
mod convert;
mod error;
mod parse;
mod partition;
mod types;
pub mod validate;
mod xml;

pub use build::{
    CAMUNDA_NS, DC_NS, DMN_MODEL_NS, DMNDI_NS, DecisionTable, NO_OUTPUT, WILDCARD, build,
    build_with, input_entry, output_entry,
};
pub use config::{BatchConfig, ConvertConfig, DEFAULT_NAMESPACE, TableConfig};
pub use convert::{Conversion, convert};
pub use error::DmnifyError;
pub use parse::{ClauseKind, ParseError, ParsedRules, SkippedLine, parse_many, parse_rule};
pub use partition::partition;
pub use types::{
    Action, Condition, FeelValue, ModelError, Operator, Rule, is_boolean, is_numeric,
    normalize_variable,
};
pub use validate::{ValidationReport, validate};
pub use xml::escape;
