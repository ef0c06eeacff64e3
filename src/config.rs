//! Plain configuration values for table building, conversion and batches.
//!
//! All fields are public and every struct has a [`Default`]. With the
//! `serde` feature the structs can be read from any serde format; missing
//! fields fall back to their defaults.

use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Vendor namespace written on the `definitions` root by default.
pub const DEFAULT_NAMESPACE: &str = "http://camunda.org/schema/1.0/dmn";

/// Identity of one generated decision.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TableConfig {
    pub decision_name: String,
    pub decision_id: String,
    pub namespace: String,
}

impl TableConfig {
    /// A config with the given name and id and the default namespace.
    pub fn new(decision_name: impl Into<String>, decision_id: impl Into<String>) -> Self {
        Self {
            decision_name: decision_name.into(),
            decision_id: decision_id.into(),
            namespace: DEFAULT_NAMESPACE.to_owned(),
        }
    }

    /// Derive a decision name and id from a source file stem.
    ///
    /// `loan-rules_v2` becomes name `loan rules v2` and id `loan-rules_v2`
    /// lower-cased with spaces turned into `_`.
    #[must_use]
    pub fn from_stem(stem: &str) -> Self {
        let name = stem.replace(['-', '_'], " ");
        let id = stem.to_lowercase().replace(' ', "_");
        Self::new(name, id)
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new("Decision", "decision_1")
    }
}

/// Settings for turning one rule text into DMN documents.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConvertConfig {
    /// Rules per decision table before the set is split; `0` disables splitting.
    pub max_rules_per_table: usize,
    /// Run [`validate`](crate::validate::validate) on every generated document.
    pub validate_output: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            max_rules_per_table: 1000,
            validate_output: true,
        }
    }
}

/// Settings for converting a directory of rule files.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BatchConfig {
    /// Where `.dmn` files are written. Created if missing.
    pub output_dir: PathBuf,
    /// Worker threads; `0` means one per available CPU.
    pub workers: usize,
    /// Extension (without the dot) of the rule files to pick up.
    pub extension: String,
    pub convert: ConvertConfig,
}

impl BatchConfig {
    /// The worker count to actually spawn.
    #[must_use]
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            workers: 0,
            extension: "txt".to_owned(),
            convert: ConvertConfig::default(),
        }
    }
}
