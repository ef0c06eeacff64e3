use thiserror::Error;

/// Rejected attempts to construct an invalid [`Rule`](super::Rule).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("rule '{rule}' has no conditions; at least one is required")]
    NoConditions { rule: String },

    #[error("rule '{rule}' has no actions; at least one is required")]
    NoActions { rule: String },
}
