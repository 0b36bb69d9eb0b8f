// SPDX-License-Identifier: MIT

//! Typed error handling for condition-dsl
//!
//! Resolution failures are kept apart from the rest so that hosts plugging in
//! their own `OperatorResolver` only need to produce a `ResolveError`.

use thiserror::Error;

/// Top-level error type for condition-dsl
#[derive(Debug, Error)]
pub enum ConditionError {
    /// The operator resolver rejected a token
    #[error("Operator resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    /// A combinator node lacks the field its kind requires
    #[error("Malformed '{op}' node: missing '{field}'")]
    MissingField { op: String, field: &'static str },

    /// Condition tree nested deeper than the configured limit
    #[error("Condition tree exceeds maximum depth of {limit}")]
    DepthExceeded { limit: usize },

    /// Configuration errors (bad alias table, invalid env override)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data record is not a key-value object
    #[error("Invalid data record: {0}")]
    InvalidRecord(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors raised while normalizing an operator token
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolveError {
    /// Empty or whitespace-only token
    #[error("Malformed operator token: {0:?}")]
    Malformed(String),

    /// Token not present in the alias table (strict resolvers only)
    #[error("Unknown operator: {0}")]
    Unknown(String),
}

impl ConditionError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a missing field error
    pub fn missing_field(op: impl Into<String>, field: &'static str) -> Self {
        Self::MissingField {
            op: op.into(),
            field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_error_converts() {
        let err: ConditionError = ResolveError::Unknown("between".to_string()).into();
        assert!(matches!(err, ConditionError::Resolve(ResolveError::Unknown(_))));
        assert_eq!(
            err.to_string(),
            "Operator resolution failed: Unknown operator: between"
        );
    }

    #[test]
    fn test_missing_field_message() {
        let err = ConditionError::missing_field("and", "conditions");
        assert_eq!(err.to_string(), "Malformed 'and' node: missing 'conditions'");
    }

    #[test]
    fn test_malformed_token_message() {
        let err = ResolveError::Malformed("  ".to_string());
        assert_eq!(err.to_string(), "Malformed operator token: \"  \"");
    }
}
