// SPDX-License-Identifier: MIT

//! Evaluator configuration
//!
//! Settings come from an optional YAML file and are then overridden by
//! environment variables:
//! - `CONDITION_ORDERING` - `loose` or `strict`
//! - `CONDITION_MAX_DEPTH` - positive integer, or `none`
//! - `CONDITION_STRICT_OPERATORS` - `true`/`false`
//! - `CONDITION_CASE_INSENSITIVE` - `true`/`false`

use crate::error::ConditionError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// How relational operators treat operands of differing types
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderingMode {
    /// Coerce mixed operands to numbers; strings compare by UTF-16 code units
    #[default]
    Loose,
    /// Only number/number and string/string pairs are ordered
    Strict,
}

impl std::str::FromStr for OrderingMode {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loose" => Ok(OrderingMode::Loose),
            "strict" => Ok(OrderingMode::Strict),
            other => Err(ConditionError::config(format!(
                "unknown ordering mode '{}'",
                other
            ))),
        }
    }
}

/// Operator resolver settings
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ResolverConfig {
    /// Reject unknown tokens instead of resolving them as unrecognized
    pub strict: bool,
    /// Match tokens ignoring case
    pub case_insensitive: bool,
    /// Extra aliases: token -> canonical operator name
    pub aliases: HashMap<String, String>,
}

/// Evaluator settings
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub ordering: OrderingMode,
    /// Maximum nesting depth; unlimited when absent
    pub max_depth: Option<usize>,
    pub resolver: ResolverConfig,
}

impl EvaluatorConfig {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConditionError> {
        let path = path.as_ref();
        log::debug!("Loading evaluator config from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, ConditionError> {
        // An empty document means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: EvaluatorConfig = serde_yaml::from_str(content)?;
        if config.max_depth == Some(0) {
            return Err(ConditionError::config("max_depth must be a positive integer, got '0'"));
        }
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(self) -> Result<Self, ConditionError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConditionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ordering) = lookup("CONDITION_ORDERING") {
            self.ordering = ordering.parse()?;
        }
        if let Some(depth) = lookup("CONDITION_MAX_DEPTH") {
            self.max_depth = parse_depth(&depth)?;
        }
        if let Some(strict) = lookup("CONDITION_STRICT_OPERATORS") {
            self.resolver.strict = parse_flag("CONDITION_STRICT_OPERATORS", &strict)?;
        }
        if let Some(flag) = lookup("CONDITION_CASE_INSENSITIVE") {
            self.resolver.case_insensitive = parse_flag("CONDITION_CASE_INSENSITIVE", &flag)?;
        }
        Ok(self)
    }
}

fn parse_depth(value: &str) -> Result<Option<usize>, ConditionError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("none") || value.is_empty() {
        return Ok(None);
    }
    match value.parse::<usize>() {
        Ok(0) | Err(_) => Err(ConditionError::config(format!(
            "CONDITION_MAX_DEPTH must be a positive integer, got '{}'",
            value
        ))),
        Ok(n) => Ok(Some(n)),
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConditionError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConditionError::config(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}
