// SPDX-License-Identifier: MIT

//! Operator kinds and token resolution

use crate::config::ResolverConfig;
use crate::error::{ConditionError, ResolveError};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Normalized operator kind the evaluator dispatches on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    LessThan,
    GreaterThan,
    Equals,
    NotEquals,
    LessThanOrEqual,
    GreaterThanOrEqual,
    And,
    Or,
    Not,
    /// Resolved, but not a kind the evaluator knows; evaluates to false
    Unrecognized(String),
}

impl OperatorKind {
    /// Every kind the evaluator dispatches on
    pub const KNOWN: [OperatorKind; 9] = [
        OperatorKind::LessThan,
        OperatorKind::GreaterThan,
        OperatorKind::Equals,
        OperatorKind::NotEquals,
        OperatorKind::LessThanOrEqual,
        OperatorKind::GreaterThanOrEqual,
        OperatorKind::And,
        OperatorKind::Or,
        OperatorKind::Not,
    ];

    /// Canonical token for this kind
    pub fn as_str(&self) -> &str {
        match self {
            OperatorKind::LessThan => "lessThan",
            OperatorKind::GreaterThan => "greaterThan",
            OperatorKind::Equals => "equals",
            OperatorKind::NotEquals => "notEquals",
            OperatorKind::LessThanOrEqual => "lessThanOrEqual",
            OperatorKind::GreaterThanOrEqual => "greaterThanOrEqual",
            OperatorKind::And => "and",
            OperatorKind::Or => "or",
            OperatorKind::Not => "not",
            OperatorKind::Unrecognized(token) => token,
        }
    }

    /// Look up a kind by its canonical token (exact match)
    pub fn from_canonical(token: &str) -> Option<Self> {
        Self::KNOWN.iter().find(|k| k.as_str() == token).cloned()
    }
}

impl std::fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalizes operator tokens into kinds.
///
/// Called once per visited node, so implementations must be deterministic,
/// free of side effects that matter to evaluation, and must not do I/O.
pub trait OperatorResolver: Send + Sync {
    fn resolve(&self, token: &str) -> Result<OperatorKind, ResolveError>;
}

impl<F> OperatorResolver for F
where
    F: Fn(&str) -> Result<OperatorKind, ResolveError> + Send + Sync,
{
    fn resolve(&self, token: &str) -> Result<OperatorKind, ResolveError> {
        self(token)
    }
}

/// Built-in aliases, keyed by token
static BUILTIN_ALIASES: Lazy<HashMap<&'static str, OperatorKind>> = Lazy::new(|| {
    let table: [(&[&str], OperatorKind); 9] = [
        (&["lessThan", "lt", "<"], OperatorKind::LessThan),
        (&["greaterThan", "gt", ">"], OperatorKind::GreaterThan),
        (&["equals", "eq", "==", "==="], OperatorKind::Equals),
        (&["notEquals", "ne", "neq", "!=", "!=="], OperatorKind::NotEquals),
        (&["lessThanOrEqual", "lte", "le", "<="], OperatorKind::LessThanOrEqual),
        (
            &["greaterThanOrEqual", "gte", "ge", ">="],
            OperatorKind::GreaterThanOrEqual,
        ),
        (&["and", "all", "&&"], OperatorKind::And),
        (&["or", "any", "||"], OperatorKind::Or),
        (&["not", "!"], OperatorKind::Not),
    ];

    let mut aliases = HashMap::new();
    for (tokens, kind) in table {
        for token in tokens {
            aliases.insert(*token, kind.clone());
        }
    }
    aliases
});

/// Table-driven resolver with configurable aliases
#[derive(Debug, Clone)]
pub struct AliasResolver {
    aliases: HashMap<String, OperatorKind>,
    case_insensitive: bool,
    strict: bool,
}

impl AliasResolver {
    /// Resolver over the built-in alias table, lenient about unknown tokens
    pub fn new() -> Self {
        Self {
            aliases: BUILTIN_ALIASES
                .iter()
                .map(|(token, kind)| (token.to_string(), kind.clone()))
                .collect(),
            case_insensitive: false,
            strict: false,
        }
    }

    /// Build a resolver from configuration, merging extra aliases over the
    /// built-in table
    pub fn from_config(config: &ResolverConfig) -> Result<Self, ConditionError> {
        let mut resolver = Self::new();
        resolver.strict = config.strict;
        resolver.case_insensitive = config.case_insensitive;

        for (alias, canonical) in &config.aliases {
            let kind = OperatorKind::from_canonical(canonical).ok_or_else(|| {
                ConditionError::config(format!(
                    "alias '{}' targets unknown operator '{}'",
                    alias, canonical
                ))
            })?;
            let alias = alias.trim();
            if alias.is_empty() {
                return Err(ConditionError::config("empty operator alias"));
            }
            resolver.aliases.insert(alias.to_string(), kind);
        }

        if resolver.case_insensitive {
            let folded = resolver.fold_case()?;
            resolver.aliases = folded;
        }

        log::debug!(
            "Operator resolver ready: {} aliases, strict={}, case_insensitive={}",
            resolver.aliases.len(),
            resolver.strict,
            resolver.case_insensitive
        );
        Ok(resolver)
    }

    /// Lowercase every alias, rejecting tokens that collide on different kinds
    fn fold_case(&self) -> Result<HashMap<String, OperatorKind>, ConditionError> {
        let mut folded: HashMap<String, OperatorKind> = HashMap::new();
        for (alias, kind) in &self.aliases {
            let key = alias.to_lowercase();
            match folded.get(&key) {
                Some(existing) if existing != kind => {
                    return Err(ConditionError::config(format!(
                        "aliases for '{}' and '{}' collide as '{}'",
                        existing, kind, key
                    )));
                }
                _ => {
                    folded.insert(key, kind.clone());
                }
            }
        }
        Ok(folded)
    }

    /// Number of known aliases
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl Default for AliasResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl OperatorResolver for AliasResolver {
    fn resolve(&self, token: &str) -> Result<OperatorKind, ResolveError> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(ResolveError::Malformed(token.to_string()));
        }

        let found = if self.case_insensitive {
            self.aliases.get(&trimmed.to_lowercase())
        } else {
            self.aliases.get(trimmed)
        };

        match found {
            Some(kind) => Ok(kind.clone()),
            None if self.strict => Err(ResolveError::Unknown(trimmed.to_string())),
            None => Ok(OperatorKind::Unrecognized(trimmed.to_string())),
        }
    }
}
