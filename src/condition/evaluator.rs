// SPDX-License-Identifier: MIT

//! Condition tree evaluator

use super::ast::ConditionNode;
use super::compare::{self, Comparison, Operand};
use super::operator::{AliasResolver, OperatorKind, OperatorResolver};
use super::record::DataRecord;
use crate::config::EvaluatorConfig;
use crate::error::ConditionError;
use once_cell::sync::Lazy;

static DEFAULT_EVALUATOR: Lazy<ConditionEvaluator<AliasResolver>> =
    Lazy::new(|| ConditionEvaluator::new(AliasResolver::new()));

/// Evaluate a condition tree with the built-in alias resolver and default
/// settings
pub fn evaluate(node: &ConditionNode, record: &DataRecord) -> Result<bool, ConditionError> {
    DEFAULT_EVALUATOR.evaluate(node, record)
}

/// Walks condition trees against data records.
///
/// The evaluator holds no per-call state, so one instance can serve any
/// number of threads as long as its resolver can.
#[derive(Debug, Clone)]
pub struct ConditionEvaluator<R> {
    resolver: R,
    config: EvaluatorConfig,
}

impl<R: OperatorResolver> ConditionEvaluator<R> {
    /// Create an evaluator with default settings
    pub fn new(resolver: R) -> Self {
        Self::with_config(resolver, EvaluatorConfig::default())
    }

    /// Create an evaluator with explicit settings
    pub fn with_config(resolver: R, config: EvaluatorConfig) -> Self {
        Self { resolver, config }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate `node` against `record`.
    ///
    /// The resolver is consulted once for every node actually visited;
    /// `and`/`or` children are visited left to right and stop as soon as the
    /// verdict is fixed. Resolver failures propagate. A kind the evaluator
    /// does not know evaluates to `false`.
    pub fn evaluate(
        &self,
        node: &ConditionNode,
        record: &DataRecord,
    ) -> Result<bool, ConditionError> {
        self.evaluate_at(node, record, 1)
    }

    fn evaluate_at(
        &self,
        node: &ConditionNode,
        record: &DataRecord,
        depth: usize,
    ) -> Result<bool, ConditionError> {
        if let Some(limit) = self.config.max_depth {
            if depth > limit {
                return Err(ConditionError::DepthExceeded { limit });
            }
        }

        let kind = self.resolver.resolve(&node.op)?;

        let verdict = match &kind {
            OperatorKind::And => {
                let children = self.children(node, &kind)?;
                let mut all = true;
                for child in children {
                    if !self.evaluate_at(child, record, depth + 1)? {
                        all = false;
                        break;
                    }
                }
                all
            }
            OperatorKind::Or => {
                let children = self.children(node, &kind)?;
                let mut any = false;
                for child in children {
                    if self.evaluate_at(child, record, depth + 1)? {
                        any = true;
                        break;
                    }
                }
                any
            }
            OperatorKind::Not => {
                let inner = node
                    .condition
                    .as_deref()
                    .ok_or_else(|| ConditionError::missing_field(kind.as_str(), "condition"))?;
                !self.evaluate_at(inner, record, depth + 1)?
            }
            OperatorKind::Unrecognized(token) => {
                log::debug!("Operator '{}' is not evaluable, treating as false", token);
                false
            }
            other => match Comparison::from_kind(other) {
                Some(comparison) => self.evaluate_compare(comparison, node, record),
                None => false,
            },
        };

        log::trace!("{} at depth {} -> {}", kind, depth, verdict);
        Ok(verdict)
    }

    fn children<'n>(
        &self,
        node: &'n ConditionNode,
        kind: &OperatorKind,
    ) -> Result<&'n [ConditionNode], ConditionError> {
        node.conditions
            .as_deref()
            .ok_or_else(|| ConditionError::missing_field(kind.as_str(), "conditions"))
    }

    fn evaluate_compare(
        &self,
        comparison: Comparison,
        node: &ConditionNode,
        record: &DataRecord,
    ) -> bool {
        // A node without `property` reads nothing, same as a missing key
        let left = Operand::from_record(node.property.as_deref().and_then(|p| record.get(p)));
        let right = Operand::from_literal(node.value.as_ref());
        compare::compare(comparison, left, right, self.config.ordering)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::ast::Literal;
    use crate::config::OrderingMode;
    use crate::error::ResolveError;
    use serde_json::{json, Value};

    fn record_with(pairs: Vec<(&str, Value)>) -> DataRecord {
        let mut record = DataRecord::new();
        for (k, v) in pairs {
            record.insert(k, v);
        }
        record
    }

    fn node(value: Value) -> ConditionNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_string_equality() {
        let record = record_with(vec![("intent", json!("search"))]);
        assert!(evaluate(&ConditionNode::equals("intent", "search"), &record).unwrap());
        assert!(!evaluate(&ConditionNode::equals("intent", "code"), &record).unwrap());
    }

    #[test]
    fn test_string_not_equal() {
        let record = record_with(vec![("status", json!("pending"))]);
        assert!(evaluate(&ConditionNode::not_equals("status", "done"), &record).unwrap());
        assert!(!evaluate(&ConditionNode::not_equals("status", "pending"), &record).unwrap());
    }

    #[test]
    fn test_number_comparison() {
        let record = record_with(vec![("score", json!(7.5))]);

        assert!(evaluate(&ConditionNode::greater_than("score", 5), &record).unwrap());
        assert!(!evaluate(&ConditionNode::greater_than("score", 10), &record).unwrap());

        assert!(evaluate(&ConditionNode::greater_than_or_equal("score", 7.5), &record).unwrap());
        assert!(!evaluate(&ConditionNode::greater_than_or_equal("score", 8), &record).unwrap());

        assert!(evaluate(&ConditionNode::less_than("score", 10), &record).unwrap());
        assert!(!evaluate(&ConditionNode::less_than("score", 5), &record).unwrap());

        assert!(evaluate(&ConditionNode::less_than_or_equal("score", 7.5), &record).unwrap());
        assert!(!evaluate(&ConditionNode::less_than_or_equal("score", 7), &record).unwrap());
    }

    #[test]
    fn test_boolean_comparison() {
        let record = record_with(vec![("is_draft", json!(true))]);
        assert!(evaluate(&ConditionNode::equals("is_draft", true), &record).unwrap());
        assert!(!evaluate(&ConditionNode::equals("is_draft", false), &record).unwrap());
    }

    #[test]
    fn test_null_versus_absent() {
        let record = record_with(vec![("result", json!(null))]);

        assert!(evaluate(&ConditionNode::equals("result", Literal::Null), &record).unwrap());
        assert!(!evaluate(&ConditionNode::equals("missing", Literal::Null), &record).unwrap());

        // Node without `value` compares against absent
        let no_value = node(json!({"op": "equals", "property": "missing"}));
        assert!(evaluate(&no_value, &record).unwrap());
        let no_value = node(json!({"op": "equals", "property": "result"}));
        assert!(!evaluate(&no_value, &record).unwrap());
    }

    #[test]
    fn test_missing_field_relations_are_false() {
        let record = DataRecord::new();
        assert!(!evaluate(&ConditionNode::less_than("missing", 10), &record).unwrap());
        assert!(!evaluate(&ConditionNode::greater_than_or_equal("missing", 0), &record).unwrap());
        assert!(evaluate(&ConditionNode::not_equals("missing", "value"), &record).unwrap());
    }

    #[test]
    fn test_missing_property_reads_absent() {
        let record = record_with(vec![("a", json!(1))]);
        let leaf = node(json!({"op": "lessThan", "value": 5}));
        assert!(!evaluate(&leaf, &record).unwrap());
        let leaf = node(json!({"op": "notEquals", "value": 5}));
        assert!(evaluate(&leaf, &record).unwrap());
    }

    #[test]
    fn test_combinators() {
        let record = record_with(vec![("intent", json!("code")), ("confidence", json!(0.9))]);

        let both = ConditionNode::and(vec![
            ConditionNode::equals("intent", "code"),
            ConditionNode::greater_than("confidence", 0.8),
        ]);
        assert!(evaluate(&both, &record).unwrap());

        let either = ConditionNode::or(vec![
            ConditionNode::equals("intent", "search"),
            ConditionNode::greater_than("confidence", 0.95),
        ]);
        assert!(!evaluate(&either, &record).unwrap());

        assert!(evaluate(&ConditionNode::not(either), &record).unwrap());
    }

    #[test]
    fn test_empty_combinators() {
        let record = DataRecord::new();
        assert!(evaluate(&ConditionNode::and(vec![]), &record).unwrap());
        assert!(!evaluate(&ConditionNode::or(vec![]), &record).unwrap());
    }

    #[test]
    fn test_unrecognized_operator_is_false() {
        let record = record_with(vec![("a", json!(1))]);
        let leaf = node(json!({"op": "between", "property": "a", "value": 1}));
        assert!(!evaluate(&leaf, &record).unwrap());
        assert!(evaluate(&ConditionNode::not(leaf), &record).unwrap());
    }

    #[test]
    fn test_resolver_failure_propagates() {
        let record = DataRecord::new();
        let err = evaluate(&ConditionNode::with_op(""), &record).unwrap_err();
        assert!(matches!(err, ConditionError::Resolve(ResolveError::Malformed(_))));

        let nested = ConditionNode::or(vec![ConditionNode::and(vec![ConditionNode::with_op(" ")])]);
        assert!(evaluate(&nested, &record).is_err());
    }

    #[test]
    fn test_malformed_combinators() {
        let record = DataRecord::new();

        let err = evaluate(&ConditionNode::with_op("and"), &record).unwrap_err();
        assert!(matches!(err, ConditionError::MissingField { field: "conditions", .. }));

        let err = evaluate(&ConditionNode::with_op("||"), &record).unwrap_err();
        assert_eq!(err.to_string(), "Malformed 'or' node: missing 'conditions'");

        let err = evaluate(&ConditionNode::with_op("not"), &record).unwrap_err();
        assert!(matches!(err, ConditionError::MissingField { field: "condition", .. }));
    }

    #[test]
    fn test_aliases_resolve() {
        let record = record_with(vec![("age", json!(30))]);
        let tree = node(json!({
            "op": "&&",
            "conditions": [
                {"op": ">=", "property": "age", "value": 18},
                {"op": "!", "condition": {"op": "lt", "property": "age", "value": 21}}
            ]
        }));
        assert!(evaluate(&tree, &record).unwrap());
    }

    #[test]
    fn test_ordering_modes() {
        let record = record_with(vec![("count", json!("10"))]);
        let leaf = ConditionNode::greater_than("count", 9);

        let loose = ConditionEvaluator::new(AliasResolver::new());
        assert!(loose.evaluate(&leaf, &record).unwrap());

        let strict = ConditionEvaluator::with_config(
            AliasResolver::new(),
            EvaluatorConfig {
                ordering: OrderingMode::Strict,
                ..Default::default()
            },
        );
        assert!(!strict.evaluate(&leaf, &record).unwrap());
        assert_eq!(strict.config().ordering, OrderingMode::Strict);
    }

    #[test]
    fn test_max_depth() {
        let evaluator = ConditionEvaluator::with_config(
            AliasResolver::new(),
            EvaluatorConfig {
                max_depth: Some(2),
                ..Default::default()
            },
        );
        let record = record_with(vec![("flag", json!(true))]);

        let shallow = ConditionNode::not(ConditionNode::equals("flag", false));
        assert!(evaluator.evaluate(&shallow, &record).unwrap());

        let deep = ConditionNode::not(ConditionNode::not(ConditionNode::equals("flag", true)));
        let err = evaluator.evaluate(&deep, &record).unwrap_err();
        assert!(matches!(err, ConditionError::DepthExceeded { limit: 2 }));
    }

    #[test]
    fn test_depth_limit_not_reached_past_short_circuit() {
        let evaluator = ConditionEvaluator::with_config(
            AliasResolver::new(),
            EvaluatorConfig {
                max_depth: Some(2),
                ..Default::default()
            },
        );
        let record = record_with(vec![("a", json!(1))]);
        let tree = ConditionNode::or(vec![
            ConditionNode::equals("a", 1),
            ConditionNode::not(ConditionNode::not(ConditionNode::equals("a", 1))),
        ]);
        assert!(evaluator.evaluate(&tree, &record).unwrap());
    }

    #[test]
    fn test_custom_resolver() {
        // Resolver that knows only symbolic tokens
        let resolver = |token: &str| -> Result<OperatorKind, ResolveError> {
            match token {
                "=" => Ok(OperatorKind::Equals),
                "&" => Ok(OperatorKind::And),
                other => Err(ResolveError::Unknown(other.to_string())),
            }
        };
        let evaluator = ConditionEvaluator::new(resolver);
        let record = record_with(vec![("x", json!("y"))]);

        let tree = node(json!({
            "op": "&",
            "conditions": [{"op": "=", "property": "x", "value": "y"}]
        }));
        assert!(evaluator.evaluate(&tree, &record).unwrap());

        let err = evaluator
            .evaluate(&ConditionNode::equals("x", "y"), &record)
            .unwrap_err();
        assert!(matches!(err, ConditionError::Resolve(ResolveError::Unknown(_))));
    }
}
