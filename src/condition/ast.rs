// SPDX-License-Identifier: MIT

//! Condition tree nodes

use super::operator::OperatorKind;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// One node of a condition tree: a comparison leaf or a logical combinator.
///
/// Which fields matter depends on the kind `op` resolves to:
/// - comparisons read `property` and `value`
/// - `and`/`or` read `conditions`
/// - `not` reads `condition`
///
/// Fields that do not apply are ignored. Trees are owned (`Box`/`Vec`), so a
/// node can never be its own ancestor.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize, JsonSchema)]
pub struct ConditionNode {
    /// Operator token, normalized by the resolver at evaluation time
    #[serde(default, alias = "operator")]
    pub op: String,
    /// Record field a comparison reads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    /// Comparison operand; `None` when the key is absent, `Some(Literal::Null)`
    /// for an explicit null
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<Literal>")]
    pub value: Option<Literal>,
    /// Children of `and`/`or`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<ConditionNode>>,
    /// Operand of `not`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Box<ConditionNode>>,
}

/// Literal operand of a comparison
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum Literal {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
}

/// Any value present under the key, `null` included, becomes `Some`
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Literal>, D::Error>
where
    D: Deserializer<'de>,
{
    Literal::deserialize(deserializer).map(Some)
}

impl ConditionNode {
    /// Comparison leaf with an arbitrary comparison kind
    pub fn compare(
        kind: OperatorKind,
        property: impl Into<String>,
        value: impl Into<Literal>,
    ) -> Self {
        Self {
            op: kind.as_str().to_string(),
            property: Some(property.into()),
            value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn less_than(property: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::compare(OperatorKind::LessThan, property, value)
    }

    pub fn greater_than(property: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::compare(OperatorKind::GreaterThan, property, value)
    }

    pub fn equals(property: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::compare(OperatorKind::Equals, property, value)
    }

    pub fn not_equals(property: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::compare(OperatorKind::NotEquals, property, value)
    }

    pub fn less_than_or_equal(property: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::compare(OperatorKind::LessThanOrEqual, property, value)
    }

    pub fn greater_than_or_equal(property: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::compare(OperatorKind::GreaterThanOrEqual, property, value)
    }

    /// True when every child holds (vacuously true for no children)
    pub fn and(conditions: Vec<ConditionNode>) -> Self {
        Self {
            op: OperatorKind::And.as_str().to_string(),
            conditions: Some(conditions),
            ..Default::default()
        }
    }

    /// True when any child holds
    pub fn or(conditions: Vec<ConditionNode>) -> Self {
        Self {
            op: OperatorKind::Or.as_str().to_string(),
            conditions: Some(conditions),
            ..Default::default()
        }
    }

    /// Negation of a single child
    #[allow(clippy::should_implement_trait)]
    pub fn not(condition: ConditionNode) -> Self {
        Self {
            op: OperatorKind::Not.as_str().to_string(),
            condition: Some(Box::new(condition)),
            ..Default::default()
        }
    }

    /// Node with a raw operator token and no operands
    pub fn with_op(op: impl Into<String>) -> Self {
        Self {
            op: op.into(),
            ..Default::default()
        }
    }

    /// Depth of the tree rooted here (a leaf has depth 1)
    pub fn depth(&self) -> usize {
        let children = self
            .conditions
            .iter()
            .flatten()
            .chain(self.condition.as_deref())
            .map(ConditionNode::depth)
            .max()
            .unwrap_or(0);
        children + 1
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Boolean(b)
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Number(n)
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Literal::Number(f64::from(n))
    }
}

impl From<u32> for Literal {
    fn from(n: u32) -> Self {
        Literal::Number(f64::from(n))
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Null => write!(f, "null"),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Number(n) => write!(f, "{}", n),
            Literal::String(s) => write!(f, "{:?}", s),
        }
    }
}
