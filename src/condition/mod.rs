// SPDX-License-Identifier: MIT

//! Condition trees and their evaluation
//!
//! A condition is a tree of nodes, each naming an operator token:
//! - comparisons: `lessThan`, `greaterThan`, `equals`, `notEquals`,
//!   `lessThanOrEqual`, `greaterThanOrEqual` over a record property and a literal
//! - combinators: `and`/`or` over a list of nodes, `not` over one node
//!
//! Tokens are normalized by an [`OperatorResolver`] before dispatch.

mod ast;
mod compare;
mod evaluator;
mod operator;
mod record;

pub use ast::{ConditionNode, Literal};
pub use compare::{string_to_number, Comparison};
pub use evaluator::{evaluate, ConditionEvaluator};
pub use operator::{AliasResolver, OperatorKind, OperatorResolver};
pub use record::DataRecord;
