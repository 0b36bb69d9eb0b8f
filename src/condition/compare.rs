// SPDX-License-Identifier: MIT

//! Comparison semantics for property/value leaves
//!
//! Equality is always strict: operands must share a type and a value.
//! Ordering depends on [`OrderingMode`]:
//! - `Loose` follows dynamic-language relational comparison. Two strings
//!   compare by UTF-16 code units; any other pairing is converted to numbers
//!   and a NaN on either side makes every relation false.
//! - `Strict` orders only number/number and string/string pairs.
//!
//! Arrays and objects in a record are never ordered and never equal a literal.

use super::ast::Literal;
use super::operator::OperatorKind;
use crate::config::OrderingMode;
use serde_json::Value;

/// The six comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    LessThan,
    GreaterThan,
    Equals,
    NotEquals,
    LessThanOrEqual,
    GreaterThanOrEqual,
}

impl Comparison {
    /// Comparison for a resolved kind, `None` for combinators
    pub fn from_kind(kind: &OperatorKind) -> Option<Self> {
        match kind {
            OperatorKind::LessThan => Some(Comparison::LessThan),
            OperatorKind::GreaterThan => Some(Comparison::GreaterThan),
            OperatorKind::Equals => Some(Comparison::Equals),
            OperatorKind::NotEquals => Some(Comparison::NotEquals),
            OperatorKind::LessThanOrEqual => Some(Comparison::LessThanOrEqual),
            OperatorKind::GreaterThanOrEqual => Some(Comparison::GreaterThanOrEqual),
            _ => None,
        }
    }
}

/// One side of a comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand<'a> {
    /// Missing record property, or a node without `value`
    Absent,
    Null,
    Bool(bool),
    Number(f64),
    Str(&'a str),
    /// Array or object from the record
    Composite,
}

impl<'a> Operand<'a> {
    pub fn from_record(value: Option<&'a Value>) -> Self {
        match value {
            None => Operand::Absent,
            Some(Value::Null) => Operand::Null,
            Some(Value::Bool(b)) => Operand::Bool(*b),
            Some(Value::Number(n)) => Operand::Number(n.as_f64().unwrap_or(f64::NAN)),
            Some(Value::String(s)) => Operand::Str(s.as_str()),
            Some(Value::Array(_)) | Some(Value::Object(_)) => Operand::Composite,
        }
    }

    pub fn from_literal(literal: Option<&'a Literal>) -> Self {
        match literal {
            None => Operand::Absent,
            Some(Literal::Null) => Operand::Null,
            Some(Literal::Boolean(b)) => Operand::Bool(*b),
            Some(Literal::Number(n)) => Operand::Number(*n),
            Some(Literal::String(s)) => Operand::Str(s.as_str()),
        }
    }

    /// Numeric conversion used by loose ordering; `None` for composites
    fn to_number(self) -> Option<f64> {
        match self {
            Operand::Absent => Some(f64::NAN),
            Operand::Null => Some(0.0),
            Operand::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
            Operand::Number(n) => Some(n),
            Operand::Str(s) => Some(string_to_number(s)),
            Operand::Composite => None,
        }
    }
}

/// Apply a comparison to two operands
pub fn compare(op: Comparison, left: Operand<'_>, right: Operand<'_>, mode: OrderingMode) -> bool {
    match op {
        Comparison::Equals => strict_equals(left, right),
        Comparison::NotEquals => !strict_equals(left, right),
        Comparison::LessThan => less_than(left, right, mode).unwrap_or(false),
        Comparison::GreaterThan => less_than(right, left, mode).unwrap_or(false),
        Comparison::LessThanOrEqual => less_than(right, left, mode) == Some(false),
        Comparison::GreaterThanOrEqual => less_than(left, right, mode) == Some(false),
    }
}

/// Same type and same value. Absent only equals absent; NaN equals nothing.
pub fn strict_equals(left: Operand<'_>, right: Operand<'_>) -> bool {
    match (left, right) {
        (Operand::Absent, Operand::Absent) => true,
        (Operand::Null, Operand::Null) => true,
        (Operand::Bool(a), Operand::Bool(b)) => a == b,
        (Operand::Number(a), Operand::Number(b)) => a == b,
        (Operand::Str(a), Operand::Str(b)) => a == b,
        _ => false,
    }
}

/// `Some(left < right)`, or `None` when the pair is unordered
fn less_than(left: Operand<'_>, right: Operand<'_>, mode: OrderingMode) -> Option<bool> {
    if let (Operand::Str(a), Operand::Str(b)) = (left, right) {
        return Some(a.encode_utf16().lt(b.encode_utf16()));
    }

    let (a, b) = match mode {
        OrderingMode::Strict => match (left, right) {
            (Operand::Number(a), Operand::Number(b)) => (a, b),
            _ => return None,
        },
        OrderingMode::Loose => (left.to_number()?, right.to_number()?),
    };

    if a.is_nan() || b.is_nan() {
        return None;
    }
    Some(a < b)
}

/// Numeric value of a string the way dynamic languages coerce it: surrounding
/// whitespace is ignored, empty means zero, anything unparseable is NaN.
pub fn string_to_number(input: &str) -> f64 {
    let s = input.trim_matches(is_js_whitespace);
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix(&s[2..], radix);
    }

    // f64::from_str also takes "inf"/"nan"; only plain decimal literals count
    let decimal = s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !decimal || !s.chars().any(|c| c.is_ascii_digit()) {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Whitespace and line terminators as dynamic-language number parsing sees
/// them: Unicode `White_Space` minus NEL (U+0085), plus the BOM (U+FEFF)
fn is_js_whitespace(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN)
}
