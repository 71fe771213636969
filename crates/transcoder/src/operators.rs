//! Operator resolution: structural operator tags to token table keys.
//!
//! Binary operators resolve by snake-casing their tag (`BitOr` → `bit_or`).
//! Comparison tags don't follow that pattern and go through a fixed map.
//! Boolean operators only ever resolve to `and_op` / `or_op`.

use crate::config::{OperatorToken, TokenName};
use transcoder_syntax::{BinaryOperator, BooleanOperator, CompareOperator};

/// Insert an underscore before every uppercase letter not at position 0,
/// then lowercase the whole tag.
pub fn snake_case(tag: &str) -> String {
    let mut out = String::with_capacity(tag.len() + 4);
    for (i, c) in tag.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            out.push('_');
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Token for a binary operator tag (`Add`, `FloorDiv`...).
///
/// Only arithmetic and bitwise keys count; a tag that snake-cases onto a
/// comparison or boolean key is not a binary operator.
pub fn resolve_binary_tag(tag: &str) -> Option<OperatorToken> {
    let token = OperatorToken::from_key(&snake_case(tag))?;
    is_binary(token).then_some(token)
}

/// Token for a comparison operator tag (`Eq`, `NotIn`...).
pub fn resolve_comparison_tag(tag: &str) -> Option<OperatorToken> {
    let token = match tag {
        "Eq" => OperatorToken::Equal,
        "NotEq" => OperatorToken::NotEqual,
        "Lt" => OperatorToken::LowerThan,
        "LtE" => OperatorToken::LowerThanEqual,
        "Gt" => OperatorToken::GreaterThan,
        "GtE" => OperatorToken::GreaterThanEqual,
        "Is" => OperatorToken::IsOp,
        "IsNot" => OperatorToken::IsNotOp,
        "In" => OperatorToken::InOp,
        "NotIn" => OperatorToken::NotInOp,
        _ => return None,
    };
    Some(token)
}

/// Token for a boolean operator tag (`And`, `Or`).
pub fn resolve_boolean_tag(tag: &str) -> Option<OperatorToken> {
    match tag {
        "And" => Some(OperatorToken::AndOp),
        "Or" => Some(OperatorToken::OrOp),
        _ => None,
    }
}

pub fn binary_token(op: BinaryOperator) -> Option<OperatorToken> {
    resolve_binary_tag(op.tag())
}

pub fn comparison_token(op: CompareOperator) -> Option<OperatorToken> {
    resolve_comparison_tag(op.tag())
}

pub fn boolean_token(op: BooleanOperator) -> Option<OperatorToken> {
    resolve_boolean_tag(op.tag())
}

fn is_binary(token: OperatorToken) -> bool {
    !matches!(
        token,
        OperatorToken::AndOp
            | OperatorToken::OrOp
            | OperatorToken::Equal
            | OperatorToken::NotEqual
            | OperatorToken::LowerThan
            | OperatorToken::LowerThanEqual
            | OperatorToken::GreaterThan
            | OperatorToken::GreaterThanEqual
            | OperatorToken::IsOp
            | OperatorToken::IsNotOp
            | OperatorToken::InOp
            | OperatorToken::NotInOp
    )
}
