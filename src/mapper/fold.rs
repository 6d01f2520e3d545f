//! Compile-time folding of literal operator expressions

use crate::ast::{BinaryOp, Expression, UnaryOp};

/// A scalar produced by folding
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Folded {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
}

/// Fold an expression built only from scalar literals and operators.
///
/// Returns `None` as soon as any operand needs runtime resolution or an
/// operator is applied to incompatible operands.
pub(crate) fn fold(expr: &Expression) -> Option<Folded> {
    match expr {
        Expression::StringLiteral { value, .. } => Some(Folded::Text(value.clone())),
        Expression::NumberLiteral { value, .. } => Some(Folded::Number(*value)),
        Expression::BooleanLiteral { value, .. } => Some(Folded::Bool(*value)),
        Expression::NullLiteral { .. } => Some(Folded::Null),
        Expression::Binary {
            op, left, right, ..
        } => fold_binary(*op, &fold(left)?, &fold(right)?),
        Expression::Unary { op, operand, .. } => fold_unary(*op, &fold(operand)?),
        _ => None,
    }
}

fn fold_binary(op: BinaryOp, left: &Folded, right: &Folded) -> Option<Folded> {
    use Folded::{Bool, Number, Text};

    match (op, left, right) {
        // Arithmetic
        (BinaryOp::Add, Number(a), Number(b)) => Some(Number(a + b)),
        (BinaryOp::Sub, Number(a), Number(b)) => Some(Number(a - b)),
        (BinaryOp::Mul, Number(a), Number(b)) => Some(Number(a * b)),
        (BinaryOp::Div | BinaryOp::Mod, Number(_), Number(b)) if *b == 0.0 => None,
        (BinaryOp::Div, Number(a), Number(b)) => Some(Number(a / b)),
        (BinaryOp::Mod, Number(a), Number(b)) => Some(Number(a % b)),

        // Concatenation
        (BinaryOp::Add, Text(a), Text(b)) => Some(Text(format!("{}{}", a, b))),
        (BinaryOp::Add, Text(a), Number(b)) => {
            Some(Text(format!("{}{}", a, crate::ast::format_number(*b))))
        }
        (BinaryOp::Add, Number(a), Text(b)) => {
            Some(Text(format!("{}{}", crate::ast::format_number(*a), b)))
        }

        // Comparison
        (BinaryOp::Eq, a, b) => Some(Bool(a == b)),
        (BinaryOp::Ne, a, b) => Some(Bool(a != b)),
        (BinaryOp::Lt, Number(a), Number(b)) => Some(Bool(a < b)),
        (BinaryOp::Le, Number(a), Number(b)) => Some(Bool(a <= b)),
        (BinaryOp::Gt, Number(a), Number(b)) => Some(Bool(a > b)),
        (BinaryOp::Ge, Number(a), Number(b)) => Some(Bool(a >= b)),
        (BinaryOp::Lt, Text(a), Text(b)) => Some(Bool(a < b)),
        (BinaryOp::Le, Text(a), Text(b)) => Some(Bool(a <= b)),
        (BinaryOp::Gt, Text(a), Text(b)) => Some(Bool(a > b)),
        (BinaryOp::Ge, Text(a), Text(b)) => Some(Bool(a >= b)),

        // Logic
        (BinaryOp::And, Bool(a), Bool(b)) => Some(Bool(*a && *b)),
        (BinaryOp::Or, Bool(a), Bool(b)) => Some(Bool(*a || *b)),

        _ => None,
    }
}

fn fold_unary(op: UnaryOp, operand: &Folded) -> Option<Folded> {
    match (op, operand) {
        (UnaryOp::Neg, Folded::Number(n)) => Some(Folded::Number(-n)),
        (UnaryOp::Not, Folded::Bool(b)) => Some(Folded::Bool(!b)),
        _ => None,
    }
}
