//! Literal type inference

use crate::ast::Expression;
use crate::registry::EligianType;

/// Lattice type of an argument expression, judged purely by its syntactic kind.
///
/// Anything that is not a literal needs runtime resolution and yields `unknown`.
pub fn infer_literal_type(expr: &Expression) -> EligianType {
    match expr {
        Expression::StringLiteral { .. } => EligianType::String,
        Expression::NumberLiteral { .. } => EligianType::Number,
        Expression::BooleanLiteral { .. } => EligianType::Boolean,
        Expression::ObjectLiteral { .. } => EligianType::Object,
        Expression::ArrayLiteral { .. } => EligianType::Array,
        Expression::NullLiteral { .. }
        | Expression::PropertyChain { .. }
        | Expression::Reference { .. }
        | Expression::VariableReference { .. }
        | Expression::SystemProperty { .. }
        | Expression::Binary { .. }
        | Expression::Unary { .. } => EligianType::Unknown,
    }
}
