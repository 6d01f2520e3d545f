//! Positional-to-named parameter mapping
//!
//! Turns a validated call such as `selectElement("#box")` into the named
//! `operationData` object the runtime engine consumes:
//! `{"selector": "#box"}`.
//!
//! Runtime references become strings in the engine's dotted convention
//! (`scope.currentItem`, `operationdata.selector`, `globaldata.user`). The
//! engine parses these strings, so their format must not drift.

mod error;
mod fold;

use serde_json::{Map, Value};
use tracing::trace;

use crate::ast::{property_chain_path, ActionDefinition, Expression, Scope};
use crate::diagnostics::Span;
use crate::registry::OperationSignature;

pub use error::MappingError;
use fold::{fold, Folded};

/// Named operation data for one call
pub type OperationData = Map<String, Value>;

/// Names a bare reference can resolve to while mapping
#[derive(Debug, Clone, Default)]
pub struct MappingContext {
    parameters: Vec<String>,
    loop_variables: Vec<String>,
}

impl MappingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for calls inside an action body
    pub fn for_action(action: &ActionDefinition) -> Self {
        Self {
            parameters: action.parameters.iter().map(|p| p.name.clone()).collect(),
            loop_variables: Vec::new(),
        }
    }

    /// Context for the body of a `for` loop binding `item`
    pub fn with_loop_variable(&self, item: impl Into<String>) -> Self {
        let mut inner = self.clone();
        inner.loop_variables.push(item.into());
        inner
    }

    /// Runtime path of a bare reference, if it names a loop item or parameter
    pub fn resolve(&self, name: &str) -> Option<String> {
        // Only the innermost loop item is reachable through `scope.currentItem`
        if self.loop_variables.last().is_some_and(|item| item == name) {
            return Some(property_chain_path(Scope::Scope, &["currentItem".to_string()]));
        }
        if self.parameters.iter().any(|p| p == name) {
            return Some(property_chain_path(Scope::OperationData, &[name.to_string()]));
        }
        None
    }
}

/// Outcome of mapping one call
#[derive(Debug, Clone, PartialEq)]
pub struct MappingResult {
    pub success: bool,
    pub operation_data: Option<OperationData>,
    pub errors: Vec<MappingError>,
}

impl MappingResult {
    fn from_parts(data: OperationData, errors: Vec<MappingError>) -> Self {
        if errors.is_empty() {
            Self {
                success: true,
                operation_data: Some(data),
                errors,
            }
        } else {
            Self {
                success: false,
                operation_data: None,
                errors,
            }
        }
    }

    pub fn into_result(self) -> Result<OperationData, Vec<MappingError>> {
        match self.operation_data {
            Some(data) if self.success => Ok(data),
            _ => Err(self.errors),
        }
    }
}

/// Map positional arguments onto the signature's parameter names
pub fn map_positional_to_named(
    signature: &OperationSignature,
    arguments: &[Expression],
) -> MappingResult {
    map_positional_to_named_in(signature, arguments, &MappingContext::new(), &Span::default())
}

/// Map positional arguments, resolving bare references through `context`.
///
/// For each parameter in order: bind the argument at that position, else the
/// parameter's default, else leave optional parameters unbound. A required
/// parameter with neither is an error reported at `call_span`. Surplus
/// arguments are ignored; the validator reports them.
pub fn map_positional_to_named_in(
    signature: &OperationSignature,
    arguments: &[Expression],
    context: &MappingContext,
    call_span: &Span,
) -> MappingResult {
    let mut data = OperationData::new();
    let mut errors = Vec::new();

    for (index, parameter) in signature.parameters.iter().enumerate() {
        if let Some(argument) = arguments.get(index) {
            match extract_value(argument, context) {
                Ok(value) => {
                    data.insert(parameter.name.clone(), value);
                }
                Err(error) => errors.push(error),
            }
        } else if let Some(default) = &parameter.default_value {
            data.insert(parameter.name.clone(), default.clone());
        } else if parameter.required {
            errors.push(MappingError::MissingParameter {
                operation: signature.name.clone(),
                parameter: parameter.name.clone(),
                span: call_span.clone(),
            });
        }
    }

    trace!(
        operation = %signature.name,
        bound = data.len(),
        errors = errors.len(),
        "mapped arguments"
    );
    MappingResult::from_parts(wrap_parameters(&signature.name, data), errors)
}

/// Runtime value of an argument expression
pub fn extract_value(expr: &Expression, context: &MappingContext) -> Result<Value, MappingError> {
    match expr {
        Expression::StringLiteral { value, .. } => Ok(Value::String(value.clone())),
        Expression::NumberLiteral { value, .. } => Ok(number_value(*value)),
        Expression::BooleanLiteral { value, .. } => Ok(Value::Bool(*value)),
        Expression::NullLiteral { .. } => Ok(Value::Null),
        Expression::ObjectLiteral { properties, .. } => {
            let mut object = Map::new();
            for property in properties {
                object.insert(property.key.clone(), extract_value(&property.value, context)?);
            }
            Ok(Value::Object(object))
        }
        Expression::ArrayLiteral { elements, .. } => elements
            .iter()
            .map(|element| extract_value(element, context))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Expression::PropertyChain {
            scope, properties, ..
        } => Ok(Value::String(property_chain_path(*scope, properties))),
        Expression::Reference { name, span } => context
            .resolve(name)
            .map(Value::String)
            .ok_or_else(|| MappingError::UnresolvedReference {
                name: name.clone(),
                span: span.clone(),
            }),
        Expression::VariableReference { name, .. } => Ok(Value::String(property_chain_path(
            Scope::Scope,
            &["variables".to_string(), name.clone()],
        ))),
        Expression::SystemProperty { name, .. } => Ok(Value::String(property_chain_path(
            Scope::Scope,
            &[name.clone()],
        ))),
        Expression::Binary { span, .. } | Expression::Unary { span, .. } => match fold(expr) {
            Some(folded) => Ok(folded_value(folded)),
            None => Err(MappingError::UnsupportedExpression {
                expression: expr.render(),
                span: span.clone(),
            }),
        },
    }
}

/// Per-operation renaming or grouping of fields. No bundled operation needs
/// any, so the data passes through unchanged.
pub fn wrap_parameters(_operation: &str, data: OperationData) -> OperationData {
    data
}

/// Integral numbers become JSON integers, the rest floats. Non-finite values
/// have no JSON form and map to `null`.
fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        Value::from(value as i64)
    } else {
        serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn folded_value(folded: Folded) -> Value {
    match folded {
        Folded::Text(text) => Value::String(text),
        Folded::Number(n) => number_value(n),
        Folded::Bool(b) => Value::Bool(b),
        Folded::Null => Value::Null,
    }
}
