//! Editor-time structural type system
//!
//! Holds the primitive lattice types, one function type per registry operation
//! and one per user action. Operation function types exist for inference and
//! hover only: the operation validator owns call checking, so they never
//! validate arguments. Action function types do, which is how call sites of
//! user actions get checked.
//!
//! Import statements and timeline events get custom types of their own, see
//! [`imports`] and [`timeline`].

mod error;
pub mod imports;
pub mod timeline;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::ast::{ActionDefinition, Expression, ImportStatement, TimelineEvent};
use crate::diagnostics::Span;
use crate::registry::{EligianType, OperationRegistry};
use crate::typechecker::ParameterTypeMap;
use crate::validator::{classify_argument, ArgumentType};

pub use error::StructuralError;
pub use imports::{infer_import_type, ImportKind, ImportType};
pub use timeline::{infer_timeline_event, TimelineEventType};

/// Where a function type came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    Operation,
    Action,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: EligianType,
    pub optional: bool,
    /// Type written in the source rather than inferred from usage
    #[serde(skip)]
    pub declared: bool,
}

/// Signature of an operation or action as a function type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionType {
    pub name: String,
    pub kind: FunctionKind,
    pub parameters: Vec<FunctionParameter>,
    pub output: EligianType,
    /// Whether call sites are checked against this type
    pub validate_arguments: bool,
}

impl fmt::Display for FunctionType {
    /// `fadeIn(selector: string, duration?: number): unknown`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parameters: Vec<String> = self
            .parameters
            .iter()
            .map(|p| {
                let marker = if p.optional { "?" } else { "" };
                format!("{}{}: {}", p.name, marker, p.ty)
            })
            .collect();
        write!(f, "{}({}): {}", self.name, parameters.join(", "), self.output)
    }
}

/// Primitive types, operation functions and action functions for one document
#[derive(Debug, Clone)]
pub struct StructuralTypeSystem {
    operations: BTreeMap<String, FunctionType>,
    actions: BTreeMap<String, FunctionType>,
}

impl StructuralTypeSystem {
    /// Register a function type for every operation in the registry
    pub fn new(registry: &OperationRegistry) -> Self {
        let operations: BTreeMap<String, FunctionType> = registry
            .signatures()
            .map(|signature| {
                let function = FunctionType {
                    name: signature.name.clone(),
                    kind: FunctionKind::Operation,
                    parameters: signature
                        .parameters
                        .iter()
                        .map(|p| FunctionParameter {
                            name: p.name.clone(),
                            ty: p.lattice_type(),
                            optional: !p.required,
                            declared: true,
                        })
                        .collect(),
                    output: EligianType::Unknown,
                    validate_arguments: false,
                };
                (signature.name.clone(), function)
            })
            .collect();
        debug!(operations = operations.len(), "registered operation function types");
        Self {
            operations,
            actions: BTreeMap::new(),
        }
    }

    /// The primitive types, one per lattice element
    pub fn primitives(&self) -> &'static [EligianType] {
        &EligianType::ALL
    }

    /// Inference rule keyed on the expression kind; bare references resolve
    /// through `env`.
    pub fn infer_expression(&self, expr: &Expression, env: &ParameterTypeMap) -> EligianType {
        match classify_argument(expr, env) {
            ArgumentType::Known(ty) => ty,
            ArgumentType::RuntimeValue => EligianType::Unknown,
        }
    }

    /// Register (or replace) the function type of a user action.
    ///
    /// Parameters missing from `types` fall back to `unknown`.
    pub fn register_action(&mut self, action: &ActionDefinition, types: &ParameterTypeMap) {
        let function = FunctionType {
            name: action.name.clone(),
            kind: FunctionKind::Action,
            parameters: action
                .parameters
                .iter()
                .map(|p| FunctionParameter {
                    name: p.name.clone(),
                    ty: types.get(&p.name).copied().unwrap_or(EligianType::Unknown),
                    optional: false,
                    declared: p.type_annotation.is_some(),
                })
                .collect(),
            output: EligianType::Unknown,
            validate_arguments: true,
        };
        self.actions.insert(action.name.clone(), function);
    }

    pub fn operation(&self, name: &str) -> Option<&FunctionType> {
        self.operations.get(name)
    }

    pub fn action(&self, name: &str) -> Option<&FunctionType> {
        self.actions.get(name)
    }

    /// Look up a function; user actions shadow operations of the same name
    pub fn function(&self, name: &str) -> Option<&FunctionType> {
        self.action(name).or_else(|| self.operation(name))
    }

    /// Hover text for a function name
    pub fn hover(&self, name: &str) -> Option<String> {
        self.function(name).map(FunctionType::to_string)
    }

    /// Check a call site against the function type registered for `name`.
    ///
    /// Functions that do not validate arguments, and unknown names, always
    /// pass. Argument types are checked only where both sides are known.
    pub fn validate_call(
        &self,
        name: &str,
        arguments: &[Expression],
        span: &Span,
        env: &ParameterTypeMap,
    ) -> Vec<StructuralError> {
        let Some(function) = self.function(name) else {
            return Vec::new();
        };
        if !function.validate_arguments {
            return Vec::new();
        }

        let required = function.parameters.iter().filter(|p| !p.optional).count();
        let total = function.parameters.len();
        if arguments.len() < required || arguments.len() > total {
            return vec![StructuralError::ActionArgumentCount {
                action: function.name.clone(),
                expected: total,
                actual: arguments.len(),
                signature: function.to_string(),
                span: span.clone(),
            }];
        }

        let mut errors = Vec::new();
        for (index, (argument, parameter)) in arguments.iter().zip(&function.parameters).enumerate()
        {
            let actual = self.infer_expression(argument, env);
            if parameter.ty.is_compatible_with(actual) {
                continue;
            }
            errors.push(StructuralError::ActionArgumentType {
                action: function.name.clone(),
                index,
                parameter: parameter.name.clone(),
                expected: parameter.ty,
                actual,
                declared: parameter.declared,
                span: argument.span().clone(),
            });
        }
        errors
    }

    pub fn infer_import(&self, import: &ImportStatement) -> ImportType {
        infer_import_type(import)
    }

    pub fn infer_timeline_event(&self, event: &TimelineEvent) -> Option<TimelineEventType> {
        infer_timeline_event(event)
    }
}

/// Parameter-type environment with `names` removed, for loop bodies whose
/// item shadows an action parameter
pub fn shadowed_env<'a>(
    env: &ParameterTypeMap,
    names: impl IntoIterator<Item = &'a str>,
) -> ParameterTypeMap {
    let mut inner: HashMap<String, EligianType> = env.clone();
    for name in names {
        inner.remove(name);
    }
    inner
}
