//! Staged validation of operation calls against the registry
//!
//! Stages run in order and an earlier failing stage short-circuits the rest:
//!
//! 1. existence (with typo suggestions)
//! 2. argument count
//! 3. argument categories
//! 4. dependencies (reserved)
//! 5. control-flow pairing (reserved)
//!
//! Errors inside one stage accumulate, so every mismatched argument of a call
//! is reported at once.

mod error;
mod suggestions;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use crate::ast::{Expression, OperationCall};
use crate::diagnostics::Span;
use crate::registry::{accepted_categories, EligianType, OperationRegistry, OperationSignature};
use crate::typechecker::infer_literal_type;

pub use error::{OperationValidationError, ParameterRange};
pub use suggestions::{levenshtein_distance, suggest_similar};

/// Tunables for the existence stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    pub max_suggestions: usize,
    pub max_edit_distance: usize,
    pub fallback_operations: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_suggestions: 3,
            max_edit_distance: 3,
            fallback_operations: 5,
        }
    }
}

/// Compile-time view of an argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentType {
    /// Category known from the syntax or from the parameter environment
    Known(EligianType),
    /// Resolved by the engine at runtime; compatible with every parameter
    RuntimeValue,
}

/// Classify an argument expression.
///
/// `env` maps in-scope action parameters to their types; a bare reference is
/// only known when it names one of them with a concrete type.
pub fn classify_argument(expr: &Expression, env: &HashMap<String, EligianType>) -> ArgumentType {
    match expr {
        Expression::StringLiteral { .. }
        | Expression::NumberLiteral { .. }
        | Expression::BooleanLiteral { .. }
        | Expression::ObjectLiteral { .. }
        | Expression::ArrayLiteral { .. } => ArgumentType::Known(infer_literal_type(expr)),
        Expression::Reference { name, .. } => match env.get(name) {
            Some(ty) if *ty != EligianType::Unknown => ArgumentType::Known(*ty),
            _ => ArgumentType::RuntimeValue,
        },
        Expression::NullLiteral { .. }
        | Expression::PropertyChain { .. }
        | Expression::VariableReference { .. }
        | Expression::SystemProperty { .. }
        | Expression::Binary { .. }
        | Expression::Unary { .. } => ArgumentType::RuntimeValue,
    }
}

/// Outcome of validating one call
#[derive(Debug, Clone)]
pub enum ValidationResult {
    Success { signature: Arc<OperationSignature> },
    Failure { errors: Vec<OperationValidationError> },
}

impl ValidationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationResult::Success { .. })
    }

    pub fn errors(&self) -> &[OperationValidationError] {
        match self {
            ValidationResult::Success { .. } => &[],
            ValidationResult::Failure { errors } => errors,
        }
    }

    pub fn into_errors(self) -> Vec<OperationValidationError> {
        match self {
            ValidationResult::Success { .. } => Vec::new(),
            ValidationResult::Failure { errors } => errors,
        }
    }
}

/// Validates operation calls against a shared registry
#[derive(Debug, Clone)]
pub struct OperationValidator {
    registry: Arc<OperationRegistry>,
    options: ValidationOptions,
}

impl OperationValidator {
    pub fn new(registry: Arc<OperationRegistry>) -> Self {
        Self::with_options(registry, ValidationOptions::default())
    }

    pub fn with_options(registry: Arc<OperationRegistry>, options: ValidationOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &Arc<OperationRegistry> {
        &self.registry
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Validate a call outside any action (no parameters in scope)
    pub fn validate_call(&self, call: &OperationCall) -> ValidationResult {
        self.validate_call_in(call, &HashMap::new())
    }

    /// Validate a call with action parameters `env` in scope
    pub fn validate_call_in(
        &self,
        call: &OperationCall,
        env: &HashMap<String, EligianType>,
    ) -> ValidationResult {
        trace!(operation = %call.name, arguments = call.arguments.len(), "validating call");

        let signature = match self.validate_operation_exists(&call.name, &call.span) {
            Ok(signature) => signature,
            Err(error) => return ValidationResult::Failure { errors: vec![error] },
        };

        if let Err(error) =
            self.validate_parameter_count(&signature, call.arguments.len(), &call.span)
        {
            return ValidationResult::Failure { errors: vec![error] };
        }

        let stages = [
            self.validate_parameter_types(&signature, &call.arguments, env),
            self.validate_dependencies(&signature, call),
            self.validate_control_flow(&signature, call),
        ];
        for errors in stages {
            if !errors.is_empty() {
                return ValidationResult::Failure { errors };
            }
        }

        ValidationResult::Success { signature }
    }

    /// Stage 1: the operation must be registered
    pub fn validate_operation_exists(
        &self,
        name: &str,
        span: &Span,
    ) -> Result<Arc<OperationSignature>, OperationValidationError> {
        if let Some(signature) = self.registry.lookup(name) {
            return Ok(Arc::clone(signature));
        }

        let suggestions = suggest_similar(
            name,
            self.registry.names(),
            self.options.max_suggestions,
            self.options.max_edit_distance,
        );
        let available: Vec<String> = self
            .registry
            .names()
            .take(self.options.fallback_operations)
            .map(str::to_string)
            .collect();

        Err(OperationValidationError::UnknownOperation {
            name: name.to_string(),
            suggestions,
            more_available: self.registry.len() > available.len(),
            available,
            span: span.clone(),
        })
    }

    /// Stage 2: `required <= actual <= total`
    pub fn validate_parameter_count(
        &self,
        signature: &OperationSignature,
        actual: usize,
        span: &Span,
    ) -> Result<(), OperationValidationError> {
        let expected = ParameterRange::new(signature.required_count(), signature.total_count());
        if expected.contains(actual) {
            return Ok(());
        }
        Err(OperationValidationError::ParameterCount {
            operation: signature.name.clone(),
            expected,
            actual,
            usage: signature.usage(),
            span: span.clone(),
        })
    }

    /// Stage 3: each present argument must match its parameter's category.
    ///
    /// Constant sets are only checked as strings, not against their values.
    pub fn validate_parameter_types(
        &self,
        signature: &OperationSignature,
        arguments: &[Expression],
        env: &HashMap<String, EligianType>,
    ) -> Vec<OperationValidationError> {
        let mut errors = Vec::new();

        for (index, (argument, parameter)) in
            arguments.iter().zip(&signature.parameters).enumerate()
        {
            let ArgumentType::Known(actual) = classify_argument(argument, env) else {
                continue;
            };
            let expected = accepted_categories(&parameter.ty);
            if expected.iter().any(|category| category.is_compatible_with(actual)) {
                continue;
            }
            errors.push(OperationValidationError::ParameterType {
                operation: signature.name.clone(),
                index,
                parameter: parameter.name.clone(),
                expected,
                actual,
                span: argument.span().clone(),
            });
        }

        errors
    }

    /// Stage 4: operations whose runtime input is produced by another
    /// operation. No trigger conditions are defined yet.
    pub fn validate_dependencies(
        &self,
        _signature: &OperationSignature,
        _call: &OperationCall,
    ) -> Vec<OperationValidationError> {
        Vec::new()
    }

    /// Stage 5: block openers and closers (`when`/`endWhen`,
    /// `forEach`/`endForEach`). No trigger conditions are defined yet.
    pub fn validate_control_flow(
        &self,
        _signature: &OperationSignature,
        _call: &OperationCall,
    ) -> Vec<OperationValidationError> {
        Vec::new()
    }
}
