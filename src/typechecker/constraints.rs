//! Constraint collection over an action body
//!
//! Every bare reference to an action parameter that is passed as an operation
//! argument constrains that parameter to the lattice type expected at the
//! argument's position.

use std::collections::HashMap;

use tracing::trace;

use crate::ast::{ActionDefinition, Expression, OperationCall, Statement};
use crate::diagnostics::Span;
use crate::registry::{EligianType, OperationRegistry};

/// One observed usage of a parameter
#[derive(Debug, Clone, PartialEq)]
pub struct TypeConstraint {
    pub parameter: String,
    pub expected_type: EligianType,
    /// e.g. `selectElement(arg 1: selector)`
    pub source: String,
    pub location: Span,
}

/// Collect type constraints for every parameter of an action.
///
/// Parameters that are never passed to an operation have no entry.
pub fn collect_parameter_constraints(
    action: &ActionDefinition,
    registry: &OperationRegistry,
) -> HashMap<String, Vec<TypeConstraint>> {
    let mut collector = Collector {
        action,
        registry,
        loop_variables: Vec::new(),
        constraints: HashMap::new(),
    };
    for body in action.bodies() {
        collector.visit_statements(body);
    }
    collector.constraints
}

struct Collector<'a> {
    action: &'a ActionDefinition,
    registry: &'a OperationRegistry,
    /// Loop variables in scope; they shadow parameters of the same name
    loop_variables: Vec<&'a str>,
    constraints: HashMap<String, Vec<TypeConstraint>>,
}

impl<'a> Collector<'a> {
    fn visit_statements(&mut self, statements: &'a [Statement]) {
        for statement in statements {
            self.visit_statement(statement);
        }
    }

    fn visit_statement(&mut self, statement: &'a Statement) {
        match statement {
            Statement::OperationCall(call) => self.visit_call(call),
            Statement::If {
                then_branch,
                else_branch,
                ..
            } => {
                self.visit_statements(then_branch);
                if let Some(else_branch) = else_branch {
                    self.visit_statements(else_branch);
                }
            }
            Statement::For { item, body, .. } => {
                self.loop_variables.push(item.as_str());
                self.visit_statements(body);
                self.loop_variables.pop();
            }
            Statement::VariableDeclaration { .. } => {}
        }
    }

    fn visit_call(&mut self, call: &OperationCall) {
        // Calls to user actions and unknown names carry no registry types
        let (Some(signature), Some(types)) = (
            self.registry.lookup(&call.name),
            self.registry.parameter_types(&call.name),
        ) else {
            return;
        };

        for (index, argument) in call.arguments.iter().enumerate() {
            let Expression::Reference { name, span } = argument else {
                continue;
            };
            if self.loop_variables.iter().any(|v| *v == name.as_str()) {
                continue;
            }
            if self.action.parameter(name).is_none() {
                continue;
            }
            let (Some(spec), Some(expected_type)) =
                (signature.parameters.get(index), types.get(index))
            else {
                continue;
            };

            let source = format!("{}(arg {}: {})", call.name, index + 1, spec.name);
            trace!(parameter = %name, expected = %expected_type, %source, "constraint");
            self.constraints
                .entry(name.clone())
                .or_default()
                .push(TypeConstraint {
                    parameter: name.clone(),
                    expected_type: *expected_type,
                    source,
                    location: span.clone(),
                });
        }
    }
}
