//! Constraint unification and action parameter inference

use std::collections::HashMap;

use tracing::debug;

use super::constraints::{collect_parameter_constraints, TypeConstraint};
use crate::ast::ActionDefinition;
use crate::diagnostics::{inference, Diagnostic, Note, Span};
use crate::registry::{EligianType, OperationRegistry};

/// Inferred (or annotated) type of each action parameter
pub type ParameterTypeMap = HashMap<String, EligianType>;

/// Inference failure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeError {
    #[error("Type conflict for parameter \"{parameter}\": used as {}", join_types(.types))]
    TypeConflict {
        parameter: String,
        /// Distinct conflicting types, in order of first occurrence
        types: Vec<EligianType>,
        /// Every contributing usage, e.g. `wait(arg 1: milliseconds)`
        sources: Vec<String>,
        span: Span,
    },
}

fn join_types(types: &[EligianType]) -> String {
    types
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl TypeError {
    pub fn code(&self) -> &'static str {
        match self {
            TypeError::TypeConflict { .. } => inference::TYPE_CONFLICT,
        }
    }

    pub fn hint(&self) -> String {
        match self {
            TypeError::TypeConflict { sources, .. } => {
                format!("Conflicting usages: {}", sources.join("; "))
            }
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            TypeError::TypeConflict { span, .. } => span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut builder = Diagnostic::error(self.code())
            .message(self.to_string())
            .hint(self.hint())
            .span(self.span().clone());
        let TypeError::TypeConflict { parameter, .. } = self;
        builder = builder.note(Note::new(format!(
            "annotate `{}` with an explicit type, or use it consistently",
            parameter
        )));
        builder.build()
    }
}

/// Reduce the constraints collected for one parameter to a single type.
///
/// No constraints means the parameter is unused and stays `unknown`. Several
/// constraints must agree exactly; any disagreement is a hard conflict.
pub fn unify_constraints(constraints: &[TypeConstraint]) -> Result<EligianType, TypeError> {
    let Some(first) = constraints.first() else {
        return Ok(EligianType::Unknown);
    };

    let mut distinct: Vec<EligianType> = Vec::new();
    for constraint in constraints {
        if !distinct.contains(&constraint.expected_type) {
            distinct.push(constraint.expected_type);
        }
    }

    if distinct.len() == 1 {
        return Ok(first.expected_type);
    }

    Err(TypeError::TypeConflict {
        parameter: first.parameter.clone(),
        types: distinct,
        sources: constraints.iter().map(|c| c.source.clone()).collect(),
        span: first.location.clone(),
    })
}

/// Infer the type of every parameter of an action.
///
/// Annotated parameters keep their annotation. Inference is all-or-nothing:
/// if any parameter conflicts, every conflict is returned and no map is.
pub fn infer_parameter_types(
    action: &ActionDefinition,
    registry: &OperationRegistry,
) -> Result<ParameterTypeMap, Vec<TypeError>> {
    let constraints = collect_parameter_constraints(action, registry);
    let mut types = ParameterTypeMap::new();
    let mut errors = Vec::new();

    for parameter in &action.parameters {
        if let Some(annotation) = parameter.type_annotation {
            types.insert(parameter.name.clone(), annotation.into());
            continue;
        }
        let collected = constraints
            .get(&parameter.name)
            .map(Vec::as_slice)
            .unwrap_or_default();
        match unify_constraints(collected) {
            Ok(ty) => {
                types.insert(parameter.name.clone(), ty);
            }
            Err(error) => errors.push(error),
        }
    }

    if errors.is_empty() {
        debug!(action = %action.name, parameters = types.len(), "inferred parameter types");
        Ok(types)
    } else {
        debug!(action = %action.name, conflicts = errors.len(), "parameter inference failed");
        Err(errors)
    }
}
