//! Per-document compilation pipeline
//!
//! 1. reject duplicate action names
//! 2. infer every action's parameter types and register its function type
//! 3. validate calls in action bodies and timelines, then map their arguments
//!    the way lowering will
//! 4. lower to engine configuration, only when nothing above failed
//!
//! Each document is compiled independently. The registry is the only shared
//! state and it is read-only.

mod error;
pub mod ir;
mod lower;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::ast::{EventAction, Expression, OperationCall, Program, Statement, Timeline, TimelineEvent};
use crate::diagnostics::{DiagnosticBag, Span};
use crate::mapper::{extract_value, map_positional_to_named_in, MappingContext, MappingError};
use crate::registry::{EligianType, OperationRegistry};
use crate::structural::{shadowed_env, StructuralTypeSystem, TimelineEventType};
use crate::typechecker::{infer_parameter_types, ParameterTypeMap, TypeError};
use crate::validator::{OperationValidator, ValidationOptions};

pub use error::CompileError;
pub use ir::{
    CompiledAction, CompiledImport, CompiledOperation, CompiledProgram, CompiledTimeline,
    CompiledTimelineEvent,
};

/// Everything learned about a document before lowering
#[derive(Debug)]
pub struct Analysis {
    pub diagnostics: DiagnosticBag,
    /// Parameter types per action; `unknown` where inference failed
    pub parameter_types: BTreeMap<String, ParameterTypeMap>,
    pub types: StructuralTypeSystem,
}

/// Compiles AST documents against one registry
#[derive(Debug, Clone)]
pub struct Compiler {
    registry: Arc<OperationRegistry>,
    validator: OperationValidator,
}

impl Compiler {
    pub fn new(registry: Arc<OperationRegistry>) -> Self {
        Self::with_options(registry, ValidationOptions::default())
    }

    pub fn with_options(registry: Arc<OperationRegistry>, options: ValidationOptions) -> Self {
        let validator = OperationValidator::with_options(Arc::clone(&registry), options);
        Self {
            registry,
            validator,
        }
    }

    pub fn registry(&self) -> &Arc<OperationRegistry> {
        &self.registry
    }

    pub fn validator(&self) -> &OperationValidator {
        &self.validator
    }

    /// Infer parameter types of every action, keeping per-action failures
    pub fn infer(&self, program: &Program) -> Vec<(String, Result<ParameterTypeMap, Vec<TypeError>>)> {
        program
            .actions
            .iter()
            .map(|action| (action.name.clone(), infer_parameter_types(action, &self.registry)))
            .collect()
    }

    /// Run every check without lowering
    pub fn check(&self, program: &Program) -> Analysis {
        let mut diagnostics = DiagnosticBag::new();
        let mut types = StructuralTypeSystem::new(&self.registry);
        let mut parameter_types = BTreeMap::new();

        // Duplicates keep their first definition
        let mut first_spans: HashMap<&str, &Span> = HashMap::new();
        for action in &program.actions {
            if let Some(first) = first_spans.get(action.name.as_str()) {
                diagnostics.push(
                    CompileError::DuplicateAction {
                        name: action.name.clone(),
                        span: action.span.clone(),
                        first: (*first).clone(),
                    }
                    .to_diagnostic(),
                );
                continue;
            }
            first_spans.insert(action.name.as_str(), &action.span);

            let inferred = match infer_parameter_types(action, &self.registry) {
                Ok(inferred) => inferred,
                Err(errors) => {
                    diagnostics.extend(errors.iter().map(TypeError::to_diagnostic));
                    action
                        .parameters
                        .iter()
                        .map(|p| {
                            let ty = p.type_annotation.map_or(EligianType::Unknown, Into::into);
                            (p.name.clone(), ty)
                        })
                        .collect()
                }
            };
            types.register_action(action, &inferred);
            parameter_types.insert(action.name.clone(), inferred);
        }

        let mut checked = HashSet::new();
        for action in &program.actions {
            if !checked.insert(action.name.as_str()) {
                continue;
            }
            let Some(env) = parameter_types.get(&action.name) else {
                continue;
            };
            let context = MappingContext::for_action(action);
            for body in action.bodies() {
                self.check_statements(body, env, &context, &types, &mut diagnostics);
            }
        }

        for timeline in &program.timelines {
            self.check_timeline(timeline, &types, &mut diagnostics);
        }

        debug!(
            actions = parameter_types.len(),
            timelines = program.timelines.len(),
            errors = diagnostics.error_count(),
            "checked document"
        );
        Analysis {
            diagnostics,
            parameter_types,
            types,
        }
    }

    /// Check and lower a document
    pub fn compile(&self, program: &Program) -> Result<CompiledProgram, DiagnosticBag> {
        let analysis = self.check(program);
        if analysis.diagnostics.has_errors() {
            return Err(analysis.diagnostics);
        }
        lower::Lowering::new(&self.registry, program, &analysis.types).lower()
    }

    fn check_statements(
        &self,
        statements: &[Statement],
        env: &ParameterTypeMap,
        context: &MappingContext,
        types: &StructuralTypeSystem,
        diagnostics: &mut DiagnosticBag,
    ) {
        for statement in statements {
            match statement {
                Statement::OperationCall(call) => self.check_call(
                    &call.name,
                    &call.arguments,
                    &call.span,
                    env,
                    context,
                    types,
                    diagnostics,
                ),
                Statement::If {
                    then_branch,
                    else_branch,
                    ..
                } => {
                    self.check_statements(then_branch, env, context, types, diagnostics);
                    if let Some(else_branch) = else_branch {
                        self.check_statements(else_branch, env, context, types, diagnostics);
                    }
                }
                Statement::For {
                    item,
                    collection,
                    body,
                    ..
                } => {
                    check_values(std::slice::from_ref(collection), context, diagnostics);
                    let inner = shadowed_env(env, [item.as_str()]);
                    let inner_context = context.with_loop_variable(item.as_str());
                    self.check_statements(body, &inner, &inner_context, types, diagnostics);
                }
                Statement::VariableDeclaration { value, .. } => {
                    check_values(std::slice::from_ref(value), context, diagnostics)
                }
            }
        }
    }

    /// User actions are checked structurally, everything else by the
    /// operation validator. Calls that pass are mapped as lowering maps them.
    #[allow(clippy::too_many_arguments)]
    fn check_call(
        &self,
        name: &str,
        arguments: &[Expression],
        span: &Span,
        env: &ParameterTypeMap,
        context: &MappingContext,
        types: &StructuralTypeSystem,
        diagnostics: &mut DiagnosticBag,
    ) {
        if types.action(name).is_some() {
            let errors = types.validate_call(name, arguments, span, env);
            if errors.is_empty() {
                check_values(arguments, context, diagnostics);
            }
            diagnostics.extend(errors.iter().map(|e| e.to_diagnostic()));
            return;
        }

        let call = OperationCall {
            span: span.clone(),
            name: name.to_string(),
            arguments: arguments.to_vec(),
        };
        let result = self.validator.validate_call_in(&call, env);
        if !result.is_success() {
            diagnostics.extend(result.errors().iter().map(|e| e.to_diagnostic()));
            return;
        }
        if let Some(signature) = self.registry.lookup(name) {
            let mapped = map_positional_to_named_in(signature, arguments, context, span);
            diagnostics.extend(mapped.errors.iter().map(MappingError::to_diagnostic));
        }
    }

    fn check_timeline(
        &self,
        timeline: &Timeline,
        types: &StructuralTypeSystem,
        diagnostics: &mut DiagnosticBag,
    ) {
        let env = ParameterTypeMap::new();
        let context = MappingContext::new();

        for event in &timeline.events {
            let invalid = |start, end| {
                CompileError::InvalidTimeRange {
                    timeline: timeline.name.clone(),
                    start,
                    end,
                    span: event.span().clone(),
                }
                .to_diagnostic()
            };

            match types.infer_timeline_event(event) {
                None => diagnostics.push(invalid(None, None)),
                Some(TimelineEventType::Timed { start, end, .. }) if start > end => {
                    diagnostics.push(invalid(Some(start), Some(end)))
                }
                Some(_) => {}
            }

            match event {
                TimelineEvent::Timed { action, .. } => match action {
                    EventAction::Call(call) => self.check_call(
                        &call.name,
                        &call.arguments,
                        &call.span,
                        &env,
                        &context,
                        types,
                        diagnostics,
                    ),
                    EventAction::Inline { start, end } => {
                        self.check_statements(start, &env, &context, types, diagnostics);
                        self.check_statements(end, &env, &context, types, diagnostics);
                    }
                },
                TimelineEvent::Sequence { items, .. } => {
                    for item in items {
                        let call = &item.action;
                        self.check_call(
                            &call.name,
                            &call.arguments,
                            &call.span,
                            &env,
                            &context,
                            types,
                            diagnostics,
                        );
                    }
                }
                TimelineEvent::Stagger { items, action, .. } => {
                    match items {
                        Expression::ArrayLiteral { elements, .. } => {
                            check_values(elements, &context, diagnostics)
                        }
                        other => diagnostics.push(
                            MappingError::UnsupportedExpression {
                                expression: other.render(),
                                span: other.span().clone(),
                            }
                            .to_diagnostic(),
                        ),
                    }

                    // The staggered item is passed as the first argument
                    let mut arguments = vec![Expression::NullLiteral {
                        span: action.span.clone(),
                    }];
                    arguments.extend(action.arguments.iter().cloned());
                    self.check_call(
                        &action.name,
                        &arguments,
                        &action.span,
                        &env,
                        &context,
                        types,
                        diagnostics,
                    );
                }
            }
        }
    }
}

/// Report values that have no runtime form in `context`
fn check_values(values: &[Expression], context: &MappingContext, diagnostics: &mut DiagnosticBag) {
    for value in values {
        if let Err(error) = extract_value(value, context) {
            diagnostics.push(error.to_diagnostic());
        }
    }
}

#[cfg(test)]
mod tests;
