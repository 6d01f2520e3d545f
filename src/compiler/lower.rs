//! Lowering of a checked document to engine configuration

use std::collections::HashSet;

use serde_json::Value;

use super::ir::{
    CompiledAction, CompiledImport, CompiledOperation, CompiledProgram, CompiledTimeline,
    CompiledTimelineEvent,
};
use crate::ast::{
    ActionBody, ActionDefinition, EventAction, Expression, Program, Statement, Timeline,
    TimelineEvent, UnaryOp,
};
use crate::diagnostics::{DiagnosticBag, Span};
use crate::mapper::{extract_value, map_positional_to_named_in, MappingContext, MappingError, OperationData};
use crate::registry::OperationRegistry;
use crate::structural::{infer_import_type, StructuralTypeSystem, TimelineEventType};

type Operations = Vec<CompiledOperation>;

pub(super) struct Lowering<'a> {
    registry: &'a OperationRegistry,
    program: &'a Program,
    types: &'a StructuralTypeSystem,
    errors: Vec<MappingError>,
}

impl<'a> Lowering<'a> {
    pub(super) fn new(
        registry: &'a OperationRegistry,
        program: &'a Program,
        types: &'a StructuralTypeSystem,
    ) -> Self {
        Self {
            registry,
            program,
            types,
            errors: Vec::new(),
        }
    }

    pub(super) fn lower(mut self) -> Result<CompiledProgram, DiagnosticBag> {
        let program = self.program;

        let imports = program
            .imports
            .iter()
            .map(|import| {
                let ty = infer_import_type(import);
                CompiledImport {
                    name: ty.name,
                    path: ty.path,
                    kind: ty.kind,
                }
            })
            .collect();

        let mut seen = HashSet::new();
        let mut actions = Vec::new();
        for action in &program.actions {
            if seen.insert(action.name.as_str()) {
                actions.push(self.lower_action(action));
            }
        }

        let mut timelines = Vec::new();
        for timeline in &program.timelines {
            timelines.push(self.lower_timeline(timeline));
        }

        if !self.errors.is_empty() {
            return Err(self.errors.iter().map(MappingError::to_diagnostic).collect());
        }
        Ok(CompiledProgram {
            imports,
            actions,
            timelines,
        })
    }

    fn lower_action(&mut self, action: &ActionDefinition) -> CompiledAction {
        let context = MappingContext::for_action(action);
        let (start_operations, end_operations) = match &action.body {
            ActionBody::Regular { operations } => (self.lower_statements(operations, &context), Vec::new()),
            ActionBody::Endable { start, end } => (
                self.lower_statements(start, &context),
                self.lower_statements(end, &context),
            ),
        };
        CompiledAction {
            name: action.name.clone(),
            start_operations,
            end_operations,
        }
    }

    fn lower_statements(&mut self, statements: &[Statement], context: &MappingContext) -> Operations {
        let mut out = Vec::new();
        for statement in statements {
            self.lower_statement(statement, context, &mut out);
        }
        out
    }

    fn lower_statement(&mut self, statement: &Statement, context: &MappingContext, out: &mut Operations) {
        match statement {
            Statement::OperationCall(call) => {
                self.lower_call(&call.name, &call.arguments, &call.span, context, out)
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                out.push(self.builtin_with(
                    "when",
                    "expression",
                    Value::String(condition_string(condition, context)),
                ));
                out.extend(self.lower_statements(then_branch, context));
                if let Some(else_branch) = else_branch {
                    out.push(self.builtin("otherwise", OperationData::new()));
                    out.extend(self.lower_statements(else_branch, context));
                }
                out.push(self.builtin("endWhen", OperationData::new()));
            }
            Statement::For {
                item,
                collection,
                body,
                ..
            } => {
                let collection = self.value(collection, context);
                out.push(self.builtin_with("forEach", "collection", collection));
                let inner = context.with_loop_variable(item.as_str());
                out.extend(self.lower_statements(body, &inner));
                out.push(self.builtin("endForEach", OperationData::new()));
            }
            Statement::VariableDeclaration { name, value, .. } => {
                let mut data = OperationData::new();
                data.insert("name".to_string(), Value::String(name.clone()));
                data.insert("value".to_string(), self.value(value, context));
                out.push(self.builtin("setVariable", data));
            }
        }
    }

    /// A user action call becomes `requestAction` + `startAction`; anything
    /// else is a registry operation
    fn lower_call(
        &mut self,
        name: &str,
        arguments: &[Expression],
        span: &Span,
        context: &MappingContext,
        out: &mut Operations,
    ) {
        let program = self.program;
        if let Some(action) = program.action(name) {
            let data = self.action_data(action, arguments, context);
            out.push(self.request_action(name));
            out.push(self.builtin_with("startAction", "actionOperationData", Value::Object(data)));
            return;
        }

        let registry = self.registry;
        let Some(signature) = registry.lookup(name) else {
            return;
        };
        let result = map_positional_to_named_in(signature, arguments, context, span);
        match result.into_result() {
            Ok(data) => out.push(CompiledOperation::new(signature.system_name.clone(), data)),
            Err(errors) => self.errors.extend(errors),
        }
    }

    fn action_data(
        &mut self,
        action: &ActionDefinition,
        arguments: &[Expression],
        context: &MappingContext,
    ) -> OperationData {
        let mut data = OperationData::new();
        for (parameter, argument) in action.parameters.iter().zip(arguments) {
            let value = self.value(argument, context);
            data.insert(parameter.name.clone(), value);
        }
        data
    }

    fn lower_timeline(&mut self, timeline: &Timeline) -> CompiledTimeline {
        let mut events = Vec::new();

        for event in &timeline.events {
            match (event, self.types.infer_timeline_event(event)) {
                (
                    TimelineEvent::Timed { action, .. },
                    Some(TimelineEventType::Timed { start, end, .. }),
                ) => {
                    let (start_operations, end_operations) = match action {
                        EventAction::Call(call) => {
                            self.lower_timeline_call(&call.name, &call.arguments, &call.span)
                        }
                        EventAction::Inline { start, end } => {
                            let context = MappingContext::new();
                            (
                                self.lower_statements(start, &context),
                                self.lower_statements(end, &context),
                            )
                        }
                    };
                    events.push(CompiledTimelineEvent {
                        start,
                        end,
                        start_operations,
                        end_operations,
                    });
                }
                (
                    TimelineEvent::Sequence { items, .. },
                    Some(TimelineEventType::Sequence {
                        start,
                        items: durations,
                        ..
                    }),
                ) => {
                    let mut cursor = start;
                    for (item, duration) in items.iter().zip(durations) {
                        let (start_operations, end_operations) =
                            self.lower_timeline_call(
                                &item.action.name,
                                &item.action.arguments,
                                &item.action.span,
                            );
                        events.push(CompiledTimelineEvent {
                            start: cursor,
                            end: cursor + duration,
                            start_operations,
                            end_operations,
                        });
                        cursor += duration;
                    }
                }
                (
                    TimelineEvent::Stagger { items, action, .. },
                    Some(TimelineEventType::Stagger {
                        delay,
                        item_duration,
                    }),
                ) => {
                    let Expression::ArrayLiteral { elements, .. } = items else {
                        self.errors.push(MappingError::UnsupportedExpression {
                            expression: items.render(),
                            span: items.span().clone(),
                        });
                        continue;
                    };
                    for (index, element) in elements.iter().enumerate() {
                        let mut arguments = vec![element.clone()];
                        arguments.extend(action.arguments.iter().cloned());
                        let (start_operations, end_operations) =
                            self.lower_timeline_call(&action.name, &arguments, &action.span);
                        let start = delay * index as f64;
                        events.push(CompiledTimelineEvent {
                            start,
                            end: start + item_duration,
                            start_operations,
                            end_operations,
                        });
                    }
                }
                // Rejected during checking
                _ => {}
            }
        }

        CompiledTimeline {
            name: timeline.name.clone(),
            provider: timeline.provider.clone(),
            events,
        }
    }

    /// Start and end operations for a call made directly from a timeline.
    /// Endable actions are ended when the event ends.
    fn lower_timeline_call(
        &mut self,
        name: &str,
        arguments: &[Expression],
        span: &Span,
    ) -> (Operations, Operations) {
        let context = MappingContext::new();
        let program = self.program;

        let Some(action) = program.action(name) else {
            let mut start = Vec::new();
            self.lower_call(name, arguments, span, &context, &mut start);
            return (start, Vec::new());
        };

        let data = self.action_data(action, arguments, &context);
        let start = vec![
            self.request_action(name),
            self.builtin_with("startAction", "actionOperationData", Value::Object(data.clone())),
        ];
        let end = if action.is_endable() {
            vec![
                self.request_action(name),
                self.builtin_with("endAction", "actionOperationData", Value::Object(data)),
            ]
        } else {
            Vec::new()
        };
        (start, end)
    }

    fn value(&mut self, expr: &Expression, context: &MappingContext) -> Value {
        match extract_value(expr, context) {
            Ok(value) => value,
            Err(error) => {
                self.errors.push(error);
                Value::Null
            }
        }
    }

    fn request_action(&self, name: &str) -> CompiledOperation {
        self.builtin_with("requestAction", "systemName", Value::String(name.to_string()))
    }

    /// Control and action operations by their engine name
    fn system_name(&self, name: &str) -> String {
        self.registry
            .lookup(name)
            .map_or_else(|| name.to_string(), |s| s.system_name.clone())
    }

    fn builtin(&self, name: &str, data: OperationData) -> CompiledOperation {
        CompiledOperation::new(self.system_name(name), data)
    }

    fn builtin_with(&self, name: &str, key: &str, value: Value) -> CompiledOperation {
        CompiledOperation::with_field(self.system_name(name), key, value)
    }
}

/// Runtime condition text for `when`, with references resolved to their
/// dotted paths
fn condition_string(expr: &Expression, context: &MappingContext) -> String {
    match expr {
        Expression::Reference { name, .. } => context.resolve(name).unwrap_or_else(|| name.clone()),
        Expression::VariableReference { name, .. } => format!("scope.variables.{}", name),
        Expression::SystemProperty { name, .. } => format!("scope.{}", name),
        Expression::Binary {
            op, left, right, ..
        } => format!(
            "{} {} {}",
            condition_string(left, context),
            op.symbol(),
            condition_string(right, context)
        ),
        Expression::Unary { op, operand, .. } => match op {
            UnaryOp::Neg => format!("-{}", condition_string(operand, context)),
            UnaryOp::Not => format!("!{}", condition_string(operand, context)),
        },
        other => other.render(),
    }
}
