use crate::ast::format_number;
use crate::diagnostics::{actions, timeline, Diagnostic, Note, Span};

/// Document-level errors found by the compiler itself
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("Duplicate action \"{name}\"")]
    DuplicateAction {
        name: String,
        span: Span,
        first: Span,
    },

    #[error("Invalid time range in timeline \"{timeline}\": {}", describe_range(.start, .end))]
    InvalidTimeRange {
        timeline: String,
        start: Option<f64>,
        end: Option<f64>,
        span: Span,
    },
}

fn describe_range(start: &Option<f64>, end: &Option<f64>) -> String {
    match (*start, *end) {
        (Some(start), Some(end)) => format!(
            "starts at {}s but ends at {}s",
            format_number(start),
            format_number(end)
        ),
        _ => "a time expression cannot be evaluated".to_string(),
    }
}

impl CompileError {
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::DuplicateAction { .. } => actions::DUPLICATE_ACTION,
            CompileError::InvalidTimeRange { .. } => timeline::INVALID_TIME_RANGE,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            CompileError::DuplicateAction { span, .. }
            | CompileError::InvalidTimeRange { span, .. } => span,
        }
    }

    pub fn hint(&self) -> String {
        match self {
            CompileError::DuplicateAction { .. } => {
                "Rename one of the actions so every action name is unique".to_string()
            }
            CompileError::InvalidTimeRange { start: Some(_), end: Some(_), .. } => {
                "The start of a time range must not be after its end".to_string()
            }
            CompileError::InvalidTimeRange { .. } => {
                "Avoid dividing a time by zero".to_string()
            }
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut builder = Diagnostic::error(self.code())
            .message(self.to_string())
            .hint(self.hint())
            .span(self.span().clone());
        if let CompileError::DuplicateAction { first, .. } = self {
            builder = builder.note(Note::new("first defined here").with_span(first.clone()));
        }
        builder.build()
    }
}
