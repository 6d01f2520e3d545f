use crate::diagnostics::{actions, Diagnostic, Span};
use crate::registry::EligianType;

/// Call-site errors for user actions
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StructuralError {
    #[error("Action \"{action}\" expects {expected} argument(s), but got {actual}")]
    ActionArgumentCount {
        action: String,
        expected: usize,
        actual: usize,
        /// Rendered function type
        signature: String,
        span: Span,
    },

    #[error(
        "Argument {} of action \"{action}\" (parameter \"{parameter}\") expects {expected}, but got {actual}",
        .index + 1
    )]
    ActionArgumentType {
        action: String,
        index: usize,
        parameter: String,
        expected: EligianType,
        actual: EligianType,
        /// The expected type comes from an annotation
        declared: bool,
        span: Span,
    },
}

impl StructuralError {
    pub fn code(&self) -> &'static str {
        match self {
            StructuralError::ActionArgumentCount { .. } => actions::ACTION_ARGUMENT_COUNT,
            StructuralError::ActionArgumentType { .. } => actions::ACTION_ARGUMENT_TYPE,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            StructuralError::ActionArgumentCount { span, .. }
            | StructuralError::ActionArgumentType { span, .. } => span,
        }
    }

    pub fn hint(&self) -> String {
        match self {
            StructuralError::ActionArgumentCount { signature, .. } => {
                format!("Usage: {}", signature)
            }
            StructuralError::ActionArgumentType {
                parameter,
                expected,
                declared: true,
                ..
            } => format!("\"{}\" is declared as {}", parameter, expected),
            StructuralError::ActionArgumentType {
                parameter,
                expected,
                ..
            } => format!("\"{}\" is used as {} inside the action", parameter, expected),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code())
            .message(self.to_string())
            .hint(self.hint())
            .span(self.span().clone())
            .build()
    }
}
