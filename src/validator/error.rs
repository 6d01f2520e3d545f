//! Operation call validation errors

use std::fmt;

use serde::Serialize;

use crate::diagnostics::{operations, Diagnostic, Note, Span, Suggestion};
use crate::registry::EligianType;

/// Accepted argument count of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterRange {
    pub min: usize,
    pub max: usize,
}

impl ParameterRange {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, count: usize) -> bool {
        self.min <= count && count <= self.max
    }
}

impl fmt::Display for ParameterRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

/// Failure of one validation stage for one operation call
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OperationValidationError {
    #[error("Unknown operation: \"{name}\"")]
    UnknownOperation {
        name: String,
        /// Closest registered names, best first
        suggestions: Vec<String>,
        /// Fallback listing used when nothing is similar
        available: Vec<String>,
        /// Whether the registry holds more names than `available`
        more_available: bool,
        span: Span,
    },

    #[error("Operation \"{operation}\" expects {expected} parameter(s), but got {actual}")]
    ParameterCount {
        operation: String,
        expected: ParameterRange,
        actual: usize,
        usage: String,
        span: Span,
    },

    #[error(
        "Argument {} of \"{operation}\" (parameter \"{parameter}\") expects {}, but got {actual}",
        .index + 1,
        join_categories(.expected)
    )]
    ParameterType {
        operation: String,
        /// Zero-based argument position
        index: usize,
        parameter: String,
        expected: Vec<EligianType>,
        actual: EligianType,
        span: Span,
    },

    #[error("Operation \"{operation}\" requires \"{dependency}\" to run first")]
    MissingDependency {
        operation: String,
        dependency: String,
        span: Span,
    },

    #[error("Operation \"{operation}\": {message}")]
    ControlFlow {
        operation: String,
        message: String,
        span: Span,
    },
}

fn join_categories(categories: &[EligianType]) -> String {
    categories
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(" | ")
}

fn example_for(category: EligianType) -> &'static str {
    match category {
        EligianType::String => "Pass a string value, e.g. \"text\"",
        EligianType::Number => "Pass a number value, e.g. 1000",
        EligianType::Boolean => "Pass a boolean value, e.g. true",
        EligianType::Object => "Pass an object literal, e.g. {opacity: 1}",
        EligianType::Array => "Pass an array literal, e.g. [\"a\", \"b\"]",
        EligianType::Unknown => "Pass a value of the expected type",
    }
}

impl OperationValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownOperation { .. } => operations::UNKNOWN_OPERATION,
            Self::ParameterCount { .. } => operations::PARAMETER_COUNT,
            Self::ParameterType { .. } => operations::PARAMETER_TYPE,
            Self::MissingDependency { .. } => operations::MISSING_DEPENDENCY,
            Self::ControlFlow { .. } => operations::CONTROL_FLOW,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Self::UnknownOperation { span, .. }
            | Self::ParameterCount { span, .. }
            | Self::ParameterType { span, .. }
            | Self::MissingDependency { span, .. }
            | Self::ControlFlow { span, .. } => span,
        }
    }

    pub fn hint(&self) -> String {
        match self {
            Self::UnknownOperation {
                suggestions,
                available,
                more_available,
                ..
            } => {
                if suggestions.is_empty() {
                    let mut listing = available.join(", ");
                    if *more_available {
                        listing.push_str(", ...");
                    }
                    format!("Available operations: {}", listing)
                } else {
                    format!("Did you mean: {}?", suggestions.join(", "))
                }
            }
            Self::ParameterCount { usage, .. } => format!("Usage: {}", usage),
            Self::ParameterType { expected, .. } => {
                example_for(expected.first().copied().unwrap_or(EligianType::Unknown)).to_string()
            }
            Self::MissingDependency { dependency, .. } => {
                format!("Call \"{}\" earlier in the same action", dependency)
            }
            Self::ControlFlow { .. } => "Check that every block opener has a matching closer".to_string(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut builder = Diagnostic::error(self.code())
            .message(self.to_string())
            .hint(self.hint())
            .span(self.span().clone());

        match self {
            Self::UnknownOperation { suggestions, .. } => {
                for suggestion in suggestions {
                    builder = builder.suggestion(Suggestion::replace_with(suggestion.as_str()));
                }
            }
            Self::ParameterCount {
                expected, actual, ..
            } => {
                builder = builder.note(Note::new(format!(
                    "expected {{min: {}, max: {}}}, actual: {}",
                    expected.min, expected.max, actual
                )));
            }
            _ => {}
        }

        builder.build()
    }
}
