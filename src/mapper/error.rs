use crate::diagnostics::{mapping, Diagnostic, Span};

/// Failure to turn a positional call into named operation data
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MappingError {
    #[error("Missing required parameter \"{parameter}\" for operation \"{operation}\"")]
    MissingParameter {
        operation: String,
        parameter: String,
        span: Span,
    },

    #[error("Cannot resolve \"{name}\" to an action parameter or loop variable")]
    UnresolvedReference { name: String, span: Span },

    #[error("Expression `{expression}` cannot be evaluated at compile time")]
    UnsupportedExpression { expression: String, span: Span },
}

impl MappingError {
    pub fn code(&self) -> &'static str {
        mapping::MAPPING_ERROR
    }

    pub fn span(&self) -> &Span {
        match self {
            MappingError::MissingParameter { span, .. }
            | MappingError::UnresolvedReference { span, .. }
            | MappingError::UnsupportedExpression { span, .. } => span,
        }
    }

    pub fn hint(&self) -> String {
        match self {
            MappingError::MissingParameter { parameter, .. } => {
                format!("Pass a value for \"{}\"", parameter)
            }
            MappingError::UnresolvedReference { name, .. } => {
                format!("Declare \"{}\" as an action parameter, or use a property chain such as $operationdata.{}", name, name)
            }
            MappingError::UnsupportedExpression { .. } => {
                "Only literal operands can be combined with operators here".to_string()
            }
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
