//! Abstract Syntax Tree consumed by the Eligian front-end
//!
//! The grammar and parser live outside this crate; they hand over a typed tree
//! (usually as JSON) following the node vocabulary below. All nodes carry a
//! source span, which defaults to an empty span when absent from the input.

use crate::diagnostics::Span;
use serde::{Deserialize, Serialize};

pub mod time;

pub use time::{TimeExpression, TimeOp, TimeRange, TimeUnit};

/// A complete Eligian document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub span: Span,
    #[serde(default)]
    pub imports: Vec<ImportStatement>,
    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
    #[serde(default)]
    pub timelines: Vec<Timeline>,
}

impl Program {
    /// Look up an action definition by name
    pub fn action(&self, name: &str) -> Option<&ActionDefinition> {
        self.actions.iter().find(|a| a.name == name)
    }
}

// ---------------------------------------------------------------------------
// Imports
// ---------------------------------------------------------------------------

/// Keyword of a default import (`layout './layout.html'`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultImportKeyword {
    Layout,
    Styles,
    Provider,
}

/// Explicit asset type in `import x from './x' as html`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Html,
    Css,
    Media,
    Json,
}

/// Import statement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ImportStatement {
    Default {
        #[serde(default)]
        span: Span,
        keyword: DefaultImportKeyword,
        path: String,
    },
    Named {
        #[serde(default)]
        span: Span,
        name: String,
        path: String,
        #[serde(default, rename = "as")]
        as_type: Option<AssetKind>,
    },
}

impl ImportStatement {
    pub fn span(&self) -> &Span {
        match self {
            ImportStatement::Default { span, .. } | ImportStatement::Named { span, .. } => span,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            ImportStatement::Default { path, .. } | ImportStatement::Named { path, .. } => path,
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Explicit type annotation on an action parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeAnnotation {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

/// Action parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default)]
    pub span: Span,
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<TypeAnnotation>,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            span: Span::default(),
            name: name.into(),
            type_annotation: None,
        }
    }

    pub fn typed(name: impl Into<String>, annotation: TypeAnnotation) -> Self {
        Self {
            type_annotation: Some(annotation),
            ..Self::new(name)
        }
    }
}

/// User-defined action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDefinition {
    #[serde(default)]
    pub span: Span,
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub body: ActionBody,
}

/// Operation bodies of an action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ActionBody {
    /// `action name(...) [ ... ]`
    Regular { operations: Vec<Statement> },
    /// `endable action name(...) [ start ] [ end ]`
    Endable {
        start: Vec<Statement>,
        end: Vec<Statement>,
    },
}

impl ActionDefinition {
    /// Create a regular action
    pub fn regular(
        name: impl Into<String>,
        parameters: Vec<Parameter>,
        operations: Vec<Statement>,
    ) -> Self {
        Self {
            span: Span::default(),
            name: name.into(),
            parameters,
            body: ActionBody::Regular { operations },
        }
    }

    /// Create an endable action with separate start and end bodies
    pub fn endable(
        name: impl Into<String>,
        parameters: Vec<Parameter>,
        start: Vec<Statement>,
        end: Vec<Statement>,
    ) -> Self {
        Self {
            span: Span::default(),
            name: name.into(),
            parameters,
            body: ActionBody::Endable { start, end },
        }
    }

    /// All operation statement lists (one for regular, two for endable actions)
    pub fn bodies(&self) -> Vec<&[Statement]> {
        match &self.body {
            ActionBody::Regular { operations } => vec![operations.as_slice()],
            ActionBody::Endable { start, end } => vec![start.as_slice(), end.as_slice()],
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn is_endable(&self) -> bool {
        matches!(self.body, ActionBody::Endable { .. })
    }
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

/// A call to a built-in operation or a user-defined action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationCall {
    #[serde(default)]
    pub span: Span,
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<Expression>,
}

impl OperationCall {
    pub fn new(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Self {
            span: Span::default(),
            name: name.into(),
            arguments,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// Statement inside an action or inline event body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Statement {
    OperationCall(OperationCall),
    If {
        #[serde(default)]
        span: Span,
        condition: Expression,
        then_branch: Vec<Statement>,
        #[serde(default)]
        else_branch: Option<Vec<Statement>>,
    },
    For {
        #[serde(default)]
        span: Span,
        item: String,
        collection: Expression,
        body: Vec<Statement>,
    },
    VariableDeclaration {
        #[serde(default)]
        span: Span,
        name: String,
        value: Expression,
    },
}

impl Statement {
    pub fn call(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Statement::OperationCall(OperationCall::new(name, arguments))
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

/// Runtime data scope addressed by a property chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// `$scope`
    Scope,
    /// `$operationdata`
    OperationData,
    /// `$globaldata`
    GlobalData,
}

impl Scope {
    /// Name used in the runtime's string reference convention
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Scope => "scope",
            Scope::OperationData => "operationdata",
            Scope::GlobalData => "globaldata",
        }
    }
}

/// A key/value pair in an object literal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectProperty {
    pub key: String,
    pub value: Expression,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Mod,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "||")]
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    #[serde(rename = "-")]
    Neg,
    #[serde(rename = "!")]
    Not,
}

/// Argument expression
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expression {
    StringLiteral {
        #[serde(default)]
        span: Span,
        value: String,
    },
    NumberLiteral {
        #[serde(default)]
        span: Span,
        value: f64,
    },
    BooleanLiteral {
        #[serde(default)]
        span: Span,
        value: bool,
    },
    NullLiteral {
        #[serde(default)]
        span: Span,
    },
    ObjectLiteral {
        #[serde(default)]
        span: Span,
        properties: Vec<ObjectProperty>,
    },
    ArrayLiteral {
        #[serde(default)]
        span: Span,
        elements: Vec<Expression>,
    },
    /// `$scope.currentItem.label`
    PropertyChain {
        #[serde(default)]
        span: Span,
        scope: Scope,
        properties: Vec<String>,
    },
    /// Bare identifier: an action parameter or a loop variable
    Reference {
        #[serde(default)]
        span: Span,
        name: String,
    },
    /// `@name`, a constant declared earlier in the body
    VariableReference {
        #[serde(default)]
        span: Span,
        name: String,
    },
    /// `@@currentItem`
    SystemProperty {
        #[serde(default)]
        span: Span,
        name: String,
    },
    Binary {
        #[serde(default)]
        span: Span,
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Unary {
        #[serde(default)]
        span: Span,
        op: UnaryOp,
        operand: Box<Expression>,
    },
}

impl Expression {
    pub fn string(value: impl Into<String>) -> Self {
        Expression::StringLiteral {
            span: Span::default(),
            value: value.into(),
        }
    }

    pub fn number(value: f64) -> Self {
        Expression::NumberLiteral {
            span: Span::default(),
            value,
        }
    }

    pub fn boolean(value: bool) -> Self {
        Expression::BooleanLiteral {
            span: Span::default(),
            value,
        }
    }

    pub fn object<K: Into<String>>(properties: impl IntoIterator<Item = (K, Expression)>) -> Self {
        Expression::ObjectLiteral {
            span: Span::default(),
            properties: properties
                .into_iter()
                .map(|(key, value)| ObjectProperty {
                    key: key.into(),
                    value,
                })
                .collect(),
        }
    }

    pub fn array(elements: Vec<Expression>) -> Self {
        Expression::ArrayLiteral {
            span: Span::default(),
            elements,
        }
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Expression::Reference {
            span: Span::default(),
            name: name.into(),
        }
    }

    pub fn property_chain<S: Into<String>>(
        scope: Scope,
        properties: impl IntoIterator<Item = S>,
    ) -> Self {
        Expression::PropertyChain {
            span: Span::default(),
            scope,
            properties: properties.into_iter().map(Into::into).collect(),
        }
    }

    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            span: Span::default(),
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Source span of this expression
    pub fn span(&self) -> &Span {
        match self {
            Expression::StringLiteral { span, .. }
            | Expression::NumberLiteral { span, .. }
            | Expression::BooleanLiteral { span, .. }
            | Expression::NullLiteral { span }
            | Expression::ObjectLiteral { span, .. }
            | Expression::ArrayLiteral { span, .. }
            | Expression::PropertyChain { span, .. }
            | Expression::Reference { span, .. }
            | Expression::VariableReference { span, .. }
            | Expression::SystemProperty { span, .. }
            | Expression::Binary { span, .. }
            | Expression::Unary { span, .. } => span,
        }
    }

    /// Render the expression back to source-like text, used for runtime
    /// condition strings and hover output
    pub fn render(&self) -> String {
        match self {
            Expression::StringLiteral { value, .. } => format!("'{}'", value),
            Expression::NumberLiteral { value, .. } => format_number(*value),
            Expression::BooleanLiteral { value, .. } => value.to_string(),
            Expression::NullLiteral { .. } => "null".to_string(),
            Expression::ObjectLiteral { properties, .. } => {
                let fields: Vec<String> = properties
                    .iter()
                    .map(|p| format!("{}: {}", p.key, p.value.render()))
                    .collect();
                format!("{{{}}}", fields.join(", "))
            }
            Expression::ArrayLiteral { elements, .. } => {
                let items: Vec<String> = elements.iter().map(|e| e.render()).collect();
                format!("[{}]", items.join(", "))
            }
            Expression::PropertyChain {
                scope, properties, ..
            } => property_chain_path(*scope, properties),
            Expression::Reference { name, .. } => name.clone(),
            Expression::VariableReference { name, .. } => format!("@{}", name),
            Expression::SystemProperty { name, .. } => format!("@@{}", name),
            Expression::Binary {
                op, left, right, ..
            } => format!("{} {} {}", left.render(), op.symbol(), right.render()),
            Expression::Unary { op, operand, .. } => match op {
                UnaryOp::Neg => format!("-{}", operand.render()),
                UnaryOp::Not => format!("!{}", operand.render()),
            },
        }
    }
}

/// The runtime's string convention for property chains: `scope.a.b`
pub fn property_chain_path(scope: Scope, properties: &[String]) -> String {
    std::iter::once(scope.as_str())
        .chain(properties.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(".")
}

/// Format a number without a trailing `.0` for integral values
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Timelines
// ---------------------------------------------------------------------------

/// A timeline bound to a media provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    #[serde(default)]
    pub span: Span,
    pub name: String,
    pub provider: String,
    #[serde(default)]
    pub events: Vec<TimelineEvent>,
}

/// Call of a user action from a timeline event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionCall {
    #[serde(default)]
    pub span: Span,
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<Expression>,
}

impl ActionCall {
    pub fn new(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Self {
            span: Span::default(),
            name: name.into(),
            arguments,
        }
    }
}

/// What a timeline event triggers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EventAction {
    /// A named action, e.g. `at 0s..5s fadeIn("#box")`
    Call(ActionCall),
    /// Inline operation lists, e.g. `at 0s..5s [ ... ] [ ... ]`
    Inline {
        start: Vec<Statement>,
        #[serde(default)]
        end: Vec<Statement>,
    },
}

/// One entry of a `sequence { ... }` block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceItem {
    pub action: ActionCall,
    pub duration: TimeExpression,
}

/// Timeline event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TimelineEvent {
    /// `at <start>..<end> <action>`
    Timed {
        #[serde(default)]
        span: Span,
        range: TimeRange,
        action: EventAction,
    },
    /// `sequence { a for 2s  b for 3s }`
    Sequence {
        #[serde(default)]
        span: Span,
        items: Vec<SequenceItem>,
    },
    /// `stagger 200ms items with a for 1s`
    Stagger {
        #[serde(default)]
        span: Span,
        delay: TimeExpression,
        items: Expression,
        action: ActionCall,
        duration: TimeExpression,
    },
}

impl TimelineEvent {
    pub fn span(&self) -> &Span {
        match self {
            TimelineEvent::Timed { span, .. }
            | TimelineEvent::Sequence { span, .. }
            | TimelineEvent::Stagger { span, .. } => span,
        }
    }
}

#[cfg(test)]
mod tests;
