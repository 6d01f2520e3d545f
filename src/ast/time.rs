//! Time literals and time arithmetic used by timeline events

use crate::diagnostics::Span;
use serde::{Deserialize, Serialize};

/// Unit of a time literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Ms,
    S,
    M,
    H,
}

impl TimeUnit {
    fn to_seconds(self, value: f64) -> f64 {
        match self {
            TimeUnit::Ms => value / 1000.0,
            TimeUnit::S => value,
            TimeUnit::M => value * 60.0,
            TimeUnit::H => value * 3600.0,
        }
    }
}

/// Arithmetic operator between time expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
}

/// Time expression such as `2s + 500ms`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TimeExpression {
    Literal {
        #[serde(default)]
        span: Span,
        value: f64,
        /// Plain numbers (used as multipliers) carry no unit and count as seconds
        #[serde(default)]
        unit: Option<TimeUnit>,
    },
    Binary {
        #[serde(default)]
        span: Span,
        op: TimeOp,
        left: Box<TimeExpression>,
        right: Box<TimeExpression>,
    },
}

impl TimeExpression {
    pub fn seconds(value: f64) -> Self {
        TimeExpression::Literal {
            span: Span::default(),
            value,
            unit: Some(TimeUnit::S),
        }
    }

    pub fn millis(value: f64) -> Self {
        TimeExpression::Literal {
            span: Span::default(),
            value,
            unit: Some(TimeUnit::Ms),
        }
    }

    pub fn binary(op: TimeOp, left: TimeExpression, right: TimeExpression) -> Self {
        TimeExpression::Binary {
            span: Span::default(),
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            TimeExpression::Literal { span, .. } | TimeExpression::Binary { span, .. } => span,
        }
    }

    /// Evaluate to seconds. `None` on division by zero or a non-finite result.
    pub fn evaluate(&self) -> Option<f64> {
        let value = match self {
            TimeExpression::Literal { value, unit, .. } => {
                unit.map_or(*value, |unit| unit.to_seconds(*value))
            }
            TimeExpression::Binary {
                op, left, right, ..
            } => {
                let l = left.evaluate()?;
                let r = right.evaluate()?;
                match op {
                    TimeOp::Add => l + r,
                    TimeOp::Sub => l - r,
                    TimeOp::Mul => l * r,
                    TimeOp::Div if r == 0.0 => return None,
                    TimeOp::Div => l / r,
                }
            }
        };
        value.is_finite().then_some(value)
    }
}

/// `start..end`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: TimeExpression,
    pub end: TimeExpression,
}

impl TimeRange {
    pub fn new(start: TimeExpression, end: TimeExpression) -> Self {
        Self { start, end }
    }
}
