//! Registry parameter types
//!
//! Registry type strings look like `ParameterType:selector`; the prefix is
//! optional. Names outside the known vocabulary are kept verbatim; the lattice
//! classifies them by the category keywords they contain.

use std::fmt;

use serde::{Deserialize, Serialize};

const TYPE_PREFIX: &str = "ParameterType:";

/// Semantic parameter type from the operation registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParameterType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Selector,
    ClassName,
    HtmlElementName,
    EventTopic,
    EventName,
    SystemName,
    ActionName,
    ControllerName,
    Url,
    HtmlContent,
    LabelId,
    ImagePath,
    QuadrantPosition,
    Expression,
    MathFunction,
    Dimensions,
    DimensionsModifier,
    JQuery,
    Other(String),
}

impl ParameterType {
    pub fn name(&self) -> &str {
        match self {
            ParameterType::String => "string",
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
            ParameterType::Object => "object",
            ParameterType::Array => "array",
            ParameterType::Selector => "selector",
            ParameterType::ClassName => "className",
            ParameterType::HtmlElementName => "htmlElementName",
            ParameterType::EventTopic => "eventTopic",
            ParameterType::EventName => "eventName",
            ParameterType::SystemName => "systemName",
            ParameterType::ActionName => "actionName",
            ParameterType::ControllerName => "controllerName",
            ParameterType::Url => "url",
            ParameterType::HtmlContent => "htmlContent",
            ParameterType::LabelId => "labelId",
            ParameterType::ImagePath => "ImagePath",
            ParameterType::QuadrantPosition => "QuadrantPosition",
            ParameterType::Expression => "expression",
            ParameterType::MathFunction => "mathfunction",
            ParameterType::Dimensions => "dimensions",
            ParameterType::DimensionsModifier => "dimensionsModifier",
            ParameterType::JQuery => "jQuery",
            ParameterType::Other(name) => name,
        }
    }
}

impl From<String> for ParameterType {
    fn from(raw: String) -> Self {
        let name = raw.strip_prefix(TYPE_PREFIX).unwrap_or(&raw);
        match name {
            "string" => ParameterType::String,
            "number" => ParameterType::Number,
            "boolean" => ParameterType::Boolean,
            "object" => ParameterType::Object,
            "array" => ParameterType::Array,
            "selector" => ParameterType::Selector,
            "className" => ParameterType::ClassName,
            "htmlElementName" => ParameterType::HtmlElementName,
            "eventTopic" => ParameterType::EventTopic,
            "eventName" => ParameterType::EventName,
            "systemName" => ParameterType::SystemName,
            "actionName" => ParameterType::ActionName,
            "controllerName" => ParameterType::ControllerName,
            "url" => ParameterType::Url,
            "htmlContent" => ParameterType::HtmlContent,
            "labelId" => ParameterType::LabelId,
            "ImagePath" => ParameterType::ImagePath,
            "QuadrantPosition" => ParameterType::QuadrantPosition,
            "expression" => ParameterType::Expression,
            "mathfunction" => ParameterType::MathFunction,
            "dimensions" => ParameterType::Dimensions,
            "dimensionsModifier" => ParameterType::DimensionsModifier,
            "jQuery" => ParameterType::JQuery,
            other => ParameterType::Other(other.to_string()),
        }
    }
}

impl From<&str> for ParameterType {
    fn from(raw: &str) -> Self {
        ParameterType::from(raw.to_string())
    }
}

impl From<ParameterType> for String {
    fn from(ty: ParameterType) -> Self {
        format!("{}{}", TYPE_PREFIX, ty.name())
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One allowed value of an enumerated parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantValue {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ConstantValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            description: None,
        }
    }
}

/// The `type` of a registry parameter: one type, a union, or a constant set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterTypes {
    Single(ParameterType),
    Union(Vec<ParameterType>),
    Constants(Vec<ConstantValue>),
}

impl fmt::Display for ParameterTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterTypes::Single(ty) => write!(f, "{}", ty),
            ParameterTypes::Union(members) => {
                let names: Vec<&str> = members.iter().map(ParameterType::name).collect();
                f.write_str(&names.join(" | "))
            }
            ParameterTypes::Constants(values) => {
                let quoted: Vec<String> = values.iter().map(|c| format!("'{}'", c.value)).collect();
                f.write_str(&quoted.join(" | "))
            }
        }
    }
}
