//! The compile-time type lattice and the registry-type → lattice mapping
//!
//! The lattice is deliberately coarser than the registry's semantic types:
//! compile-time checks catch category errors (a number where a selector string
//! is expected), not semantic subtype errors. Both the call validator and the
//! structural type system go through [`map_parameter_type`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::{ParameterType, ParameterTypes};
use crate::ast::TypeAnnotation;

/// Lattice element. Disjoint, except `Unknown` which is compatible with all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EligianType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Unknown,
}

impl EligianType {
    pub const ALL: [EligianType; 6] = [
        EligianType::String,
        EligianType::Number,
        EligianType::Boolean,
        EligianType::Object,
        EligianType::Array,
        EligianType::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EligianType::String => "string",
            EligianType::Number => "number",
            EligianType::Boolean => "boolean",
            EligianType::Object => "object",
            EligianType::Array => "array",
            EligianType::Unknown => "unknown",
        }
    }

    /// `unknown` on either side is compatible with everything
    pub fn is_compatible_with(self, other: EligianType) -> bool {
        self == EligianType::Unknown || other == EligianType::Unknown || self == other
    }
}

impl fmt::Display for EligianType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TypeAnnotation> for EligianType {
    fn from(annotation: TypeAnnotation) -> Self {
        match annotation {
            TypeAnnotation::String => EligianType::String,
            TypeAnnotation::Number => EligianType::Number,
            TypeAnnotation::Boolean => EligianType::Boolean,
            TypeAnnotation::Object => EligianType::Object,
            TypeAnnotation::Array => EligianType::Array,
        }
    }
}

/// Category of a single registry parameter type
pub fn category_of(ty: &ParameterType) -> EligianType {
    match ty {
        ParameterType::String
        | ParameterType::Selector
        | ParameterType::ClassName
        | ParameterType::HtmlElementName
        | ParameterType::EventTopic
        | ParameterType::EventName
        | ParameterType::SystemName
        | ParameterType::ActionName
        | ParameterType::ControllerName
        | ParameterType::Url
        | ParameterType::HtmlContent
        | ParameterType::LabelId
        | ParameterType::ImagePath
        | ParameterType::QuadrantPosition
        | ParameterType::Expression
        | ParameterType::MathFunction => EligianType::String,
        ParameterType::Number | ParameterType::Dimensions | ParameterType::DimensionsModifier => {
            EligianType::Number
        }
        ParameterType::Boolean => EligianType::Boolean,
        ParameterType::Object | ParameterType::JQuery => EligianType::Object,
        ParameterType::Array => EligianType::Array,
        ParameterType::Other(name) => category_by_keyword(name),
    }
}

/// Category keywords, tested in order. Matching is case-insensitive.
const CATEGORY_KEYWORDS: [(EligianType, &[&str]); 5] = [
    (
        EligianType::String,
        &[
            "string",
            "selector",
            "classname",
            "htmlelementname",
            "eventtopic",
            "eventname",
            "systemname",
            "actionname",
            "controllername",
            "url",
            "htmlcontent",
            "labelid",
            "imagepath",
            "quadrantposition",
            "expression",
            "mathfunction",
        ],
    ),
    (EligianType::Number, &["number", "dimensions"]),
    (EligianType::Boolean, &["boolean"]),
    (EligianType::Object, &["object", "jquery"]),
    (EligianType::Array, &["array"]),
];

/// Category of a type name outside the known vocabulary, e.g. `cssSelector`
/// is a string and `numberOfItems` a number
fn category_by_keyword(name: &str) -> EligianType {
    let name = name.to_ascii_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| name.contains(keyword)))
        .map_or(EligianType::Unknown, |(category, _)| *category)
}

/// Map a registry parameter type onto the lattice.
///
/// Constant sets are strings; unions are classified by their first member.
pub fn map_parameter_type(types: &ParameterTypes) -> EligianType {
    match types {
        ParameterTypes::Constants(_) => EligianType::String,
        ParameterTypes::Single(ty) => category_of(ty),
        ParameterTypes::Union(members) => members
            .first()
            .map(category_of)
            .unwrap_or(EligianType::Unknown),
    }
}

/// Every category a parameter accepts, used for call-site compatibility
pub fn accepted_categories(types: &ParameterTypes) -> Vec<EligianType> {
    match types {
        ParameterTypes::Constants(_) => vec![EligianType::String],
        ParameterTypes::Single(ty) => vec![category_of(ty)],
        ParameterTypes::Union(members) if members.is_empty() => vec![EligianType::Unknown],
        ParameterTypes::Union(members) => {
            let mut categories: Vec<EligianType> = Vec::new();
            for category in members.iter().map(category_of) {
                if !categories.contains(&category) {
                    categories.push(category);
                }
            }
            categories
        }
    }
}
