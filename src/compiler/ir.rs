//! Engine configuration produced by the compiler

use serde::Serialize;
use serde_json::Value;

use crate::mapper::OperationData;
use crate::structural::ImportKind;

/// One runtime operation with named data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledOperation {
    pub system_name: String,
    pub operation_data: OperationData,
}

impl CompiledOperation {
    pub fn new(system_name: impl Into<String>, operation_data: OperationData) -> Self {
        Self {
            system_name: system_name.into(),
            operation_data,
        }
    }

    /// Operation whose data is a single field
    pub fn with_field(system_name: impl Into<String>, key: &str, value: Value) -> Self {
        let mut data = OperationData::new();
        data.insert(key.to_string(), value);
        Self::new(system_name, data)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledAction {
    pub name: String,
    pub start_operations: Vec<CompiledOperation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub end_operations: Vec<CompiledOperation>,
}

/// Event with resolved times in seconds
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledTimelineEvent {
    pub start: f64,
    pub end: f64,
    pub start_operations: Vec<CompiledOperation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub end_operations: Vec<CompiledOperation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledTimeline {
    pub name: String,
    pub provider: String,
    pub events: Vec<CompiledTimelineEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledImport {
    pub name: String,
    pub path: String,
    pub kind: ImportKind,
}

/// Complete compiled document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompiledProgram {
    pub imports: Vec<CompiledImport>,
    pub actions: Vec<CompiledAction>,
    pub timelines: Vec<CompiledTimeline>,
}

impl CompiledProgram {
    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
