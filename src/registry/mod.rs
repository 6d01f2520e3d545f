//! Operation registry
//!
//! Maps operation names to their signatures. The registry is loaded once,
//! never mutated afterwards, and shared (usually behind an `Arc`) by every
//! validation pass. Per-operation lattice types are memoized inside the
//! registry; the memo never needs invalidation because the registry is
//! immutable.

pub mod lattice;
pub mod types;

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

pub use lattice::{accepted_categories, category_of, map_parameter_type, EligianType};
pub use types::{ConstantValue, ParameterType, ParameterTypes};

/// Registry bundled with the compiler
const BUNDLED_REGISTRY: &str = include_str!("operations.json");

/// Errors raised while loading a registry
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read operation registry {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid operation registry: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate operation name `{0}`")]
    DuplicateOperation(String),
}

fn default_required() -> bool {
    true
}

/// One positional parameter of an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParameterTypes,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(
        default,
        rename = "defaultValue",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<serde_json::Value>,
}

impl ParameterSpec {
    pub fn required(name: impl Into<String>, ty: ParameterTypes) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            default_value: None,
        }
    }

    pub fn optional(
        name: impl Into<String>,
        ty: ParameterTypes,
        default_value: Option<serde_json::Value>,
    ) -> Self {
        Self {
            name: name.into(),
            ty,
            required: false,
            default_value,
        }
    }

    /// Lattice type of this parameter
    pub fn lattice_type(&self) -> EligianType {
        map_parameter_type(&self.ty)
    }
}

/// Signature as stored in registry JSON (the name is the map key)
#[derive(Debug, Deserialize)]
struct RawSignature {
    #[serde(default, rename = "systemName")]
    system_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Vec<ParameterSpec>,
}

/// Signature of a built-in operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationSignature {
    pub name: String,
    #[serde(rename = "systemName")]
    pub system_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parameters: Vec<ParameterSpec>,
}

impl OperationSignature {
    pub fn new(name: impl Into<String>, parameters: Vec<ParameterSpec>) -> Self {
        let name = name.into();
        Self {
            system_name: name.clone(),
            name,
            description: None,
            parameters,
        }
    }

    /// Number of required parameters
    pub fn required_count(&self) -> usize {
        self.parameters.iter().filter(|p| p.required).count()
    }

    /// Number of parameters overall
    pub fn total_count(&self) -> usize {
        self.parameters.len()
    }

    /// Render a call signature with optional parameters in brackets,
    /// required parameters first: `selectElement(selector, [useSelectedElementAsRoot])`
    pub fn usage(&self) -> String {
        let required = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.clone());
        let optional = self
            .parameters
            .iter()
            .filter(|p| !p.required)
            .map(|p| format!("[{}]", p.name));
        let rendered: Vec<String> = required.chain(optional).collect();
        format!("{}({})", self.name, rendered.join(", "))
    }
}

/// Immutable operation registry with memoized lattice lookups
#[derive(Debug)]
pub struct OperationRegistry {
    operations: BTreeMap<String, Arc<OperationSignature>>,
    lattice_cache: RwLock<HashMap<String, Arc<[EligianType]>>>,
}

impl OperationRegistry {
    /// Build a registry from signatures, rejecting duplicate names
    pub fn from_signatures(
        signatures: impl IntoIterator<Item = OperationSignature>,
    ) -> Result<Self, RegistryError> {
        let mut operations = BTreeMap::new();
        for signature in signatures {
            let name = signature.name.clone();
            if operations.insert(name.clone(), Arc::new(signature)).is_some() {
                return Err(RegistryError::DuplicateOperation(name));
            }
        }
        debug!(operations = operations.len(), "operation registry loaded");
        Ok(Self {
            operations,
            lattice_cache: RwLock::new(HashMap::new()),
        })
    }

    /// Parse a registry from its JSON representation
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: BTreeMap<String, RawSignature> = serde_json::from_str(json)?;
        Self::from_signatures(raw.into_iter().map(|(name, raw)| OperationSignature {
            system_name: raw.system_name.unwrap_or_else(|| name.clone()),
            name,
            description: raw.description,
            parameters: raw.parameters,
        }))
    }

    /// Load a registry JSON file
    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// The registry shipped with the compiler
    pub fn bundled() -> Result<Self, RegistryError> {
        Self::from_json(BUNDLED_REGISTRY)
    }

    /// Look up an operation signature by name
    pub fn lookup(&self, name: &str) -> Option<&Arc<OperationSignature>> {
        self.operations.get(name)
    }

    pub fn has_operation(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// All operation names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    pub fn signatures(&self) -> impl Iterator<Item = &Arc<OperationSignature>> {
        self.operations.values()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Lattice type of every parameter of an operation, by position
    pub fn parameter_types(&self, name: &str) -> Option<Arc<[EligianType]>> {
        if let Some(cached) = self
            .lattice_cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Some(Arc::clone(cached));
        }

        let signature = self.operations.get(name)?;
        let types: Arc<[EligianType]> = signature
            .parameters
            .iter()
            .map(ParameterSpec::lattice_type)
            .collect();
        trace!(operation = name, "memoized parameter lattice types");

        self.lattice_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), Arc::clone(&types));
        Some(types)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
