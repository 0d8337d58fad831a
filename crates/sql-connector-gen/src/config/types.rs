//! Configuration type definitions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root configuration for the sql connector generator.
///
/// Carries the mapping from native (doctrine) column types to processing
/// type identifiers, the catalog of resolvable processing types and the
/// root namespace generated classes are placed under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlConnectorConfig {
    /// Namespace prefix for generated data types.
    #[serde(default = "default_root_namespace")]
    pub root_namespace: String,

    /// Native column type name -> base processing type identifier.
    #[serde(default = "default_type_map")]
    pub type_map: IndexMap<String, String>,

    /// Catalog of known processing types.
    #[serde(default = "TypeCatalog::standard")]
    pub catalog: TypeCatalog,
}

impl Default for SqlConnectorConfig {
    fn default() -> Self {
        Self {
            root_namespace: default_root_namespace(),
            type_map: default_type_map(),
            catalog: TypeCatalog::standard(),
        }
    }
}

/// Catalog of processing types resolvable in the target runtime, keyed by
/// fully qualified name.
///
/// This replaces the original's per-call `class_exists` / interface probes:
/// a mapping is checked against the catalog when the configuration is loaded
/// and again when a column is mapped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeCatalog {
    entries: IndexMap<String, TypeDescriptor>,
}

/// Descriptor for one catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Whether the type satisfies the processing type contract. Helper
    /// classes (descriptions, prototypes) resolve but are not usable as
    /// column types.
    #[serde(default = "default_true")]
    pub processing_type: bool,
}

impl TypeCatalog {
    /// The standard processing primitives and their nullable variants.
    pub fn standard() -> Self {
        let mut catalog = Self::default();
        for name in ["String", "Integer", "Float", "Boolean", "DateTime"] {
            catalog.add(format!("Prooph\\Processing\\Type\\{}", name), true);
            catalog.add(format!("Prooph\\Processing\\Type\\{}OrNull", name), true);
        }
        catalog
    }

    /// Register a type under its fully qualified name.
    pub fn add(&mut self, fqcn: impl Into<String>, processing_type: bool) {
        self.entries
            .insert(fqcn.into(), TypeDescriptor { processing_type });
    }

    /// Whether the name resolves to a known type at all.
    pub fn contains(&self, fqcn: &str) -> bool {
        self.entries.contains_key(fqcn)
    }

    /// Whether the name resolves to a type satisfying the processing
    /// contract. Unknown names are not processing types.
    pub fn is_processing_type(&self, fqcn: &str) -> bool {
        self.entries
            .get(fqcn)
            .map(|descriptor| descriptor.processing_type)
            .unwrap_or(false)
    }
}

pub(super) fn default_root_namespace() -> String {
    "Prooph\\Link\\Application\\DataType".to_string()
}

pub(super) fn default_type_map() -> IndexMap<String, String> {
    let pairs = [
        ("string", "String"),
        ("text", "String"),
        ("guid", "String"),
        ("integer", "Integer"),
        ("smallint", "Integer"),
        ("bigint", "Integer"),
        ("float", "Float"),
        ("decimal", "Float"),
        ("boolean", "Boolean"),
        ("datetime", "DateTime"),
        ("datetimetz", "DateTime"),
        ("date", "DateTime"),
        ("time", "DateTime"),
    ];

    pairs
        .into_iter()
        .map(|(native, processing)| {
            (
                native.to_string(),
                format!("Prooph\\Processing\\Type\\{}", processing),
            )
        })
        .collect()
}

fn default_true() -> bool {
    true
}
