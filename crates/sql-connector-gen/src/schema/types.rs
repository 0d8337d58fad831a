//! Schema metadata types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column metadata as reported by a connection's schema source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name, case preserved.
    pub name: String,

    /// Native type name (e.g. "string", "integer", "datetime").
    pub native_type: String,

    /// Whether the column allows NULL.
    #[serde(default)]
    pub is_nullable: bool,

    /// Whether the column is an autoincrement/identity column.
    #[serde(default)]
    pub auto_increment: bool,
}

/// Index metadata as reported by a connection's schema source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDescriptor {
    /// Index name.
    pub name: String,

    /// Indexed column names in index order.
    pub columns: Vec<String>,

    /// Whether this is the primary index.
    #[serde(default)]
    pub is_primary: bool,

    /// Whether the index is unique.
    #[serde(default)]
    pub is_unique: bool,
}

/// Resolved type information for one table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyType {
    /// Mapped processing type identifier.
    pub processing_type: String,

    /// Original native type name, recorded for downstream fidelity.
    pub native_type: String,
}

/// Ordered column name -> property type map.
///
/// Insertion order is the column declaration order and must be preserved
/// into generated source for deterministic output.
pub type PropertyMap = IndexMap<String, PropertyType>;

/// Shape of an introspected table: its properties and its primary key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableShape {
    /// Table name as introspected.
    pub table: String,

    /// Ordered property map.
    pub properties: PropertyMap,

    /// Primary key name, if the table has a primary index. Composite keys
    /// are joined with `_` and a candidate may not match any property (the
    /// generated type then needs manual adjustment).
    pub primary_key: Option<String>,
}

impl TableShape {
    /// Check if the table has a primary key.
    pub fn has_primary_key(&self) -> bool {
        self.primary_key.is_some()
    }
}
