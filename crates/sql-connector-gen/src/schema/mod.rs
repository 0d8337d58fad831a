//! Table schema introspection.
//!
//! The [`DbalConnection`] trait is the boundary to the actual database
//! layer: the generator only needs a database name, a platform identifier
//! and column/index enumeration for a named table. Connections are looked up
//! by name in a [`ConnectionRegistry`] populated by the embedding
//! application.

mod types;

pub use types::*;

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use tracing::warn;

use crate::error::Result;
use crate::typemap::ProcessingTypeRegistry;

/// Interface to a named database connection.
///
/// Implementations must be `Send + Sync`; the generator holds them as
/// `Arc<dyn DbalConnection>` and never mutates them.
#[async_trait]
pub trait DbalConnection: Send + Sync {
    /// Name of the database this connection points at.
    fn database_name(&self) -> &str;

    /// Identifier of the connection's platform/dialect, recorded in
    /// generated row types for downstream fidelity.
    fn platform_class(&self) -> &str;

    /// Enumerate the columns of a table in declaration order.
    async fn list_table_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>>;

    /// Enumerate the indexes of a table.
    async fn list_table_indexes(&self, table: &str) -> Result<Vec<IndexDescriptor>>;
}

/// Registry of named dbal connections.
#[derive(Default, Clone)]
pub struct ConnectionRegistry {
    connections: IndexMap<String, Arc<dyn DbalConnection>>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection under a name, replacing any previous entry.
    pub fn add(&mut self, name: impl Into<String>, connection: Arc<dyn DbalConnection>) {
        self.connections.insert(name.into(), connection);
    }

    /// Check whether a connection is registered under the name.
    pub fn contains(&self, name: &str) -> bool {
        self.connections.contains_key(name)
    }

    /// Look up a connection by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn DbalConnection>> {
        self.connections.get(name).cloned()
    }
}

/// Introspect a table into its [`TableShape`].
///
/// Columns are mapped through the registry in declaration order. The first
/// primary index wins; its column list joined with `_` forms the primary key
/// candidate, which is then reconciled case-insensitively against the
/// property names.
pub async fn describe_table(
    connection: &dyn DbalConnection,
    table: &str,
    registry: &ProcessingTypeRegistry,
) -> Result<TableShape> {
    let columns = connection.list_table_columns(table).await?;

    let mut properties = PropertyMap::new();
    for column in &columns {
        let processing_type = registry.map_column(column)?;
        properties.insert(
            column.name.clone(),
            PropertyType {
                processing_type,
                native_type: column.native_type.clone(),
            },
        );
    }

    let indexes = connection.list_table_indexes(table).await?;
    let primary_key = indexes
        .iter()
        .find(|index| index.is_primary)
        .map(|index| reconcile_primary_key(index.columns.join("_"), &properties, table));

    Ok(TableShape {
        table: table.to_string(),
        properties,
        primary_key,
    })
}

/// Match a primary key candidate against the property names.
///
/// An exact match is kept; otherwise the first case-insensitive match is
/// substituted. A candidate without any match (composite keys, renamed
/// columns) is kept as-is and the generated type must be adjusted manually.
fn reconcile_primary_key(candidate: String, properties: &PropertyMap, table: &str) -> String {
    if properties.contains_key(&candidate) {
        return candidate;
    }

    for name in properties.keys() {
        if name.eq_ignore_ascii_case(&candidate) {
            return name.clone();
        }
    }

    warn!(
        table,
        primary_key = %candidate,
        "primary key does not match any column property, embedding raw candidate"
    );

    candidate
}
