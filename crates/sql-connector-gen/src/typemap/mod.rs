//! Mapping from native column types to processing types.

use indexmap::IndexMap;

use crate::config::{SqlConnectorConfig, TypeCatalog};
use crate::error::{ConnectorError, Result};
use crate::schema::ColumnDescriptor;

/// Suffix appended to the base processing type of nullable columns.
pub const NULLABLE_SUFFIX: &str = "OrNull";

/// Resolves columns to processing type identifiers.
///
/// Pure lookup over the configured native-type map and the type catalog; a
/// registry built through [`SqlConnectorConfig::from_yaml`] is already
/// validated, but every check is repeated here so hand-built registries fail
/// closed as well.
#[derive(Debug, Clone)]
pub struct ProcessingTypeRegistry {
    type_map: IndexMap<String, String>,
    catalog: TypeCatalog,
}

impl ProcessingTypeRegistry {
    /// Build a registry from an explicit type map and catalog.
    pub fn new(type_map: IndexMap<String, String>, catalog: TypeCatalog) -> Self {
        Self { type_map, catalog }
    }

    /// Build a registry from loaded configuration.
    pub fn from_config(config: &SqlConnectorConfig) -> Self {
        Self::new(config.type_map.clone(), config.catalog.clone())
    }

    /// Map a column to its processing type identifier.
    ///
    /// Nullable and autoincrement columns map to the `OrNull` variant of the
    /// configured base type. Autoincrement columns are treated as nullable
    /// because their value is absent until the row is inserted.
    pub fn map_column(&self, column: &ColumnDescriptor) -> Result<String> {
        let base = self
            .type_map
            .get(&column.native_type)
            .ok_or_else(|| ConnectorError::UnmappedType(column.native_type.clone()))?;

        let mut processing_type = base.clone();

        if column.is_nullable || column.auto_increment {
            processing_type.push_str(NULLABLE_SUFFIX);

            if !self.catalog.contains(&processing_type) {
                return Err(ConnectorError::MissingNullVariant {
                    processing_type,
                    column: column.name.clone(),
                });
            }
        }

        if !self.catalog.is_processing_type(&processing_type) {
            return Err(ConnectorError::InvalidType(processing_type));
        }

        Ok(processing_type)
    }
}
