//! Configuration validation.

use super::SqlConnectorConfig;
use crate::error::{ConnectorError, Result};
use crate::typemap::NULLABLE_SUFFIX;

/// Validate the configuration.
///
/// Every mapped base type must resolve in the catalog and satisfy the
/// processing type contract, so that a broken type map is rejected when the
/// configuration is loaded instead of on the first add call. A missing
/// `OrNull` variant is legal here: it only matters once a nullable column of
/// that type is actually mapped.
pub fn validate(config: &SqlConnectorConfig) -> Result<()> {
    if config.root_namespace.is_empty() {
        return Err(ConnectorError::Config("root_namespace is required".into()));
    }
    if config.root_namespace.ends_with('\\') {
        return Err(ConnectorError::Config(
            "root_namespace must not end with a namespace separator".into(),
        ));
    }
    if config.type_map.is_empty() {
        return Err(ConnectorError::Config(
            "type_map must contain at least one native type mapping".into(),
        ));
    }

    for (native, processing) in &config.type_map {
        if processing.ends_with(NULLABLE_SUFFIX) {
            return Err(ConnectorError::Config(format!(
                "type_map entry '{}' maps to nullable variant '{}' - map to the base type instead",
                native, processing
            )));
        }
        if !config.catalog.contains(processing) {
            return Err(ConnectorError::Config(format!(
                "type_map entry '{}' maps to unknown type '{}'",
                native, processing
            )));
        }
        if !config.catalog.is_processing_type(processing) {
            return Err(ConnectorError::Config(format!(
                "type_map entry '{}' maps to '{}' which does not satisfy the processing type contract",
                native, processing
            )));
        }
    }

    Ok(())
}
