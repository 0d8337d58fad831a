//! Connector generation orchestrator.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::codegen;
use crate::command::{
    CommandDispatcher, ConfigLocation, ConnectorCommand, COLLECT_DATA, PROCESS_DATA,
};
use crate::config::SqlConnectorConfig;
use crate::error::{ConnectorError, Result};
use crate::naming::TypeRefs;
use crate::schema::{describe_table, ConnectionRegistry, DbalConnection, TableShape};
use crate::sink::DataTypeSink;
use crate::typemap::ProcessingTypeRegistry;

/// Icon assigned to every sql connector record.
pub const ICON: &str = "glyphicon-hdd";

/// UI metadata tag assigned to every sql connector record.
pub const METADATA_UI_KEY: &str = "sqlconnector-metadata";

/// Takes a sql table connector definition, generates table row processing
/// types from the table's schema and registers the connector in the
/// processing configuration via command dispatch.
///
/// Each call runs the full sequence to completion: validate the definition,
/// resolve the named connection, introspect the table, render and write both
/// generated type sources, then dispatch the configuration command.
/// Artifacts are written before dispatch; a dispatch failure leaves them in
/// place without a registered connector (no rollback).
pub struct TableConnectorGenerator {
    connections: ConnectionRegistry,
    data_types: Arc<dyn DataTypeSink>,
    config_location: ConfigLocation,
    command_bus: Arc<dyn CommandDispatcher>,
    type_registry: ProcessingTypeRegistry,
    root_namespace: String,
}

/// Validated required fields of a connector definition.
struct ConnectorDefinition {
    dbal_connection: String,
    table: String,
    name: String,
}

impl ConnectorDefinition {
    fn from_map(connector: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            dbal_connection: require_str(connector, "dbal_connection")?,
            table: require_str(connector, "table")?,
            name: require_str(connector, "name")?,
        })
    }
}

fn require_str(connector: &Map<String, Value>, key: &'static str) -> Result<String> {
    match connector.get(key) {
        None => Err(ConnectorError::MissingField(key)),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(ConnectorError::InvalidField(key)),
    }
}

impl TableConnectorGenerator {
    /// Create a generator over the injected collaborators.
    pub fn new(
        connections: ConnectionRegistry,
        data_types: Arc<dyn DataTypeSink>,
        config_location: ConfigLocation,
        command_bus: Arc<dyn CommandDispatcher>,
        config: &SqlConnectorConfig,
    ) -> Self {
        Self {
            connections,
            data_types,
            config_location,
            command_bus,
            type_registry: ProcessingTypeRegistry::from_config(config),
            root_namespace: config.root_namespace.clone(),
        }
    }

    /// Add a new connector: generate its table types and dispatch an
    /// add-connector command.
    ///
    /// Type generation is create-if-absent: repeating the call for an
    /// unchanged table leaves previously generated sources untouched.
    pub async fn add_connector(&self, id: &str, connector: &Map<String, Value>) -> Result<()> {
        let definition = ConnectorDefinition::from_map(connector)?;
        let connection = self.resolve_connection(&definition)?;

        let refs = TypeRefs::derive(
            &self.root_namespace,
            connection.database_name(),
            &definition.table,
        );

        let shape = describe_table(
            connection.as_ref(),
            &definition.table,
            &self.type_registry,
        )
        .await?;

        self.write_generated_types(&refs, &shape, connection.platform_class(), false)
            .await?;

        let mut additional_data = connector.clone();
        additional_data.remove("name");
        additional_data.insert("icon".to_string(), Value::String(ICON.to_string()));
        additional_data.insert(
            "ui_metadata_riot_tag".to_string(),
            Value::String(METADATA_UI_KEY.to_string()),
        );

        info!(
            connector_id = id,
            connector_name = %definition.name,
            table = %definition.table,
            row_type = %refs.row_fqcn(),
            "registering sql connector"
        );

        self.command_bus
            .dispatch(ConnectorCommand::AddConnectorToConfig {
                connector_id: id.to_string(),
                connector_name: definition.name,
                allowed_messages: allowed_messages(),
                allowed_types: vec![refs.row_fqcn(), refs.collection_fqcn()],
                config_location: self.config_location.clone(),
                additional_data,
            })
            .await
    }

    /// Update an existing connector, keyed by id.
    ///
    /// With `regenerate_types` the table is introspected again and both
    /// generated sources are force-replaced; this overwrites types that may
    /// already be in use elsewhere and is the caller's responsibility.
    /// Without it no schema access happens at all, only the deterministic
    /// type names are recomputed.
    pub async fn update_connector(
        &self,
        id: &str,
        connector: &Map<String, Value>,
        regenerate_types: bool,
    ) -> Result<()> {
        let definition = ConnectorDefinition::from_map(connector)?;
        let connection = self.resolve_connection(&definition)?;

        let refs = TypeRefs::derive(
            &self.root_namespace,
            connection.database_name(),
            &definition.table,
        );

        if regenerate_types {
            let shape = describe_table(
                connection.as_ref(),
                &definition.table,
                &self.type_registry,
            )
            .await?;

            self.write_generated_types(&refs, &shape, connection.platform_class(), true)
                .await?;
        }

        let mut payload = connector.clone();
        payload.insert("icon".to_string(), Value::String(ICON.to_string()));
        payload.insert(
            "ui_metadata_riot_tag".to_string(),
            Value::String(METADATA_UI_KEY.to_string()),
        );
        payload.insert(
            "allowed_types".to_string(),
            string_list(vec![refs.row_fqcn(), refs.collection_fqcn()]),
        );
        payload.insert("allowed_messages".to_string(), string_list(allowed_messages()));

        info!(
            connector_id = id,
            table = %definition.table,
            regenerate_types,
            "updating sql connector"
        );

        self.command_bus
            .dispatch(ConnectorCommand::ChangeConnectorConfig {
                connector_id: id.to_string(),
                payload,
                config_location: self.config_location.clone(),
            })
            .await
    }

    fn resolve_connection(
        &self,
        definition: &ConnectorDefinition,
    ) -> Result<Arc<dyn DbalConnection>> {
        self.connections
            .get(&definition.dbal_connection)
            .ok_or_else(|| {
                ConnectorError::unknown_connection(&definition.dbal_connection, &definition.name)
            })
    }

    /// Render and write both generated sources for a table.
    ///
    /// In create-if-absent mode an existing artifact is kept and the
    /// AlreadyExists signal is downgraded to a skip, which makes repeated
    /// add calls idempotent.
    async fn write_generated_types(
        &self,
        refs: &TypeRefs,
        shape: &TableShape,
        platform_class: &str,
        force_replace: bool,
    ) -> Result<()> {
        let row_source =
            codegen::render_row_type(&refs.namespace, &refs.row_class, shape, platform_class);
        let collection_source = codegen::render_collection_type(
            &refs.namespace,
            &refs.collection_class,
            &refs.row_class,
        );

        self.write_artifact(&refs.row_fqcn(), &row_source, force_replace)
            .await?;
        self.write_artifact(&refs.collection_fqcn(), &collection_source, force_replace)
            .await
    }

    async fn write_artifact(&self, fqcn: &str, source: &str, force_replace: bool) -> Result<()> {
        match self.data_types.write(fqcn, source, force_replace).await {
            Err(ConnectorError::AlreadyExists(_)) if !force_replace => {
                debug!(fqcn, "generated data type already exists, keeping it");
                Ok(())
            }
            other => other,
        }
    }
}

fn allowed_messages() -> Vec<String> {
    vec![COLLECT_DATA.to_string(), PROCESS_DATA.to_string()]
}

fn string_list(values: Vec<String>) -> Value {
    Value::Array(values.into_iter().map(Value::String).collect())
}
