//! # sql-connector-gen
//!
//! Schema-driven sql connector generator.
//!
//! Given a registered database connection and a table name, this library
//! introspects the table's columns and primary key, maps each native column
//! type to a processing type, renders a generated row type and a collection
//! type for it, writes both to a data type sink and registers the connector
//! in the persisted processing configuration via command dispatch:
//!
//! - **Type mapping** from native column types to processing types, with
//!   nullable/autoincrement columns mapped to `OrNull` variants
//! - **Deterministic source synthesis** keyed by titleized database and
//!   table names
//! - **Idempotent adds** (create-if-absent) vs. **destructive
//!   regeneration** (force-replace) on update
//! - **Command dispatch** of add/change connector configuration commands
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sql_connector_gen::{
//!     ConfigLocation, ConnectorResource, DataTypeLocation, SqlConnectorConfig,
//!     TableConnectorGenerator,
//! };
//!
//! # async fn example(
//! #     connections: sql_connector_gen::ConnectionRegistry,
//! #     command_bus: Arc<dyn sql_connector_gen::CommandDispatcher>,
//! # ) -> sql_connector_gen::Result<()> {
//! let config = SqlConnectorConfig::load("sqlconnector.yaml")?;
//!
//! let generator = TableConnectorGenerator::new(
//!     connections,
//!     Arc::new(DataTypeLocation::new("data/DataType", &config.root_namespace)),
//!     ConfigLocation::from_path("config/processing.json"),
//!     command_bus,
//!     &config,
//! );
//!
//! let resource = ConnectorResource::new(Arc::new(generator));
//! let definition = serde_json::json!({
//!     "dbal_connection": "crm",
//!     "table": "customers",
//!     "name": "Crm Customers",
//! });
//! let created = resource
//!     .create(definition.as_object().cloned().unwrap())
//!     .await?;
//! println!("connector id: {}", created["id"]);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod codegen;
pub mod command;
pub mod config;
pub mod error;
pub mod generator;
pub mod naming;
pub mod schema;
pub mod sink;
pub mod typemap;

// Re-exports for convenient access
pub use api::{generate_connector_id, ConnectorResource};
pub use command::{CommandDispatcher, ConfigLocation, ConnectorCommand};
pub use config::{SqlConnectorConfig, TypeCatalog};
pub use error::{ConnectorError, Result};
pub use generator::TableConnectorGenerator;
pub use naming::{titleize, TypeRefs};
pub use schema::{
    ColumnDescriptor, ConnectionRegistry, DbalConnection, IndexDescriptor, TableShape,
};
pub use sink::{DataTypeLocation, DataTypeSink};
pub use typemap::ProcessingTypeRegistry;
