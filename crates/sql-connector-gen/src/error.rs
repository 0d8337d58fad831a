//! Error types for the connector generator.

use thiserror::Error;

/// Main error type for connector generation operations.
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// Configuration error (invalid YAML, bad type map, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A connector definition lacks one of its required keys.
    #[error("Connector definition is missing required field '{0}'")]
    MissingField(&'static str),

    /// A required key is present but does not hold a string value.
    #[error("Connector definition field '{0}' must be a string")]
    InvalidField(&'static str),

    /// The named dbal connection is not registered.
    #[error("Dbal connection {connection} for connector {connector} does not exist")]
    UnknownConnection { connection: String, connector: String },

    /// The connection could not enumerate the named table.
    #[error("Table {0} not found")]
    TableNotFound(String),

    /// Connection-level failure while introspecting the schema.
    #[error("Connection error: {0}")]
    Connection(String),

    /// No processing type is configured for a native column type.
    #[error("No processing type mapping for column type {0}")]
    UnmappedType(String),

    /// A nullable or autoincrement column needs an OrNull variant that the
    /// catalog does not know.
    #[error("Missing null type {processing_type} for nullable column {column}")]
    MissingNullVariant {
        processing_type: String,
        column: String,
    },

    /// The mapped identifier does not resolve to a processing type.
    #[error("{0} does not satisfy the processing type contract")]
    InvalidType(String),

    /// A generated data type already exists under its fully qualified name.
    #[error("Data type {0} already exists")]
    AlreadyExists(String),

    /// Writing a generated data type failed.
    #[error("Failed to write data type {fqcn}: {message}")]
    Write { fqcn: String, message: String },

    /// The command bus rejected a dispatched command.
    #[error("Command dispatch failed: {0}")]
    Dispatch(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConnectorError {
    /// Create an UnknownConnection error with the connector it was resolved for.
    pub fn unknown_connection(connection: impl Into<String>, connector: impl Into<String>) -> Self {
        ConnectorError::UnknownConnection {
            connection: connection.into(),
            connector: connector.into(),
        }
    }

    /// Create a Write error with the fully qualified name it occurred for.
    pub fn write(fqcn: impl Into<String>, message: impl Into<String>) -> Self {
        ConnectorError::Write {
            fqcn: fqcn.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for connector generation operations.
pub type Result<T> = std::result::Result<T, ConnectorError>;
