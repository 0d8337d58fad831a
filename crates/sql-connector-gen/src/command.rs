//! Connector configuration commands and the dispatch boundary.
//!
//! The generator does not persist connector records itself: it builds one of
//! the command shapes below and hands it to the injected
//! [`CommandDispatcher`]. The dispatcher is the last step of every add and
//! update call; generated artifacts are written before dispatch and are not
//! rolled back when dispatch fails.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Message kind for collecting rows from a connector.
pub const COLLECT_DATA: &str = "collect-data";

/// Message kind for processing rows through a connector.
pub const PROCESS_DATA: &str = "process-data";

/// Location of the persisted processing configuration the commands target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigLocation(PathBuf);

impl ConfigLocation {
    /// Create a config location from a path.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// The underlying path.
    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Commands produced by the connector generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ConnectorCommand {
    /// Register a new connector in the processing configuration.
    AddConnectorToConfig {
        connector_id: String,
        connector_name: String,
        allowed_messages: Vec<String>,
        allowed_types: Vec<String>,
        config_location: ConfigLocation,
        additional_data: Map<String, Value>,
    },

    /// Apply new values to an existing connector, keyed by id.
    ChangeConnectorConfig {
        connector_id: String,
        payload: Map<String, Value>,
        config_location: ConfigLocation,
    },
}

impl ConnectorCommand {
    /// Id of the connector the command targets.
    pub fn connector_id(&self) -> &str {
        match self {
            ConnectorCommand::AddConnectorToConfig { connector_id, .. } => connector_id,
            ConnectorCommand::ChangeConnectorConfig { connector_id, .. } => connector_id,
        }
    }
}

/// Boundary to the command bus applying connector commands to the persisted
/// configuration.
#[async_trait]
pub trait CommandDispatcher: Send + Sync {
    /// Dispatch a command. The generator propagates errors but performs no
    /// retry and no rollback of already written artifacts.
    async fn dispatch(&self, command: ConnectorCommand) -> Result<()>;
}
