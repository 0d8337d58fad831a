//! Inbound resource surface consumed by the REST layer.

use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::Result;
use crate::generator::TableConnectorGenerator;

/// Prefix of every generated connector id.
pub const CONNECTOR_ID_PREFIX: &str = "sqlconnector:::";

/// Generate a unique connector id.
pub fn generate_connector_id() -> String {
    format!("{}{}", CONNECTOR_ID_PREFIX, Uuid::new_v4())
}

/// Connector resource: maps inbound create/update payloads onto the
/// generator and echoes the payload back with its id populated.
pub struct ConnectorResource {
    generator: Arc<TableConnectorGenerator>,
}

impl ConnectorResource {
    pub fn new(generator: Arc<TableConnectorGenerator>) -> Self {
        Self { generator }
    }

    /// Create a connector from a definition payload.
    pub async fn create(&self, mut data: Map<String, Value>) -> Result<Map<String, Value>> {
        let connector_id = generate_connector_id();

        self.generator.add_connector(&connector_id, &data).await?;

        data.insert("id".to_string(), Value::String(connector_id));
        Ok(data)
    }

    /// Update a connector from a definition payload.
    ///
    /// `id` and `regenerate_type` are control fields, not connector data:
    /// both are stripped from the payload before it reaches the generator,
    /// `regenerate_type` (default false) decides whether the table types are
    /// regenerated.
    pub async fn update(
        &self,
        id: &str,
        mut data: Map<String, Value>,
    ) -> Result<Map<String, Value>> {
        data.remove("id");
        let regenerate_types = data
            .remove("regenerate_type")
            .map(|value| truthy(&value))
            .unwrap_or(false);

        self.generator
            .update_connector(id, &data, regenerate_types)
            .await?;

        data.insert("id".to_string(), Value::String(id.to_string()));
        Ok(data)
    }
}

/// Loose boolean coercion for inbound flag values: zero numbers, empty
/// strings, `"0"`, empty containers and null are false, everything else is
/// true (so `"false"` is true, as inbound form payloads have always been
/// coerced).
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Value::String(text) => !text.is_empty() && text != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
        Value::Null => false,
    }
}
