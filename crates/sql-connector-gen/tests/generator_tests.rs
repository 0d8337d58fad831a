//! End-to-end tests for connector generation.
//!
//! A fixture connection serves the schema of a `test_data` table on a
//! `test_db` database; generated sources land in a temp directory and
//! dispatched commands are recorded for inspection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};
use tempfile::TempDir;

use sql_connector_gen::{
    generator, ColumnDescriptor, CommandDispatcher, ConfigLocation, ConnectionRegistry,
    ConnectorCommand, ConnectorError, ConnectorResource, DataTypeLocation, DbalConnection,
    IndexDescriptor, Result, SqlConnectorConfig, TableConnectorGenerator,
};

const ROW_FQCN: &str = "Prooph\\Link\\Application\\DataType\\SqlConnector\\TestDb\\TestData";
const COLLECTION_FQCN: &str =
    "Prooph\\Link\\Application\\DataType\\SqlConnector\\TestDb\\TestDataCollection";

const EXPECTED_ROW_SOURCE: &str = r#"<?php
/*
 * This file was auto generated by the SqlConnector TableConnectorGenerator.
 * Do not edit by hand, regeneration replaces this file.
 */
namespace Prooph\Link\Application\DataType\SqlConnector\TestDb;

use Prooph\Processing\Type\Description\Description;
use Prooph\Processing\Type\Description\NativeType;
use Prooph\Link\Application\DataType\SqlConnector\TableRow;

class TestData extends TableRow
{
    /**
     * @var array list of native db types indexed by property name
     */
    protected static $propertyDbTypes = [
        'name' => 'string',
        'age' => 'integer',
        'created_at' => 'datetime',
        'price' => 'float',
        'active' => 'boolean',

    ];

    /**
     * @var string database platform class of the originating connection
     */
    protected static $platformClass = 'Doctrine\DBAL\Platforms\SqlitePlatform';

    /**
     * @return array[propertyName => Prototype]
     */
    public static function getPropertyPrototypes()
    {
        return [
            'name' => \Prooph\Processing\Type\String::prototype(),
            'age' => \Prooph\Processing\Type\Integer::prototype(),
            'created_at' => \Prooph\Processing\Type\DateTime::prototype(),
            'price' => \Prooph\Processing\Type\Float::prototype(),
            'active' => \Prooph\Processing\Type\Boolean::prototype(),

        ];
    }

    /**
     * @return Description
     */
    public static function buildDescription()
    {
        return new Description("TestData", NativeType::DICTIONARY, true, "name");
    }
}"#;

const EXPECTED_COLLECTION_SOURCE: &str = r#"<?php
/*
 * This file was auto generated by the SqlConnector TableConnectorGenerator.
 * Do not edit by hand, regeneration replaces this file.
 */
namespace Prooph\Link\Application\DataType\SqlConnector\TestDb;

use Prooph\Processing\Type\AbstractCollection;
use Prooph\Processing\Type\Description\Description;
use Prooph\Processing\Type\Description\NativeType;
use Prooph\Processing\Type\Prototype;

class TestDataCollection extends AbstractCollection
{
    /**
     * Returns the prototype of the items type
     *
     * A collection has always one property with name item representing the type of all items in the collection.
     *
     * @return Prototype
     */
    public static function itemPrototype()
    {
        return TestData::prototype();
    }

    /**
     * @return Description
     */
    public static function buildDescription()
    {
        return new Description("TestData List", NativeType::COLLECTION, false);
    }
}"#;

/// In-memory connection serving the `test_data` fixture schema and counting
/// introspection calls.
struct FixtureConnection {
    introspections: AtomicUsize,
}

impl FixtureConnection {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            introspections: AtomicUsize::new(0),
        })
    }

    fn introspections(&self) -> usize {
        self.introspections.load(Ordering::SeqCst)
    }

    fn column(name: &str, native_type: &str) -> ColumnDescriptor {
        ColumnDescriptor {
            name: name.to_string(),
            native_type: native_type.to_string(),
            is_nullable: false,
            auto_increment: false,
        }
    }
}

#[async_trait]
impl DbalConnection for FixtureConnection {
    fn database_name(&self) -> &str {
        "test_db"
    }

    fn platform_class(&self) -> &str {
        "Doctrine\\DBAL\\Platforms\\SqlitePlatform"
    }

    async fn list_table_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        self.introspections.fetch_add(1, Ordering::SeqCst);

        if table != "test_data" {
            return Err(ConnectorError::TableNotFound(table.to_string()));
        }

        Ok(vec![
            Self::column("name", "string"),
            Self::column("age", "integer"),
            Self::column("created_at", "datetime"),
            Self::column("price", "float"),
            Self::column("active", "boolean"),
        ])
    }

    async fn list_table_indexes(&self, _table: &str) -> Result<Vec<IndexDescriptor>> {
        Ok(vec![IndexDescriptor {
            name: "primary".to_string(),
            columns: vec!["name".to_string()],
            is_primary: true,
            is_unique: true,
        }])
    }
}

/// Dispatcher recording every command it receives.
#[derive(Default)]
struct RecordingDispatcher {
    commands: Mutex<Vec<ConnectorCommand>>,
}

impl RecordingDispatcher {
    fn commands(&self) -> Vec<ConnectorCommand> {
        self.commands.lock().unwrap().clone()
    }

    fn last(&self) -> ConnectorCommand {
        self.commands().last().cloned().expect("no command dispatched")
    }
}

#[async_trait]
impl CommandDispatcher for RecordingDispatcher {
    async fn dispatch(&self, command: ConnectorCommand) -> Result<()> {
        self.commands.lock().unwrap().push(command);
        Ok(())
    }
}

/// Dispatcher rejecting every command.
struct FailingDispatcher;

#[async_trait]
impl CommandDispatcher for FailingDispatcher {
    async fn dispatch(&self, _command: ConnectorCommand) -> Result<()> {
        Err(ConnectorError::Dispatch("config store unreachable".to_string()))
    }
}

struct Harness {
    dir: TempDir,
    connection: Arc<FixtureConnection>,
    dispatcher: Arc<RecordingDispatcher>,
    generator: Arc<TableConnectorGenerator>,
}

impl Harness {
    fn new() -> Self {
        Self::with_dispatcher(Arc::new(RecordingDispatcher::default()))
    }

    fn with_dispatcher(dispatcher: Arc<RecordingDispatcher>) -> Self {
        let config = SqlConnectorConfig::default();
        let dir = TempDir::new().unwrap();
        let connection = FixtureConnection::new();

        let mut connections = ConnectionRegistry::new();
        connections.add("test_db", connection.clone());

        let generator = Arc::new(TableConnectorGenerator::new(
            connections,
            Arc::new(DataTypeLocation::new(dir.path(), &config.root_namespace)),
            ConfigLocation::from_path("/etc/processing"),
            dispatcher.clone(),
            &config,
        ));

        Self {
            dir,
            connection,
            dispatcher,
            generator,
        }
    }

    fn row_path(&self) -> std::path::PathBuf {
        self.dir.path().join("SqlConnector/TestDb/TestData.php")
    }

    fn collection_path(&self) -> std::path::PathBuf {
        self.dir
            .path()
            .join("SqlConnector/TestDb/TestDataCollection.php")
    }
}

fn definition() -> Map<String, Value> {
    json!({
        "dbal_connection": "test_db",
        "table": "test_data",
        "name": "Test Db Data",
    })
    .as_object()
    .cloned()
    .unwrap()
}

#[tokio::test]
async fn adds_a_new_connector_and_generates_table_types() {
    let harness = Harness::new();

    harness
        .generator
        .add_connector("sqlconnector:::abc", &definition())
        .await
        .unwrap();

    let row_source = std::fs::read_to_string(harness.row_path()).unwrap();
    let collection_source = std::fs::read_to_string(harness.collection_path()).unwrap();
    assert_eq!(row_source, EXPECTED_ROW_SOURCE);
    assert_eq!(collection_source, EXPECTED_COLLECTION_SOURCE);

    match harness.dispatcher.last() {
        ConnectorCommand::AddConnectorToConfig {
            connector_id,
            connector_name,
            allowed_messages,
            allowed_types,
            config_location,
            additional_data,
        } => {
            assert_eq!(connector_id, "sqlconnector:::abc");
            assert_eq!(connector_name, "Test Db Data");
            assert_eq!(allowed_messages, vec!["collect-data", "process-data"]);
            assert_eq!(allowed_types, vec![ROW_FQCN, COLLECTION_FQCN]);
            assert_eq!(config_location, ConfigLocation::from_path("/etc/processing"));

            let expected_additional_data = json!({
                "dbal_connection": "test_db",
                "table": "test_data",
                "icon": generator::ICON,
                "ui_metadata_riot_tag": generator::METADATA_UI_KEY,
            });
            assert_eq!(Value::Object(additional_data), expected_additional_data);
        }
        other => panic!("expected AddConnectorToConfig, got {:?}", other),
    }
}

#[tokio::test]
async fn repeated_add_keeps_existing_generated_types() {
    let harness = Harness::new();
    let id = "sqlconnector:::abc";

    harness.generator.add_connector(id, &definition()).await.unwrap();

    // Tamper with the artifact: a repeated add must not touch it.
    std::fs::write(harness.row_path(), "manually adjusted").unwrap();

    harness.generator.add_connector(id, &definition()).await.unwrap();

    assert_eq!(
        std::fs::read_to_string(harness.row_path()).unwrap(),
        "manually adjusted"
    );
    assert_eq!(harness.dispatcher.commands().len(), 2);
}

#[tokio::test]
async fn add_fails_on_missing_fields_before_any_work() {
    let harness = Harness::new();
    let incomplete = json!({ "table": "x" }).as_object().cloned().unwrap();

    let result = harness.generator.add_connector("sqlconnector:::abc", &incomplete).await;

    assert!(matches!(
        result,
        Err(ConnectorError::MissingField("dbal_connection"))
    ));
    assert_eq!(harness.connection.introspections(), 0);
    assert!(harness.dispatcher.commands().is_empty());
}

#[tokio::test]
async fn add_rejects_non_string_required_field() {
    let harness = Harness::new();
    let mut malformed = definition();
    malformed.insert("table".to_string(), json!(123));

    let result = harness.generator.add_connector("sqlconnector:::abc", &malformed).await;

    assert!(matches!(result, Err(ConnectorError::InvalidField("table"))));
    assert_eq!(harness.connection.introspections(), 0);
    assert!(harness.dispatcher.commands().is_empty());
}

#[tokio::test]
async fn add_fails_for_unknown_connection() {
    let harness = Harness::new();
    let mut foreign = definition();
    foreign.insert("dbal_connection".to_string(), json!("other_db"));

    let result = harness.generator.add_connector("sqlconnector:::abc", &foreign).await;

    assert!(matches!(
        result,
        Err(ConnectorError::UnknownConnection { connection, .. }) if connection == "other_db"
    ));
    assert!(harness.dispatcher.commands().is_empty());
}

#[tokio::test]
async fn update_without_regeneration_never_introspects() {
    let harness = Harness::new();

    harness
        .generator
        .update_connector("sqlconnector:::abc", &definition(), false)
        .await
        .unwrap();

    assert_eq!(harness.connection.introspections(), 0);
    assert!(!harness.row_path().exists());

    match harness.dispatcher.last() {
        ConnectorCommand::ChangeConnectorConfig {
            connector_id,
            payload,
            ..
        } => {
            assert_eq!(connector_id, "sqlconnector:::abc");
            assert_eq!(payload["name"], json!("Test Db Data"));
            assert_eq!(payload["allowed_types"], json!([ROW_FQCN, COLLECTION_FQCN]));
            assert_eq!(
                payload["allowed_messages"],
                json!(["collect-data", "process-data"])
            );
            assert_eq!(payload["icon"], json!(generator::ICON));
            assert_eq!(
                payload["ui_metadata_riot_tag"],
                json!(generator::METADATA_UI_KEY)
            );
        }
        other => panic!("expected ChangeConnectorConfig, got {:?}", other),
    }
}

#[tokio::test]
async fn update_with_regeneration_force_replaces_types() {
    let harness = Harness::new();
    let id = "sqlconnector:::abc";

    harness.generator.add_connector(id, &definition()).await.unwrap();
    std::fs::write(harness.row_path(), "manually adjusted").unwrap();

    harness
        .generator
        .update_connector(id, &definition(), true)
        .await
        .unwrap();

    assert_eq!(harness.connection.introspections(), 2);
    assert_eq!(
        std::fs::read_to_string(harness.row_path()).unwrap(),
        EXPECTED_ROW_SOURCE
    );
    assert_eq!(
        std::fs::read_to_string(harness.collection_path()).unwrap(),
        EXPECTED_COLLECTION_SOURCE
    );
}

#[tokio::test]
async fn dispatch_failure_leaves_generated_artifacts_in_place() {
    let config = SqlConnectorConfig::default();
    let dir = TempDir::new().unwrap();

    let mut connections = ConnectionRegistry::new();
    connections.add("test_db", FixtureConnection::new());

    let generator = TableConnectorGenerator::new(
        connections,
        Arc::new(DataTypeLocation::new(dir.path(), &config.root_namespace)),
        ConfigLocation::from_path("/etc/processing"),
        Arc::new(FailingDispatcher),
        &config,
    );

    let result = generator.add_connector("sqlconnector:::abc", &definition()).await;

    // Write happens before dispatch and is not rolled back.
    assert!(matches!(result, Err(ConnectorError::Dispatch(_))));
    assert!(dir.path().join("SqlConnector/TestDb/TestData.php").exists());
    assert!(dir
        .path()
        .join("SqlConnector/TestDb/TestDataCollection.php")
        .exists());
}

#[tokio::test]
async fn resource_create_populates_generated_id() {
    let harness = Harness::new();
    let resource = ConnectorResource::new(harness.generator.clone());

    let created = resource.create(definition()).await.unwrap();

    let id = created["id"].as_str().unwrap();
    assert!(id.starts_with("sqlconnector:::"));
    assert_eq!(harness.dispatcher.last().connector_id(), id);
    assert_eq!(created["name"], json!("Test Db Data"));
}

#[tokio::test]
async fn resource_update_strips_control_fields() {
    let harness = Harness::new();
    let resource = ConnectorResource::new(harness.generator.clone());

    let mut data = definition();
    data.insert("id".to_string(), json!("stale-id"));
    data.insert("regenerate_type".to_string(), json!("1"));

    let updated = resource.update("sqlconnector:::abc", data).await.unwrap();

    // The truthy regenerate flag reached the generator.
    assert_eq!(harness.connection.introspections(), 1);
    assert_eq!(updated["id"], json!("sqlconnector:::abc"));

    match harness.dispatcher.last() {
        ConnectorCommand::ChangeConnectorConfig { payload, .. } => {
            assert!(!payload.contains_key("regenerate_type"));
            assert!(!payload.contains_key("id"));
        }
        other => panic!("expected ChangeConnectorConfig, got {:?}", other),
    }
}
