//! Rendering of generated data type sources.
//!
//! Pure text synthesis: the generator renders processing type class sources
//! for the target runtime but never loads or executes them. Identical inputs
//! render byte-identical output; iteration follows the [`PropertyMap`] order
//! so repeated generation of an unchanged table is a no-op at the sink.

use crate::schema::{PropertyMap, TableShape};

const TAB: &str = "    ";

const GENERATED_HEADER: &str = "<?php
/*
 * This file was auto generated by the SqlConnector TableConnectorGenerator.
 * Do not edit by hand, regeneration replaces this file.
 */
";

/// Render the row type class source for an introspected table.
///
/// Embeds the native type per property, the processing type prototype per
/// property, the primary key (or `null`) and the platform class of the
/// originating connection.
pub fn render_row_type(
    namespace: &str,
    class_name: &str,
    shape: &TableShape,
    platform_class: &str,
) -> String {
    let has_primary_key = if shape.has_primary_key() {
        "true"
    } else {
        "false"
    };
    let primary_key = match &shape.primary_key {
        Some(key) => format!("\"{}\"", key),
        None => "null".to_string(),
    };

    format!(
        r#"{header}namespace {namespace};

use Prooph\Processing\Type\Description\Description;
use Prooph\Processing\Type\Description\NativeType;
use Prooph\Link\Application\DataType\SqlConnector\TableRow;

class {class_name} extends TableRow
{{
{t}/**
{t} * @var array list of native db types indexed by property name
{t} */
{t}protected static $propertyDbTypes = {db_types};

{t}/**
{t} * @var string database platform class of the originating connection
{t} */
{t}protected static $platformClass = '{platform_class}';

{t}/**
{t} * @return array[propertyName => Prototype]
{t} */
{t}public static function getPropertyPrototypes()
{t}{{
{t}{t}return {prototypes};
{t}}}

{t}/**
{t} * @return Description
{t} */
{t}public static function buildDescription()
{t}{{
{t}{t}return new Description("{class_name}", NativeType::DICTIONARY, {has_primary_key}, {primary_key});
{t}}}
}}"#,
        header = GENERATED_HEADER,
        namespace = namespace,
        class_name = class_name,
        db_types = native_type_map_literal(&shape.properties),
        platform_class = platform_class,
        prototypes = prototype_map_literal(&shape.properties),
        has_primary_key = has_primary_key,
        primary_key = primary_key,
        t = TAB,
    )
}

/// Render the collection type class source for a row type.
pub fn render_collection_type(
    namespace: &str,
    collection_class: &str,
    row_class: &str,
) -> String {
    format!(
        r#"{header}namespace {namespace};

use Prooph\Processing\Type\AbstractCollection;
use Prooph\Processing\Type\Description\Description;
use Prooph\Processing\Type\Description\NativeType;
use Prooph\Processing\Type\Prototype;

class {collection_class} extends AbstractCollection
{{
{t}/**
{t} * Returns the prototype of the items type
{t} *
{t} * A collection has always one property with name item representing the type of all items in the collection.
{t} *
{t} * @return Prototype
{t} */
{t}public static function itemPrototype()
{t}{{
{t}{t}return {row_class}::prototype();
{t}}}

{t}/**
{t} * @return Description
{t} */
{t}public static function buildDescription()
{t}{{
{t}{t}return new Description("{row_class} List", NativeType::COLLECTION, false);
{t}}}
}}"#,
        header = GENERATED_HEADER,
        namespace = namespace,
        collection_class = collection_class,
        row_class = row_class,
        t = TAB,
    )
}

/// Property name -> native type name map literal.
fn native_type_map_literal(properties: &PropertyMap) -> String {
    let mut literal = String::from("[\n");

    for (name, property) in properties {
        literal.push_str(&format!(
            "{t}{t}'{name}' => '{native}',\n",
            t = TAB,
            name = name,
            native = property.native_type,
        ));
    }

    literal.push_str(&format!("\n{t}]", t = TAB));
    literal
}

/// Property name -> processing type prototype map literal.
fn prototype_map_literal(properties: &PropertyMap) -> String {
    let mut literal = String::from("[\n");

    for (name, property) in properties {
        literal.push_str(&format!(
            "{t}{t}{t}'{name}' => \\{processing}::prototype(),\n",
            t = TAB,
            name = name,
            processing = property.processing_type,
        ));
    }

    literal.push_str(&format!("\n{t}{t}]", t = TAB));
    literal
}
