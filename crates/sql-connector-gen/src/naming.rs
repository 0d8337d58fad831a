//! Name derivation for generated data types.

/// Convert a snake/kebab-case name into a PascalCase identifier.
///
/// Underscores, hyphens and spaces are treated as word separators; each word
/// is capitalized and the separators are stripped. The function is total and
/// idempotent on already-titleized input.
pub fn titleize(raw: &str) -> String {
    raw.split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Fully qualified names of the generated row and collection types for one
/// table on one database.
///
/// Derivation is deterministic and needs no schema access:
/// `<root>\SqlConnector\<Titleize(dbname)>\<Titleize(table)>` for the row
/// type and the same with a `Collection` suffix for the collection type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRefs {
    /// Namespace holding both generated classes.
    pub namespace: String,

    /// Row type class name (titleized table name).
    pub row_class: String,

    /// Collection type class name.
    pub collection_class: String,
}

impl TypeRefs {
    /// Derive the generated type names for a table on a database.
    pub fn derive(root_namespace: &str, dbname: &str, table: &str) -> Self {
        let namespace = format!("{}\\SqlConnector\\{}", root_namespace, titleize(dbname));
        let row_class = titleize(table);
        let collection_class = format!("{}Collection", row_class);

        Self {
            namespace,
            row_class,
            collection_class,
        }
    }

    /// Fully qualified name of the row type.
    pub fn row_fqcn(&self) -> String {
        format!("{}\\{}", self.namespace, self.row_class)
    }

    /// Fully qualified name of the collection type.
    pub fn collection_fqcn(&self) -> String {
        format!("{}\\{}", self.namespace, self.collection_class)
    }
}
