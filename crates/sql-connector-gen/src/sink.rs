//! Data type sink: where generated sources are written to.
//!
//! The generator works against the [`DataTypeSink`] trait so the embedding
//! application decides where generated classes live. [`DataTypeLocation`] is
//! the filesystem implementation matching the target runtime's autoloader
//! layout.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::error::{ConnectorError, Result};

/// Sink for generated data type sources, keyed by fully qualified name.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` and must apply atomic
/// create/replace semantics per fully qualified name so concurrent
/// regenerations never interleave partial writes.
#[async_trait]
pub trait DataTypeSink: Send + Sync {
    /// Write a generated source under its fully qualified name.
    ///
    /// Without `force_replace` an existing artifact is left untouched and
    /// [`ConnectorError::AlreadyExists`] is returned; with `force_replace`
    /// the artifact is overwritten.
    async fn write(&self, fqcn: &str, source: &str, force_replace: bool) -> Result<()>;
}

/// Filesystem sink mapping fully qualified names to `.php` files.
///
/// The configured root namespace prefix is stripped from the name and the
/// remaining segments become directories under the root path, e.g.
/// `<root>\SqlConnector\TestDb\TestData` -> `<dir>/SqlConnector/TestDb/TestData.php`.
#[derive(Debug, Clone)]
pub struct DataTypeLocation {
    root: PathBuf,
    root_namespace: String,
}

impl DataTypeLocation {
    /// Create a location rooted at a directory for a root namespace.
    pub fn new(root: impl Into<PathBuf>, root_namespace: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            root_namespace: root_namespace.into(),
        }
    }

    /// Resolve the file path for a fully qualified name.
    pub fn path_for(&self, fqcn: &str) -> PathBuf {
        let relative = fqcn
            .strip_prefix(&self.root_namespace)
            .unwrap_or(fqcn)
            .trim_start_matches('\\');

        let mut path = self.root.clone();
        for segment in relative.split('\\') {
            path.push(segment);
        }
        path.set_extension("php");
        path
    }

    fn write_atomic(&self, path: &Path, fqcn: &str, source: &str, force_replace: bool) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConnectorError::write(fqcn, e.to_string()))?;
        }

        // Atomic write: stage next to the target under a name unique to this
        // write, so concurrent writers of the same fully qualified name never
        // share a staging file.
        let temp_path = path.with_extension(format!("php.{}.tmp", Uuid::new_v4()));
        std::fs::write(&temp_path, source).map_err(|e| ConnectorError::write(fqcn, e.to_string()))?;

        if force_replace {
            return std::fs::rename(&temp_path, path)
                .map_err(|e| ConnectorError::write(fqcn, e.to_string()));
        }

        // Create-if-absent must hold between check and install: hard_link
        // refuses to replace an existing target, unlike rename.
        let linked = std::fs::hard_link(&temp_path, path);
        let _ = std::fs::remove_file(&temp_path);

        match linked {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(ConnectorError::AlreadyExists(fqcn.to_string()))
            }
            Err(e) => Err(ConnectorError::write(fqcn, e.to_string())),
        }
    }
}

#[async_trait]
impl DataTypeSink for DataTypeLocation {
    async fn write(&self, fqcn: &str, source: &str, force_replace: bool) -> Result<()> {
        let path = self.path_for(fqcn);

        self.write_atomic(&path, fqcn, source, force_replace)?;
        debug!(fqcn, path = %path.display(), force_replace, "wrote generated data type");

        Ok(())
    }
}
