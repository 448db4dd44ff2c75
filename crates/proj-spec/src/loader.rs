//! Loader for `proj.yaml` configuration files.
//!
//! A module root holds one `proj.yaml`. The first YAML document describes
//! the module itself; further `---`-separated documents declare extensions
//! shipped alongside it:
//!
//! ```text
//! my-app/
//!   proj.yaml     # kind: project, then kind: extension documents
//!   lib/
//!     task.js
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::registry::SpecificationRegistry;
use crate::specification::{Specification, SpecificationParams};

/// Name of the configuration file at a module root.
pub const CONFIG_FILENAME: &str = "proj.yaml";

/// Parse every non-empty YAML document in `text` into a raw record.
pub fn parse_documents(path: &Path, text: &str) -> Result<Vec<Value>> {
    let mut records = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(document).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if !value.is_null() {
            records.push(value);
        }
    }
    Ok(records)
}

/// Id of the `index`-th document in a module with id `module_id`.
pub fn document_id(module_id: &str, index: usize) -> String {
    match index {
        0 => module_id.to_string(),
        n => format!("{module_id}#{n}"),
    }
}

/// Loads and initializes the specifications declared by a module.
#[derive(Debug, Clone)]
pub struct SpecificationLoader {
    registry: SpecificationRegistry,
}

impl SpecificationLoader {
    pub fn new(registry: SpecificationRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SpecificationRegistry {
        &self.registry
    }

    /// Canonical module root, checked to be a directory.
    pub fn resolve_module_path(module_path: &Path) -> Result<PathBuf> {
        if !module_path.is_dir() {
            return Err(Error::ConfigNotFound {
                path: module_path.to_path_buf(),
            });
        }
        dunce::canonicalize(module_path).map_err(|e| Error::io(module_path, e))
    }

    /// Read the raw records of `<module_path>/proj.yaml`.
    pub fn read_records(module_path: &Path) -> Result<Vec<Value>> {
        let path = module_path.join(CONFIG_FILENAME);
        if !path.is_file() {
            return Err(Error::ConfigNotFound { path });
        }
        let text = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        let records = parse_documents(&path, &text)?;
        debug!(path = %path.display(), documents = records.len(), "read configuration");
        Ok(records)
    }

    /// Load every specification declared under `module_path`, in file order.
    ///
    /// Initialization stops at the first failing document.
    #[instrument(skip(self, module_path), fields(module_path = %module_path.display()))]
    pub async fn load(
        &self,
        module_path: &Path,
        id: &str,
        version: &str,
    ) -> Result<Vec<Box<dyn Specification>>> {
        let root = Self::resolve_module_path(module_path)?;
        let records = Self::read_records(&root)?;

        let mut specifications = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let params = SpecificationParams::new(document_id(id, index), version, &root, record)?;
            specifications.push(self.registry.create(params).await?);
        }
        Ok(specifications)
    }
}

impl Default for SpecificationLoader {
    fn default() -> Self {
        Self::new(SpecificationRegistry::with_builtins())
    }
}
